// Command-line shell over the library.
//
// Four subcommands: `inspect` (summary), `lookup` (generated -> original
// resolution), `rewrite` (decode + re-encode normalization), `merge`
// (successive-stage composition). All file handling lives here; the
// library stays purely in-memory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::compose;
use crate::decoder;
use crate::encoder::{self, EncodeOptions};
use crate::types::RawSourceMap;

type CliResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Source map v3 codec and algebra.
#[derive(Parser, Debug)]
#[command(
    name = "oximap",
    version,
    about = "Source map v3 codec and algebra",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output results as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print summary information about a source map.
    Inspect(InspectArgs),
    /// Resolve a generated position to its original positions.
    Lookup(LookupArgs),
    /// Decode and re-encode a map (normalizes the wire form).
    Rewrite(RewriteArgs),
    /// Merge two maps from successive compilation stages.
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Source map file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Source map file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Generated line (0-based).
    line: u32,

    /// Generated column (0-based).
    column: u32,
}

#[derive(Args, Debug)]
struct RewriteArgs {
    /// Input source map file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Map of the first stage (original -> intermediate).
    #[arg(value_hint = ValueHint::FilePath)]
    first: PathBuf,

    /// Map of the second stage (intermediate -> final).
    #[arg(value_hint = ValueHint::FilePath)]
    second: PathBuf,

    /// Output file (default: stdout).
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let force = cli.force;
    let json_output = cli.json_output;
    let result = match cli.command {
        Cmd::Inspect(args) => cmd_inspect(&args, json_output),
        Cmd::Lookup(args) => cmd_lookup(&args, json_output),
        Cmd::Rewrite(args) => cmd_rewrite(&args, force),
        Cmd::Merge(args) => cmd_merge(&args, force),
    };

    if let Err(e) = result {
        eprintln!("oximap: {e}");
        process::exit(1);
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_inspect(args: &InspectArgs, json_output: bool) -> CliResult {
    let raw = load_map(&args.input)?;
    let index = decoder::decode_reverse(&raw)?;

    if json_output {
        let summary = serde_json::json!({
            "file": raw.file,
            "sources": raw.sources,
            "names": raw.names.len(),
            "associations": index.len(),
            "lineCount": raw.line_count,
        });
        println!("{summary}");
    } else {
        println!("file:         {}", raw.file.as_deref().unwrap_or("-"));
        println!("sources:      {}", raw.sources.len());
        for source in &raw.sources {
            println!("  {source}");
        }
        println!("names:        {}", raw.names.len());
        println!("associations: {}", index.len());
    }
    Ok(())
}

fn cmd_lookup(args: &LookupArgs, json_output: bool) -> CliResult {
    let raw = load_map(&args.input)?;
    let index = decoder::decode(&raw)?;
    let hits = index.lookup(args.line, args.column);

    if json_output {
        let rows: Vec<_> = hits
            .iter()
            .map(|pos| {
                serde_json::json!({
                    "source": index.source(pos.src),
                    "line": pos.line,
                    "column": pos.col,
                    "name": pos.name.and_then(|id| index.name(id)),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(rows));
    } else if hits.is_empty() {
        println!("no mapping at {}:{}", args.line, args.column);
    } else {
        for pos in hits {
            let source = index.source(pos.src).unwrap_or("?");
            match pos.name.and_then(|id| index.name(id)) {
                Some(name) => println!("{source}:{}:{} ({name})", pos.line, pos.col),
                None => println!("{source}:{}:{}", pos.line, pos.col),
            }
        }
    }
    Ok(())
}

fn cmd_rewrite(args: &RewriteArgs, force: bool) -> CliResult {
    let raw = load_map(&args.input)?;
    let index = decoder::decode_reverse(&raw)?;
    let opts = EncodeOptions {
        file: raw.file.clone(),
        lines: raw.line_count,
        pretty_print: args.pretty,
        ..Default::default()
    };
    let text = encoder::encode_to_string(&index, &opts)?;
    write_output(args.output.as_deref(), force, &text)
}

fn cmd_merge(args: &MergeArgs, force: bool) -> CliResult {
    let first = decoder::decode_reverse(&load_map(&args.first)?)?;
    let second_raw = load_map(&args.second)?;
    let second = decoder::decode_reverse(&second_raw)?;

    let merged = compose::merge(&first, &second);
    let opts = EncodeOptions {
        file: second_raw.file.clone(),
        pretty_print: args.pretty,
        ..Default::default()
    };
    let text = encoder::encode_to_string(&merged, &opts)?;
    write_output(args.output.as_deref(), force, &text)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_map(path: &Path) -> Result<RawSourceMap, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(RawSourceMap::from_json(&text)?)
}

fn write_output(path: Option<&Path>, force: bool, text: &str) -> CliResult {
    match path {
        Some(path) => {
            if path.exists() && !force {
                return Err(format!(
                    "output file {} exists (use --force to overwrite)",
                    path.display()
                )
                .into());
            }
            fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}
