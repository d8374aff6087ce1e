fn main() {
    #[cfg(feature = "cli")]
    oximap::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("oximap: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
