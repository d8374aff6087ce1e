// Path collaborator for the encoder's `sources` relativization policy.
//
// Kept behind this seam, away from segment arithmetic: the encoder only
// calls `PathRelativizer::rewrite`. Two path classes exist: archive-
// embedded paths (jar-style `!/` separator) rewrite relative to the
// archive root; plain filesystem paths relativize against a configured
// base directory.

use std::collections::HashMap;
use std::path::{Component, Path};

/// Conventional separator between an archive file and the path embedded
/// in it (`lib.jar!/project/core.cljs`).
pub const ARCHIVE_SEPARATOR: &str = "!/";

/// Whether `path` points inside an archive.
pub fn is_archive_embedded(path: &str) -> bool {
    path.contains(ARCHIVE_SEPARATOR)
}

/// The component after the archive separator, relative to the archive
/// root. Paths without a separator pass through unchanged.
pub fn archive_relative(path: &str) -> &str {
    match path.find(ARCHIVE_SEPARATOR) {
        Some(i) => &path[i + ARCHIVE_SEPARATOR.len()..],
        None => path,
    }
}

/// Relativize `path` against the directory `base`: strip the shared
/// component prefix and step up with `..` for what remains of `base`.
pub fn relativize(path: &str, base: &str) -> String {
    let path_comps: Vec<Component<'_>> = Path::new(path).components().collect();
    let base_comps: Vec<Component<'_>> = Path::new(base).components().collect();

    let common = path_comps
        .iter()
        .zip(&base_comps)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base_comps.len() {
        parts.push("..".to_string());
    }
    for comp in &path_comps[common..] {
        parts.push(comp.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Source-path rewriting policy, assembled by the encoder from its
/// options.
#[derive(Debug, Clone, Default)]
pub struct PathRelativizer {
    /// Explicit path -> relative-path overrides, consulted first.
    pub relpaths: HashMap<String, String>,
    /// Base directory plain paths relativize against. `None` passes
    /// plain paths through unchanged.
    pub base: Option<String>,
}

impl PathRelativizer {
    pub fn rewrite(&self, source: &str) -> String {
        if let Some(mapped) = self.relpaths.get(source) {
            return mapped.clone();
        }
        if is_archive_embedded(source) {
            return archive_relative(source).to_string();
        }
        match &self.base {
            Some(base) => relativize(source, base),
            None => source.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_detection() {
        assert!(is_archive_embedded("deps/lib.jar!/project/core.cljs"));
        assert!(!is_archive_embedded("src/project/core.cljs"));
    }

    #[test]
    fn archive_paths_rewrite_to_the_embedded_component() {
        assert_eq!(
            archive_relative("deps/lib.jar!/project/core.cljs"),
            "project/core.cljs"
        );
        assert_eq!(archive_relative("plain/path.cljs"), "plain/path.cljs");
    }

    #[test]
    fn relativize_strips_common_prefix() {
        assert_eq!(relativize("/work/src/core.cljs", "/work/out"), "../src/core.cljs");
        assert_eq!(relativize("/work/out/core.js", "/work/out"), "core.js");
        assert_eq!(relativize("/work/out", "/work/out"), ".");
    }

    #[test]
    fn overrides_win_over_both_rules() {
        let rel = PathRelativizer {
            relpaths: HashMap::from([(
                "deps/lib.jar!/project/core.cljs".to_string(),
                "vendored/core.cljs".to_string(),
            )]),
            base: Some("/work/out".to_string()),
        };
        assert_eq!(
            rel.rewrite("deps/lib.jar!/project/core.cljs"),
            "vendored/core.cljs"
        );
        assert_eq!(rel.rewrite("/work/src/a.cljs"), "../src/a.cljs");
    }

    #[test]
    fn no_base_passes_plain_paths_through() {
        let rel = PathRelativizer::default();
        assert_eq!(rel.rewrite("src/a.cljs"), "src/a.cljs");
    }
}
