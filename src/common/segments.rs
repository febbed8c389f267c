// Segment discovery for multi-part EWF images
//
// A set starts at its primary segment (.E01, .L01, .S01, .Ex01, .Lx01) and
// continues with siblings sharing the stem and letter prefix:
// .E01, .E02, ..., .E99, then .EAA, .EAB, ..., .EZZ

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

fn primary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\.([els]x?)01$").expect("primary segment pattern is valid")
    })
}

/// Check whether a file name is the primary segment of a supported EWF set
pub fn format_supported(name: &str) -> bool {
    primary_pattern().is_match(name)
}

/// Letter prefix of a primary segment's extension ("E", "e", "Ex", "Lx", ...)
fn segment_prefix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    primary_pattern()
        .captures(name)
        .map(|captures| captures[1].to_string())
}

/// Extension suffix for the n-th segment (1-based), or None past the last one
fn segment_suffix(n: usize, uppercase: bool) -> Option<String> {
    match n {
        1..=99 => Some(format!("{:02}", n)),
        100..=775 => {
            // 676 two-letter suffixes: AA..ZZ
            let index = n - 100;
            let first = (b'A' + (index / 26) as u8) as char;
            let second = (b'A' + (index % 26) as u8) as char;
            let suffix = format!("{}{}", first, second);
            Some(if uppercase { suffix } else { suffix.to_lowercase() })
        }
        _ => None,
    }
}

/// Resolve a segment path to its full, ordered set of segment files
///
/// A primary segment is expanded to every consecutive sibling that exists; any
/// other path resolves to itself only.
pub fn discover_ewf_segments(path: &Path) -> Vec<PathBuf> {
    debug!(path = %path.display(), "Discovering EWF segments");
    let prefix = match segment_prefix(path) {
        Some(prefix) => prefix,
        None => return vec![path.to_path_buf()],
    };

    let uppercase = prefix.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    let mut paths = vec![path.to_path_buf()];

    for n in 2.. {
        let suffix = match segment_suffix(n, uppercase) {
            Some(suffix) => suffix,
            None => break,
        };
        let candidate = path.with_extension(format!("{}{}", prefix, suffix));
        if candidate.is_file() {
            trace!(segment = n, path = %candidate.display(), "Found EWF segment");
            paths.push(candidate);
        } else {
            break;
        }
    }

    debug!(segment_count = paths.len(), "EWF segments discovered");
    paths
}

/// Human-readable identifier for a segment set: "image.E01..E03"
pub fn describe_segments(paths: &[PathBuf]) -> String {
    let first = match paths.first() {
        Some(first) => first.display().to_string(),
        None => return String::new(),
    };
    match paths.last().and_then(|last| last.extension()) {
        Some(extension) if paths.len() > 1 => {
            format!("{}..{}", first, extension.to_string_lossy())
        }
        _ => first,
    }
}
