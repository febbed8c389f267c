//! Expansion of command line paths into digestable files

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{DigestError, Result};
use crate::ewf;

/// Resolve each argument to the files it names, in argument order
///
/// Plain files pass through untouched. Directories are walked in name order
/// when `recursive` is set and are an error otherwise. Inside a directory, the
/// later segments of an image whose primary was found are dropped so the set is
/// digested once. Failures are returned in place so the batch can continue.
pub fn expand(paths: &[PathBuf], recursive: bool) -> Vec<Result<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if !path.is_dir() {
            inputs.push(Ok(path.clone()));
        } else if recursive {
            inputs.extend(walk(path));
        } else {
            inputs.push(Err(DigestError::open(path.display().to_string(), "is a directory")));
        }
    }
    inputs
}

fn walk(root: &Path) -> Vec<Result<PathBuf>> {
    debug!(root = %root.display(), "Walking directory");
    let entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let id = err.path().unwrap_or(root).display().to_string();
                Some(Err(DigestError::open(id, err)))
            }
        })
        .collect();
    skip_secondary_segments(entries)
}

/// Drop later segments of every image whose primary is present, keeping walk order
fn skip_secondary_segments(entries: Vec<Result<PathBuf>>) -> Vec<Result<PathBuf>> {
    let covered: HashSet<PathBuf> = entries
        .iter()
        .filter_map(|entry| entry.as_ref().ok())
        .filter(|path| is_image_primary(path))
        .flat_map(|primary| ewf::list_segments(primary).into_iter().skip(1))
        .collect();

    entries
        .into_iter()
        .filter(|entry| match entry {
            Ok(path) if covered.contains(path) => {
                trace!(path = %path.display(), "Skipping secondary image segment");
                false
            }
            _ => true,
        })
        .collect()
}

fn is_image_primary(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(ewf::format_supported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ok_paths(inputs: Vec<Result<PathBuf>>) -> Vec<PathBuf> {
        inputs.into_iter().map(|input| input.unwrap()).collect()
    }

    #[test]
    fn test_files_pass_through() {
        let paths = vec![PathBuf::from("/nonexistent/a.bin"), PathBuf::from("b.E01")];
        assert_eq!(ok_paths(expand(&paths, false)), paths);
    }

    #[test]
    fn test_directory_requires_recursion() {
        let dir = TempDir::new().unwrap();
        let inputs = expand(&[dir.path().to_path_buf()], false);
        assert_eq!(inputs.len(), 1);
        let err = inputs.into_iter().next().unwrap().unwrap_err();
        assert!(matches!(err, DigestError::SourceOpen { .. }));
        assert!(err.to_string().contains("is a directory"));
    }

    #[test]
    fn test_recursive_walk_is_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.bin"), b"b").unwrap();
        fs::write(dir.path().join("a.bin"), b"a").unwrap();
        fs::write(dir.path().join("nested/c.bin"), b"c").unwrap();

        let found = ok_paths(expand(&[dir.path().to_path_buf()], true));
        assert_eq!(
            found,
            vec![
                dir.path().join("a.bin"),
                dir.path().join("b.bin"),
                dir.path().join("nested/c.bin"),
            ]
        );
    }

    #[test]
    fn test_walk_failures_keep_their_place() {
        let dir = TempDir::new().unwrap();
        for name in ["disk.E01", "disk.E02"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let entries = vec![
            Ok(dir.path().join("a.bin")),
            Err(DigestError::open("unreadable", "permission denied")),
            Ok(dir.path().join("disk.E01")),
            Ok(dir.path().join("disk.E02")),
            Ok(dir.path().join("z.bin")),
        ];

        let kept = skip_secondary_segments(entries);
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[0].as_ref().unwrap(), &dir.path().join("a.bin"));
        assert!(matches!(kept[1], Err(DigestError::SourceOpen { .. })));
        assert_eq!(kept[2].as_ref().unwrap(), &dir.path().join("disk.E01"));
        assert_eq!(kept[3].as_ref().unwrap(), &dir.path().join("z.bin"));
    }

    #[test]
    fn test_secondary_segments_skipped() {
        let dir = TempDir::new().unwrap();
        for name in ["disk.E01", "disk.E02", "disk.E03", "orphan.E02", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let found = ok_paths(expand(&[dir.path().to_path_buf()], true));
        assert_eq!(
            found,
            vec![
                dir.path().join("disk.E01"),
                dir.path().join("notes.txt"),
                dir.path().join("orphan.E02"),
            ]
        );
    }

    #[test]
    fn test_explicit_secondary_segment_kept() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("disk.E01"), b"x").unwrap();
        fs::write(dir.path().join("disk.E02"), b"x").unwrap();
        let paths = vec![dir.path().join("disk.E01"), dir.path().join("disk.E02")];
        assert_eq!(ok_paths(expand(&paths, true)), paths);
    }
}
