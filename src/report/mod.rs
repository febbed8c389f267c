//! Report output
//!
//! Completed [`SourceReport`]s go to the console as they finish and, with
//! `--output`, to a JSON file once the whole batch has run.
//!
//! ```text
//! /evidence/disk.E01..E03 (1.5 GiB)
//!   md5       0b6c...
//!   sha2-256  5d1f...
//!   entropy   7.99231045
//! ```

mod types;

pub use types::{SinkResult, SourceReport};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::common::format::file_size;
use crate::error::{DigestError, Result};

/// Console block for one source: header line, then one line per sink
pub fn render(report: &SourceReport) -> String {
    let width = report
        .results
        .iter()
        .map(|entry| entry.sink.len())
        .max()
        .unwrap_or(0);

    let mut out = format!("{} ({})\n", report.source, file_size(report.size));
    for entry in &report.results {
        out.push_str(&format!("  {:<width$}  {}\n", entry.sink, entry.result, width = width));
    }
    out
}

/// Print one report to a console stream
pub fn write_console<W: Write>(out: &mut W, report: &SourceReport) -> Result<()> {
    out.write_all(render(report).as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| DigestError::Report(format!("console: {}", e)))
}

/// Write every report as a pretty-printed JSON array
pub fn write_json(path: &Path, reports: &[SourceReport]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| DigestError::Report(format!("cannot create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| DigestError::Report(format!("cannot write {}: {}", path.display(), e)))?;

    info!(path = %path.display(), reports = reports.len(), "Report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{create_sinks, SinkKind};
    use crate::common::hash::HashAlgorithm;
    use tempfile::TempDir;

    fn sample_report() -> SourceReport {
        let mut sinks = create_sinks(&[SinkKind::Hash(HashAlgorithm::Md5), SinkKind::Entropy]);
        for sink in sinks.iter_mut() {
            sink.process(&[1, 2, 3, 4]).unwrap();
        }
        SourceReport::from_sinks("disk.dd", 4, &sinks)
    }

    #[test]
    fn test_from_sinks_keeps_order() {
        let report = sample_report();
        let names: Vec<&str> = report.results.iter().map(|r| r.sink.as_str()).collect();
        assert_eq!(names, vec!["md5", "entropy"]);
        assert_eq!(report.result("md5"), Some("08d6c05a21512a79a1dfeb9d2a8f262f"));
        assert_eq!(report.result("entropy"), Some("2.00000000"));
        assert_eq!(report.result("sha1"), None);
    }

    #[test]
    fn test_render_console() {
        let rendered = render(&sample_report());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "disk.dd (4 bytes)");
        assert_eq!(lines[1], "  md5      08d6c05a21512a79a1dfeb9d2a8f262f");
        assert_eq!(lines[2], "  entropy  2.00000000");
    }

    #[test]
    fn test_write_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let reports = vec![sample_report()];
        write_json(&path, &reports).unwrap();

        let parsed: Vec<SourceReport> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, reports);
    }

    #[test]
    fn test_write_json_bad_path() {
        let dir = TempDir::new().unwrap();
        let err = write_json(&dir.path().join("missing/report.json"), &[]).unwrap_err();
        assert!(matches!(err, DigestError::Report(_)));
    }
}
