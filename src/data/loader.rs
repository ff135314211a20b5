use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::LoadError;

use super::model::{Dataset, LoadedSeries, Sample, SourceDescriptor};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every available source under `base_dir` and merge their time axes.
///
/// Sources are visited in order. A source whose directory or file is missing
/// is skipped; a malformed line or a read error on a present file aborts the
/// whole load.
///
/// The returned axis is the union of all timestamps read, deduplicated by
/// exact value and sorted ascending. Datasets keep input order.
pub fn load(base_dir: &Path, sources: &[SourceDescriptor]) -> Result<LoadedSeries, LoadError> {
    let mut timestamps: Vec<f64> = Vec::new();
    let mut datasets = Vec::with_capacity(sources.len());

    for source in sources {
        let Some(path) = resolve(base_dir, source) else {
            log::info!("Skipping {source}: no data file under {}", base_dir.display());
            continue;
        };

        let samples = read_samples(&path)?;
        log::debug!("Read {} samples from {}", samples.len(), path.display());

        timestamps.extend(samples.iter().map(|s| s.timestamp));
        datasets.push(Dataset {
            label: source.test_dir.clone(),
            values: samples.iter().map(|s| s.value).collect(),
        });
    }

    Ok(LoadedSeries {
        time_axis: merge_time_axis(timestamps),
        datasets,
    })
}

/// Present/absent lookup for one source.
///
/// A missing test directory and a missing data file are the same case.
pub fn resolve(base_dir: &Path, source: &SourceDescriptor) -> Option<PathBuf> {
    let path = source.path_in(base_dir);
    path.exists().then_some(path)
}

/// Sort ascending and drop exact duplicates.
pub fn merge_time_axis(mut timestamps: Vec<f64>) -> Vec<f64> {
    timestamps.sort_by(f64::total_cmp);
    timestamps.dedup_by(|a, b| a == b);
    timestamps
}

// ---------------------------------------------------------------------------
// Two-column text reader
// ---------------------------------------------------------------------------

/// Read every `<timestamp> <value>` line of one file.
///
/// The file is opened, consumed, and closed before returning. Lines are
/// read as bytes, so text that is not UTF-8 is a malformed line rather
/// than a read failure.
pub fn read_samples(path: &Path) -> Result<Vec<Sample>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let mut samples = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(io_err)? == 0 {
            break;
        }
        line_no += 1;
        let raw = trim_line_end(&buf);
        let sample = std::str::from_utf8(raw)
            .ok()
            .and_then(parse_line)
            .ok_or_else(|| LoadError::MalformedLine {
                path: path.to_path_buf(),
                line_no,
                line: String::from_utf8_lossy(raw).into_owned(),
            })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Strip a trailing `\n` or `\r\n`.
fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Parse exactly two whitespace-separated floats.
pub fn parse_line(line: &str) -> Option<Sample> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(t), Some(v), None) => Some(Sample {
            timestamp: t.parse().ok()?,
            value: v.parse().ok()?,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_source(base: &Path, test_dir: &str, file_name: &str, body: &str) {
        let dir = base.join(test_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file_name), body).unwrap();
    }

    #[test]
    fn parse_line_accepts_two_numbers() {
        assert_eq!(
            parse_line("0.5 1.25"),
            Some(Sample { timestamp: 0.5, value: 1.25 })
        );
        assert_eq!(
            parse_line("  1e-3\t-2.0  "),
            Some(Sample { timestamp: 0.001, value: -2.0 })
        );
    }

    #[test]
    fn parse_line_rejects_malformed() {
        assert_eq!(parse_line("abc 1.0"), None);
        assert_eq!(parse_line("1.0"), None);
        assert_eq!(parse_line("1.0 2.0 3.0"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("1.0,2.0"), None);
    }

    #[test]
    fn merge_time_axis_sorts_and_dedups() {
        let axis = merge_time_axis(vec![2.0, 0.0, 1.0, 0.0, 2.0, 0.5]);
        assert_eq!(axis, vec![0.0, 0.5, 1.0, 2.0]);
        assert!(merge_time_axis(Vec::new()).is_empty());
    }

    #[test]
    fn merge_time_axis_uses_exact_equality() {
        let axis = merge_time_axis(vec![0.1 + 0.2, 0.3]);
        assert_eq!(axis.len(), 2);
    }

    #[test]
    fn load_skips_missing_sources() {
        let tmp = tempfile::tempdir().unwrap();
        write_source(tmp.path(), "A", "v.txt", "0.0 1.0\n1.0 2.0\n");
        // B has a directory but no file; D has nothing at all.
        fs::create_dir_all(tmp.path().join("B")).unwrap();
        write_source(tmp.path(), "C", "v.txt", "0.0 5.0\n2.0 6.0\n");

        let sources = SourceDescriptor::for_tests(["A", "B", "C", "D"], "v.txt");
        let series = load(tmp.path(), &sources).unwrap();

        assert_eq!(series.time_axis, vec![0.0, 1.0, 2.0]);
        let labels: Vec<&str> = series.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["A", "C"]);
        assert_eq!(series.datasets[0].values, vec![1.0, 2.0]);
        assert_eq!(series.datasets[1].values, vec![5.0, 6.0]);
    }

    #[test]
    fn load_keeps_file_order_of_values() {
        let tmp = tempfile::tempdir().unwrap();
        write_source(tmp.path(), "A", "v.txt", "2.0 20.0\n0.0 0.0\n1.0 10.0\n");

        let series = load(tmp.path(), &SourceDescriptor::for_tests(["A"], "v.txt")).unwrap();
        assert_eq!(series.time_axis, vec![0.0, 1.0, 2.0]);
        assert_eq!(series.datasets[0].values, vec![20.0, 0.0, 10.0]);
    }

    #[test]
    fn load_with_nothing_present_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let series = load(tmp.path(), &SourceDescriptor::for_tests(["x", "y"], "v.txt")).unwrap();
        assert!(series.is_empty());
        assert!(series.time_axis.is_empty());
    }

    #[test]
    fn empty_file_yields_empty_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        write_source(tmp.path(), "A", "v.txt", "");
        write_source(tmp.path(), "B", "v.txt", "0.0 1.0\n");

        let series = load(tmp.path(), &SourceDescriptor::for_tests(["A", "B"], "v.txt")).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.datasets[0].is_empty());
        assert_eq!(series.time_axis, vec![0.0]);
        assert_eq!(series.misaligned(), ["A"]);
    }

    #[test]
    fn malformed_line_aborts_with_context() {
        let tmp = tempfile::tempdir().unwrap();
        write_source(tmp.path(), "A", "v.txt", "0.0 1.0\n");
        write_source(tmp.path(), "B", "v.txt", "0.0 1.0\nabc 1.0\n");

        let err = load(tmp.path(), &SourceDescriptor::for_tests(["A", "B"], "v.txt")).unwrap_err();
        match err {
            LoadError::MalformedLine { path, line_no, line } => {
                assert!(path.ends_with("B/v.txt"));
                assert_eq!(line_no, 2);
                assert_eq!(line, "abc 1.0");
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_is_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        write_source(tmp.path(), "A", "v.txt", "0.0 1.0\n\n1.0 2.0\n");

        let err = load(tmp.path(), &SourceDescriptor::for_tests(["A"], "v.txt")).unwrap_err();
        assert!(matches!(err, LoadError::MalformedLine { line_no: 2, .. }));
    }

    #[test]
    fn invalid_utf8_is_a_malformed_line() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("A");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("v.txt"), b"0.0 1.0\n\xff\xfe 2.0\n").unwrap();

        let err = load(tmp.path(), &SourceDescriptor::for_tests(["A"], "v.txt")).unwrap_err();
        match err {
            LoadError::MalformedLine { line_no, line, .. } => {
                assert_eq!(line_no, 2);
                assert!(line.ends_with(" 2.0"));
                assert!(line.contains('\u{fffd}'));
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn crlf_and_missing_final_newline_are_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        write_source(tmp.path(), "A", "v.txt", "0.0 1.0\r\n1.0 2.0");

        let series = load(tmp.path(), &SourceDescriptor::for_tests(["A"], "v.txt")).unwrap();
        assert_eq!(series.datasets[0].values, vec![1.0, 2.0]);
    }

    #[test]
    fn unreadable_present_source_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        // The data "file" is a directory: it exists, but cannot be read as text.
        fs::create_dir_all(tmp.path().join("A").join("v.txt")).unwrap();

        let err = load(tmp.path(), &SourceDescriptor::for_tests(["A"], "v.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
