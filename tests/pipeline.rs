use std::fs;
use std::path::Path;

use trial_plotter::config::{JobConfig, RunConfig, SeriesKind};
use trial_plotter::data::{self, SourceDescriptor};
use trial_plotter::error::LoadError;
use trial_plotter::pipeline::{run, run_job};
use trial_plotter::render::ImageFormat;

fn write_source(base: &Path, test_dir: &str, file_name: &str, body: &str) {
    let dir = base.join(test_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file_name), body).unwrap();
}

fn names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// A, C present; B missing.
fn abc_fixture(base: &Path) {
    write_source(base, "A", "displacementValues.txt", "0.0 1.0\n1.0 2.0\n");
    write_source(base, "C", "displacementValues.txt", "0.0 5.0\n2.0 6.0\n");
}

#[test]
fn skips_missing_test_and_writes_n_plus_one_images() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("results");
    let output = tmp.path().join("plots").join("displacement");
    abc_fixture(&input);

    let job = JobConfig::new(
        SeriesKind::Displacement,
        &input,
        vec!["A".into(), "B".into(), "C".into()],
        &output,
    );
    let report = run_job(&job).unwrap();

    assert_eq!(report.configured, 3);
    assert_eq!(report.datasets, 2);
    assert_eq!(report.time_points, 3);
    assert_eq!(
        names(&report.written),
        [
            "displacement_test_1.jpg",
            "displacement_test_2.jpg",
            "displacement_all_tests_combined.jpg",
        ]
    );
    for path in &report.written {
        assert_eq!(image::image_dimensions(path).unwrap(), (1000, 600));
    }
}

#[test]
fn loads_the_reference_example() {
    let tmp = tempfile::tempdir().unwrap();
    abc_fixture(tmp.path());

    let sources = SourceDescriptor::for_tests(["A", "B", "C"], "displacementValues.txt");
    let series = data::load(tmp.path(), &sources).unwrap();
    assert_eq!(series.time_axis, vec![0.0, 1.0, 2.0]);
    let values: Vec<&[f64]> = series.datasets.iter().map(|d| d.values.as_slice()).collect();
    assert_eq!(values, [&[1.0, 2.0][..], &[5.0, 6.0][..]]);

    // Same inputs, same answer.
    assert_eq!(data::load(tmp.path(), &sources).unwrap(), series);
}

#[test]
fn malformed_line_fails_the_job_without_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("results");
    let output = tmp.path().join("plots");
    write_source(&input, "A", "navierStokesValues.txt", "0.0 1.0\n");
    write_source(&input, "B", "navierStokesValues.txt", "abc 1.0\n");

    let job = JobConfig::new(
        SeriesKind::NavierStokes,
        &input,
        vec!["A".into(), "B".into()],
        &output,
    );
    let err = run_job(&job).unwrap_err();

    let load_err = err.downcast_ref::<LoadError>().expect("load error in chain");
    assert!(matches!(load_err, LoadError::MalformedLine { line_no: 1, .. }));
    assert!(!output.exists());
}

#[test]
fn empty_batch_succeeds_with_no_images() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("plots");
    let job = JobConfig::new(
        SeriesKind::Displacement,
        tmp.path().join("nothing-here"),
        vec!["x".into(), "y".into()],
        &output,
    );
    let report = run_job(&job).unwrap();
    assert_eq!(report.datasets, 0);
    assert!(report.written.is_empty());
    assert!(!output.exists());
}

#[test]
fn png_output_has_requested_size() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("results");
    write_source(&input, "only", "displacementValues.txt", "0.0 1.0\n0.5 1.5\n1.0 0.5\n");

    let mut job = JobConfig::new(
        SeriesKind::Displacement,
        &input,
        vec!["only".into()],
        tmp.path().join("plots"),
    );
    job.format = ImageFormat::Png;
    job.width = 640;
    job.height = 480;

    let report = run_job(&job).unwrap();
    assert_eq!(
        names(&report.written),
        ["displacement_test_1.png", "displacement_all_tests_combined.png"]
    );
    for path in &report.written {
        assert_eq!(image::image_dimensions(path).unwrap(), (640, 480));
    }
}

#[test]
fn extreme_magnitudes_still_render() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("results");
    write_source(&input, "huge", "displacementValues.txt", "0.0 0.0\n1.0 1.7e308\n2.0 -1.7e308\n");
    write_source(&input, "wide", "displacementValues.txt", "0.0 -1e300\n1.0 1e300\n");

    let mut job = JobConfig::new(
        SeriesKind::Displacement,
        &input,
        vec!["huge".into(), "wide".into()],
        tmp.path().join("plots"),
    );
    job.format = ImageFormat::Svg;

    let report = run_job(&job).unwrap();
    assert_eq!(report.written.len(), 3);
    for path in &report.written {
        assert!(fs::read_to_string(path).unwrap().starts_with("<svg"));
    }
}

#[test]
fn run_executes_jobs_in_order_and_stops_on_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let good_in = tmp.path().join("good");
    let bad_in = tmp.path().join("bad");
    let good_out = tmp.path().join("out_good");
    let bad_out = tmp.path().join("out_bad");
    abc_fixture(&good_in);
    write_source(&bad_in, "A", "navierStokesValues.txt", "0.0 1.0 2.0\n");

    let config_json = serde_json::json!({
        "jobs": [
            {
                "kind": "displacement",
                "base_dir": &good_in,
                "tests": ["A", "B", "C"],
                "output_dir": &good_out,
                "format": "svg"
            },
            {
                "kind": "navier_stokes",
                "base_dir": &bad_in,
                "tests": ["A"],
                "output_dir": &bad_out,
                "format": "svg"
            }
        ]
    });
    let config = RunConfig::from_json(&config_json.to_string()).unwrap();

    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("job 2"));
    assert_eq!(fs::read_dir(&good_out).unwrap().count(), 3);
    assert!(!bad_out.exists());
}
