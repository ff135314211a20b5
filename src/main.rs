use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use trial_plotter::config::{JobConfig, RunConfig, SeriesKind};
use trial_plotter::pipeline;
use trial_plotter::render::ImageFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot per-test time series against one merged time axis")]
struct Cli {
    /// JSON run file listing one or more jobs.
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["kind", "base_dir", "output_dir", "tests", "file_name"])]
    config: Option<PathBuf>,

    /// Result kind for a single job given on the command line.
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Directory containing one subdirectory per test.
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Where the images go (created if missing).
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Test subdirectory, in plotting order. Repeat for each test.
    #[arg(long = "test", value_name = "NAME")]
    tests: Vec<String>,

    /// Data file name inside each test directory (defaults per kind).
    #[arg(long)]
    file_name: Option<String>,

    #[arg(long, value_enum)]
    format: Option<ImageFormat>,

    /// TrueType font for chart text.
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Displacement,
    NavierStokes,
}

impl Cli {
    fn into_run_config(self) -> Result<RunConfig> {
        let mut config = match self.config {
            Some(path) => RunConfig::from_path(&path)?,
            None => {
                let (Some(kind), Some(base_dir), Some(output_dir)) =
                    (self.kind, self.base_dir, self.output_dir)
                else {
                    bail!("either --config or all of --kind, --base-dir, --output-dir and --test are required");
                };
                let kind = match kind {
                    KindArg::Displacement => SeriesKind::Displacement,
                    KindArg::NavierStokes => SeriesKind::NavierStokes,
                };
                let mut job = JobConfig::new(kind, base_dir, self.tests, output_dir);
                job.file_name = self.file_name;
                RunConfig {
                    jobs: vec![job],
                    font: None,
                }
            }
        };

        if let Some(format) = self.format {
            for job in &mut config.jobs {
                job.format = format;
            }
        }
        if self.font.is_some() {
            config.font = self.font;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_run_config()?;
    let reports = pipeline::run(&config)?;

    for report in &reports {
        log::info!(
            "{} of {} tests plotted over {} time points, {} images",
            report.datasets,
            report.configured,
            report.time_points,
            report.written.len()
        );
    }
    Ok(())
}
