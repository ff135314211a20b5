use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{JobConfig, RunConfig};
use crate::data;
use crate::render::{self, fonts};

/// What one job produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub configured: usize,
    pub datasets: usize,
    pub time_points: usize,
    pub written: Vec<PathBuf>,
}

/// Load one kind of result file and render it.
pub fn run_job(job: &JobConfig) -> Result<JobReport> {
    job.validate()?;
    let labels = job.kind.labels();
    let sources = job.sources()?;

    let series = data::load(&job.base_dir, &sources).with_context(|| {
        format!(
            "loading {} results from {}",
            labels.file_prefix,
            job.base_dir.display()
        )
    })?;

    log::info!(
        "{}: {}/{} tests found, {} time points",
        labels.file_prefix,
        series.len(),
        sources.len(),
        series.time_axis.len()
    );
    for label in series.misaligned() {
        log::warn!(
            "{label}: value count differs from the {} merged time points; plotting by position",
            series.time_axis.len()
        );
    }

    let options = job.render_options();
    if series.len() > options.styles.period() {
        log::info!(
            "{} datasets share {} styles; styles repeat from test {}",
            series.len(),
            options.styles.period(),
            options.styles.period() + 1
        );
    }

    let written = render::render_all(&series, &labels, &options, &job.output_dir)
        .with_context(|| format!("rendering {} charts", labels.file_prefix))?;

    Ok(JobReport {
        configured: sources.len(),
        datasets: series.len(),
        time_points: series.time_axis.len(),
        written,
    })
}

/// Install the chart font, then run every job in order.
///
/// The first failing job stops the run; images from earlier jobs stay.
pub fn run(config: &RunConfig) -> Result<Vec<JobReport>> {
    config.validate()?;
    fonts::install(config.font.as_deref()).context("loading chart font")?;

    let mut reports = Vec::with_capacity(config.jobs.len());
    for (i, job) in config.jobs.iter().enumerate() {
        let report = run_job(job).with_context(|| format!("job {} failed", i + 1))?;
        reports.push(report);
    }
    Ok(reports)
}
