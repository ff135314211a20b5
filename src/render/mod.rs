/// Rendering layer: one chart per dataset plus one combined chart.
///
/// ```text
///   LoadedSeries ──► ChartSpec ──► draw_chart ──► TextFallback<Backend> ──► file
///                       ▲
///                  StyleTable[i % len]
/// ```

pub mod backend;
pub mod chart;
pub mod fonts;
pub mod path;

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ChartLabels;
use crate::data::LoadedSeries;
use crate::error::RenderError;
use crate::style::StyleTable;

use backend::TextFallback;
use chart::{draw_chart, ChartLine, ChartSpec};

const LEGEND_TITLE_SINGLE: &str = "Test Case";
const LEGEND_TITLE_COMBINED: &str = "Test Cases";

// ---------------------------------------------------------------------------
// Output options
// ---------------------------------------------------------------------------

/// Image file format, chosen by extension when the backend saves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpg,
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub styles: StyleTable,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Jpg,
            width: 1000,
            height: 600,
            styles: StyleTable::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write one image per dataset, then one combined image, into `output_dir`.
///
/// Returns the written paths in emission order: `<prefix>_test_1 ..
/// <prefix>_test_N`, then `<prefix>_all_tests_combined`. With no datasets
/// nothing is written and the directory is not created.
pub fn render_all(
    series: &LoadedSeries,
    labels: &ChartLabels,
    options: &RenderOptions,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, RenderError> {
    if series.is_empty() {
        log::info!("No datasets for {}; nothing to draw", labels.file_prefix);
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(output_dir).map_err(|source| RenderError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let lines: Vec<ChartLine> = series
        .datasets
        .iter()
        .enumerate()
        .map(|(i, ds)| ChartLine {
            caption: format!("Test {}: {}", i + 1, ds.label),
            values: &ds.values,
            style: options.styles.style(i),
        })
        .collect();

    let mut written = Vec::with_capacity(lines.len() + 1);

    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;
        let spec = ChartSpec {
            title: labels.individual_title(n),
            x_label: &labels.x_label,
            y_label: &labels.y_label,
            legend_title: LEGEND_TITLE_SINGLE,
            time_axis: &series.time_axis,
            lines: vec![ChartLine {
                caption: line.caption.clone(),
                values: line.values,
                style: line.style,
            }],
        };
        let path = output_dir.join(labels.individual_file(n, options.format));
        write_chart(&path, &spec, options)?;
        written.push(path);
    }

    let combined = ChartSpec {
        title: labels.combined_title.clone(),
        x_label: &labels.x_label,
        y_label: &labels.y_label,
        legend_title: LEGEND_TITLE_COMBINED,
        time_axis: &series.time_axis,
        lines,
    };
    let path = output_dir.join(labels.combined_file(options.format));
    write_chart(&path, &combined, options)?;
    written.push(path);

    Ok(written)
}

/// Draw one chart and flush it to `path` before returning.
fn write_chart(path: &Path, spec: &ChartSpec, options: &RenderOptions) -> Result<(), RenderError> {
    let size = (options.width, options.height);
    let drawn = match options.format {
        ImageFormat::Svg => {
            let root = TextFallback::new(SVGBackend::new(path, size)).into_drawing_area();
            draw_chart(&root, spec).map_err(|e| e.to_string())
        }
        ImageFormat::Jpg | ImageFormat::Png => {
            let root = TextFallback::new(BitMapBackend::new(path, size)).into_drawing_area();
            draw_chart(&root, spec).map_err(|e| e.to_string())
        }
    };
    drawn.map_err(|message| RenderError::Draw {
        path: path.to_path_buf(),
        message,
    })?;

    log::info!("Wrote {}", path.display());
    Ok(())
}
