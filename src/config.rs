use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::SourceDescriptor;
use crate::error::ConfigError;
use crate::render::{ImageFormat, RenderOptions};
use crate::style::{self, LineDash, Marker, SeriesStyle, StyleTable};

const DEFAULT_WIDTH: u32 = 1000;
const DEFAULT_HEIGHT: u32 = 600;

fn default_x_label() -> String {
    "Time (s)".to_string()
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_line_width() -> u32 {
    style::DEFAULT_LINE_WIDTH
}

// ---------------------------------------------------------------------------
// ChartLabels – per-kind wording and file naming
// ---------------------------------------------------------------------------

/// Titles, axis labels, and naming for one kind of result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLabels {
    /// Data file expected inside every test directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Prefix of every image written, e.g. `displacement`.
    pub file_prefix: String,
    /// Title of a single-test chart; `{n}` becomes the 1-based test number.
    pub individual_title: String,
    pub combined_title: String,
    #[serde(default = "default_x_label")]
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    pub fn displacement() -> Self {
        ChartLabels {
            file_name: Some("displacementValues.txt".into()),
            file_prefix: "displacement".into(),
            individual_title: "Displacement of Test {n} Over Time".into(),
            combined_title: "Displacement of Different Trials Over Time".into(),
            x_label: default_x_label(),
            y_label: "Displacement (mm)".into(),
        }
    }

    pub fn navier_stokes() -> Self {
        ChartLabels {
            file_name: Some("navierStokesValues.txt".into()),
            file_prefix: "navier_stokes".into(),
            individual_title: "Navier-Stokes Parameters of Test {n} Over Time".into(),
            combined_title: "Navier-Stokes Parameters Over Time for All Tests".into(),
            x_label: default_x_label(),
            y_label: "Navier-Stokes Variable (units)".into(),
        }
    }

    pub fn individual_title(&self, n: usize) -> String {
        self.individual_title.replace("{n}", &n.to_string())
    }

    /// `<prefix>_test_<n>.<ext>`, numbered from 1.
    pub fn individual_file(&self, n: usize, format: ImageFormat) -> String {
        format!("{}_test_{n}.{}", self.file_prefix, format.extension())
    }

    pub fn combined_file(&self, format: ImageFormat) -> String {
        format!("{}_all_tests_combined.{}", self.file_prefix, format.extension())
    }
}

// ---------------------------------------------------------------------------
// SeriesKind
// ---------------------------------------------------------------------------

/// Which result file a job plots.
///
/// In JSON: `"displacement"`, `"navier_stokes"`, or `{"custom": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Displacement,
    NavierStokes,
    Custom(ChartLabels),
}

impl SeriesKind {
    pub fn labels(&self) -> ChartLabels {
        match self {
            SeriesKind::Displacement => ChartLabels::displacement(),
            SeriesKind::NavierStokes => ChartLabels::navier_stokes(),
            SeriesKind::Custom(labels) => labels.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// StyleEntry – one row of a custom style table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleEntry {
    /// `#rrggbb`.
    pub color: String,
    pub marker: Marker,
    pub dash: LineDash,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
}

impl StyleEntry {
    pub fn to_style(&self) -> SeriesStyle {
        SeriesStyle {
            color: style::hex_color(&self.color),
            marker: self.marker,
            dash: self.dash,
            line_width: self.line_width,
        }
    }
}

// ---------------------------------------------------------------------------
// JobConfig – one loader + renderer pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub kind: SeriesKind,
    /// Directory holding one subdirectory per test.
    pub base_dir: PathBuf,
    /// Test subdirectory names, in plotting order.
    pub tests: Vec<String>,
    /// Overrides the kind's data file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub format: ImageFormat,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Replaces the default style table; lookups wrap the same way.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<StyleEntry>,
}

impl JobConfig {
    pub fn new(kind: SeriesKind, base_dir: impl Into<PathBuf>, tests: Vec<String>, output_dir: impl Into<PathBuf>) -> Self {
        JobConfig {
            kind,
            base_dir: base_dir.into(),
            tests,
            file_name: None,
            output_dir: output_dir.into(),
            format: ImageFormat::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            styles: Vec::new(),
        }
    }

    /// Explicit file name first, then the kind's default.
    pub fn data_file_name(&self) -> Option<String> {
        self.file_name.clone().or_else(|| self.kind.labels().file_name)
    }

    /// One descriptor per configured test, in order.
    pub fn sources(&self) -> Result<Vec<SourceDescriptor>, ConfigError> {
        let file_name = self.data_file_name().ok_or_else(|| {
            ConfigError::Invalid("custom kind needs a `file_name`".to_string())
        })?;
        Ok(SourceDescriptor::for_tests(self.tests.iter().cloned(), &file_name))
    }

    pub fn render_options(&self) -> RenderOptions {
        let styles =
            StyleTable::from_entries(self.styles.iter().map(StyleEntry::to_style).collect())
                .unwrap_or_default();
        RenderOptions {
            format: self.format,
            width: self.width,
            height: self.height,
            styles,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tests.is_empty() {
            return Err(ConfigError::Invalid("job lists no tests".into()));
        }
        if let Some(blank) = self.tests.iter().position(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("test #{} has an empty name", blank + 1)));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir is empty".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size {}x{} is empty",
                self.width, self.height
            )));
        }
        for (i, entry) in self.styles.iter().enumerate() {
            if let Err(e) = style::parse_hex(&entry.color) {
                return Err(ConfigError::Invalid(format!(
                    "style #{}: colour {:?}: {e}",
                    i + 1,
                    entry.color
                )));
            }
            if entry.line_width == 0 {
                return Err(ConfigError::Invalid(format!("style #{} has zero line width", i + 1)));
            }
        }
        match self.data_file_name() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::Invalid("custom kind needs a `file_name`".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// RunConfig – the whole run file
// ---------------------------------------------------------------------------

/// Jobs run in order; a failing job stops the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub jobs: Vec<JobConfig>,
    /// TrueType font for chart text; system fonts are searched when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs.is_empty() {
            return Err(ConfigError::Invalid("no jobs configured".into()));
        }
        for (i, job) in self.jobs.iter().enumerate() {
            job.validate()
                .map_err(|e| ConfigError::Invalid(format!("job {}: {e}", i + 1)))?;
        }
        Ok(())
    }
}
