use std::path::PathBuf;

/// Failures while reading per-test result files.
///
/// A missing source is not represented here: it is skipped by the loader.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line_no}: expected `<timestamp> <value>`, got {line:?}")]
    MalformedLine {
        path: PathBuf,
        /// 1-based line number.
        line_no: usize,
        line: String,
    },
}

/// Failures while drawing or writing chart images.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to draw {path}: {message}")]
    Draw { path: PathBuf, message: String },
}

/// Invalid or unreadable run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
