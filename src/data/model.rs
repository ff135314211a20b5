use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SourceDescriptor – where one test's results are expected to live
// ---------------------------------------------------------------------------

/// One test's expected data location: `<base>/<test_dir>/<file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Test directory name (human-chosen, used as the dataset label).
    pub test_dir: String,
    /// Fixed data file name inside the test directory.
    pub file_name: String,
}

impl SourceDescriptor {
    pub fn new(test_dir: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            test_dir: test_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Build one descriptor per test directory, all sharing `file_name`.
    pub fn for_tests<I, S>(tests: I, file_name: &str) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tests
            .into_iter()
            .map(|t| SourceDescriptor::new(t, file_name))
            .collect()
    }

    /// The path this descriptor points at, whether or not it exists.
    pub fn path_in(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.test_dir).join(&self.file_name)
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.test_dir, self.file_name)
    }
}

// ---------------------------------------------------------------------------
// Sample – one parsed line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: f64,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Dataset – one test's values, in file order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Test directory the values were read from.
    pub label: String,
    /// Values in the order their lines appear in the file.
    pub values: Vec<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// LoadedSeries – the merged axis plus every dataset that was found
// ---------------------------------------------------------------------------

/// Output of the loader and the renderer's only input.
///
/// `time_axis` is strictly increasing. Each dataset is plotted positionally
/// against it; nothing checks that a test's own timestamps match the axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSeries {
    pub time_axis: Vec<f64>,
    pub datasets: Vec<Dataset>,
}

impl LoadedSeries {
    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether no source was found.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Labels of datasets whose length differs from the merged axis.
    pub fn misaligned(&self) -> Vec<&str> {
        self.datasets
            .iter()
            .filter(|ds| ds.len() != self.time_axis.len())
            .map(|ds| ds.label.as_str())
            .collect()
    }
}
