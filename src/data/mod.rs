/// Data layer: source descriptors, loading, and time-axis merging.
///
/// Architecture:
/// ```text
///  <base>/<test>/<file>   (one per configured test)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  present? → parse lines → samples
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ LoadedSeries  │  merged time axis + Vec<Dataset>
///   └──────────────┘
/// ```

pub mod loader;
pub mod model;

pub use loader::load;
pub use model::{Dataset, LoadedSeries, Sample, SourceDescriptor};
