//! Batch plotting of per-test time series that share one merged time axis.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod style;
