use std::str::FromStr;

use palette::rgb::FromHexError;
use palette::Srgb;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Per-series style primitives
// ---------------------------------------------------------------------------

/// Point marker drawn at every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Triangle,
    Square,
    Diamond,
    Cross,
    Star,
}

/// Stroke pattern of the connecting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineDash {
    /// Alternating on/off lengths in pixels, or `None` for a solid stroke.
    pub fn pattern(self) -> Option<&'static [u32]> {
        match self {
            LineDash::Solid => None,
            LineDash::Dashed => Some(&[12, 6]),
            LineDash::DashDot => Some(&[12, 5, 3, 5]),
            LineDash::Dotted => Some(&[3, 5]),
        }
    }
}

/// Everything needed to draw one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub marker: Marker,
    pub dash: LineDash,
    pub line_width: u32,
}

// ---------------------------------------------------------------------------
// StyleTable – fixed, index-addressed, wraps around
// ---------------------------------------------------------------------------

const DEFAULT_TABLE: [(&str, Marker, LineDash); 6] = [
    ("#1f77b4", Marker::Circle, LineDash::Solid),
    ("#ff7f0e", Marker::Triangle, LineDash::Dashed),
    ("#2ca02c", Marker::Square, LineDash::DashDot),
    ("#d62728", Marker::Diamond, LineDash::Dotted),
    ("#9467bd", Marker::Cross, LineDash::Solid),
    ("#8c564b", Marker::Star, LineDash::Dashed),
];

pub const DEFAULT_LINE_WIDTH: u32 = 2;

const FALLBACK_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Styles indexed by dataset position.
///
/// Lookups past the end wrap, so any number of datasets can be drawn.
#[derive(Debug, Clone)]
pub struct StyleTable {
    entries: Vec<SeriesStyle>,
}

impl Default for StyleTable {
    fn default() -> Self {
        let entries = DEFAULT_TABLE
            .iter()
            .map(|&(hex, marker, dash)| SeriesStyle {
                color: hex_color(hex),
                marker,
                dash,
                line_width: DEFAULT_LINE_WIDTH,
            })
            .collect();
        StyleTable { entries }
    }
}

impl StyleTable {
    /// Build a table from explicit entries. Returns `None` when empty.
    pub fn from_entries(entries: Vec<SeriesStyle>) -> Option<Self> {
        (!entries.is_empty()).then_some(StyleTable { entries })
    }

    /// Style for the dataset at `index`.
    pub fn style(&self, index: usize) -> &SeriesStyle {
        &self.entries[index % self.entries.len()]
    }

    /// Number of datasets after which styles repeat.
    pub fn period(&self) -> usize {
        self.entries.len()
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into a plotters colour.
pub fn parse_hex(hex: &str) -> Result<RGBColor, FromHexError> {
    let rgb = Srgb::<u8>::from_str(hex)?;
    Ok(RGBColor(rgb.red, rgb.green, rgb.blue))
}

/// Like [`parse_hex`], but gray if the string is not hex.
pub fn hex_color(hex: &str) -> RGBColor {
    match parse_hex(hex) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("Invalid colour {hex:?}: {e}");
            FALLBACK_COLOR
        }
    }
}
