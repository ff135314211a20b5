use std::ops::Range;

use plotters_backend::BackendCoord;

/// Fraction of the data span added on both sides of an axis.
const AXIS_MARGIN: f64 = 0.05;

/// Largest magnitude an axis may reach. plotters' tick generation does
/// not terminate on spans near `f64::MAX`.
pub const AXIS_LIMIT: f64 = 1e300;

/// Smallest padding relative to the largest magnitude on the axis. Tick
/// steps must stay well above the spacing of representable values.
const MIN_RELATIVE_PAD: f64 = 1e-9;

/// Whether a value can be placed on a chart axis.
pub fn plottable(v: f64) -> bool {
    v.is_finite() && v.abs() <= AXIS_LIMIT
}

/// Axis range covering every plottable value, with a small margin.
///
/// No plottable values gives `0.0..1.0`. A single distinct value is widened
/// by half a unit, or by the margin fraction of its magnitude if larger.
/// Bounds never exceed [`AXIS_LIMIT`].
pub fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|&v| plottable(v))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return 0.0..1.0;
    }
    let magnitude = lo.abs().max(hi.abs());
    let pad = if hi > lo {
        ((hi - lo) * AXIS_MARGIN).max(magnitude * MIN_RELATIVE_PAD)
    } else {
        (magnitude * AXIS_MARGIN).max(0.5)
    };
    (lo - pad).max(-AXIS_LIMIT)..(hi + pad).min(AXIS_LIMIT)
}

/// Split a pixel polyline into the "on" pieces of a dash pattern.
///
/// `pattern` alternates on and off lengths in pixels and starts "on". The
/// pattern phase carries over across polyline corners. An empty or all-zero
/// pattern draws the whole polyline.
pub fn dashed_segments(points: &[BackendCoord], pattern: &[u32]) -> Vec<Vec<BackendCoord>> {
    if points.len() < 2 {
        return Vec::new();
    }
    if pattern.iter().all(|&len| len == 0) {
        return vec![points.to_vec()];
    }

    let mut segments = Vec::new();
    let mut phase = 0usize;
    let mut left = pattern[0] as f64;
    let mut current: Vec<BackendCoord> = vec![points[0]];

    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let dx = (to.0 - from.0) as f64;
        let dy = (to.1 - from.1) as f64;
        let len = dx.hypot(dy);
        let mut travelled = 0.0;

        while len - travelled > left {
            travelled += left;
            let t = travelled / len;
            let at = (
                from.0 + (dx * t).round() as i32,
                from.1 + (dy * t).round() as i32,
            );
            if phase % 2 == 0 {
                current.push(at);
                segments.push(std::mem::take(&mut current));
            } else {
                current = vec![at];
            }
            phase = (phase + 1) % pattern.len();
            left = pattern[phase] as f64;
        }

        left -= len - travelled;
        if phase % 2 == 0 {
            current.push(to);
        }
    }

    if phase % 2 == 0 && current.len() >= 2 {
        segments.push(current);
    }
    segments
}
