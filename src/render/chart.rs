use plotters::coord::ranged1d::Ranged;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use plotters_backend::text_anchor::{HPos, Pos, VPos};
use plotters_backend::BackendCoord;

use crate::style::{LineDash, Marker, SeriesStyle};

use super::fonts::FONT_FAMILY;
use super::path::{dashed_segments, padded_range, plottable};

// ---------------------------------------------------------------------------
// Layout constants (pixels)
// ---------------------------------------------------------------------------

const LEGEND_WIDTH: u32 = 260;
const LEGEND_TOP: i32 = 70;
const LEGEND_ROW: i32 = 26;
const LEGEND_MIN_ROW: i32 = 12;
const LEGEND_PAD: i32 = 14;
const SWATCH_LEN: i32 = 36;

const MARKER_SIZE: i32 = 5;
const GRID_DASH: [u32; 2] = [4, 4];
const X_TICKS: usize = 10;
const Y_TICKS: usize = 8;

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// One plotted dataset.
pub struct ChartLine<'a> {
    /// Legend caption.
    pub caption: String,
    pub values: &'a [f64],
    pub style: &'a SeriesStyle,
}

impl ChartLine<'_> {
    /// `(time, value)` pairs matched by position; unpaired or unplottable
    /// entries are dropped.
    pub fn points<'s>(&'s self, time_axis: &'s [f64]) -> impl Iterator<Item = (f64, f64)> + 's {
        time_axis
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .filter(|&(x, y)| plottable(x) && plottable(y))
    }

    /// Unbroken stretches of [`points`](Self::points). A dropped entry ends
    /// one stretch, so the stroke shows a gap there instead of bridging it.
    pub fn runs(&self, time_axis: &[f64]) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (x, y) in time_axis.iter().copied().zip(self.values.iter().copied()) {
            if plottable(x) && plottable(y) {
                current.push((x, y));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

/// Everything drawn on one image.
pub struct ChartSpec<'a> {
    pub title: String,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub legend_title: &'a str,
    pub time_axis: &'a [f64],
    pub lines: Vec<ChartLine<'a>>,
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw a full chart on `root` and flush it to the backend.
///
/// The right-hand strip of `root` holds the legend; the rest holds the
/// captioned plot with a dashed grid under the data.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (width, _) = root.dim_in_pixel();
    let (plot_area, legend_area) = root.split_horizontally(width.saturating_sub(LEGEND_WIDTH));

    let x_range = padded_range(spec.time_axis.iter().copied());
    let y_range = padded_range(
        spec.lines
            .iter()
            .flat_map(|line| line.points(spec.time_axis).map(|(_, y)| y)),
    );

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(
            &spec.title,
            (FONT_FAMILY, 24).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(X_TICKS)
        .y_labels(Y_TICKS)
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .axis_desc_style((FONT_FAMILY, 18))
        .label_style((FONT_FAMILY, 14))
        .draw()?;

    // Everything below is drawn in pixels relative to `plot_area`.
    let (base_x, base_y) = plot_area.get_base_pixel();
    let to_pixel = |coord: (f64, f64)| {
        let (px, py) = chart.backend_coord(&coord);
        (px - base_x, py - base_y)
    };

    let grid_style = ShapeStyle {
        color: BLACK.mix(0.25),
        filled: false,
        stroke_width: 1,
    };
    let (x_span, y_span) = (chart.x_range(), chart.y_range());
    let coords = chart.as_coord_spec();
    for x in coords.x_spec().key_points(X_TICKS) {
        let edge = [to_pixel((x, y_span.start)), to_pixel((x, y_span.end))];
        draw_dashed(&plot_area, &edge, &GRID_DASH, grid_style)?;
    }
    for y in coords.y_spec().key_points(Y_TICKS) {
        let edge = [to_pixel((x_span.start, y)), to_pixel((x_span.end, y))];
        draw_dashed(&plot_area, &edge, &GRID_DASH, grid_style)?;
    }

    for line in &spec.lines {
        for run in line.runs(spec.time_axis) {
            let pixels: Vec<BackendCoord> = run.into_iter().map(to_pixel).collect();
            draw_dashed(&plot_area, &pixels, dash_pattern(line.style.dash), stroke(line.style))?;
            for &at in &pixels {
                draw_marker(&plot_area, at, line.style)?;
            }
        }
    }

    draw_legend(&legend_area, spec.legend_title, &spec.lines)?;

    root.present()?;
    Ok(())
}

fn stroke(style: &SeriesStyle) -> ShapeStyle {
    ShapeStyle {
        color: style.color.to_rgba(),
        filled: false,
        stroke_width: style.line_width,
    }
}

fn dash_pattern(dash: LineDash) -> &'static [u32] {
    dash.pattern().unwrap_or(&[])
}

fn draw_dashed<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    points: &[BackendCoord],
    pattern: &[u32],
    style: ShapeStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for segment in dashed_segments(points, pattern) {
        area.draw(&PathElement::new(segment, style))?;
    }
    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    (x, y): BackendCoord,
    style: &SeriesStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let fill = style.color.filled();
    let line = style.color.stroke_width(2);
    let s = MARKER_SIZE;

    match style.marker {
        Marker::Circle => area.draw(&Circle::new((x, y), s, fill)),
        Marker::Triangle => area.draw(&TriangleMarker::new((x, y), s + 1, fill)),
        Marker::Square => area.draw(&Rectangle::new(
            [(x - s + 1, y - s + 1), (x + s - 1, y + s - 1)],
            fill,
        )),
        Marker::Diamond => area.draw(&Polygon::new(
            vec![(x, y - s - 1), (x + s, y), (x, y + s + 1), (x - s, y)],
            fill,
        )),
        Marker::Cross => area.draw(&Cross::new((x, y), s, line)),
        Marker::Star => {
            area.draw(&Cross::new((x, y), s - 1, line))?;
            area.draw(&PathElement::new(vec![(x, y - s - 1), (x, y + s + 1)], line))?;
            area.draw(&PathElement::new(vec![(x - s - 1, y), (x + s + 1, y)], line))
        }
    }
}

/// Legend drawn in its own strip so it never covers data.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    lines: &[ChartLine],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if lines.is_empty() {
        return Ok(());
    }

    let left_center = Pos::new(HPos::Left, VPos::Center);
    let title_style =
        TextStyle::from((FONT_FAMILY, 16).into_font().style(FontStyle::Bold)).pos(left_center);
    let label_style = TextStyle::from((FONT_FAMILY, 14).into_font()).pos(left_center);

    let (width, height) = area.dim_in_pixel();
    let layout = LegendLayout::fit(height, lines.len());
    if layout.shown < lines.len() {
        log::warn!(
            "Legend \"{title}\" has room for {} of {} entries",
            layout.shown,
            lines.len()
        );
    }

    area.draw(&Text::new(title, (LEGEND_PAD, LEGEND_TOP), title_style))?;

    for (row, line) in lines.iter().take(layout.shown).enumerate() {
        let y = LEGEND_TOP + layout.row * (row as i32 + 1);
        let swatch = [(LEGEND_PAD, y), (LEGEND_PAD + SWATCH_LEN, y)];
        draw_dashed(area, &swatch, dash_pattern(line.style.dash), stroke(line.style))?;
        draw_marker(area, (LEGEND_PAD + SWATCH_LEN / 2, y), line.style)?;
        area.draw(&Text::new(
            line.caption.as_str(),
            (LEGEND_PAD + SWATCH_LEN + 10, y),
            label_style.clone(),
        ))?;
    }

    let bottom = layout.bottom();
    area.draw(&Rectangle::new(
        [
            (LEGEND_PAD / 2, LEGEND_TOP - LEGEND_ROW / 2),
            (width as i32 - LEGEND_PAD / 2, bottom),
        ],
        BLACK.mix(0.3).stroke_width(1),
    ))
}

/// Row pitch and entry count that keep the legend box inside the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LegendLayout {
    row: i32,
    shown: usize,
}

impl LegendLayout {
    /// Rows shrink from `LEGEND_ROW` down to `LEGEND_MIN_ROW`; entries that
    /// still do not fit are left out.
    fn fit(height: u32, entries: usize) -> Self {
        let room = height as i32 - LEGEND_TOP - LEGEND_PAD / 2;
        if room <= 0 || entries == 0 {
            return LegendLayout { row: LEGEND_ROW, shown: 0 };
        }
        // `row * (entries + 1/2)` must not exceed `room`.
        let wanted = 2 * room / (2 * entries as i32 + 1);
        let row = wanted.clamp(LEGEND_MIN_ROW, LEGEND_ROW);
        let capacity = ((2 * room / row - 1) / 2).max(0) as usize;
        LegendLayout {
            row,
            shown: entries.min(capacity),
        }
    }

    fn bottom(&self) -> i32 {
        LEGEND_TOP + self.row * self.shown as i32 + self.row / 2
    }
}
