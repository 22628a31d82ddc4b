//! Pitch break map rendering.
//!
//! A single unfaceted panel per pitcher plotting horizontal break against
//! induced vertical break, with the same density-or-scatter layer policy as
//! the location map. Axis extents are fixed so maps stay comparable across
//! pitchers.

use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::models::schema::TableSchema;
use crate::models::PitchRecord;
use crate::services::cohort::{self, PitcherGroup};
use crate::services::density::{self, Bounds, LayerPlan};
use crate::services::draw::{dash_segments, density_cells, equal_aspect_ranges};
use crate::services::palette::PitchPalette;

/// Break axes extent in inches, shared by both axes.
pub const BREAK_RANGE: (f64, f64) = (-25.0, 25.0);

/// Reference grid line spacing in inches.
const GRID_STEP: f64 = 5.0;

type BreakChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render the break map for one pitcher. Overwrites `out_path` if present.
pub fn render_break_map(
    group: &PitcherGroup<'_>,
    out_path: &Path,
    config: &ReportConfig,
    palette: &PitchPalette,
    schema: &TableSchema,
) -> Result<()> {
    draw_break_map(group, out_path, config, palette, schema)
        .map_err(|e| ReportError::render(out_path, e))
}

fn draw_break_map(
    group: &PitcherGroup<'_>,
    out_path: &Path,
    config: &ReportConfig,
    palette: &PitchPalette,
    schema: &TableSchema,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(out_path, config.break_map_size).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = format!("Pitch Break Map for Pitcher ID: {}", group.pitcher_id);

    // Probe layout first so the data ranges can be padded to equal aspect;
    // the label areas make the inner plot slightly non-square even though
    // the canvas and the break extents are.
    let (inner_w, inner_h) = ChartBuilder::on(&root)
        .caption(&caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)?
        .plotting_area()
        .dim_in_pixel();
    let (x_range, y_range) = equal_aspect_ranges(BREAK_RANGE, BREAK_RANGE, inner_w, inner_h);

    let mut chart = ChartBuilder::on(&root)
        .caption(&caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Horizontal Break (in)")
        .y_desc("Induced Vertical Break (in)")
        .draw()?;

    draw_reference_grid(&mut chart)?;

    let plottable: Vec<(f64, f64)> = group
        .rows
        .iter()
        .filter_map(|r| r.break_point())
        .collect();
    if plottable.is_empty() {
        let style = ("sans-serif", 18)
            .into_font()
            .color(&BLACK.mix(0.7))
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(std::iter::once(Text::new(
            "No break data".to_string(),
            (0.0, 0.0),
            style,
        )))?;
        root.present()?;
        return Ok(());
    }

    let bounds = Bounds::new(BREAK_RANGE.0, BREAK_RANGE.1, BREAK_RANGE.0, BREAK_RANGE.1);
    let mut legend_labels: Vec<String> = Vec::new();

    let refs: Vec<&PitchRecord> = group.rows.to_vec();
    for cohort in cohort::group_by_type(&refs, schema) {
        let points: Vec<(f64, f64)> = cohort
            .rows
            .iter()
            .filter_map(|r| r.break_point())
            .collect();
        if points.is_empty() {
            continue;
        }

        let point_color = palette.point_color(&cohort.pitch_type);
        match density::plan_layer(points.len()) {
            LayerPlan::Density { bandwidth_adjust } => {
                let grid = density::estimate(
                    &points,
                    &bounds,
                    config.kde_grid.0,
                    config.kde_grid.1,
                    bandwidth_adjust,
                );
                chart.draw_series(density_cells(
                    &grid,
                    config.contour_threshold,
                    palette.ramp(&cohort.pitch_type),
                ))?;
            }
            LayerPlan::Scatter => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, point_color.mix(0.5).filled())),
                )?;
                chart.draw_series(points.iter().map(|&(x, y)| {
                    Circle::new((x, y), 4, ShapeStyle::from(&BLACK.mix(0.8)).stroke_width(1))
                }))?;
            }
        }

        let n = points.len();
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n as f64;
        let label = format!("{} Avg: {} pitches", cohort.pitch_type, n);
        let series = chart.draw_series(std::iter::once(Circle::new(
            (mean_x, mean_y),
            6,
            point_color.filled(),
        )))?;
        if !legend_labels.contains(&label) {
            legend_labels.push(label.clone());
            series
                .label(label)
                .legend(move |(x, y)| Circle::new((x, y), 4, point_color.filled()));
        }
    }

    if !legend_labels.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Dashed reference grid every 5 inches, with the zero lines darker so the
/// break quadrants read at a glance.
fn draw_reference_grid(
    chart: &mut BreakChart<'_, '_>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut tick = BREAK_RANGE.0 + GRID_STEP;
    while tick < BREAK_RANGE.1 {
        let weight = if tick == 0.0 {
            BLACK.mix(0.6)
        } else {
            BLACK.mix(0.2)
        };
        for segment in dash_segments((tick, BREAK_RANGE.0), (tick, BREAK_RANGE.1), 0.8, 0.6) {
            chart.draw_series(std::iter::once(PathElement::new(segment.to_vec(), weight)))?;
        }
        for segment in dash_segments((BREAK_RANGE.0, tick), (BREAK_RANGE.1, tick), 0.8, 0.6) {
            chart.draw_series(std::iter::once(PathElement::new(segment.to_vec(), weight)))?;
        }
        tick += GRID_STEP;
    }
    Ok(())
}
