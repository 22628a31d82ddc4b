//! Pitch location heat map rendering.
//!
//! One PNG per pitcher, split into two sub-panels by batter handedness.
//! Pitch-type groups with enough points get a smoothed density fill; sparse
//! groups fall back to raw scatter points. Fixed axis extents and the strike
//! zone geometry apply to every panel, data or not.

use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::models::schema::TableSchema;
use crate::models::{BatterSide, PitchRecord};
use crate::services::cohort::{self, PitcherGroup};
use crate::services::density::{self, Bounds, LayerPlan};
use crate::services::draw::{dashed_rect, density_cells, equal_aspect_ranges};
use crate::services::metrics::{ZONE_HEIGHT_RANGE, ZONE_SIDE_BOUND};
use crate::services::palette::PitchPalette;

/// Location panel horizontal extent in feet.
pub const LOCATION_X_RANGE: (f64, f64) = (-3.0, 3.0);
/// Location panel vertical extent in feet.
pub const LOCATION_Y_RANGE: (f64, f64) = (0.0, 5.0);
/// Shadow-zone inflation on each side of the strike zone, one ball radius.
pub const SHADOW_ZONE_MARGIN: f64 = 0.24;

type LocationChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render the two-panel location heat map for one pitcher.
///
/// Overwrites `out_path` if present. A backend or disk failure surfaces as
/// a render error for this pitcher only.
pub fn render_heat_map(
    group: &PitcherGroup<'_>,
    out_path: &Path,
    config: &ReportConfig,
    palette: &PitchPalette,
    schema: &TableSchema,
) -> Result<()> {
    draw_heat_map(group, out_path, config, palette, schema)
        .map_err(|e| ReportError::render(out_path, e))
}

fn draw_heat_map(
    group: &PitcherGroup<'_>,
    out_path: &Path,
    config: &ReportConfig,
    palette: &PitchPalette,
    schema: &TableSchema,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(out_path, config.heat_map_size).into_drawing_area();
    root.fill(&WHITE)?;
    let title = format!(
        "Pitch Location Heat Map for Pitcher ID: {}",
        group.pitcher_id
    );
    let root = root.titled(&title, ("sans-serif", 26))?;

    let panels = root.split_evenly((1, 2));
    for (side, panel) in [BatterSide::Left, BatterSide::Right]
        .into_iter()
        .zip(panels.iter())
    {
        let facet_rows: Vec<&PitchRecord> = group
            .rows
            .iter()
            .copied()
            .filter(|r| r.batter_side == Some(side))
            .collect();
        draw_location_panel(panel, side, &facet_rows, config, palette, schema)?;
    }

    root.present()?;
    Ok(())
}

fn draw_location_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    side: BatterSide,
    rows: &[&PitchRecord],
    config: &ReportConfig,
    palette: &PitchPalette,
    schema: &TableSchema,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let caption = format!("vs {}-Handed Batters (n={})", side.label(), rows.len());

    // Lay out a probe chart first to measure the inner plot area, then pad
    // the data ranges so one foot renders the same number of pixels on both
    // axes. Building a chart allocates label areas without drawing anything.
    let (inner_w, inner_h) = ChartBuilder::on(area)
        .caption(&caption, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)?
        .plotting_area()
        .dim_in_pixel();
    let (x_range, y_range) =
        equal_aspect_ranges(LOCATION_X_RANGE, LOCATION_Y_RANGE, inner_w, inner_h);

    let mut chart = ChartBuilder::on(area)
        .caption(&caption, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Plate Location Side (ft)")
        .y_desc("Plate Location Height (ft)")
        .draw()?;

    if rows.is_empty() {
        let style = ("sans-serif", 18)
            .into_font()
            .color(&BLACK.mix(0.7))
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(std::iter::once(Text::new(
            format!("No data for {}-handed batters", side.label()),
            (
                (x_range.0 + x_range.1) / 2.0,
                (y_range.0 + y_range.1) / 2.0,
            ),
            style,
        )))?;
        draw_strike_zones(&mut chart)?;
        return Ok(());
    }

    let bounds = Bounds::new(
        LOCATION_X_RANGE.0,
        LOCATION_X_RANGE.1,
        LOCATION_Y_RANGE.0,
        LOCATION_Y_RANGE.1,
    );
    let mut legend_labels: Vec<String> = Vec::new();

    for cohort in cohort::group_by_type(rows, schema) {
        let points: Vec<(f64, f64)> = cohort
            .rows
            .iter()
            .filter_map(|r| r.plate_location())
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

        // Mean location marker, one legend entry per distinct label.
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

    draw_strike_zones(&mut chart)?;

    if !legend_labels.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

/// Strike zone outline plus the dashed shadow zone inflated by one ball
/// radius on all sides.
fn draw_strike_zones(
    chart: &mut LocationChart<'_, '_>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (bottom, top) = ZONE_HEIGHT_RANGE;
    let outline = vec![
        (-ZONE_SIDE_BOUND, bottom),
        (ZONE_SIDE_BOUND, bottom),
        (ZONE_SIDE_BOUND, top),
        (-ZONE_SIDE_BOUND, top),
        (-ZONE_SIDE_BOUND, bottom),
    ];
    chart.draw_series(std::iter::once(PathElement::new(
        outline,
        ShapeStyle::from(&BLACK).stroke_width(2),
    )))?;

    for segment in dashed_rect(
        -ZONE_SIDE_BOUND - SHADOW_ZONE_MARGIN,
        bottom - SHADOW_ZONE_MARGIN,
        ZONE_SIDE_BOUND + SHADOW_ZONE_MARGIN,
        top + SHADOW_ZONE_MARGIN,
        0.12,
        0.08,
    ) {
        chart.draw_series(std::iter::once(PathElement::new(
            segment.to_vec(),
            BLACK.mix(0.6),
        )))?;
    }
    Ok(())
}
