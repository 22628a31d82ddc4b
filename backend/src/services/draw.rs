//! Shared drawing helpers for the map renderers.

use plotters::prelude::*;

use crate::services::density::DensityGrid;
use crate::services::palette::ColorRamp;

/// Filled cells covering the part of a density surface at or above
/// `threshold`, colored by sampling the ramp over the remaining level range.
pub(crate) fn density_cells(
    grid: &DensityGrid,
    threshold: f64,
    ramp: ColorRamp,
) -> Vec<Rectangle<(f64, f64)>> {
    let mut cells = Vec::new();
    for iy in 0..grid.ny {
        for ix in 0..grid.nx {
            let level = grid.normalized(ix, iy);
            if level < threshold {
                continue;
            }
            let ((x0, y0), (x1, y1)) = grid.cell_rect(ix, iy);
            let t = (level - threshold) / (1.0 - threshold);
            cells.push(Rectangle::new(
                [(x0, y0), (x1, y1)],
                ramp.sample(t).mix(0.6).filled(),
            ));
        }
    }
    cells
}

/// Pad one data range so both axes render the same data units per pixel,
/// given the inner plot size. The denser axis is widened symmetrically
/// about its midpoint; the fixed extents stay fully visible.
pub(crate) fn equal_aspect_ranges(
    x: (f64, f64),
    y: (f64, f64),
    width_px: u32,
    height_px: u32,
) -> ((f64, f64), (f64, f64)) {
    if width_px == 0 || height_px == 0 {
        return (x, y);
    }
    let x_unit_per_px = (x.1 - x.0) / width_px as f64;
    let y_unit_per_px = (y.1 - y.0) / height_px as f64;
    if x_unit_per_px > y_unit_per_px {
        let span = height_px as f64 * x_unit_per_px;
        let mid = (y.0 + y.1) / 2.0;
        (x, (mid - span / 2.0, mid + span / 2.0))
    } else {
        let span = width_px as f64 * y_unit_per_px;
        let mid = (x.0 + x.1) / 2.0;
        ((mid - span / 2.0, mid + span / 2.0), y)
    }
}

/// Split a straight segment into dash segments of `dash` length separated
/// by `gap`, in data coordinates.
pub(crate) fn dash_segments(
    from: (f64, f64),
    to: (f64, f64),
    dash: f64,
    gap: f64,
) -> Vec<[(f64, f64); 2]> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f64::EPSILON || dash <= 0.0 {
        return vec![[from, to]];
    }
    let (ux, uy) = (dx / length, dy / length);

    let mut segments = Vec::new();
    let mut offset = 0.0;
    while offset < length {
        let end = (offset + dash).min(length);
        segments.push([
            (from.0 + ux * offset, from.1 + uy * offset),
            (from.0 + ux * end, from.1 + uy * end),
        ]);
        offset = end + gap;
    }
    segments
}

/// Dash segments tracing an axis-aligned rectangle outline.
pub(crate) fn dashed_rect(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    dash: f64,
    gap: f64,
) -> Vec<[(f64, f64); 2]> {
    let mut segments = Vec::new();
    segments.extend(dash_segments((x0, y0), (x1, y0), dash, gap));
    segments.extend(dash_segments((x1, y0), (x1, y1), dash, gap));
    segments.extend(dash_segments((x1, y1), (x0, y1), dash, gap));
    segments.extend(dash_segments((x0, y1), (x0, y0), dash, gap));
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::density::{estimate, Bounds};

    #[test]
    fn test_density_cells_follow_threshold() {
        let points = vec![
            (0.0, 2.5),
            (0.1, 2.4),
            (-0.1, 2.6),
            (0.05, 2.5),
            (-0.05, 2.45),
        ];
        let bounds = Bounds::new(-3.0, 3.0, 0.0, 5.0);
        let grid = estimate(&points, &bounds, 60, 50, 1.0);
        let ramp = ColorRamp::new(RGBColor(0, 0, 0), RGBColor(255, 0, 0));

        let tight = density_cells(&grid, 0.9, ramp);
        let loose = density_cells(&grid, 0.5, ramp);
        // The peak normalizes to 1.0, so both thresholds keep some cells,
        // and raising the threshold never adds cells.
        assert!(!tight.is_empty());
        assert!(tight.len() < loose.len());
    }

    #[test]
    fn test_equal_aspect_pads_the_denser_axis() {
        // 6 data units over 560 px is coarser than 5 over 525, so the
        // vertical range is widened and the horizontal range kept.
        let ((x0, x1), (y0, y1)) = equal_aspect_ranges((-3.0, 3.0), (0.0, 5.0), 560, 525);
        assert_eq!((x0, x1), (-3.0, 3.0));
        assert!(y0 < 0.0 && y1 > 5.0);
        assert!(((y0 + y1) / 2.0 - 2.5).abs() < 1e-12);
        let x_unit_per_px = (x1 - x0) / 560.0;
        let y_unit_per_px = (y1 - y0) / 525.0;
        assert!((x_unit_per_px - y_unit_per_px).abs() < 1e-12);
    }

    #[test]
    fn test_equal_aspect_noop_when_already_square() {
        let (x, y) = equal_aspect_ranges((0.0, 4.0), (0.0, 2.0), 400, 200);
        assert_eq!(x, (0.0, 4.0));
        assert_eq!(y, (0.0, 2.0));
    }

    #[test]
    fn test_equal_aspect_degenerate_area_unchanged() {
        let (x, y) = equal_aspect_ranges((-3.0, 3.0), (0.0, 5.0), 0, 525);
        assert_eq!(x, (-3.0, 3.0));
        assert_eq!(y, (0.0, 5.0));
    }

    #[test]
    fn test_dash_segments_cover_the_span() {
        let segments = dash_segments((0.0, 0.0), (10.0, 0.0), 1.0, 1.0);
        assert!(!segments.is_empty());
        assert_eq!(segments[0][0], (0.0, 0.0));
        let last = segments.last().unwrap();
        assert!(last[1].0 <= 10.0 + 1e-12);
        // Dashes are evenly spaced along the segment.
        assert!((segments[1][0].0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment_returned_whole() {
        let segments = dash_segments((1.0, 1.0), (1.0, 1.0), 0.5, 0.5);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_dashed_rect_has_four_sides() {
        let segments = dashed_rect(0.0, 0.0, 4.0, 2.0, 0.5, 0.5);
        // 4 dashes per horizontal side, 2 per vertical side.
        assert_eq!(segments.len(), 12);
    }
}
