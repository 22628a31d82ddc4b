//! Kernel density estimation for the pitch maps.
//!
//! The estimation itself is kept free of any drawing so the sparse-data
//! fallback policy is unit-testable: groups below [`MIN_DENSITY_POINTS`]
//! never get a density surface and are scatter-plotted raw instead, because
//! a KDE fit on a handful of points produces degenerate contours.

/// Minimum group size for fitting a density surface.
pub const MIN_DENSITY_POINTS: usize = 5;

/// Below this group size the bandwidth is widened for smoother contours.
pub const SPARSE_BANDWIDTH_CUTOFF: usize = 20;

/// Bandwidth multiplier applied to sparse groups.
pub const SPARSE_BANDWIDTH_ADJUST: f64 = 1.5;

/// How a pitch-type group is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerPlan {
    /// Smoothed density surface with the given bandwidth multiplier.
    Density { bandwidth_adjust: f64 },
    /// Raw semi-transparent points.
    Scatter,
}

/// Decide how a group of `n` points is drawn.
pub fn plan_layer(n: usize) -> LayerPlan {
    if n < MIN_DENSITY_POINTS {
        LayerPlan::Scatter
    } else if n < SPARSE_BANDWIDTH_CUTOFF {
        LayerPlan::Density {
            bandwidth_adjust: SPARSE_BANDWIDTH_ADJUST,
        }
    } else {
        LayerPlan::Density {
            bandwidth_adjust: 1.0,
        }
    }
}

/// Axis-aligned evaluation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// A density surface evaluated on a fixed grid, row-major with `x` varying
/// fastest.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    pub nx: usize,
    pub ny: usize,
    pub bounds: Bounds,
    values: Vec<f64>,
    peak: f64,
}

impl DensityGrid {
    /// Raw density at grid cell (ix, iy).
    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.values[iy * self.nx + ix]
    }

    /// Density at (ix, iy) scaled to [0, 1] by the surface peak.
    pub fn normalized(&self, ix: usize, iy: usize) -> f64 {
        if self.peak > 0.0 {
            self.value(ix, iy) / self.peak
        } else {
            0.0
        }
    }

    /// Data-space rectangle covered by grid cell (ix, iy).
    pub fn cell_rect(&self, ix: usize, iy: usize) -> ((f64, f64), (f64, f64)) {
        let dx = self.bounds.x_span() / self.nx as f64;
        let dy = self.bounds.y_span() / self.ny as f64;
        let x0 = self.bounds.x_min + ix as f64 * dx;
        let y0 = self.bounds.y_min + iy as f64 * dy;
        ((x0, y0), (x0 + dx, y0 + dy))
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }
}

/// Estimate a smoothed 2-D density over `points` on an `nx` x `ny` grid.
///
/// Gaussian product kernel with per-axis Scott's-rule bandwidths scaled by
/// `bandwidth_adjust`. Cells are evaluated at their centers.
pub fn estimate(
    points: &[(f64, f64)],
    bounds: &Bounds,
    nx: usize,
    ny: usize,
    bandwidth_adjust: f64,
) -> DensityGrid {
    let n = points.len();
    if n == 0 {
        return DensityGrid {
            nx,
            ny,
            bounds: *bounds,
            values: vec![0.0; nx * ny],
            peak: 0.0,
        };
    }
    let hx = scott_bandwidth(points.iter().map(|p| p.0), n, bounds.x_span()) * bandwidth_adjust;
    let hy = scott_bandwidth(points.iter().map(|p| p.1), n, bounds.y_span()) * bandwidth_adjust;

    let dx = bounds.x_span() / nx as f64;
    let dy = bounds.y_span() / ny as f64;
    let norm = 1.0 / (n as f64 * 2.0 * std::f64::consts::PI * hx * hy);

    let mut values = vec![0.0; nx * ny];
    let mut peak = 0.0f64;
    for iy in 0..ny {
        let cy = bounds.y_min + (iy as f64 + 0.5) * dy;
        for ix in 0..nx {
            let cx = bounds.x_min + (ix as f64 + 0.5) * dx;
            let mut sum = 0.0;
            for &(px, py) in points {
                let ux = (cx - px) / hx;
                let uy = (cy - py) / hy;
                sum += (-0.5 * (ux * ux + uy * uy)).exp();
            }
            let value = sum * norm;
            values[iy * nx + ix] = value;
            peak = peak.max(value);
        }
    }

    DensityGrid {
        nx,
        ny,
        bounds: *bounds,
        values,
        peak,
    }
}

/// Scott's rule bandwidth for one axis: `sigma * n^(-1/6)` for a 2-D fit.
/// Degenerate spreads (all points coincident) fall back to 1% of the axis
/// span so the surface stays finite.
fn scott_bandwidth<I: Iterator<Item = f64>>(values: I, n: usize, span: f64) -> f64 {
    let samples: Vec<f64> = values.collect();
    let mean = samples.iter().sum::<f64>() / n as f64;
    let variance = if n > 1 {
        samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n as f64 - 1.0)
    } else {
        0.0
    };
    let sigma = variance.sqrt();
    let h = sigma * (n as f64).powf(-1.0 / 6.0);
    if h.is_finite() && h > 0.0 {
        h
    } else {
        span * 0.01
    }
}
