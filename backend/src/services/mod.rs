//! Service layer for report computation and rendering.
//!
//! This module contains the pipeline that turns parsed pitch rows into a
//! finished report: cohort grouping, metric aggregation, density estimation,
//! the two map renderers, and the batch orchestrator that ties them together.

pub mod break_map;

pub mod cohort;

pub mod density;

pub(crate) mod draw;

pub mod heat_map;

pub mod metrics;

pub mod palette;

pub mod report;

pub use break_map::render_break_map;
pub use cohort::{Cohort, PitcherGroup};
pub use density::{DensityGrid, LayerPlan};
pub use heat_map::render_heat_map;
pub use palette::PitchPalette;
pub use report::{assemble, assemble_for, ReportEngine};
