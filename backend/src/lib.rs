//! # Pitch Report Backend
//!
//! Batch report engine for TrackMan-style pitch tracking exports.
//!
//! This crate turns a raw CSV export into per-pitcher scouting reports: a
//! summary table of per-pitch-type metrics, a two-panel location heat map
//! split by batter handedness, and a pitch break map. Reports are assembled
//! per pitcher so one bad pitcher never takes down a batch.
//!
//! ## Features
//!
//! - **Ingest**: Parse and validate CSV exports with input caps and a
//!   SHA-256 checksum of the raw bytes
//! - **Metrics**: Per-pitch-type means, usage shares, and plate-discipline
//!   rates with missing-value-aware semantics
//! - **Density**: Gaussian kernel density estimation with a scatter
//!   fallback for sparse pitch groups
//! - **Rendering**: Deterministic PNG heat maps and break maps with fixed
//!   axes and strike zone geometry
//!
//! ## Architecture
//!
//! - [`api`]: Data Transfer Objects (DTOs) for report output
//! - [`ingest`]: CSV loading, validation, and checksumming
//! - [`models`]: Parsed pitch rows and the column schema
//! - [`services`]: Metric aggregation, density estimation, map rendering,
//!   and batch orchestration

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod services;

pub use api::{BatchReport, MetricRow, PitcherId, PitcherReport, ReportTable};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use services::ReportEngine;
