//! Time-series utilities shared by the orchestrator and the presentation layer.
//!
//! Modules include:
//! - `table`: the aligned, fully populated multi-column table
//! - `align`: union-of-dates alignment with forward fill
//! - `resample`: last-observation-per-period downsampling
/// Union-of-dates alignment with forward fill.
pub mod align;
/// Downsampling of an aligned table to a coarser frequency.
pub mod resample;
/// The aligned table type.
pub mod table;
