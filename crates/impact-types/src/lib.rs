//! Shared type definitions for the impact dashboard.
//!
//! This crate is the single source of truth for the data model shared by
//! the dashboard core and its host. Types flow downstream to `TypeScript`
//! via `ts-rs` for a browser frontend.
//!
//! # Modules
//!
//! - [`enums`] -- Score categories (with chart metadata) and host views
//! - [`records`] -- Yearly records and the ordered impact series

pub mod enums;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use enums::{ParseViewError, ScoreCategory, View};
pub use records::{Achievements, ImpactSeries, Scores, YearRecord};
