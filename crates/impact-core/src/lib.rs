//! Data loading, chart geometry, and the auto-advancing state machine for
//! the impact dashboard.
//!
//! A loader fetches the yearly series once at startup (retrying with
//! exponential backoff), the dashboard state machine walks a cursor through
//! it on a timer, and every chart value is derived from the record under
//! the cursor.
//!
//! # Modules
//!
//! - [`automation`] -- Owned periodic timer driving auto-advance.
//! - [`config`] -- Configuration loading from `impact-config.yaml` into
//!   strongly-typed structs.
//! - [`dashboard`] -- [`Dashboard`] state machine and [`DashboardSnapshot`].
//! - [`events`] -- [`DashboardEvent`]s published on state changes.
//! - [`geometry`] -- Ring offsets and line chart paths.
//! - [`loader`] -- [`ImpactLoader`] with its [`RetryPolicy`].
//! - [`metrics`] -- Pure projections of the current record.
//! - [`service`] -- The task that owns a dashboard, and its handle.
//! - [`source`] -- [`ImpactSource`] trait and implementations.
//!
//! [`Dashboard`]: dashboard::Dashboard
//! [`DashboardSnapshot`]: dashboard::DashboardSnapshot
//! [`DashboardEvent`]: events::DashboardEvent
//! [`ImpactLoader`]: loader::ImpactLoader
//! [`RetryPolicy`]: loader::RetryPolicy
//! [`ImpactSource`]: source::ImpactSource

pub mod automation;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod geometry;
pub mod loader;
pub mod metrics;
pub mod service;
pub mod source;
