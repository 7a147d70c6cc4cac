//! Performance Profile Library
//!
//! Builds Dolan–Moré performance profiles from benchmark run records: for
//! each solver configuration ("combo"), the fraction of problem instances it
//! solves within a factor τ of the best configuration on that instance.
//!
//! # Pipeline
//!
//! ```text
//! {"results": [...]} → RunTable ──┐
//!                                 ├→ profile::build → PerformanceProfile
//! ProfileRegistry → ProfileConfig ┘                          │
//!                                              ┌─────────────┴─────────────┐
//!                                              ↓                           ↓
//!                                   stats::ProfileReport        curve::ProfileCurves
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use perf_profile::{build, ProfileRegistry, ProfileReport, RunTable};
//!
//! let registry = ProfileRegistry::with_defaults();
//! let table = RunTable::load("results.json")?;
//! if let Some(profile) = build(&table, "cutest", registry.get("wall_time")?, None)? {
//!     println!("{}", ProfileReport::from_profile(&profile).format_report());
//! }
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod criterion;
pub mod curve;
pub mod error;
pub mod profile;
pub mod registry;
pub mod stats;
pub mod table;

pub use config::{ProfileConfig, ProfileSettings, ProfileSpec};
pub use criterion::{Criterion, MetricDirection};
pub use curve::{curve_points, ComboCurve, ProfileCurves, StepCurve};
pub use error::{ColumnRole, ProfileError, ProfileResult};
pub use profile::{build, MetricRow, PerformanceProfile, RatioRow};
pub use registry::{create_shared_registry, ProfileRegistry, SharedProfileRegistry};
pub use stats::{compute_stats, ComboPerformance, Leader, ProfileReport, ProfileStats};
pub use table::{KeyTuple, RunRecord, RunTable};
