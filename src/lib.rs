//! Weighted multi-view GPA aggregation.
//!
//! Records are validated with [`validate::validate`], then [`engine::report::report`]
//! runs a set of [`AggregationView`]s (overall, by category, trailing credit
//! window, prerequisites) against one [`GradeScale`].

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod scale;
pub mod validate;

pub use engine::aggregate::{aggregate, totals};
pub use engine::report::{Report, report};
pub use engine::types::{AggregationView, CourseRecord, RecordFilter, ViewResult};
pub use engine::window::{WindowEntry, aggregate_window, select_window};
pub use error::{ConfigError, GpaError};
pub use scale::{GradeScale, GradeValue, Preset};
pub use validate::{CreditBounds, Violation, ViolationKind, valid_subset, validate};
