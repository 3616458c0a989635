//! GPA aggregation.
//!
//! This module turns validated course records into GPA figures: a generic
//! weighted average filtered by a predicate, a trailing credit window, and a
//! reporter that runs a set of named views over one snapshot of records.

pub mod aggregate;
pub mod report;
pub mod types;
pub mod utility;
pub mod window;
