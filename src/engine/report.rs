use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::aggregate::aggregate;
use crate::engine::types::{AggregationView, CourseRecord, ViewResult};
use crate::engine::window::aggregate_window;
use crate::error::GpaError;
use crate::scale::GradeScale;

/// Results of every requested view, keyed by view name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    pub views: BTreeMap<String, ViewResult>,
}

impl Report {
    pub fn get(&self, name: &str) -> Option<&ViewResult> {
        self.views.get(name)
    }
}

/// Computes every view independently over the same snapshot of records.
///
/// A view with `window_credits` goes through the credit window; the rest go
/// straight to the aggregator. If two views share a name, the later one wins.
#[tracing::instrument(skip_all, fields(records = records.len(), views = views.len()))]
pub fn report(
    records: &[CourseRecord],
    scale: &GradeScale,
    views: &[AggregationView],
    decimal_places: u32,
) -> Result<Report, GpaError> {
    let mut out = Report::default();

    for view in views {
        let predicate = |r: &CourseRecord| view.filter.matches(r);

        let result = match view.window_credits {
            Some(window) => aggregate_window(records, scale, predicate, window, decimal_places)?,
            None => aggregate(records, scale, predicate, decimal_places)?,
        };

        debug!(
            view = %view.name,
            value = ?result.value,
            credits_used = %result.credits_used,
            "View computed"
        );

        if out.views.insert(view.name.clone(), result).is_some() {
            warn!(view = %view.name, "Duplicate view name, keeping the later definition");
        }
    }

    Ok(out)
}
