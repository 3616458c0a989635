//! Trailing-credit window ("last N credits").
//!
//! Records are walked from most to least recent by `sequence_index`, and
//! credits are taken until the budget is spent. The record that straddles
//! the boundary contributes only the remaining credits, with its quality
//! points scaled to match. Order is chronological and never by grade or
//! credit size.

use rust_decimal::Decimal;
use tracing::debug;

use crate::engine::types::{CourseRecord, ViewResult};
use crate::engine::utility::Totals;
use crate::error::GpaError;
use crate::scale::GradeScale;

/// A record's contribution to a window, possibly truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry<'a> {
    pub record: &'a CourseRecord,
    /// Credits counted inside the window; at most `record.credits`.
    pub credits: Decimal,
    pub quality_point: Decimal,
}

impl WindowEntry<'_> {
    pub fn is_truncated(&self) -> bool {
        self.credits < self.record.credits
    }
}

/// Picks the most recent GPA-affecting records matching `predicate` until
/// `window_credits` credits are covered.
///
/// Equal `sequence_index` values are broken by input position, later
/// entries first. A non-positive budget selects nothing.
///
/// # Errors
///
/// Returns [`GpaError::UnknownGradeSymbol`] for any matching record whose
/// grade is not in `scale`, whether or not it would fall in the window.
pub fn select_window<'a, P>(
    records: &'a [CourseRecord],
    scale: &GradeScale,
    predicate: P,
    window_credits: Decimal,
) -> Result<Vec<WindowEntry<'a>>, GpaError>
where
    P: Fn(&CourseRecord) -> bool,
{
    let mut candidates = Vec::new();
    for (position, record) in records.iter().enumerate() {
        if !predicate(record) {
            continue;
        }
        let grade = scale.resolve(&record.grade_symbol)?;
        if grade.counts_toward_gpa {
            candidates.push((position, record, grade.quality_point));
        }
    }

    candidates.sort_by(|a, b| {
        b.1.sequence_index
            .cmp(&a.1.sequence_index)
            .then_with(|| b.0.cmp(&a.0))
    });

    let mut selected = Vec::new();
    let mut credits_so_far = Decimal::ZERO;

    for (_, record, quality_point) in candidates {
        if credits_so_far >= window_credits {
            break;
        }
        let credits = record.credits.min(window_credits - credits_so_far);
        credits_so_far += credits;
        selected.push(WindowEntry {
            record,
            credits,
            quality_point,
        });
    }

    debug!(
        window_credits = %window_credits,
        credits_selected = %credits_so_far,
        entries = selected.len(),
        truncated = selected.last().is_some_and(|e| e.is_truncated()),
        "Credit window selected"
    );

    Ok(selected)
}

/// GPA over the most recent `window_credits` credits of matching records.
///
/// When fewer credits are available than the window holds, the result is
/// the same as the unwindowed aggregate for the same predicate.
pub fn aggregate_window<P>(
    records: &[CourseRecord],
    scale: &GradeScale,
    predicate: P,
    window_credits: Decimal,
    decimal_places: u32,
) -> Result<ViewResult, GpaError>
where
    P: Fn(&CourseRecord) -> bool,
{
    let entries = select_window(records, scale, predicate, window_credits)?;

    let mut totals = Totals::default();
    for entry in &entries {
        totals.add(entry.credits, entry.quality_point)?;
    }
    totals.courses = entries.len();

    totals.into_result(decimal_places)
}
