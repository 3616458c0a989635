use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::types::ViewResult;
use crate::error::GpaError;

/// Running numerator/denominator for a weighted average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub quality_points: Decimal,
    pub credits: Decimal,
    pub courses: usize,
}

impl Totals {
    /// Adds `credits` worth of `quality_point` to the sums.
    ///
    /// # Errors
    ///
    /// Returns [`GpaError::Overflow`] if either sum leaves the decimal range.
    pub fn add(&mut self, credits: Decimal, quality_point: Decimal) -> Result<(), GpaError> {
        let points = credits
            .checked_mul(quality_point)
            .ok_or(GpaError::Overflow)?;
        self.quality_points = self
            .quality_points
            .checked_add(points)
            .ok_or(GpaError::Overflow)?;
        self.credits = self
            .credits
            .checked_add(credits)
            .ok_or(GpaError::Overflow)?;
        Ok(())
    }

    /// Divides once and rounds once. `value` is `None` when no credits were added.
    pub fn into_result(self, decimal_places: u32) -> Result<ViewResult, GpaError> {
        Ok(ViewResult {
            value: weighted_mean(self.quality_points, self.credits, decimal_places)?,
            credits_used: self.credits,
            quality_points: self.quality_points,
            courses: self.courses,
        })
    }
}

/// Computes `numerator / denominator` rounded half-up to `decimal_places`.
/// Returns `None` for a zero denominator.
pub fn weighted_mean(
    numerator: Decimal,
    denominator: Decimal,
    decimal_places: u32,
) -> Result<Option<Decimal>, GpaError> {
    if denominator.is_zero() {
        return Ok(None);
    }
    let value = numerator
        .checked_div(denominator)
        .ok_or(GpaError::Overflow)?;
    Ok(Some(round_half_up(value, decimal_places)))
}

/// Rounds half away from zero, which is half-up for the non-negative values
/// a GPA can take.
pub fn round_half_up(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}
