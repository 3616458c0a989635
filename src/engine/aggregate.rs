use crate::engine::types::{CourseRecord, ViewResult};
use crate::engine::utility::Totals;
use crate::error::GpaError;
use crate::scale::GradeScale;

/// Sums credits and quality points over the records matching `predicate`.
///
/// Neutral grades are counted in `courses` but add nothing to either sum.
/// Repeated courses are not deduplicated; every record contributes.
///
/// # Errors
///
/// Returns [`GpaError::UnknownGradeSymbol`] if a matching record uses a grade
/// the scale does not define. Records must be validated first.
/// Returns [`GpaError::Overflow`] if the sums leave the decimal range.
pub fn totals<P>(
    records: &[CourseRecord],
    scale: &GradeScale,
    predicate: P,
) -> Result<Totals, GpaError>
where
    P: Fn(&CourseRecord) -> bool,
{
    let mut totals = Totals::default();

    for record in records.iter().filter(|r| predicate(r)) {
        let grade = scale.resolve(&record.grade_symbol)?;
        totals.courses += 1;

        if !grade.counts_toward_gpa {
            continue;
        }

        totals.add(record.credits, grade.quality_point)?;
    }

    Ok(totals)
}

/// Credit-weighted GPA over the records matching `predicate`, rounded once to
/// `decimal_places`.
pub fn aggregate<P>(
    records: &[CourseRecord],
    scale: &GradeScale,
    predicate: P,
    decimal_places: u32,
) -> Result<ViewResult, GpaError>
where
    P: Fn(&CourseRecord) -> bool,
{
    totals(records, scale, predicate)?.into_result(decimal_places)
}
