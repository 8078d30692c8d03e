//! Month-to-month finite differences and gap filling.
//!
//! The monthly anomaly vector of a recent year usually carries a tail of
//! unpublished months. This pass mirrors the dataset's own arithmetic:
//!
//! - `derivative[i] = months[i+1] - months[i]` when both ends are present
//! - a gap at slot `i` is filled with `filled[i-1] + derivative[i-1]` when
//!   that derivative is present
//!
//! Note the structural consequence: the derivative into a gap needs the gap's
//! own value, so the fill condition can never hold for a slot that is
//! actually absent. Absent months stay absent. The pass is kept in this
//! literal form on purpose; its observable value is validation and
//! passthrough, and callers treat a still-absent slot as a hard miss rather
//! than inventing a value for it.

use crate::domain::MONTHS_PER_YEAR;

/// Slot-to-slot differences; `None` wherever either endpoint is absent.
pub fn monthly_derivatives(
    months: &[Option<f64>; MONTHS_PER_YEAR],
) -> [Option<f64>; MONTHS_PER_YEAR - 1] {
    let mut derivatives = [None; MONTHS_PER_YEAR - 1];
    for i in 0..MONTHS_PER_YEAR - 1 {
        if let (Some(left), Some(right)) = (months[i], months[i + 1]) {
            derivatives[i] = Some(right - left);
        }
    }
    derivatives
}

/// Forward pass extending the series into gaps where a derivative exists.
///
/// Present values pass through unchanged, output slots are absent exactly
/// where input slots are absent (see the module notes), and the pass is
/// idempotent.
pub fn fill_monthly_gaps(
    months: &[Option<f64>; MONTHS_PER_YEAR],
) -> [Option<f64>; MONTHS_PER_YEAR] {
    let derivatives = monthly_derivatives(months);
    let mut filled = *months;
    for i in 1..MONTHS_PER_YEAR {
        if filled[i].is_none() {
            if let (Some(prev), Some(step)) = (filled[i - 1], derivatives[i - 1]) {
                filled[i] = Some(prev + step);
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months(values: &[(usize, f64)]) -> [Option<f64>; MONTHS_PER_YEAR] {
        let mut out = [None; MONTHS_PER_YEAR];
        for &(i, v) in values {
            out[i] = Some(v);
        }
        out
    }

    #[test]
    fn derivatives_need_both_endpoints() {
        let input = months(&[(0, 0.10), (1, 0.30), (3, 0.70), (4, 0.65)]);
        let d = monthly_derivatives(&input);

        let d0 = d[0].unwrap();
        assert!((d0 - 0.20).abs() < 1e-12, "Jan→Feb step, got {d0}");
        assert_eq!(d[1], None, "Feb→Mar spans a gap");
        assert_eq!(d[2], None, "Mar→Apr starts in a gap");
        let d3 = d[3].unwrap();
        assert!((d3 + 0.05).abs() < 1e-12, "Apr→May step, got {d3}");
        assert_eq!(d[4], None);
    }

    #[test]
    fn fully_populated_year_passes_through() {
        let mut input = [None; MONTHS_PER_YEAR];
        for (i, slot) in input.iter_mut().enumerate() {
            *slot = Some(0.8 + 0.01 * i as f64);
        }

        let filled = fill_monthly_gaps(&input);
        assert_eq!(filled, input);

        let d = monthly_derivatives(&input);
        assert!(d.iter().all(|step| step.is_some()));
    }

    #[test]
    fn gaps_stay_absent() {
        // Typical publication shape: values through August, rest pending.
        let input = months(&[
            (0, 1.20),
            (1, 1.37),
            (2, 1.28),
            (3, 1.32),
            (4, 1.16),
            (5, 1.25),
            (6, 1.21),
            (7, 1.27),
        ]);

        let filled = fill_monthly_gaps(&input);
        for i in 0..MONTHS_PER_YEAR {
            assert_eq!(
                filled[i].is_some(),
                input[i].is_some(),
                "slot {i} changed presence"
            );
        }
    }

    #[test]
    fn fill_is_idempotent() {
        let input = months(&[(2, 0.9), (3, 1.1), (7, 1.3), (11, 0.95)]);
        let once = fill_monthly_gaps(&input);
        let twice = fill_monthly_gaps(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn all_absent_input_is_handled() {
        let input = [None; MONTHS_PER_YEAR];
        assert_eq!(fill_monthly_gaps(&input), input);
        assert_eq!(monthly_derivatives(&input), [None; MONTHS_PER_YEAR - 1]);
    }
}
