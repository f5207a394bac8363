//! Fixed-point money arithmetic shared by every component that partitions
//! or schedules monetary values.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::MONEY_DECIMAL_PRECISION;

/// Parses a decimal stored as TEXT, falling back to zero on corrupt data so
/// a single bad row cannot take down a whole listing.
pub(crate) fn parse_db_decimal(value: &str, field: &str) -> Decimal {
    match Decimal::from_str_exact(value) {
        Ok(d) => d,
        Err(err) => {
            log::error!(
                "Failed to parse {} '{}' as Decimal ({}). Falling back to ZERO.",
                field,
                value,
                err
            );
            Decimal::ZERO
        }
    }
}

/// Rounds a monetary value to 2 fractional digits, half-up.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        MONEY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Splits `total` into `n` parts of `round2(total / n)` each, with the last
/// part absorbing the rounding residual so the parts always sum back to
/// `total` exactly.
///
/// When the per-part share is below half a cent (e.g. 0.50 split 60 ways)
/// the rounded shares overshoot and the last part goes negative. Callers
/// splitting real money keep `total / n` at a cent or more.
pub fn split_evenly(total: Decimal, n: u32) -> Vec<Decimal> {
    if n == 0 {
        return Vec::new();
    }

    let share = round2(total / Decimal::from(n));
    let mut parts = vec![share; n as usize];
    let last = total - share * Decimal::from(n - 1);
    parts[n as usize - 1] = last;
    parts
}

/// Steps a date forward by whole calendar months, clamping to the end of
/// shorter months (Jan 31 + 1 month = Feb 28/29).
pub fn months_after(date: NaiveDate, months: u32) -> NaiveDate {
    date + Months::new(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round2_is_half_up() {
        assert_eq!(round2(dec!(360.672)), dec!(360.67));
        assert_eq!(round2(dec!(360.675)), dec!(360.68));
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn split_evenly_sums_back_to_total() {
        let parts = split_evenly(dec!(1803.36), 5);
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], dec!(360.67));
        assert_eq!(parts[3], dec!(360.67));
        // Residual cent lands on the last part only.
        assert_eq!(parts[4], dec!(360.68));
        assert_eq!(parts.iter().sum::<Decimal>(), dec!(1803.36));
    }

    #[test]
    fn split_evenly_single_part_is_the_total() {
        assert_eq!(split_evenly(dec!(99.99), 1), vec![dec!(99.99)]);
    }

    #[test]
    fn split_evenly_zero_parts_is_empty() {
        assert!(split_evenly(dec!(10.00), 0).is_empty());
    }

    #[test]
    fn split_evenly_sub_cent_shares_push_the_residual_negative() {
        // 0.50 / 60 rounds each share up to a cent, so the last part has to
        // absorb a negative residual for the sum to stay exact.
        let parts = split_evenly(dec!(0.50), 60);
        assert_eq!(parts[0], dec!(0.01));
        assert_eq!(parts[59], dec!(-0.09));
        assert_eq!(parts.iter().sum::<Decimal>(), dec!(0.50));
    }

    #[test]
    fn months_after_clamps_to_month_end() {
        let jan31 = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(
            months_after(jan31, 1),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(
            months_after(jan31, 3),
            NaiveDate::from_ymd_opt(2026, 4, 30).unwrap()
        );
    }
}
