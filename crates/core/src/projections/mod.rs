//! Pure compound-interest and annuity math shared by yield accrual,
//! retirement planning and emergency-fund planning. No persistence, no side
//! effects; every function is safe to call concurrently.

mod projections_tests;

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::SAFE_WITHDRAWAL_YEARS;
use crate::money::round2;

/// Qualitative reading of a plan's surplus or deficit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    OnTrack,
    Attention,
    AdjustmentNeeded,
}

fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / dec!(12) / dec!(100)
}

/// Compounds a balance month by month, rounding to cents after every step.
///
/// The accrual job applies the same rounded step each month, so projecting
/// with this function lands on exactly the balance accrual will produce.
pub fn project_balance(balance: Decimal, annual_rate_percent: Decimal, months: u32) -> Decimal {
    let factor = Decimal::ONE + monthly_rate(annual_rate_percent);
    let mut projected = balance;
    for _ in 0..months {
        projected = round2(projected * factor);
    }
    projected
}

/// Net worth needed to sustain the desired income under the 4% safe
/// withdrawal rule: 25 years of annual income.
pub fn required_net_worth(desired_monthly_income: Decimal) -> Decimal {
    round2(desired_monthly_income * dec!(12) * Decimal::from(SAFE_WITHDRAWAL_YEARS))
}

/// Future value of the current net worth plus an ordinary annuity of monthly
/// contributions, compounded monthly over `months`.
pub fn projected_net_worth(
    current_net_worth: Decimal,
    monthly_contribution: Decimal,
    annual_rate_percent: Decimal,
    months: u32,
) -> Decimal {
    if months == 0 {
        return round2(current_net_worth);
    }

    let rate = monthly_rate(annual_rate_percent);
    if rate.is_zero() {
        return round2(current_net_worth + monthly_contribution * Decimal::from(months));
    }

    let growth = (Decimal::ONE + rate).powu(u64::from(months));
    let lump_sum = current_net_worth * growth;
    let annuity = if monthly_contribution.is_zero() {
        Decimal::ZERO
    } else {
        monthly_contribution * (growth - Decimal::ONE) / rate
    };

    round2(lump_sum + annuity)
}

/// Monthly contribution that closes the gap between the lump-sum future
/// value and the target. Zero when the lump sum alone already gets there.
pub fn required_monthly_contribution(
    target_net_worth: Decimal,
    current_net_worth: Decimal,
    annual_rate_percent: Decimal,
    months: u32,
) -> Decimal {
    let rate = monthly_rate(annual_rate_percent);
    let growth = (Decimal::ONE + rate).powu(u64::from(months));

    let lump_sum_fv = current_net_worth * growth;
    let gap = target_net_worth - lump_sum_fv;
    if gap <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if months == 0 {
        // Nothing can compound; the whole gap is due now.
        return round2(gap);
    }
    if rate.is_zero() {
        return round2(gap / Decimal::from(months));
    }

    round2(gap * rate / (growth - Decimal::ONE))
}

/// Classifies a surplus/deficit against the required net worth: non-negative
/// is on track, a deficit within 10% of the requirement needs attention,
/// anything worse needs an adjustment.
pub fn status_classification(deficit: Decimal, required_net_worth: Decimal) -> PlanStatus {
    if deficit >= Decimal::ZERO {
        PlanStatus::OnTrack
    } else if deficit.abs() <= required_net_worth * dec!(0.10) {
        PlanStatus::Attention
    } else {
        PlanStatus::AdjustmentNeeded
    }
}

/// Whole months of contributions needed to cover `remaining`. `None` means
/// the target is unreachable at the given contribution.
pub fn months_to_target(remaining: Decimal, monthly_contribution: Decimal) -> Option<u32> {
    if remaining <= Decimal::ZERO {
        return Some(0);
    }
    if monthly_contribution <= Decimal::ZERO {
        return None;
    }
    (remaining / monthly_contribution).ceil().to_u32()
}
