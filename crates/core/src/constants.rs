/// Decimal precision for stored monetary values
pub const MONEY_DECIMAL_PRECISION: u32 = 2;

/// Days ahead an unpaid item counts as "due soon" in notification scans
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Trailing window used to average monthly expenses for emergency-fund targets
pub const EXPENSE_LOOKBACK_MONTHS: u32 = 6;

/// Safe-withdrawal multiplier: 4% rule, expressed as years of annual income
pub const SAFE_WITHDRAWAL_YEARS: u32 = 25;

/// Note attached to system-generated yield accrual transactions
pub const YIELD_ACCRUAL_NOTE: &str = "Monthly yield accrual";
