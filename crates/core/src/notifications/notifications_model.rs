use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DUE_SOON_WINDOW_DAYS;

/// What kind of obligation an alert points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSource {
    FixedBill,
    Installment,
    Invoice,
}

/// How urgent the alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertUrgency {
    Overdue,
    DueSoon,
}

/// A single due-date alert. Alerts are derived on demand from the unpaid
/// obligations; nothing is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueAlert {
    pub source: AlertSource,
    pub source_id: String,
    pub urgency: AlertUrgency,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    /// Days past due for overdue alerts, days remaining for due-soon ones
    pub days: u32,
}

/// Classifies a due date against today. Returns None when the obligation is
/// outside the warning window.
pub fn classify_due_date(due_date: NaiveDate, today: NaiveDate) -> Option<(AlertUrgency, u32)> {
    let offset = (due_date - today).num_days();
    if offset < 0 {
        Some((AlertUrgency::Overdue, offset.unsigned_abs() as u32))
    } else if offset <= DUE_SOON_WINDOW_DAYS {
        Some((AlertUrgency::DueSoon, offset as u32))
    } else {
        None
    }
}
