use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::money::parse_db_decimal;

/// Recurrence unit for generated fixed bills, expressed in months per step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Recurrence {
    /// Months between consecutive occurrences
    pub fn unit_months(&self) -> u32 {
        match self {
            Recurrence::Monthly => 1,
            Recurrence::Bimonthly => 2,
            Recurrence::Quarterly => 3,
            Recurrence::Semiannual => 6,
            Recurrence::Annual => 12,
        }
    }
}

/// A single fixed-bill occurrence: a recurring, non-card obligation with a
/// due date and a paid flag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedBill {
    pub id: String,
    pub tenant_id: String,
    pub account_id: String,
    pub category_id: String,
    pub name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub created_at: NaiveDateTime,
}

/// Request to expand one recurring bill into N discrete occurrences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringBill {
    pub name: String,
    pub amount: Decimal,
    pub account_id: String,
    pub category_id: String,
    pub start_date: NaiveDate,
    pub occurrences: u32,
    pub recurrence: Recurrence,
}

impl NewRecurringBill {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Bill name cannot be empty".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                self.amount,
            )));
        }
        if self.occurrences == 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Occurrence count must be at least 1".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model for fixed bills
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::fixed_bills)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FixedBillDB {
    pub id: String,
    pub tenant_id: String,
    pub account_id: String,
    pub category_id: String,
    pub name: String,
    pub amount: String,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub created_at: NaiveDateTime,
}

impl From<FixedBillDB> for FixedBill {
    fn from(db: FixedBillDB) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            account_id: db.account_id,
            category_id: db.category_id,
            name: db.name,
            amount: parse_db_decimal(&db.amount, "bill amount"),
            due_date: db.due_date,
            is_paid: db.is_paid,
            created_at: db.created_at,
        }
    }
}
