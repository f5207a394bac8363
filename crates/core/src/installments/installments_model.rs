use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, InstallmentError, Result, ValidationError};
use crate::money::{months_after, parse_db_decimal, round2};

/// A multi-installment credit-card purchase. Owns its installment rows by id
/// reference; regeneration is an explicit operation, not a cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPurchase {
    pub id: String,
    pub tenant_id: String,
    pub credit_card_id: String,
    pub description: String,
    pub total_amount: Decimal,
    pub purchase_date: NaiveDate,
    pub starting_installment: i32,
    pub total_installments: i32,
    pub category_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One scheduled portion of an installment purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: String,
    pub tenant_id: String,
    pub purchase_id: String,
    pub installment_number: i32,
    pub total_count: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating an installment purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallmentPurchase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub credit_card_id: String,
    pub description: String,
    pub total_amount: Decimal,
    pub purchase_date: NaiveDate,
    pub starting_installment: i32,
    pub total_installments: i32,
    pub category_id: Option<String>,
}

impl NewInstallmentPurchase {
    pub fn validate(&self) -> Result<()> {
        validate_purchase_inputs(
            self.total_amount,
            self.starting_installment,
            self.total_installments,
        )
    }
}

/// Input model for editing an installment purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPurchaseUpdate {
    pub id: String,
    pub description: String,
    pub total_amount: Decimal,
    pub purchase_date: NaiveDate,
    pub starting_installment: i32,
    pub total_installments: i32,
    pub category_id: Option<String>,
}

impl InstallmentPurchaseUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Purchase ID is required for updates".to_string(),
            )));
        }
        validate_purchase_inputs(
            self.total_amount,
            self.starting_installment,
            self.total_installments,
        )
    }
}

// Validation is a free function rather than a constructor side effect so
// callers can check inputs without building anything.
fn validate_purchase_inputs(total_amount: Decimal, starting: i32, total: i32) -> Result<()> {
    if total_amount <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidAmount(
            total_amount,
        )));
    }
    if starting < 1 || total < 1 || starting > total {
        return Err(Error::Installment(InstallmentError::InvalidRange {
            starting,
            total,
        }));
    }
    Ok(())
}

/// One line of a computed installment schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleLine {
    pub installment_number: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// Computes the materialized schedule for numbers `starting..=total`.
///
/// The per-installment amount divides by the FULL count, not the remaining
/// range, so a schedule that starts mid-way (numbers 1..starting-1 already
/// billed elsewhere) produces the same per-installment value the issuer
/// computed. The rounding residual lands on the LAST installment (number =
/// total), keeping the full schedule's sum exact even when only a sub-range
/// is materialized here.
pub fn build_schedule(
    total_amount: Decimal,
    purchase_date: NaiveDate,
    starting: i32,
    total: i32,
) -> Vec<ScheduleLine> {
    let per_installment = round2(total_amount / Decimal::from(total));
    let last_amount = total_amount - per_installment * Decimal::from(total - 1);

    (starting..=total)
        .map(|number| ScheduleLine {
            installment_number: number,
            amount: if number == total {
                last_amount
            } else {
                per_installment
            },
            due_date: months_after(purchase_date, (number - starting) as u32),
        })
        .collect()
}

/// Database model for installment purchases
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::installment_purchases)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstallmentPurchaseDB {
    pub id: String,
    pub tenant_id: String,
    pub credit_card_id: String,
    pub description: String,
    pub total_amount: String,
    pub purchase_date: NaiveDate,
    pub starting_installment: i32,
    pub total_installments: i32,
    pub category_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InstallmentPurchaseDB> for InstallmentPurchase {
    fn from(db: InstallmentPurchaseDB) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            credit_card_id: db.credit_card_id,
            description: db.description,
            total_amount: parse_db_decimal(&db.total_amount, "purchase total"),
            purchase_date: db.purchase_date,
            starting_installment: db.starting_installment,
            total_installments: db.total_installments,
            category_id: db.category_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl InstallmentPurchaseDB {
    pub fn from_new(tenant_id: &str, domain: NewInstallmentPurchase) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            tenant_id: tenant_id.to_string(),
            credit_card_id: domain.credit_card_id,
            description: domain.description,
            total_amount: domain.total_amount.to_string(),
            purchase_date: domain.purchase_date,
            starting_installment: domain.starting_installment,
            total_installments: domain.total_installments,
            category_id: domain.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Database model for installments
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::installments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstallmentDB {
    pub id: String,
    pub tenant_id: String,
    pub purchase_id: String,
    pub installment_number: i32,
    pub total_count: i32,
    pub amount: String,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InstallmentDB> for Installment {
    fn from(db: InstallmentDB) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            purchase_id: db.purchase_id,
            installment_number: db.installment_number,
            total_count: db.total_count,
            amount: parse_db_decimal(&db.amount, "installment amount"),
            due_date: db.due_date,
            is_paid: db.is_paid,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl InstallmentDB {
    /// Builds an unpaid installment row from a schedule line.
    pub fn from_schedule_line(
        tenant_id: &str,
        purchase_id: &str,
        total_count: i32,
        line: &ScheduleLine,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            purchase_id: purchase_id.to_string(),
            installment_number: line.installment_number,
            total_count,
            amount: line.amount.to_string(),
            due_date: line.due_date,
            is_paid: false,
            created_at: now,
            updated_at: now,
        }
    }
}
