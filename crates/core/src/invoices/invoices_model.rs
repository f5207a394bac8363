use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::money::parse_db_decimal;

/// Aggregated credit-card invoice for one reference month. Installments are
/// billed through these; settling one is a ledger operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub tenant_id: String,
    pub credit_card_id: String,
    pub reference_month: String,
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub paid_at: Option<NaiveDateTime>,
    pub paid_account_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for creating an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub credit_card_id: String,
    pub reference_month: String,
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
}

impl NewInvoice {
    pub fn validate(&self) -> Result<()> {
        if self.credit_card_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Invoice requires a credit card".to_string(),
            )));
        }
        if self.total_amount < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Invoice total cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model for invoices
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::invoices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvoiceDB {
    pub id: String,
    pub tenant_id: String,
    pub credit_card_id: String,
    pub reference_month: String,
    pub total_amount: String,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub paid_at: Option<NaiveDateTime>,
    pub paid_account_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<InvoiceDB> for Invoice {
    fn from(db: InvoiceDB) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            credit_card_id: db.credit_card_id,
            reference_month: db.reference_month,
            total_amount: parse_db_decimal(&db.total_amount, "invoice total"),
            due_date: db.due_date,
            is_paid: db.is_paid,
            paid_at: db.paid_at,
            paid_account_id: db.paid_account_id,
            created_at: db.created_at,
        }
    }
}

impl InvoiceDB {
    pub fn from_new(tenant_id: &str, domain: NewInvoice) -> Self {
        Self {
            id: domain.id.unwrap_or_default(),
            tenant_id: tenant_id.to_string(),
            credit_card_id: domain.credit_card_id,
            reference_month: domain.reference_month,
            total_amount: domain.total_amount.to_string(),
            due_date: domain.due_date,
            is_paid: false,
            paid_at: None,
            paid_account_id: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
