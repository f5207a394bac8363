use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::money::parse_db_decimal;

/// Kind of value movement a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Credit,
    Debit,
    TransferOut,
    TransferIn,
    InvoicePayment,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "CREDIT",
            TransactionKind::Debit => "DEBIT",
            TransactionKind::TransferOut => "TRANSFER_OUT",
            TransactionKind::TransferIn => "TRANSFER_IN",
            TransactionKind::InvoicePayment => "INVOICE_PAYMENT",
        }
    }

    /// +1 for inflows, -1 for outflows
    pub fn sign(&self) -> Decimal {
        match self {
            TransactionKind::Credit | TransactionKind::TransferIn => Decimal::ONE,
            TransactionKind::Debit
            | TransactionKind::TransferOut
            | TransactionKind::InvoicePayment => Decimal::NEGATIVE_ONE,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "CREDIT" => Ok(TransactionKind::Credit),
            "DEBIT" => Ok(TransactionKind::Debit),
            "TRANSFER_OUT" => Ok(TransactionKind::TransferOut),
            "TRANSFER_IN" => Ok(TransactionKind::TransferIn),
            "INVOICE_PAYMENT" => Ok(TransactionKind::InvoicePayment),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transaction kind '{}'",
                other
            )))),
        }
    }
}

/// Optional links and annotations carried by a ledger operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    pub category_id: Option<String>,
    pub income_id: Option<String>,
    pub fixed_bill_id: Option<String>,
    pub invoice_id: Option<String>,
    pub note: Option<String>,
}

/// An immutable entry in the account audit trail. Rows are appended by
/// ledger operations and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub tenant_id: String,
    pub account_id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub transaction_date: NaiveDateTime,
    pub destination_account_id: Option<String>,
    pub category_id: Option<String>,
    pub income_id: Option<String>,
    pub fixed_bill_id: Option<String>,
    pub invoice_id: Option<String>,
    pub note: Option<String>,
    pub is_system: bool,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Amount with the kind's sign applied; summing these over an account
    /// reproduces its balance.
    pub fn signed_amount(&self) -> Decimal {
        self.amount * self.kind.sign()
    }
}

/// Input for appending a log entry; built by the ledger, not by callers
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub transaction_date: NaiveDateTime,
    pub destination_account_id: Option<String>,
    pub meta: TransactionMeta,
    pub is_system: bool,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                self.amount,
            )));
        }
        Ok(())
    }
}

/// One page of the date-ordered transaction listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub data: Vec<Transaction>,
    pub total_row_count: i64,
}

/// Database model for transactions
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub tenant_id: String,
    pub account_id: String,
    pub kind: String,
    pub amount: String,
    pub transaction_date: NaiveDateTime,
    pub destination_account_id: Option<String>,
    pub category_id: Option<String>,
    pub income_id: Option<String>,
    pub fixed_bill_id: Option<String>,
    pub invoice_id: Option<String>,
    pub note: Option<String>,
    pub is_system: bool,
    pub created_at: NaiveDateTime,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        // A row with an unknown kind would mean schema drift; fail closed as
        // a debit so signed sums never overstate the balance.
        let kind = TransactionKind::try_from(db.kind.as_str()).unwrap_or_else(|_| {
            log::error!("Unknown transaction kind '{}' in row {}", db.kind, db.id);
            TransactionKind::Debit
        });
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            account_id: db.account_id,
            kind,
            amount: parse_db_decimal(&db.amount, "transaction amount"),
            transaction_date: db.transaction_date,
            destination_account_id: db.destination_account_id,
            category_id: db.category_id,
            income_id: db.income_id,
            fixed_bill_id: db.fixed_bill_id,
            invoice_id: db.invoice_id,
            note: db.note,
            is_system: db.is_system,
            created_at: db.created_at,
        }
    }
}

impl TransactionDB {
    /// Builds the row to append for a tenant; the id is assigned by the
    /// repository at insert time.
    pub fn from_new(tenant_id: &str, domain: NewTransaction) -> Self {
        Self {
            id: String::new(),
            tenant_id: tenant_id.to_string(),
            account_id: domain.account_id,
            kind: domain.kind.as_str().to_string(),
            amount: domain.amount.to_string(),
            transaction_date: domain.transaction_date,
            destination_account_id: domain.destination_account_id,
            category_id: domain.meta.category_id,
            income_id: domain.meta.income_id,
            fixed_bill_id: domain.meta.fixed_bill_id,
            invoice_id: domain.meta.invoice_id,
            note: domain.meta.note,
            is_system: domain.is_system,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
