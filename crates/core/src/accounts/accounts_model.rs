use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::money::parse_db_decimal;

/// Kind of money container an account represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    #[default]
    Checking,
    Savings,
    Investment,
    EmergencyFund,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "CHECKING",
            AccountKind::Savings => "SAVINGS",
            AccountKind::Investment => "INVESTMENT",
            AccountKind::EmergencyFund => "EMERGENCY_FUND",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "CHECKING" => Ok(AccountKind::Checking),
            "SAVINGS" => Ok(AccountKind::Savings),
            "INVESTMENT" => Ok(AccountKind::Investment),
            "EMERGENCY_FUND" => Ok(AccountKind::EmergencyFund),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown account kind '{}'",
                other
            )))),
        }
    }
}

/// Domain model representing an account in the system.
///
/// The balance is mutated only by ledger operations; account updates cover
/// metadata exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub owner: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub annual_yield_rate: Option<Decimal>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub owner: String,
    pub kind: AccountKind,
    pub opening_balance: Decimal,
    pub annual_yield_rate: Option<Decimal>,
    pub description: Option<String>,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.opening_balance < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Opening balance cannot be negative".to_string(),
            )));
        }
        if let Some(rate) = self.annual_yield_rate {
            if rate < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Annual yield rate cannot be negative".to_string(),
                )));
            }
        }
        Ok(())
    }
}

/// Input model for updating account metadata (never the balance)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub kind: AccountKind,
    pub annual_yield_rate: Option<Decimal>,
    pub description: Option<String>,
}

impl AccountUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account ID is required for updates".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if let Some(rate) = self.annual_yield_rate {
            if rate < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Annual yield rate cannot be negative".to_string(),
                )));
            }
        }
        Ok(())
    }
}

/// Database model for accounts
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub owner: String,
    pub account_type: String,
    pub balance: String,
    pub annual_yield_rate: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        let kind = AccountKind::try_from(db.account_type.as_str()).unwrap_or_default();
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            name: db.name,
            owner: db.owner,
            kind,
            balance: parse_db_decimal(&db.balance, "account balance"),
            annual_yield_rate: db
                .annual_yield_rate
                .as_deref()
                .map(|r| parse_db_decimal(r, "annual yield rate")),
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl AccountDB {
    /// Builds the row to insert for a new account within a tenant.
    pub fn from_new(tenant_id: &str, domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            tenant_id: tenant_id.to_string(),
            name: domain.name,
            owner: domain.owner,
            account_type: domain.kind.as_str().to_string(),
            balance: domain.opening_balance.to_string(),
            annual_yield_rate: domain.annual_yield_rate.map(|r| r.to_string()),
            description: domain.description,
            created_at: now,
            updated_at: now,
        }
    }
}
