//! Contracts for collaborator-owned reference data. The engine only needs
//! existence checks and display fields; storage and CRUD for categories and
//! credit cards live outside this crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: String,
    pub name: String,
    pub credit_limit: Option<Decimal>,
}

/// Resolves a category id within a tenant; `Error::NotFound` when absent.
pub trait CategoryLookupTrait: Send + Sync {
    fn get_category(&self, tenant_id: &str, category_id: &str) -> Result<Category>;
}

/// Resolves a credit card id within a tenant; `Error::NotFound` when absent.
pub trait CreditCardLookupTrait: Send + Sync {
    fn get_credit_card(&self, tenant_id: &str, card_id: &str) -> Result<CreditCard>;
}
