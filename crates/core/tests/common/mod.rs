use std::sync::Arc;

use nestfolio_core::accounts::{AccountKind, AccountRepository, NewAccount};
use nestfolio_core::db::{self, DbPool};
use nestfolio_core::errors::{Error, Result};
use nestfolio_core::lookups::{Category, CategoryLookupTrait, CreditCard, CreditCardLookupTrait};
use rust_decimal::Decimal;
use tempfile::TempDir;

pub const TENANT: &str = "family-a";

/// Creates a migrated pool over a throwaway database file. The TempDir must
/// be kept alive for the duration of the test.
pub fn setup_pool() -> (Arc<DbPool>, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db_path = db::init(dir.path().to_str().unwrap()).expect("failed to initialize database");
    let pool = db::create_pool(&db_path).expect("failed to create pool");
    db::run_migrations(&pool).expect("migrations failed");
    (pool, dir)
}

pub fn create_account(
    pool: &Arc<DbPool>,
    name: &str,
    opening_balance: Decimal,
) -> nestfolio_core::accounts::Account {
    create_account_with_yield(pool, name, opening_balance, None)
}

pub fn create_account_with_yield(
    pool: &Arc<DbPool>,
    name: &str,
    opening_balance: Decimal,
    annual_yield_rate: Option<Decimal>,
) -> nestfolio_core::accounts::Account {
    AccountRepository::new(pool.clone())
        .create(
            TENANT,
            NewAccount {
                id: None,
                name: name.to_string(),
                owner: "Alex".to_string(),
                kind: AccountKind::Checking,
                opening_balance,
                annual_yield_rate,
                description: None,
            },
        )
        .expect("failed to create account")
}

/// Lookup fake that accepts every id, handing back a display record
pub struct StaticLookups;

impl CategoryLookupTrait for StaticLookups {
    fn get_category(&self, _tenant_id: &str, category_id: &str) -> Result<Category> {
        Ok(Category {
            id: category_id.to_string(),
            name: format!("Category {}", category_id),
        })
    }
}

impl CreditCardLookupTrait for StaticLookups {
    fn get_credit_card(&self, _tenant_id: &str, card_id: &str) -> Result<CreditCard> {
        Ok(CreditCard {
            id: card_id.to_string(),
            name: format!("Card {}", card_id),
            credit_limit: None,
        })
    }
}

/// Lookup fake that rejects every id, for exercising the NotFound paths
pub struct EmptyLookups;

impl CategoryLookupTrait for EmptyLookups {
    fn get_category(&self, _tenant_id: &str, category_id: &str) -> Result<Category> {
        Err(Error::NotFound(format!(
            "Category '{}' not found",
            category_id
        )))
    }
}

impl CreditCardLookupTrait for EmptyLookups {
    fn get_credit_card(&self, _tenant_id: &str, card_id: &str) -> Result<CreditCard> {
        Err(Error::NotFound(format!("Card '{}' not found", card_id)))
    }
}
