use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use super::accounts_repository::AccountRepository;
use crate::errors::Result;

/// Service for managing accounts
pub struct AccountService {
    repo: AccountRepository,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repo: AccountRepository::new(pool),
        }
    }

    /// Creates a new account with its opening balance
    pub fn create_account(&self, tenant_id: &str, new_account: NewAccount) -> Result<Account> {
        debug!(
            "Creating account '{}' ({}) for tenant {}",
            new_account.name,
            new_account.kind.as_str(),
            tenant_id
        );
        self.repo.create(tenant_id, new_account)
    }

    /// Updates account metadata; the balance is never touched here
    pub fn update_account(&self, tenant_id: &str, account_update: AccountUpdate) -> Result<Account> {
        self.repo.update(tenant_id, account_update)
    }

    /// Retrieves an account by its ID
    pub fn get_account(&self, tenant_id: &str, account_id: &str) -> Result<Account> {
        self.repo.get_by_id(tenant_id, account_id)
    }

    /// Lists all accounts for the tenant
    pub fn get_all_accounts(&self, tenant_id: &str) -> Result<Vec<Account>> {
        self.repo.list(tenant_id)
    }

    /// Deletes an account when nothing references it
    pub fn delete_account(&self, tenant_id: &str, account_id: &str) -> Result<()> {
        self.repo.delete(tenant_id, account_id)
    }
}
