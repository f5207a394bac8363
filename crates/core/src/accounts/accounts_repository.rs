use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::DatabaseErrorKind;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::accounts_model::{Account, AccountDB, AccountUpdate, NewAccount};
use crate::db::get_connection;
use crate::errors::{Error, Result, ValidationError};
use crate::schema::accounts;

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a new account
    pub fn create(&self, tenant_id: &str, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        let mut conn = get_connection(&self.pool)?;

        let mut account_db = AccountDB::from_new(tenant_id, new_account);
        if account_db.id.is_empty() {
            account_db.id = Uuid::new_v4().to_string();
        }

        diesel::insert_into(accounts::table)
            .values(&account_db)
            .execute(&mut conn)?;

        Ok(account_db.into())
    }

    /// Updates account metadata. The stored balance is carried over untouched;
    /// only ledger operations may change it.
    pub fn update(&self, tenant_id: &str, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;

        let mut conn = get_connection(&self.pool)?;

        let existing = Self::find_row(&mut conn, tenant_id, &account_update.id)?;

        let account_db = AccountDB {
            id: existing.id.clone(),
            tenant_id: existing.tenant_id.clone(),
            name: account_update.name,
            owner: account_update.owner,
            account_type: account_update.kind.as_str().to_string(),
            balance: existing.balance.clone(),
            annual_yield_rate: account_update.annual_yield_rate.map(|r| r.to_string()),
            description: account_update.description,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        diesel::update(accounts::table.find(&account_db.id))
            .set(&account_db)
            .execute(&mut conn)?;

        Ok(account_db.into())
    }

    /// Retrieves an account by its ID
    pub fn get_by_id(&self, tenant_id: &str, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_row(&mut conn, tenant_id, account_id).map(Account::from)
    }

    /// Lists all accounts for the tenant
    pub fn list(&self, tenant_id: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        accounts::table
            .filter(accounts::tenant_id.eq(tenant_id))
            .order(accounts::name.asc())
            .select(AccountDB::as_select())
            .load::<AccountDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Account::from).collect())
            .map_err(Error::from)
    }

    /// Lists accounts with a configured annual yield rate
    pub fn list_yield_bearing(&self, tenant_id: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        accounts::table
            .filter(accounts::tenant_id.eq(tenant_id))
            .filter(accounts::annual_yield_rate.is_not_null())
            .order(accounts::name.asc())
            .select(AccountDB::as_select())
            .load::<AccountDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Account::from).collect())
            .map_err(Error::from)
    }

    /// Deletes an account. An account still referenced by transactions or
    /// plans fails with a domain error rather than a constraint panic.
    pub fn delete(&self, tenant_id: &str, account_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        // Existence check first so a missing id reports NotFound, not a no-op.
        Self::find_row(&mut conn, tenant_id, account_id)?;

        diesel::delete(
            accounts::table
                .filter(accounts::tenant_id.eq(tenant_id))
                .filter(accounts::id.eq(account_id)),
        )
        .execute(&mut conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Account '{}' is referenced by existing records and cannot be deleted",
                    account_id
                )))
            }
            other => Error::from(other),
        })?;

        Ok(())
    }

    /// Loads an account row inside a caller-owned transaction. Reserved for
    /// the ledger, which must read and write the balance atomically.
    pub fn get_in_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        account_id: &str,
    ) -> Result<Account> {
        Self::find_row(conn, tenant_id, account_id).map(Account::from)
    }

    /// Writes a new balance inside a caller-owned transaction. Reserved for
    /// the ledger.
    pub fn set_balance_in_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        account_id: &str,
        new_balance: Decimal,
    ) -> Result<()> {
        let updated = diesel::update(
            accounts::table
                .filter(accounts::tenant_id.eq(tenant_id))
                .filter(accounts::id.eq(account_id)),
        )
        .set((
            accounts::balance.eq(new_balance.to_string()),
            accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(conn)?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Account '{}' not found",
                account_id
            )));
        }
        Ok(())
    }

    fn find_row(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        account_id: &str,
    ) -> Result<AccountDB> {
        accounts::table
            .filter(accounts::tenant_id.eq(tenant_id))
            .filter(accounts::id.eq(account_id))
            .select(AccountDB::as_select())
            .first::<AccountDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Account '{}' not found", account_id)))
    }
}
