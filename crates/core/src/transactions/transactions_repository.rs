use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::transactions_constants::EXPENSE_KINDS;
use super::transactions_model::{NewTransaction, Transaction, TransactionDB, TransactionPage};
use crate::db::get_connection;
use crate::errors::Result;
use crate::money::round2;
use crate::schema::transactions;

/// Repository for the append-only transaction log
pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Appends a log entry inside a caller-owned transaction. The ledger
    /// composes this with its balance write so both commit or neither does.
    pub fn append_in_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        new_transaction.validate()?;

        let mut row = TransactionDB::from_new(tenant_id, new_transaction);
        row.id = Uuid::new_v4().to_string();

        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(conn)?;

        Ok(row.into())
    }

    /// Retrieves all transactions for an account, ordered by date
    pub fn list_by_account(&self, tenant_id: &str, account_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .filter(transactions::account_id.eq(account_id))
            .order(transactions::transaction_date.asc())
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(crate::errors::Error::from)
    }

    /// Retrieves the transactions linked to an income entry, used by
    /// reversal and adjustment flows
    pub fn list_by_income(&self, tenant_id: &str, income_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .filter(transactions::income_id.eq(income_id))
            .order(transactions::transaction_date.asc())
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(crate::errors::Error::from)
    }

    /// Date-descending page of the tenant's log; `page` is 1-based
    pub fn list_paged(
        &self,
        tenant_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage> {
        let mut conn = get_connection(&self.pool)?;

        let offset = (page.max(1) - 1) * page_size;

        let total_row_count = transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        let data = transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .order(transactions::transaction_date.desc())
            .limit(page_size)
            .offset(offset)
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)?
            .into_iter()
            .map(Transaction::from)
            .collect();

        Ok(TransactionPage {
            data,
            total_row_count,
        })
    }

    /// Signed sum of an account's log. Amounts are stored as decimal text,
    /// so the fold happens here rather than in SQL.
    pub fn sum_signed_by_account(&self, tenant_id: &str, account_id: &str) -> Result<Decimal> {
        Ok(self
            .list_by_account(tenant_id, account_id)?
            .iter()
            .map(Transaction::signed_amount)
            .sum())
    }

    /// Mean monthly spend (debits and invoice payments) over the trailing
    /// window, used for multiplier-based emergency-fund targets
    pub fn average_monthly_expenses(&self, tenant_id: &str, months: u32) -> Result<Decimal> {
        if months == 0 {
            return Ok(Decimal::ZERO);
        }

        let mut conn = get_connection(&self.pool)?;

        let now = Utc::now().naive_utc();
        let window_start = now
            .date()
            .checked_sub_months(chrono::Months::new(months))
            .unwrap_or(now.date())
            .and_hms_opt(0, 0, 0)
            .unwrap_or(now);

        let total: Decimal = transactions::table
            .filter(transactions::tenant_id.eq(tenant_id))
            .filter(transactions::kind.eq_any(EXPENSE_KINDS))
            .filter(transactions::transaction_date.ge(window_start))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)?
            .into_iter()
            .map(|row| Transaction::from(row).amount)
            .sum();

        Ok(round2(total / Decimal::from(months)))
    }
}
