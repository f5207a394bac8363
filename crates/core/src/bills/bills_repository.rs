use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::bills_model::{FixedBill, FixedBillDB};
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::fixed_bills;

/// Repository for fixed-bill rows
pub struct FixedBillRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl FixedBillRepository {
    /// Creates a new FixedBillRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Inserts a generated series in a single transaction
    pub fn create_batch(&self, rows: Vec<FixedBillDB>) -> Result<Vec<FixedBill>> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<_, Error, _>(|tx_conn| {
            diesel::insert_into(fixed_bills::table)
                .values(&rows)
                .execute(tx_conn)?;
            Ok(())
        })?;

        Ok(rows.into_iter().map(FixedBill::from).collect())
    }

    /// Retrieves a bill by its ID
    pub fn get_by_id(&self, tenant_id: &str, bill_id: &str) -> Result<FixedBill> {
        let mut conn = get_connection(&self.pool)?;

        fixed_bills::table
            .filter(fixed_bills::tenant_id.eq(tenant_id))
            .filter(fixed_bills::id.eq(bill_id))
            .select(FixedBillDB::as_select())
            .first::<FixedBillDB>(&mut conn)
            .optional()?
            .map(FixedBill::from)
            .ok_or_else(|| Error::NotFound(format!("Fixed bill '{}' not found", bill_id)))
    }

    /// Lists all bills for the tenant ordered by due date
    pub fn list(&self, tenant_id: &str) -> Result<Vec<FixedBill>> {
        let mut conn = get_connection(&self.pool)?;

        fixed_bills::table
            .filter(fixed_bills::tenant_id.eq(tenant_id))
            .order(fixed_bills::due_date.asc())
            .select(FixedBillDB::as_select())
            .load::<FixedBillDB>(&mut conn)
            .map(|rows| rows.into_iter().map(FixedBill::from).collect())
            .map_err(Error::from)
    }

    /// Lists unpaid bills ordered by due date
    pub fn list_unpaid(&self, tenant_id: &str) -> Result<Vec<FixedBill>> {
        let mut conn = get_connection(&self.pool)?;

        fixed_bills::table
            .filter(fixed_bills::tenant_id.eq(tenant_id))
            .filter(fixed_bills::is_paid.eq(false))
            .order(fixed_bills::due_date.asc())
            .select(FixedBillDB::as_select())
            .load::<FixedBillDB>(&mut conn)
            .map(|rows| rows.into_iter().map(FixedBill::from).collect())
            .map_err(Error::from)
    }

    /// Flips a bill's paid flag
    pub fn set_paid(&self, tenant_id: &str, bill_id: &str, is_paid: bool) -> Result<FixedBill> {
        let mut conn = get_connection(&self.pool)?;

        let updated = diesel::update(
            fixed_bills::table
                .filter(fixed_bills::tenant_id.eq(tenant_id))
                .filter(fixed_bills::id.eq(bill_id)),
        )
        .set(fixed_bills::is_paid.eq(is_paid))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Fixed bill '{}' not found",
                bill_id
            )));
        }

        self.get_by_id(tenant_id, bill_id)
    }
}
