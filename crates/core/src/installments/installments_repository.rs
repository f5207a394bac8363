use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::installments_model::{
    Installment, InstallmentDB, InstallmentPurchase, InstallmentPurchaseDB,
};
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::{installment_purchases, installments};

/// Repository for installment purchases and their installment rows
pub struct InstallmentRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl InstallmentRepository {
    /// Creates a new InstallmentRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn connection(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool)
    }

    /// Inserts a purchase and its installment rows in one transaction
    pub fn create_with_installments(
        &self,
        mut purchase: InstallmentPurchaseDB,
        rows: Vec<InstallmentDB>,
    ) -> Result<(InstallmentPurchase, Vec<Installment>)> {
        let mut conn = get_connection(&self.pool)?;

        if purchase.id.is_empty() {
            purchase.id = Uuid::new_v4().to_string();
        }
        let rows: Vec<InstallmentDB> = rows
            .into_iter()
            .map(|mut row| {
                row.purchase_id = purchase.id.clone();
                row
            })
            .collect();

        conn.transaction::<_, Error, _>(|tx_conn| {
            diesel::insert_into(installment_purchases::table)
                .values(&purchase)
                .execute(tx_conn)?;

            diesel::insert_into(installments::table)
                .values(&rows)
                .execute(tx_conn)?;

            Ok(())
        })?;

        Ok((
            purchase.into(),
            rows.into_iter().map(Installment::from).collect(),
        ))
    }

    /// Retrieves a purchase by its ID
    pub fn get_purchase(&self, tenant_id: &str, purchase_id: &str) -> Result<InstallmentPurchase> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_purchase_row(&mut conn, tenant_id, purchase_id).map(InstallmentPurchase::from)
    }

    /// Lists all purchases for the tenant, newest first
    pub fn list_purchases(&self, tenant_id: &str) -> Result<Vec<InstallmentPurchase>> {
        let mut conn = get_connection(&self.pool)?;

        installment_purchases::table
            .filter(installment_purchases::tenant_id.eq(tenant_id))
            .order(installment_purchases::purchase_date.desc())
            .select(InstallmentPurchaseDB::as_select())
            .load::<InstallmentPurchaseDB>(&mut conn)
            .map(|rows| rows.into_iter().map(InstallmentPurchase::from).collect())
            .map_err(Error::from)
    }

    /// Lists a purchase's installments ordered by number
    pub fn list_installments(&self, tenant_id: &str, purchase_id: &str) -> Result<Vec<Installment>> {
        let mut conn = get_connection(&self.pool)?;

        installments::table
            .filter(installments::tenant_id.eq(tenant_id))
            .filter(installments::purchase_id.eq(purchase_id))
            .order(installments::installment_number.asc())
            .select(InstallmentDB::as_select())
            .load::<InstallmentDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Installment::from).collect())
            .map_err(Error::from)
    }

    /// Lists all unpaid installments for the tenant ordered by due date
    pub fn list_unpaid(&self, tenant_id: &str) -> Result<Vec<Installment>> {
        let mut conn = get_connection(&self.pool)?;

        installments::table
            .filter(installments::tenant_id.eq(tenant_id))
            .filter(installments::is_paid.eq(false))
            .order(installments::due_date.asc())
            .select(InstallmentDB::as_select())
            .load::<InstallmentDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Installment::from).collect())
            .map_err(Error::from)
    }

    /// Rewrites the purchase row inside a caller-owned transaction
    pub fn update_purchase_in_tx(
        conn: &mut SqliteConnection,
        purchase: &InstallmentPurchaseDB,
    ) -> Result<()> {
        diesel::update(installment_purchases::table.find(&purchase.id))
            .set(purchase)
            .execute(conn)?;
        Ok(())
    }

    /// Deletes every installment row of a purchase inside a caller-owned
    /// transaction
    pub fn delete_installments_in_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        purchase_id: &str,
    ) -> Result<usize> {
        diesel::delete(
            installments::table
                .filter(installments::tenant_id.eq(tenant_id))
                .filter(installments::purchase_id.eq(purchase_id)),
        )
        .execute(conn)
        .map_err(Error::from)
    }

    /// Inserts regenerated installment rows inside a caller-owned transaction
    pub fn insert_installments_in_tx(
        conn: &mut SqliteConnection,
        rows: &[InstallmentDB],
    ) -> Result<()> {
        diesel::insert_into(installments::table)
            .values(rows)
            .execute(conn)?;
        Ok(())
    }

    /// Updates a single installment's amount inside a caller-owned
    /// transaction, leaving its date and paid flag alone
    pub fn set_installment_amount_in_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        purchase_id: &str,
        installment_number: i32,
        amount: &str,
    ) -> Result<()> {
        diesel::update(
            installments::table
                .filter(installments::tenant_id.eq(tenant_id))
                .filter(installments::purchase_id.eq(purchase_id))
                .filter(installments::installment_number.eq(installment_number)),
        )
        .set((
            installments::amount.eq(amount),
            installments::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(conn)?;
        Ok(())
    }

    /// Deletes a purchase and its installments in one transaction
    pub fn delete_purchase(&self, tenant_id: &str, purchase_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        Self::find_purchase_row(&mut conn, tenant_id, purchase_id)?;

        conn.transaction::<_, Error, _>(|tx_conn| {
            Self::delete_installments_in_tx(tx_conn, tenant_id, purchase_id)?;
            diesel::delete(
                installment_purchases::table
                    .filter(installment_purchases::tenant_id.eq(tenant_id))
                    .filter(installment_purchases::id.eq(purchase_id)),
            )
            .execute(tx_conn)?;
            Ok(())
        })
    }

    /// Flips an installment's paid flag
    pub fn set_installment_paid(
        &self,
        tenant_id: &str,
        installment_id: &str,
        is_paid: bool,
    ) -> Result<Installment> {
        let mut conn = get_connection(&self.pool)?;

        let updated = diesel::update(
            installments::table
                .filter(installments::tenant_id.eq(tenant_id))
                .filter(installments::id.eq(installment_id)),
        )
        .set((
            installments::is_paid.eq(is_paid),
            installments::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Installment '{}' not found",
                installment_id
            )));
        }

        installments::table
            .filter(installments::tenant_id.eq(tenant_id))
            .filter(installments::id.eq(installment_id))
            .select(InstallmentDB::as_select())
            .first::<InstallmentDB>(&mut conn)
            .map(Installment::from)
            .map_err(Error::from)
    }

    fn find_purchase_row(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        purchase_id: &str,
    ) -> Result<InstallmentPurchaseDB> {
        installment_purchases::table
            .filter(installment_purchases::tenant_id.eq(tenant_id))
            .filter(installment_purchases::id.eq(purchase_id))
            .select(InstallmentPurchaseDB::as_select())
            .first::<InstallmentPurchaseDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Purchase '{}' not found", purchase_id)))
    }
}
