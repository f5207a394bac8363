use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::invoices_model::{Invoice, InvoiceDB, NewInvoice};
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::invoices;

/// Repository for credit-card invoices
pub struct InvoiceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a new invoice
    pub fn create(&self, tenant_id: &str, new_invoice: NewInvoice) -> Result<Invoice> {
        new_invoice.validate()?;

        let mut conn = get_connection(&self.pool)?;

        let mut row = InvoiceDB::from_new(tenant_id, new_invoice);
        if row.id.is_empty() {
            row.id = Uuid::new_v4().to_string();
        }

        diesel::insert_into(invoices::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(row.into())
    }

    /// Retrieves an invoice by its ID
    pub fn get_by_id(&self, tenant_id: &str, invoice_id: &str) -> Result<Invoice> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_row(&mut conn, tenant_id, invoice_id).map(Invoice::from)
    }

    /// Lists unpaid invoices ordered by due date
    pub fn list_open(&self, tenant_id: &str) -> Result<Vec<Invoice>> {
        let mut conn = get_connection(&self.pool)?;

        invoices::table
            .filter(invoices::tenant_id.eq(tenant_id))
            .filter(invoices::is_paid.eq(false))
            .order(invoices::due_date.asc())
            .select(InvoiceDB::as_select())
            .load::<InvoiceDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Invoice::from).collect())
            .map_err(Error::from)
    }

    /// Loads an invoice inside a caller-owned transaction. Used by the
    /// ledger's pay-invoice flow.
    pub fn get_in_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        invoice_id: &str,
    ) -> Result<Invoice> {
        Self::find_row(conn, tenant_id, invoice_id).map(Invoice::from)
    }

    /// Stamps an invoice paid inside a caller-owned transaction, recording
    /// the paying account and the payment moment.
    pub fn mark_paid_in_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        invoice_id: &str,
        paying_account_id: &str,
        paid_at: NaiveDateTime,
    ) -> Result<()> {
        let updated = diesel::update(
            invoices::table
                .filter(invoices::tenant_id.eq(tenant_id))
                .filter(invoices::id.eq(invoice_id)),
        )
        .set((
            invoices::is_paid.eq(true),
            invoices::paid_at.eq(Some(paid_at)),
            invoices::paid_account_id.eq(Some(paying_account_id.to_string())),
        ))
        .execute(conn)?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Invoice '{}' not found",
                invoice_id
            )));
        }
        Ok(())
    }

    fn find_row(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        invoice_id: &str,
    ) -> Result<InvoiceDB> {
        invoices::table
            .filter(invoices::tenant_id.eq(tenant_id))
            .filter(invoices::id.eq(invoice_id))
            .select(InvoiceDB::as_select())
            .first::<InvoiceDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Invoice '{}' not found", invoice_id)))
    }
}
