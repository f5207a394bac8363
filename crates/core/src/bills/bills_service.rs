use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::bills_model::{FixedBill, FixedBillDB, NewRecurringBill};
use super::bills_repository::FixedBillRepository;
use crate::accounts::AccountRepository;
use crate::errors::Result;
use crate::lookups::CategoryLookupTrait;
use crate::money::months_after;

/// Service that expands recurring-bill requests into discrete fixed bills
pub struct FixedBillService {
    repo: FixedBillRepository,
    accounts: AccountRepository,
    categories: Arc<dyn CategoryLookupTrait>,
}

impl FixedBillService {
    /// Creates a new FixedBillService instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        categories: Arc<dyn CategoryLookupTrait>,
    ) -> Self {
        Self {
            repo: FixedBillRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool),
            categories,
        }
    }

    /// Expands one recurring bill into its N occurrences.
    ///
    /// Occurrence `i` (1-indexed) is named `"{name} (i/N)"` and falls due
    /// `(i-1) × unit` months after the start date. Every occurrence carries
    /// the full, unrounded amount — a recurring bill is a repeated charge,
    /// not a partitioned total.
    pub fn generate(
        &self,
        tenant_id: &str,
        request: NewRecurringBill,
    ) -> Result<Vec<FixedBill>> {
        request.validate()?;
        self.accounts.get_by_id(tenant_id, &request.account_id)?;
        self.categories
            .get_category(tenant_id, &request.category_id)?;

        let unit = request.recurrence.unit_months();
        let now = chrono::Utc::now().naive_utc();
        let amount = request.amount.to_string();

        let rows: Vec<FixedBillDB> = (1..=request.occurrences)
            .map(|i| FixedBillDB {
                id: Uuid::new_v4().to_string(),
                tenant_id: tenant_id.to_string(),
                account_id: request.account_id.clone(),
                category_id: request.category_id.clone(),
                name: format!("{} ({}/{})", request.name, i, request.occurrences),
                amount: amount.clone(),
                due_date: months_after(request.start_date, (i - 1) * unit),
                is_paid: false,
                created_at: now,
            })
            .collect();

        debug!(
            "Generating {} occurrence(s) of '{}' every {} month(s)",
            rows.len(),
            request.name,
            unit
        );
        self.repo.create_batch(rows)
    }

    /// Lists all fixed bills for the tenant
    pub fn list(&self, tenant_id: &str) -> Result<Vec<FixedBill>> {
        self.repo.list(tenant_id)
    }

    /// Marks a bill paid or unpaid
    pub fn set_paid(&self, tenant_id: &str, bill_id: &str, is_paid: bool) -> Result<FixedBill> {
        self.repo.set_paid(tenant_id, bill_id, is_paid)
    }
}
