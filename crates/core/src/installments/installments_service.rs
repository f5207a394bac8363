use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::installments_model::{
    build_schedule, Installment, InstallmentDB, InstallmentPurchase, InstallmentPurchaseDB,
    InstallmentPurchaseUpdate, NewInstallmentPurchase,
};
use super::installments_repository::InstallmentRepository;
use crate::errors::{Error, Result};
use crate::lookups::{CategoryLookupTrait, CreditCardLookupTrait};

/// Service for creating and maintaining installment purchase schedules.
///
/// Installments are informational: paying them happens later through the
/// card's aggregated invoice, which is a ledger flow. Nothing here touches
/// account balances.
pub struct InstallmentService {
    repo: InstallmentRepository,
    cards: Arc<dyn CreditCardLookupTrait>,
    categories: Arc<dyn CategoryLookupTrait>,
}

impl InstallmentService {
    /// Creates a new InstallmentService instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        cards: Arc<dyn CreditCardLookupTrait>,
        categories: Arc<dyn CategoryLookupTrait>,
    ) -> Self {
        Self {
            repo: InstallmentRepository::new(pool),
            cards,
            categories,
        }
    }

    /// Creates a purchase and materializes its installment rows for numbers
    /// `starting..=total`
    pub fn create_purchase(
        &self,
        tenant_id: &str,
        new_purchase: NewInstallmentPurchase,
    ) -> Result<(InstallmentPurchase, Vec<Installment>)> {
        new_purchase.validate()?;
        self.cards
            .get_credit_card(tenant_id, &new_purchase.credit_card_id)?;
        if let Some(category_id) = &new_purchase.category_id {
            self.categories.get_category(tenant_id, category_id)?;
        }

        let schedule = build_schedule(
            new_purchase.total_amount,
            new_purchase.purchase_date,
            new_purchase.starting_installment,
            new_purchase.total_installments,
        );
        debug!(
            "Creating purchase '{}': {} installment(s) materialized of {}",
            new_purchase.description,
            schedule.len(),
            new_purchase.total_installments
        );

        let total_count = new_purchase.total_installments;
        let purchase_db = InstallmentPurchaseDB::from_new(tenant_id, new_purchase);
        let rows: Vec<InstallmentDB> = schedule
            .iter()
            .map(|line| InstallmentDB::from_schedule_line(tenant_id, "", total_count, line))
            .collect();

        self.repo.create_with_installments(purchase_db, rows)
    }

    /// Edits a purchase. A changed installment range drops every existing row
    /// and regenerates the schedule — paid flags are lost, matching the
    /// original edit semantics. Amount-only edits rescale the existing rows
    /// in place, keeping due dates and paid flags.
    pub fn update_purchase(
        &self,
        tenant_id: &str,
        update: InstallmentPurchaseUpdate,
    ) -> Result<(InstallmentPurchase, Vec<Installment>)> {
        update.validate()?;

        let existing = self.repo.get_purchase(tenant_id, &update.id)?;
        if let Some(category_id) = &update.category_id {
            self.categories.get_category(tenant_id, category_id)?;
        }

        let range_changed = existing.starting_installment != update.starting_installment
            || existing.total_installments != update.total_installments;

        let purchase_db = InstallmentPurchaseDB {
            id: existing.id.clone(),
            tenant_id: existing.tenant_id.clone(),
            credit_card_id: existing.credit_card_id.clone(),
            description: update.description,
            total_amount: update.total_amount.to_string(),
            purchase_date: update.purchase_date,
            starting_installment: update.starting_installment,
            total_installments: update.total_installments,
            category_id: update.category_id,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let schedule = build_schedule(
            update.total_amount,
            update.purchase_date,
            update.starting_installment,
            update.total_installments,
        );

        let mut conn = self.repo.connection()?;
        conn.transaction::<_, Error, _>(|tx_conn| {
            InstallmentRepository::update_purchase_in_tx(tx_conn, &purchase_db)?;

            if range_changed {
                debug!(
                    "Purchase '{}' range changed; regenerating installments",
                    purchase_db.id
                );
                InstallmentRepository::delete_installments_in_tx(
                    tx_conn,
                    tenant_id,
                    &purchase_db.id,
                )?;
                let rows: Vec<InstallmentDB> = schedule
                    .iter()
                    .map(|line| {
                        InstallmentDB::from_schedule_line(
                            tenant_id,
                            &purchase_db.id,
                            purchase_db.total_installments,
                            line,
                        )
                    })
                    .collect();
                InstallmentRepository::insert_installments_in_tx(tx_conn, &rows)?;
            } else {
                for line in &schedule {
                    InstallmentRepository::set_installment_amount_in_tx(
                        tx_conn,
                        tenant_id,
                        &purchase_db.id,
                        line.installment_number,
                        &line.amount.to_string(),
                    )?;
                }
            }
            Ok(())
        })?;

        let installments = self.repo.list_installments(tenant_id, &update.id)?;
        Ok((purchase_db.into(), installments))
    }

    /// Retrieves a purchase with its installments
    pub fn get_purchase(
        &self,
        tenant_id: &str,
        purchase_id: &str,
    ) -> Result<(InstallmentPurchase, Vec<Installment>)> {
        let purchase = self.repo.get_purchase(tenant_id, purchase_id)?;
        let installments = self.repo.list_installments(tenant_id, purchase_id)?;
        Ok((purchase, installments))
    }

    /// Lists all purchases for the tenant
    pub fn list_purchases(&self, tenant_id: &str) -> Result<Vec<InstallmentPurchase>> {
        self.repo.list_purchases(tenant_id)
    }

    /// Deletes a purchase aggregate: installments first, then the purchase
    pub fn delete_purchase(&self, tenant_id: &str, purchase_id: &str) -> Result<()> {
        self.repo.delete_purchase(tenant_id, purchase_id)
    }

    /// Marks an installment paid. Informational only; no ledger interaction.
    pub fn mark_paid(&self, tenant_id: &str, installment_id: &str) -> Result<Installment> {
        self.repo.set_installment_paid(tenant_id, installment_id, true)
    }

    /// Clears an installment's paid flag
    pub fn mark_unpaid(&self, tenant_id: &str, installment_id: &str) -> Result<Installment> {
        self.repo.set_installment_paid(tenant_id, installment_id, false)
    }
}
