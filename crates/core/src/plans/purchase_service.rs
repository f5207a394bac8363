use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::plans_model::{NewPurchasePlan, PurchasePlanUpdate, PurchasePlanView};
use super::plans_repository::PlanRepository;
use crate::errors::Result;

/// Service for purchase savings plans. Final cost and percent saved are
/// derived from the stored figures on every read.
pub struct PurchasePlanService {
    repo: PlanRepository,
}

impl PurchasePlanService {
    /// Creates a new PurchasePlanService instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repo: PlanRepository::new(pool),
        }
    }

    pub fn create_plan(
        &self,
        tenant_id: &str,
        new_plan: NewPurchasePlan,
    ) -> Result<PurchasePlanView> {
        new_plan.validate()?;

        let plan = self.repo.create_purchase_plan(tenant_id, new_plan)?;
        debug!("Created purchase plan {} '{}'", plan.id, plan.name);
        Ok(plan.into())
    }

    pub fn get_plan(&self, tenant_id: &str, plan_id: &str) -> Result<PurchasePlanView> {
        self.repo
            .get_purchase_plan(tenant_id, plan_id)
            .map(PurchasePlanView::from)
    }

    /// Lists plans ordered by priority, each with its derived figures
    pub fn list_plans(&self, tenant_id: &str) -> Result<Vec<PurchasePlanView>> {
        Ok(self
            .repo
            .list_purchase_plans(tenant_id)?
            .into_iter()
            .map(PurchasePlanView::from)
            .collect())
    }

    pub fn update_plan(
        &self,
        tenant_id: &str,
        update: PurchasePlanUpdate,
    ) -> Result<PurchasePlanView> {
        update.validate()?;

        let plan = self.repo.update_purchase_plan(tenant_id, update)?;
        Ok(plan.into())
    }

    pub fn delete_plan(&self, tenant_id: &str, plan_id: &str) -> Result<()> {
        self.repo.delete_purchase_plan(tenant_id, plan_id)?;
        debug!("Deleted purchase plan {}", plan_id);
        Ok(())
    }
}
