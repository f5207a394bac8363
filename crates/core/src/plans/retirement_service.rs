use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::plans_model::{NewRetirementPlan, RetirementOutlook, RetirementPlan};
use super::plans_repository::PlanRepository;
use crate::errors::{Error, PlanError, Result};

/// Service for the tenant's retirement plan. A tenant holds at most one
/// active plan; the outlook is recomputed on every read, never stored.
pub struct RetirementService {
    repo: PlanRepository,
}

impl RetirementService {
    /// Creates a new RetirementService instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repo: PlanRepository::new(pool),
        }
    }

    /// Creates the tenant's retirement plan. Fails when an active plan
    /// already exists; the caller must deactivate it first.
    pub fn create_plan(
        &self,
        tenant_id: &str,
        new_plan: NewRetirementPlan,
    ) -> Result<(RetirementPlan, RetirementOutlook)> {
        new_plan.validate()?;

        if self.repo.get_active_retirement(tenant_id)?.is_some() {
            return Err(Error::Plan(PlanError::SingletonConflict));
        }

        let plan = self.repo.create_retirement(tenant_id, &new_plan)?;
        debug!(
            "Created retirement plan {} (retire at {})",
            plan.id, plan.retirement_age
        );
        let outlook = plan.outlook();
        Ok((plan, outlook))
    }

    /// Replaces the active plan's figures and returns the fresh outlook
    pub fn update_plan(
        &self,
        tenant_id: &str,
        update: NewRetirementPlan,
    ) -> Result<(RetirementPlan, RetirementOutlook)> {
        update.validate()?;

        let active = self
            .repo
            .get_active_retirement(tenant_id)?
            .ok_or_else(|| Error::NotFound("No active retirement plan".to_string()))?;

        let plan = self.repo.update_retirement(tenant_id, &active.id, &update)?;
        let outlook = plan.outlook();
        Ok((plan, outlook))
    }

    /// Returns the active plan with its derived outlook, if one exists
    pub fn get_outlook(
        &self,
        tenant_id: &str,
    ) -> Result<Option<(RetirementPlan, RetirementOutlook)>> {
        Ok(self
            .repo
            .get_active_retirement(tenant_id)?
            .map(|plan| {
                let outlook = plan.outlook();
                (plan, outlook)
            }))
    }

    /// Deactivates the active plan. The row stays for history; a new plan
    /// may be created afterwards.
    pub fn deactivate_plan(&self, tenant_id: &str) -> Result<()> {
        let active = self
            .repo
            .get_active_retirement(tenant_id)?
            .ok_or_else(|| Error::NotFound("No active retirement plan".to_string()))?;

        self.repo.deactivate_retirement(tenant_id, &active.id)?;
        debug!("Deactivated retirement plan {}", active.id);
        Ok(())
    }
}
