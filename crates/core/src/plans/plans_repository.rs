use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::plans_model::{
    EmergencyFund, EmergencyFundDB, NewEmergencyFund, NewPurchasePlan, NewRetirementPlan,
    PurchasePlan, PurchasePlanDB, PurchasePlanUpdate, RetirementPlan, RetirementPlanDB,
};
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::{emergency_funds, purchase_plans, retirement_plans};

/// Repository for the three plan tables. They share a pool and the same
/// tenant filtering discipline, so one repository covers all of them.
pub struct PlanRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PlanRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    // -- retirement -----------------------------------------------------

    pub fn create_retirement(
        &self,
        tenant_id: &str,
        new_plan: &NewRetirementPlan,
    ) -> Result<RetirementPlan> {
        let mut conn = get_connection(&self.pool)?;

        let mut plan_db = RetirementPlanDB::from_new(tenant_id, new_plan);
        plan_db.id = Uuid::new_v4().to_string();

        diesel::insert_into(retirement_plans::table)
            .values(&plan_db)
            .execute(&mut conn)?;

        Ok(plan_db.into())
    }

    /// Returns the tenant's active retirement plan, if one exists
    pub fn get_active_retirement(&self, tenant_id: &str) -> Result<Option<RetirementPlan>> {
        let mut conn = get_connection(&self.pool)?;

        retirement_plans::table
            .filter(retirement_plans::tenant_id.eq(tenant_id))
            .filter(retirement_plans::is_active.eq(true))
            .select(RetirementPlanDB::as_select())
            .first::<RetirementPlanDB>(&mut conn)
            .optional()
            .map(|row| row.map(RetirementPlan::from))
            .map_err(Error::from)
    }

    /// Replaces the figures of an existing retirement plan
    pub fn update_retirement(
        &self,
        tenant_id: &str,
        plan_id: &str,
        update: &NewRetirementPlan,
    ) -> Result<RetirementPlan> {
        let mut conn = get_connection(&self.pool)?;

        let existing = retirement_plans::table
            .filter(retirement_plans::tenant_id.eq(tenant_id))
            .filter(retirement_plans::id.eq(plan_id))
            .select(RetirementPlanDB::as_select())
            .first::<RetirementPlanDB>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Retirement plan '{}' not found", plan_id)))?;

        let plan_db = RetirementPlanDB {
            id: existing.id.clone(),
            tenant_id: existing.tenant_id.clone(),
            current_age: update.current_age,
            retirement_age: update.retirement_age,
            desired_monthly_income: update.desired_monthly_income.to_string(),
            current_net_worth: update.current_net_worth.to_string(),
            monthly_contribution: update.monthly_contribution.to_string(),
            annual_return_rate: update.annual_return_rate.to_string(),
            life_expectancy: update.life_expectancy,
            is_active: existing.is_active,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        diesel::update(retirement_plans::table.find(&plan_db.id))
            .set(&plan_db)
            .execute(&mut conn)?;

        Ok(plan_db.into())
    }

    pub fn deactivate_retirement(&self, tenant_id: &str, plan_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        let updated = diesel::update(
            retirement_plans::table
                .filter(retirement_plans::tenant_id.eq(tenant_id))
                .filter(retirement_plans::id.eq(plan_id)),
        )
        .set((
            retirement_plans::is_active.eq(false),
            retirement_plans::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Retirement plan '{}' not found",
                plan_id
            )));
        }
        Ok(())
    }

    // -- purchase plans -------------------------------------------------

    pub fn create_purchase_plan(
        &self,
        tenant_id: &str,
        new_plan: NewPurchasePlan,
    ) -> Result<PurchasePlan> {
        let mut conn = get_connection(&self.pool)?;

        let mut plan_db = PurchasePlanDB::from_new(tenant_id, new_plan);
        plan_db.id = Uuid::new_v4().to_string();

        diesel::insert_into(purchase_plans::table)
            .values(&plan_db)
            .execute(&mut conn)?;

        Ok(plan_db.into())
    }

    pub fn get_purchase_plan(&self, tenant_id: &str, plan_id: &str) -> Result<PurchasePlan> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_purchase_row(&mut conn, tenant_id, plan_id).map(PurchasePlan::from)
    }

    /// Lists purchase plans ordered by priority, then target date
    pub fn list_purchase_plans(&self, tenant_id: &str) -> Result<Vec<PurchasePlan>> {
        let mut conn = get_connection(&self.pool)?;

        purchase_plans::table
            .filter(purchase_plans::tenant_id.eq(tenant_id))
            .order((
                purchase_plans::priority.asc(),
                purchase_plans::target_date.asc(),
            ))
            .select(PurchasePlanDB::as_select())
            .load::<PurchasePlanDB>(&mut conn)
            .map(|rows| rows.into_iter().map(PurchasePlan::from).collect())
            .map_err(Error::from)
    }

    pub fn update_purchase_plan(
        &self,
        tenant_id: &str,
        update: PurchasePlanUpdate,
    ) -> Result<PurchasePlan> {
        let mut conn = get_connection(&self.pool)?;

        let existing = Self::find_purchase_row(&mut conn, tenant_id, &update.id)?;

        let plan_db = PurchasePlanDB {
            id: existing.id.clone(),
            tenant_id: existing.tenant_id.clone(),
            name: update.name,
            target_amount: update.target_amount.to_string(),
            saved_amount: update.saved_amount.to_string(),
            down_payment: update.down_payment.map(|d| d.to_string()),
            installment_count: update.installment_count,
            monthly_interest_rate: update.monthly_interest_rate.map(|r| r.to_string()),
            priority: update.priority,
            target_date: update.target_date,
            status: update.status.as_str().to_string(),
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        diesel::update(purchase_plans::table.find(&plan_db.id))
            .set(&plan_db)
            .execute(&mut conn)?;

        Ok(plan_db.into())
    }

    pub fn delete_purchase_plan(&self, tenant_id: &str, plan_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        Self::find_purchase_row(&mut conn, tenant_id, plan_id)?;

        diesel::delete(
            purchase_plans::table
                .filter(purchase_plans::tenant_id.eq(tenant_id))
                .filter(purchase_plans::id.eq(plan_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }

    // -- emergency funds ------------------------------------------------

    pub fn create_emergency_fund(
        &self,
        tenant_id: &str,
        new_fund: NewEmergencyFund,
    ) -> Result<EmergencyFund> {
        let mut conn = get_connection(&self.pool)?;

        let mut fund_db = EmergencyFundDB::from_new(tenant_id, new_fund);
        fund_db.id = Uuid::new_v4().to_string();

        diesel::insert_into(emergency_funds::table)
            .values(&fund_db)
            .execute(&mut conn)?;

        Ok(fund_db.into())
    }

    pub fn get_emergency_fund(&self, tenant_id: &str, fund_id: &str) -> Result<EmergencyFund> {
        let mut conn = get_connection(&self.pool)?;

        emergency_funds::table
            .filter(emergency_funds::tenant_id.eq(tenant_id))
            .filter(emergency_funds::id.eq(fund_id))
            .select(EmergencyFundDB::as_select())
            .first::<EmergencyFundDB>(&mut conn)
            .optional()?
            .map(EmergencyFund::from)
            .ok_or_else(|| Error::NotFound(format!("Emergency fund '{}' not found", fund_id)))
    }

    pub fn list_emergency_funds(&self, tenant_id: &str) -> Result<Vec<EmergencyFund>> {
        let mut conn = get_connection(&self.pool)?;

        emergency_funds::table
            .filter(emergency_funds::tenant_id.eq(tenant_id))
            .order(emergency_funds::created_at.asc())
            .select(EmergencyFundDB::as_select())
            .load::<EmergencyFundDB>(&mut conn)
            .map(|rows| rows.into_iter().map(EmergencyFund::from).collect())
            .map_err(Error::from)
    }

    /// Replaces a fund's target and contribution figures
    pub fn update_emergency_fund(
        &self,
        tenant_id: &str,
        fund_id: &str,
        update: NewEmergencyFund,
    ) -> Result<EmergencyFund> {
        let mut conn = get_connection(&self.pool)?;

        let existing = emergency_funds::table
            .filter(emergency_funds::tenant_id.eq(tenant_id))
            .filter(emergency_funds::id.eq(fund_id))
            .select(EmergencyFundDB::as_select())
            .first::<EmergencyFundDB>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Emergency fund '{}' not found", fund_id)))?;

        let fund_db = EmergencyFundDB {
            id: existing.id.clone(),
            tenant_id: existing.tenant_id.clone(),
            account_id: update.account_id,
            target_amount: update.target_amount.map(|t| t.to_string()),
            expense_multiplier: update.expense_multiplier.map(|m| m.to_string()),
            monthly_contribution: update.monthly_contribution.to_string(),
            created_at: existing.created_at,
        };

        diesel::update(emergency_funds::table.find(&fund_db.id))
            .set(&fund_db)
            .execute(&mut conn)?;

        Ok(fund_db.into())
    }

    pub fn delete_emergency_fund(&self, tenant_id: &str, fund_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        let deleted = diesel::delete(
            emergency_funds::table
                .filter(emergency_funds::tenant_id.eq(tenant_id))
                .filter(emergency_funds::id.eq(fund_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(Error::NotFound(format!(
                "Emergency fund '{}' not found",
                fund_id
            )));
        }
        Ok(())
    }

    fn find_purchase_row(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        plan_id: &str,
    ) -> Result<PurchasePlanDB> {
        purchase_plans::table
            .filter(purchase_plans::tenant_id.eq(tenant_id))
            .filter(purchase_plans::id.eq(plan_id))
            .select(PurchasePlanDB::as_select())
            .first::<PurchasePlanDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Purchase plan '{}' not found", plan_id)))
    }
}
