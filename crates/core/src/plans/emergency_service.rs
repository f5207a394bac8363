use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::plans_model::{emergency_fund_view, EmergencyFund, EmergencyFundView, NewEmergencyFund};
use super::plans_repository::PlanRepository;
use crate::accounts::AccountRepository;
use crate::constants::EXPENSE_LOOKBACK_MONTHS;
use crate::errors::Result;
use crate::money::round2;
use crate::transactions::TransactionRepository;

/// Service for emergency funds. The fund tracks a dedicated account; its
/// target is either a fixed amount or a multiple of average monthly
/// expenses over the recent lookback window.
pub struct EmergencyFundService {
    repo: PlanRepository,
    accounts: AccountRepository,
    transactions: TransactionRepository,
}

impl EmergencyFundService {
    /// Creates a new EmergencyFundService instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repo: PlanRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool),
        }
    }

    /// Creates a fund after checking its account exists
    pub fn create_fund(&self, tenant_id: &str, new_fund: NewEmergencyFund) -> Result<EmergencyFund> {
        new_fund.validate()?;
        self.accounts.get_by_id(tenant_id, &new_fund.account_id)?;

        let fund = self.repo.create_emergency_fund(tenant_id, new_fund)?;
        debug!(
            "Created emergency fund {} on account {}",
            fund.id, fund.account_id
        );
        Ok(fund)
    }

    /// Replaces a fund's figures; the new account must exist too
    pub fn update_fund(
        &self,
        tenant_id: &str,
        fund_id: &str,
        update: NewEmergencyFund,
    ) -> Result<EmergencyFundView> {
        update.validate()?;
        self.accounts.get_by_id(tenant_id, &update.account_id)?;

        let fund = self.repo.update_emergency_fund(tenant_id, fund_id, update)?;
        self.build_view(tenant_id, fund)
    }

    /// Returns a fund with its derived completion figures
    pub fn get_view(&self, tenant_id: &str, fund_id: &str) -> Result<EmergencyFundView> {
        let fund = self.repo.get_emergency_fund(tenant_id, fund_id)?;
        self.build_view(tenant_id, fund)
    }

    pub fn list_views(&self, tenant_id: &str) -> Result<Vec<EmergencyFundView>> {
        self.repo
            .list_emergency_funds(tenant_id)?
            .into_iter()
            .map(|fund| self.build_view(tenant_id, fund))
            .collect()
    }

    pub fn delete_fund(&self, tenant_id: &str, fund_id: &str) -> Result<()> {
        self.repo.delete_emergency_fund(tenant_id, fund_id)?;
        debug!("Deleted emergency fund {}", fund_id);
        Ok(())
    }

    fn build_view(&self, tenant_id: &str, fund: EmergencyFund) -> Result<EmergencyFundView> {
        let target = self.resolve_target(tenant_id, &fund)?;
        let balance = self
            .accounts
            .get_by_id(tenant_id, &fund.account_id)?
            .balance;
        let today = chrono::Utc::now().date_naive();
        Ok(emergency_fund_view(fund, target, balance, today))
    }

    fn resolve_target(&self, tenant_id: &str, fund: &EmergencyFund) -> Result<Decimal> {
        if let Some(target) = fund.target_amount {
            return Ok(target);
        }
        let multiplier = fund.expense_multiplier.unwrap_or(Decimal::ZERO);
        let average = self
            .transactions
            .average_monthly_expenses(tenant_id, EXPENSE_LOOKBACK_MONTHS)?;
        Ok(round2(multiplier * average))
    }
}
