use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::money::{parse_db_decimal, round2};
use crate::projections::{self, PlanStatus};

// ---------------------------------------------------------------------------
// Retirement plan
// ---------------------------------------------------------------------------

/// A tenant's retirement plan. At most one active plan exists per tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub id: String,
    pub tenant_id: String,
    pub current_age: i32,
    pub retirement_age: i32,
    pub desired_monthly_income: Decimal,
    pub current_net_worth: Decimal,
    pub monthly_contribution: Decimal,
    pub annual_return_rate: Decimal,
    pub life_expectancy: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RetirementPlan {
    pub fn months_to_retirement(&self) -> u32 {
        ((self.retirement_age - self.current_age).max(0) as u32) * 12
    }

    /// Recomputes the derived projection on every read; nothing here is
    /// persisted.
    pub fn outlook(&self) -> RetirementOutlook {
        let months = self.months_to_retirement();
        let required = projections::required_net_worth(self.desired_monthly_income);
        let projected = projections::projected_net_worth(
            self.current_net_worth,
            self.monthly_contribution,
            self.annual_return_rate,
            months,
        );
        let surplus = projected - required;
        let required_contribution = if surplus >= Decimal::ZERO {
            Decimal::ZERO
        } else {
            projections::required_monthly_contribution(
                required,
                self.current_net_worth,
                self.annual_return_rate,
                months,
            )
        };

        RetirementOutlook {
            required_net_worth: required,
            projected_net_worth: projected,
            surplus,
            required_monthly_contribution: required_contribution,
            status: projections::status_classification(surplus, required),
        }
    }
}

/// Derived retirement projection, recomputed on read/write
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementOutlook {
    pub required_net_worth: Decimal,
    pub projected_net_worth: Decimal,
    pub surplus: Decimal,
    pub required_monthly_contribution: Decimal,
    pub status: PlanStatus,
}

/// Input model for creating or replacing a retirement plan's figures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRetirementPlan {
    pub current_age: i32,
    pub retirement_age: i32,
    pub desired_monthly_income: Decimal,
    pub current_net_worth: Decimal,
    pub monthly_contribution: Decimal,
    pub annual_return_rate: Decimal,
    pub life_expectancy: i32,
}

impl NewRetirementPlan {
    pub fn validate(&self) -> Result<()> {
        if self.current_age <= 0 {
            return Err(invalid("Current age must be positive"));
        }
        if self.retirement_age <= self.current_age {
            return Err(invalid("Retirement age must be greater than current age"));
        }
        if self.life_expectancy < self.retirement_age {
            return Err(invalid("Life expectancy cannot precede retirement"));
        }
        if self.desired_monthly_income <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                self.desired_monthly_income,
            )));
        }
        if self.current_net_worth < Decimal::ZERO
            || self.monthly_contribution < Decimal::ZERO
            || self.annual_return_rate < Decimal::ZERO
        {
            return Err(invalid("Retirement plan figures cannot be negative"));
        }
        Ok(())
    }
}

/// Database model for retirement plans
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::retirement_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RetirementPlanDB {
    pub id: String,
    pub tenant_id: String,
    pub current_age: i32,
    pub retirement_age: i32,
    pub desired_monthly_income: String,
    pub current_net_worth: String,
    pub monthly_contribution: String,
    pub annual_return_rate: String,
    pub life_expectancy: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<RetirementPlanDB> for RetirementPlan {
    fn from(db: RetirementPlanDB) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            current_age: db.current_age,
            retirement_age: db.retirement_age,
            desired_monthly_income: parse_db_decimal(&db.desired_monthly_income, "desired income"),
            current_net_worth: parse_db_decimal(&db.current_net_worth, "net worth"),
            monthly_contribution: parse_db_decimal(&db.monthly_contribution, "contribution"),
            annual_return_rate: parse_db_decimal(&db.annual_return_rate, "return rate"),
            life_expectancy: db.life_expectancy,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl RetirementPlanDB {
    pub fn from_new(tenant_id: &str, domain: &NewRetirementPlan) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),
            tenant_id: tenant_id.to_string(),
            current_age: domain.current_age,
            retirement_age: domain.retirement_age,
            desired_monthly_income: domain.desired_monthly_income.to_string(),
            current_net_worth: domain.current_net_worth.to_string(),
            monthly_contribution: domain.monthly_contribution.to_string(),
            annual_return_rate: domain.annual_return_rate.to_string(),
            life_expectancy: domain.life_expectancy,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Purchase plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchasePlanStatus {
    #[default]
    Planned,
    InProgress,
    Done,
    Cancelled,
}

impl PurchasePlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchasePlanStatus::Planned => "PLANNED",
            PurchasePlanStatus::InProgress => "IN_PROGRESS",
            PurchasePlanStatus::Done => "DONE",
            PurchasePlanStatus::Cancelled => "CANCELLED",
        }
    }
}

impl TryFrom<&str> for PurchasePlanStatus {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "PLANNED" => Ok(PurchasePlanStatus::Planned),
            "IN_PROGRESS" => Ok(PurchasePlanStatus::InProgress),
            "DONE" => Ok(PurchasePlanStatus::Done),
            "CANCELLED" => Ok(PurchasePlanStatus::Cancelled),
            other => Err(invalid(&format!("Unknown purchase plan status '{}'", other))),
        }
    }
}

/// A savings goal for a big purchase, optionally financed in installments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePlan {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub down_payment: Option<Decimal>,
    pub installment_count: Option<i32>,
    pub monthly_interest_rate: Option<Decimal>,
    pub priority: i32,
    pub target_date: NaiveDate,
    pub status: PurchasePlanStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PurchasePlan {
    /// Total cost once interest is paid. A cash purchase costs its target;
    /// a financed one costs the down payment plus the Price-table payment
    /// times the installment count.
    pub fn final_cost(&self) -> Decimal {
        let count = match self.installment_count {
            Some(count) if count > 0 => count,
            _ => return round2(self.target_amount),
        };

        let down = self.down_payment.unwrap_or(Decimal::ZERO);
        let financed = self.target_amount - down;
        if financed <= Decimal::ZERO {
            return round2(self.target_amount);
        }

        let rate = match self.monthly_interest_rate {
            Some(rate) if rate > Decimal::ZERO => rate / dec!(100),
            _ => return round2(self.target_amount),
        };

        // Price table: payment = financed * i / (1 - (1+i)^-n)
        let growth = (Decimal::ONE + rate).powu(count as u64);
        let payment = round2(financed * rate * growth / (growth - Decimal::ONE));
        round2(down + payment * Decimal::from(count))
    }

    /// Share of the target already saved, capped at 100
    pub fn percent_saved(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return dec!(100);
        }
        round2((self.saved_amount / self.target_amount * dec!(100)).min(dec!(100)))
    }
}

/// Purchase plan together with its derived figures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePlanView {
    #[serde(flatten)]
    pub plan: PurchasePlan,
    pub final_cost: Decimal,
    pub percent_saved: Decimal,
}

impl From<PurchasePlan> for PurchasePlanView {
    fn from(plan: PurchasePlan) -> Self {
        let final_cost = plan.final_cost();
        let percent_saved = plan.percent_saved();
        Self {
            plan,
            final_cost,
            percent_saved,
        }
    }
}

/// Input model for creating a purchase plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchasePlan {
    pub name: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub down_payment: Option<Decimal>,
    pub installment_count: Option<i32>,
    pub monthly_interest_rate: Option<Decimal>,
    pub priority: i32,
    pub target_date: NaiveDate,
}

impl NewPurchasePlan {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("Purchase plan name cannot be empty"));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                self.target_amount,
            )));
        }
        if self.saved_amount < Decimal::ZERO {
            return Err(invalid("Saved amount cannot be negative"));
        }
        if !(1..=3).contains(&self.priority) {
            return Err(invalid("Priority must be between 1 and 3"));
        }
        if let Some(count) = self.installment_count {
            if count < 1 {
                return Err(invalid("Installment count must be at least 1"));
            }
        }
        if let Some(down) = self.down_payment {
            if down < Decimal::ZERO || down > self.target_amount {
                return Err(invalid("Down payment must be between zero and the target"));
            }
        }
        if let Some(rate) = self.monthly_interest_rate {
            if rate < Decimal::ZERO {
                return Err(invalid("Interest rate cannot be negative"));
            }
        }
        Ok(())
    }
}

/// Input model for updating a purchase plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePlanUpdate {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub down_payment: Option<Decimal>,
    pub installment_count: Option<i32>,
    pub monthly_interest_rate: Option<Decimal>,
    pub priority: i32,
    pub target_date: NaiveDate,
    pub status: PurchasePlanStatus,
}

impl PurchasePlanUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(invalid("Purchase plan ID is required for updates"));
        }
        NewPurchasePlan {
            name: self.name.clone(),
            target_amount: self.target_amount,
            saved_amount: self.saved_amount,
            down_payment: self.down_payment,
            installment_count: self.installment_count,
            monthly_interest_rate: self.monthly_interest_rate,
            priority: self.priority,
            target_date: self.target_date,
        }
        .validate()
    }
}

/// Database model for purchase plans
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::purchase_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PurchasePlanDB {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub target_amount: String,
    pub saved_amount: String,
    pub down_payment: Option<String>,
    pub installment_count: Option<i32>,
    pub monthly_interest_rate: Option<String>,
    pub priority: i32,
    pub target_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PurchasePlanDB> for PurchasePlan {
    fn from(db: PurchasePlanDB) -> Self {
        let status = PurchasePlanStatus::try_from(db.status.as_str()).unwrap_or_default();
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            name: db.name,
            target_amount: parse_db_decimal(&db.target_amount, "target amount"),
            saved_amount: parse_db_decimal(&db.saved_amount, "saved amount"),
            down_payment: db
                .down_payment
                .as_deref()
                .map(|d| parse_db_decimal(d, "down payment")),
            installment_count: db.installment_count,
            monthly_interest_rate: db
                .monthly_interest_rate
                .as_deref()
                .map(|r| parse_db_decimal(r, "interest rate")),
            priority: db.priority,
            target_date: db.target_date,
            status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl PurchasePlanDB {
    pub fn from_new(tenant_id: &str, domain: NewPurchasePlan) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),
            tenant_id: tenant_id.to_string(),
            name: domain.name,
            target_amount: domain.target_amount.to_string(),
            saved_amount: domain.saved_amount.to_string(),
            down_payment: domain.down_payment.map(|d| d.to_string()),
            installment_count: domain.installment_count,
            monthly_interest_rate: domain.monthly_interest_rate.map(|r| r.to_string()),
            priority: domain.priority,
            target_date: domain.target_date,
            status: PurchasePlanStatus::Planned.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Emergency fund
// ---------------------------------------------------------------------------

/// An emergency fund bound to a dedicated account. The target is either an
/// explicit amount or a multiplier over average monthly expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFund {
    pub id: String,
    pub tenant_id: String,
    pub account_id: String,
    pub target_amount: Option<Decimal>,
    pub expense_multiplier: Option<Decimal>,
    pub monthly_contribution: Decimal,
    pub created_at: NaiveDateTime,
}

/// Emergency fund with its derived completion figures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundView {
    #[serde(flatten)]
    pub fund: EmergencyFund,
    pub resolved_target: Decimal,
    pub current_balance: Decimal,
    pub percent_complete: Decimal,
    pub months_to_completion: Option<u32>,
    pub projected_completion_date: Option<NaiveDate>,
}

/// Computes the derived completion figures for a fund. Pure so the cap and
/// the projection stay testable without a database.
pub fn emergency_fund_view(
    fund: EmergencyFund,
    resolved_target: Decimal,
    current_balance: Decimal,
    today: NaiveDate,
) -> EmergencyFundView {
    let percent_complete = if resolved_target <= Decimal::ZERO {
        dec!(100)
    } else {
        round2((current_balance / resolved_target * dec!(100)).min(dec!(100)))
    };

    let remaining = resolved_target - current_balance;
    let months_to_completion = projections::months_to_target(remaining, fund.monthly_contribution);
    let projected_completion_date =
        months_to_completion.map(|months| crate::money::months_after(today, months));

    EmergencyFundView {
        fund,
        resolved_target,
        current_balance,
        percent_complete,
        months_to_completion,
        projected_completion_date,
    }
}

/// Input model for creating an emergency fund
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmergencyFund {
    pub account_id: String,
    pub target_amount: Option<Decimal>,
    pub expense_multiplier: Option<Decimal>,
    pub monthly_contribution: Decimal,
}

impl NewEmergencyFund {
    pub fn validate(&self) -> Result<()> {
        match (self.target_amount, self.expense_multiplier) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(invalid(
                    "Set exactly one of target amount or expense multiplier",
                ));
            }
            (Some(target), None) if target <= Decimal::ZERO => {
                return Err(Error::Validation(ValidationError::InvalidAmount(target)));
            }
            (None, Some(multiplier)) if multiplier <= Decimal::ZERO => {
                return Err(invalid("Expense multiplier must be positive"));
            }
            _ => {}
        }
        if self.monthly_contribution < Decimal::ZERO {
            return Err(invalid("Monthly contribution cannot be negative"));
        }
        Ok(())
    }
}

/// Database model for emergency funds
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::emergency_funds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EmergencyFundDB {
    pub id: String,
    pub tenant_id: String,
    pub account_id: String,
    pub target_amount: Option<String>,
    pub expense_multiplier: Option<String>,
    pub monthly_contribution: String,
    pub created_at: NaiveDateTime,
}

impl From<EmergencyFundDB> for EmergencyFund {
    fn from(db: EmergencyFundDB) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            account_id: db.account_id,
            target_amount: db
                .target_amount
                .as_deref()
                .map(|t| parse_db_decimal(t, "fund target")),
            expense_multiplier: db
                .expense_multiplier
                .as_deref()
                .map(|m| parse_db_decimal(m, "expense multiplier")),
            monthly_contribution: parse_db_decimal(&db.monthly_contribution, "fund contribution"),
            created_at: db.created_at,
        }
    }
}

impl EmergencyFundDB {
    pub fn from_new(tenant_id: &str, domain: NewEmergencyFund) -> Self {
        Self {
            id: String::new(),
            tenant_id: tenant_id.to_string(),
            account_id: domain.account_id,
            target_amount: domain.target_amount.map(|t| t.to_string()),
            expense_multiplier: domain.expense_multiplier.map(|m| m.to_string()),
            monthly_contribution: domain.monthly_contribution.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::Validation(ValidationError::InvalidInput(message.to_string()))
}
