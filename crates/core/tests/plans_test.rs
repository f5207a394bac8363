mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::TENANT;
use nestfolio_core::bills::{FixedBillService, NewRecurringBill, Recurrence};
use nestfolio_core::errors::{Error, PlanError};
use nestfolio_core::plans::{
    EmergencyFundService, NewEmergencyFund, NewPurchasePlan, NewRetirementPlan,
    PurchasePlanService, RetirementService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn retirement_inputs() -> NewRetirementPlan {
    NewRetirementPlan {
        current_age: 35,
        retirement_age: 60,
        desired_monthly_income: dec!(8000),
        current_net_worth: dec!(150000),
        monthly_contribution: dec!(2500),
        annual_return_rate: dec!(6),
        life_expectancy: 90,
    }
}

#[test]
fn recurring_bill_expands_into_numbered_occurrences() {
    let (pool, _dir) = common::setup_pool();
    let account = common::create_account(&pool, "Checking", dec!(1000));
    let bills = FixedBillService::new(pool, Arc::new(common::StaticLookups));

    let generated = bills
        .generate(
            TENANT,
            NewRecurringBill {
                name: "Car insurance".to_string(),
                amount: dec!(183.90),
                account_id: account.id,
                category_id: "insurance".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
                occurrences: 4,
                recurrence: Recurrence::Quarterly,
            },
        )
        .unwrap();

    assert_eq!(generated.len(), 4);
    assert_eq!(generated[0].name, "Car insurance (1/4)");
    assert_eq!(generated[3].name, "Car insurance (4/4)");
    // Each occurrence repeats the full amount.
    assert!(generated.iter().all(|b| b.amount == dec!(183.90)));
    // Quarterly stepping clamps Jan 31 to the shorter months.
    assert_eq!(
        generated[1].due_date,
        NaiveDate::from_ymd_opt(2026, 4, 30).unwrap()
    );
    assert_eq!(
        generated[3].due_date,
        NaiveDate::from_ymd_opt(2026, 10, 31).unwrap()
    );
}

#[test]
fn second_active_retirement_plan_is_rejected() {
    let (pool, _dir) = common::setup_pool();
    let retirement = RetirementService::new(pool);

    retirement.create_plan(TENANT, retirement_inputs()).unwrap();
    let err = retirement
        .create_plan(TENANT, retirement_inputs())
        .unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::SingletonConflict)));

    // Deactivating clears the way for a replacement.
    retirement.deactivate_plan(TENANT).unwrap();
    assert!(retirement.get_outlook(TENANT).unwrap().is_none());
    retirement.create_plan(TENANT, retirement_inputs()).unwrap();
}

#[test]
fn retirement_outlook_is_stable_across_reads() {
    let (pool, _dir) = common::setup_pool();
    let retirement = RetirementService::new(pool);

    let (_, created_outlook) = retirement.create_plan(TENANT, retirement_inputs()).unwrap();
    let (_, read_outlook) = retirement.get_outlook(TENANT).unwrap().unwrap();

    assert_eq!(
        created_outlook.projected_net_worth,
        read_outlook.projected_net_worth
    );
    assert_eq!(created_outlook.status, read_outlook.status);
    // Required net worth follows the safe-withdrawal rule: 8000 x 12 x 25.
    assert_eq!(read_outlook.required_net_worth, dec!(2400000.00));
}

#[test]
fn purchase_plan_round_trip_with_derived_figures() {
    let (pool, _dir) = common::setup_pool();
    let purchases = PurchasePlanService::new(pool);

    let view = purchases
        .create_plan(
            TENANT,
            NewPurchasePlan {
                name: "New car".to_string(),
                target_amount: dec!(10000),
                saved_amount: dec!(2500),
                down_payment: Some(dec!(2000)),
                installment_count: Some(12),
                monthly_interest_rate: Some(dec!(1)),
                priority: 2,
                target_date: NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
            },
        )
        .unwrap();

    assert_eq!(view.final_cost, dec!(10529.48));
    assert_eq!(view.percent_saved, dec!(25.00));

    let listed = purchases.list_plans(TENANT).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].final_cost, view.final_cost);

    // Dropping the financing reverts the final cost to the cash target.
    let updated = purchases
        .update_plan(
            TENANT,
            nestfolio_core::plans::PurchasePlanUpdate {
                id: view.plan.id.clone(),
                name: view.plan.name.clone(),
                target_amount: dec!(10000),
                saved_amount: dec!(4000),
                down_payment: None,
                installment_count: None,
                monthly_interest_rate: None,
                priority: 1,
                target_date: view.plan.target_date,
                status: nestfolio_core::plans::PurchasePlanStatus::InProgress,
            },
        )
        .unwrap();
    assert_eq!(updated.final_cost, dec!(10000.00));
    assert_eq!(updated.percent_saved, dec!(40.00));
    assert_eq!(
        updated.plan.status,
        nestfolio_core::plans::PurchasePlanStatus::InProgress
    );

    purchases.delete_plan(TENANT, &view.plan.id).unwrap();
    assert!(purchases.list_plans(TENANT).unwrap().is_empty());
}

#[test]
fn emergency_fund_with_fixed_target_reports_completion() {
    let (pool, _dir) = common::setup_pool();
    let account = common::create_account(&pool, "Reserve", dec!(3000));
    let funds = EmergencyFundService::new(pool);

    let fund = funds
        .create_fund(
            TENANT,
            NewEmergencyFund {
                account_id: account.id,
                target_amount: Some(dec!(12000)),
                expense_multiplier: None,
                monthly_contribution: dec!(500),
            },
        )
        .unwrap();

    let view = funds.get_view(TENANT, &fund.id).unwrap();
    assert_eq!(view.resolved_target, dec!(12000));
    assert_eq!(view.current_balance, dec!(3000));
    assert_eq!(view.percent_complete, dec!(25.00));
    assert_eq!(view.months_to_completion, Some(18));
    assert!(view.projected_completion_date.is_some());

    // Halving the target and doubling the pace shortens the horizon.
    let updated = funds
        .update_fund(
            TENANT,
            &fund.id,
            NewEmergencyFund {
                account_id: view.fund.account_id.clone(),
                target_amount: Some(dec!(6000)),
                expense_multiplier: None,
                monthly_contribution: dec!(1000),
            },
        )
        .unwrap();
    assert_eq!(updated.percent_complete, dec!(50.00));
    assert_eq!(updated.months_to_completion, Some(3));
}

#[test]
fn emergency_fund_multiplier_without_expenses_targets_zero() {
    let (pool, _dir) = common::setup_pool();
    let account = common::create_account(&pool, "Reserve", dec!(500));
    let funds = EmergencyFundService::new(pool);

    let fund = funds
        .create_fund(
            TENANT,
            NewEmergencyFund {
                account_id: account.id,
                target_amount: None,
                expense_multiplier: Some(dec!(6)),
                monthly_contribution: dec!(200),
            },
        )
        .unwrap();

    // No expense history yet, so the derived target is zero and the fund
    // counts as complete.
    let view = funds.get_view(TENANT, &fund.id).unwrap();
    assert_eq!(view.resolved_target, Decimal::ZERO);
    assert_eq!(view.percent_complete, dec!(100.00));
}

#[test]
fn emergency_fund_needs_an_existing_account() {
    let (pool, _dir) = common::setup_pool();
    let funds = EmergencyFundService::new(pool);

    let err = funds
        .create_fund(
            TENANT,
            NewEmergencyFund {
                account_id: "no-such-account".to_string(),
                target_amount: Some(dec!(5000)),
                expense_multiplier: None,
                monthly_contribution: dec!(100),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
