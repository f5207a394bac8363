//! Tests for the derived plan figures: Price-table financing, savings
//! percentages and emergency-fund completion.

#[cfg(test)]
mod tests {
    use crate::plans::plans_model::{
        emergency_fund_view, EmergencyFund, NewEmergencyFund, NewPurchasePlan, NewRetirementPlan,
        PurchasePlan, PurchasePlanStatus,
    };
    use crate::projections::PlanStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn purchase_plan() -> PurchasePlan {
        let now = chrono::Utc::now().naive_utc();
        PurchasePlan {
            id: "plan-1".to_string(),
            tenant_id: "family-1".to_string(),
            name: "New car".to_string(),
            target_amount: dec!(10000),
            saved_amount: dec!(2500),
            down_payment: None,
            installment_count: None,
            monthly_interest_rate: None,
            priority: 1,
            target_date: NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
            status: PurchasePlanStatus::Planned,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn cash_purchase_costs_its_target() {
        let plan = purchase_plan();
        assert_eq!(plan.final_cost(), dec!(10000.00));
    }

    #[test]
    fn financed_purchase_uses_price_table() {
        // 8000 financed over 12 months at 1% a month: payment 710.79,
        // so the full cost is 2000 + 12 x 710.79 = 10529.48.
        let plan = PurchasePlan {
            down_payment: Some(dec!(2000)),
            installment_count: Some(12),
            monthly_interest_rate: Some(dec!(1)),
            ..purchase_plan()
        };
        assert_eq!(plan.final_cost(), dec!(10529.48));
    }

    #[test]
    fn zero_interest_financing_costs_the_target() {
        let plan = PurchasePlan {
            down_payment: Some(dec!(2000)),
            installment_count: Some(12),
            monthly_interest_rate: Some(Decimal::ZERO),
            ..purchase_plan()
        };
        assert_eq!(plan.final_cost(), dec!(10000.00));
    }

    #[test]
    fn percent_saved_rounds_to_cents() {
        let plan = purchase_plan();
        assert_eq!(plan.percent_saved(), dec!(25.00));
    }

    #[test]
    fn percent_saved_caps_at_one_hundred() {
        let plan = PurchasePlan {
            saved_amount: dec!(15000),
            ..purchase_plan()
        };
        assert_eq!(plan.percent_saved(), dec!(100.00));
    }

    #[test]
    fn purchase_plan_priority_out_of_range_rejected() {
        let new_plan = NewPurchasePlan {
            name: "Trip".to_string(),
            target_amount: dec!(5000),
            saved_amount: Decimal::ZERO,
            down_payment: None,
            installment_count: None,
            monthly_interest_rate: None,
            priority: 4,
            target_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
        };
        assert!(new_plan.validate().is_err());
    }

    #[test]
    fn retirement_outlook_with_no_gap_needs_no_extra_contribution() {
        let now = chrono::Utc::now().naive_utc();
        let plan = crate::plans::RetirementPlan {
            id: "ret-1".to_string(),
            tenant_id: "family-1".to_string(),
            current_age: 40,
            retirement_age: 41,
            desired_monthly_income: dec!(10),
            current_net_worth: dec!(10000),
            monthly_contribution: Decimal::ZERO,
            annual_return_rate: Decimal::ZERO,
            life_expectancy: 90,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let outlook = plan.outlook();
        // Required: 10 x 12 x 25 = 3000; already held.
        assert_eq!(outlook.required_net_worth, dec!(3000.00));
        assert_eq!(outlook.projected_net_worth, dec!(10000.00));
        assert_eq!(outlook.surplus, dec!(7000.00));
        assert_eq!(outlook.required_monthly_contribution, Decimal::ZERO);
        assert_eq!(outlook.status, PlanStatus::OnTrack);
    }

    #[test]
    fn retirement_ages_must_be_ordered() {
        let new_plan = NewRetirementPlan {
            current_age: 50,
            retirement_age: 45,
            desired_monthly_income: dec!(5000),
            current_net_worth: Decimal::ZERO,
            monthly_contribution: dec!(100),
            annual_return_rate: dec!(6),
            life_expectancy: 90,
        };
        assert!(new_plan.validate().is_err());
    }

    #[test]
    fn emergency_fund_requires_exactly_one_target_kind() {
        let both = NewEmergencyFund {
            account_id: "acc-1".to_string(),
            target_amount: Some(dec!(10000)),
            expense_multiplier: Some(dec!(6)),
            monthly_contribution: dec!(500),
        };
        assert!(both.validate().is_err());

        let neither = NewEmergencyFund {
            account_id: "acc-1".to_string(),
            target_amount: None,
            expense_multiplier: None,
            monthly_contribution: dec!(500),
        };
        assert!(neither.validate().is_err());
    }

    #[test]
    fn emergency_fund_view_projects_completion() {
        let fund = EmergencyFund {
            id: "ef-1".to_string(),
            tenant_id: "family-1".to_string(),
            account_id: "acc-1".to_string(),
            target_amount: Some(dec!(12000)),
            expense_multiplier: None,
            monthly_contribution: dec!(500),
            created_at: chrono::Utc::now().naive_utc(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        let view = emergency_fund_view(fund, dec!(12000), dec!(3000), today);
        assert_eq!(view.percent_complete, dec!(25.00));
        assert_eq!(view.months_to_completion, Some(18));
        assert_eq!(
            view.projected_completion_date,
            Some(NaiveDate::from_ymd_opt(2027, 7, 15).unwrap())
        );
    }

    #[test]
    fn emergency_fund_view_without_contribution_never_completes() {
        let fund = EmergencyFund {
            id: "ef-2".to_string(),
            tenant_id: "family-1".to_string(),
            account_id: "acc-1".to_string(),
            target_amount: Some(dec!(12000)),
            expense_multiplier: None,
            monthly_contribution: Decimal::ZERO,
            created_at: chrono::Utc::now().naive_utc(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        let view = emergency_fund_view(fund, dec!(12000), dec!(3000), today);
        assert_eq!(view.months_to_completion, None);
        assert_eq!(view.projected_completion_date, None);
    }

    #[test]
    fn overfunded_emergency_fund_is_complete() {
        let fund = EmergencyFund {
            id: "ef-3".to_string(),
            tenant_id: "family-1".to_string(),
            account_id: "acc-1".to_string(),
            target_amount: Some(dec!(5000)),
            expense_multiplier: None,
            monthly_contribution: dec!(100),
            created_at: chrono::Utc::now().naive_utc(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        let view = emergency_fund_view(fund, dec!(5000), dec!(7500), today);
        assert_eq!(view.percent_complete, dec!(100.00));
        assert_eq!(view.months_to_completion, Some(0));
        assert_eq!(view.projected_completion_date, Some(today));
    }
}
