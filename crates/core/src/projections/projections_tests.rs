//! Tests for the pure projection math.

#[cfg(test)]
mod tests {
    use crate::projections::{
        months_to_target, project_balance, projected_net_worth, required_monthly_contribution,
        required_net_worth, status_classification, PlanStatus,
    };
    use rust_decimal_macros::dec;

    #[test]
    fn project_balance_zero_months_is_identity() {
        assert_eq!(project_balance(dec!(1234.56), dec!(12), 0), dec!(1234.56));
    }

    #[test]
    fn project_balance_compounds_monthly() {
        // 12% annual = 1% monthly
        assert_eq!(project_balance(dec!(1000.00), dec!(12), 1), dec!(1010.00));
        assert_eq!(project_balance(dec!(1000.00), dec!(12), 2), dec!(1020.10));
    }

    #[test]
    fn project_balance_rounds_after_every_step() {
        // 0.1% annual on 100.00 yields ~0.0083 a month; per-step half-up
        // rounding credits a cent every month, exactly like the accrual job.
        assert_eq!(project_balance(dec!(100.00), dec!(0.1), 1), dec!(100.01));
        assert_eq!(project_balance(dec!(100.00), dec!(0.1), 2), dec!(100.02));
    }

    #[test]
    fn required_net_worth_follows_four_percent_rule() {
        assert_eq!(required_net_worth(dec!(1000)), dec!(300000.00));
        assert_eq!(required_net_worth(dec!(7500.50)), dec!(2250150.00));
    }

    #[test]
    fn projected_net_worth_zero_rate_is_linear() {
        assert_eq!(
            projected_net_worth(dec!(1000), dec!(100), dec!(0), 12),
            dec!(2200.00)
        );
    }

    #[test]
    fn projected_net_worth_lump_sum_only() {
        // 1000 * 1.01^12 = 1126.8250...
        assert_eq!(
            projected_net_worth(dec!(1000), dec!(0), dec!(12), 12),
            dec!(1126.83)
        );
    }

    #[test]
    fn projected_net_worth_annuity_only() {
        // 100 * ((1.01^12 - 1) / 0.01) = 1268.2503...
        assert_eq!(
            projected_net_worth(dec!(0), dec!(100), dec!(12), 12),
            dec!(1268.25)
        );
    }

    #[test]
    fn required_contribution_inverts_the_annuity() {
        let contribution = required_monthly_contribution(dec!(1268.25), dec!(0), dec!(12), 12);
        assert_eq!(contribution, dec!(100.00));
    }

    #[test]
    fn required_contribution_zero_when_lump_sum_suffices() {
        assert_eq!(
            required_monthly_contribution(dec!(1000), dec!(1000), dec!(12), 12),
            dec!(0)
        );
    }

    #[test]
    fn required_contribution_zero_rate_is_straight_division() {
        assert_eq!(
            required_monthly_contribution(dec!(1200), dec!(0), dec!(0), 12),
            dec!(100.00)
        );
    }

    #[test]
    fn months_to_target_is_ceiling_division() {
        assert_eq!(months_to_target(dec!(1000), dec!(300)), Some(4));
        assert_eq!(months_to_target(dec!(900), dec!(300)), Some(3));
    }

    #[test]
    fn months_to_target_already_reached() {
        assert_eq!(months_to_target(dec!(0), dec!(100)), Some(0));
        assert_eq!(months_to_target(dec!(-50), dec!(100)), Some(0));
    }

    #[test]
    fn months_to_target_unreachable_without_contribution() {
        assert_eq!(months_to_target(dec!(1000), dec!(0)), None);
        assert_eq!(months_to_target(dec!(1000), dec!(-10)), None);
    }

    #[test]
    fn status_bands() {
        assert_eq!(
            status_classification(dec!(0), dec!(100000)),
            PlanStatus::OnTrack
        );
        assert_eq!(
            status_classification(dec!(500), dec!(100000)),
            PlanStatus::OnTrack
        );
        assert_eq!(
            status_classification(dec!(-9999), dec!(100000)),
            PlanStatus::Attention
        );
        // Exactly 10% of the requirement still only needs attention.
        assert_eq!(
            status_classification(dec!(-10000), dec!(100000)),
            PlanStatus::Attention
        );
        assert_eq!(
            status_classification(dec!(-10001), dec!(100000)),
            PlanStatus::AdjustmentNeeded
        );
    }

    #[test]
    fn projections_are_idempotent() {
        let a = projected_net_worth(dec!(5000), dec!(250), dec!(8), 240);
        let b = projected_net_worth(dec!(5000), dec!(250), dec!(8), 240);
        assert_eq!(a, b);

        let c = required_monthly_contribution(dec!(1000000), dec!(5000), dec!(8), 240);
        let d = required_monthly_contribution(dec!(1000000), dec!(5000), dec!(8), 240);
        assert_eq!(c, d);
    }
}
