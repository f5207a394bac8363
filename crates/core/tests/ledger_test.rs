mod common;

use common::TENANT;
use nestfolio_core::errors::{Error, LedgerError};
use nestfolio_core::invoices::{InvoiceRepository, NewInvoice};
use nestfolio_core::ledger::LedgerService;
use nestfolio_core::projections::project_balance;
use nestfolio_core::transactions::{TransactionMeta, TransactionRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn ledger_operations_move_balances_and_log_every_step() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());
    let transactions = TransactionRepository::new(pool.clone());

    let checking = common::create_account(&pool, "Checking", dec!(500));
    let savings = common::create_account(&pool, "Savings", dec!(0));

    let entry = ledger
        .credit(TENANT, &checking.id, dec!(200), TransactionMeta::default())
        .unwrap();
    assert_eq!(entry.account.balance, dec!(700));

    let entry = ledger
        .debit(TENANT, &checking.id, dec!(300), TransactionMeta::default())
        .unwrap();
    assert_eq!(entry.account.balance, dec!(400));

    let receipt = ledger
        .transfer(
            TENANT,
            &checking.id,
            &savings.id,
            dec!(100),
            TransactionMeta::default(),
        )
        .unwrap();
    assert_eq!(receipt.source.balance, dec!(300));
    assert_eq!(receipt.destination.balance, dec!(100));
    assert_eq!(
        receipt.outgoing.destination_account_id.as_deref(),
        Some(savings.id.as_str())
    );
    assert_eq!(
        receipt.incoming.destination_account_id.as_deref(),
        Some(checking.id.as_str())
    );

    // Four rows in total: credit, debit, and one leg per transfer side.
    let log = transactions.list_by_account(TENANT, &checking.id).unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(
        transactions
            .list_by_account(TENANT, &savings.id)
            .unwrap()
            .len(),
        1
    );

    // The signed log replays to the balance delta since opening.
    let signed = transactions
        .sum_signed_by_account(TENANT, &checking.id)
        .unwrap();
    assert_eq!(dec!(500) + signed, dec!(300));
}

#[test]
fn overdraft_is_rejected_with_no_log_entry() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());
    let transactions = TransactionRepository::new(pool.clone());

    let account = common::create_account(&pool, "Checking", dec!(100.00));

    let err = ledger
        .debit(TENANT, &account.id, dec!(100.01), TransactionMeta::default())
        .unwrap_err();
    match err {
        Error::Ledger(LedgerError::InsufficientFunds {
            requested,
            available,
        }) => {
            assert_eq!(requested, dec!(100.01));
            assert_eq!(available, dec!(100.00));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing was logged and the balance is untouched.
    assert!(transactions
        .list_by_account(TENANT, &account.id)
        .unwrap()
        .is_empty());
}

#[test]
fn failed_transfer_leaves_the_source_untouched() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());

    let source = common::create_account(&pool, "Checking", dec!(500));

    let err = ledger
        .transfer(
            TENANT,
            &source.id,
            "no-such-account",
            dec!(100),
            TransactionMeta::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let accounts = nestfolio_core::accounts::AccountRepository::new(pool.clone());
    assert_eq!(
        accounts.get_by_id(TENANT, &source.id).unwrap().balance,
        dec!(500)
    );
    assert!(TransactionRepository::new(pool)
        .list_by_account(TENANT, &source.id)
        .unwrap()
        .is_empty());
}

#[test]
fn transfer_to_the_same_account_is_rejected() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());
    let account = common::create_account(&pool, "Checking", dec!(500));

    let err = ledger
        .transfer(
            TENANT,
            &account.id,
            &account.id,
            dec!(100),
            TransactionMeta::default(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(LedgerError::SameAccountTransfer)
    ));
}

#[test]
fn non_positive_amounts_are_rejected() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());
    let account = common::create_account(&pool, "Checking", dec!(500));

    for amount in [Decimal::ZERO, dec!(-10)] {
        assert!(ledger
            .credit(TENANT, &account.id, amount, TransactionMeta::default())
            .is_err());
        assert!(ledger
            .debit(TENANT, &account.id, amount, TransactionMeta::default())
            .is_err());
    }
}

#[test]
fn debit_purchase_adjustment_logs_a_system_debit() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());
    let transactions = TransactionRepository::new(pool.clone());

    let account = common::create_account(&pool, "Checking", dec!(500));

    let entry = ledger
        .adjust_for_debit_purchase(
            TENANT,
            &account.id,
            dec!(129.90),
            TransactionMeta {
                category_id: Some("groceries".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(entry.account.balance, dec!(370.10));

    // Exactly one row, flagged as system so the purchase record and the
    // balance mutation came from the same call.
    let log = transactions.list_by_account(TENANT, &account.id).unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].is_system);
    assert_eq!(log[0].amount, dec!(129.90));
    assert_eq!(log[0].category_id.as_deref(), Some("groceries"));

    // Same overdraft checks as a plain debit.
    assert!(matches!(
        ledger
            .adjust_for_debit_purchase(
                TENANT,
                &account.id,
                dec!(370.11),
                TransactionMeta::default()
            )
            .unwrap_err(),
        Error::Ledger(LedgerError::InsufficientFunds { .. })
    ));
}

#[test]
fn paying_an_invoice_marks_it_and_debits_the_account() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());
    let invoices = InvoiceRepository::new(pool.clone());

    let account = common::create_account(&pool, "Checking", dec!(2000));
    let invoice = invoices
        .create(
            TENANT,
            NewInvoice {
                id: None,
                credit_card_id: "card-1".to_string(),
                reference_month: "2026-08".to_string(),
                total_amount: dec!(850.40),
                due_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            },
        )
        .unwrap();

    let entry = ledger
        .pay_invoice(
            TENANT,
            &account.id,
            &invoice.id,
            dec!(850.40),
            TransactionMeta::default(),
        )
        .unwrap();
    assert_eq!(entry.account.balance, dec!(1149.60));
    assert_eq!(entry.transaction.invoice_id.as_deref(), Some(invoice.id.as_str()));

    let settled = invoices.get_by_id(TENANT, &invoice.id).unwrap();
    assert!(settled.is_paid);
    assert_eq!(settled.paid_account_id.as_deref(), Some(account.id.as_str()));
    assert!(settled.paid_at.is_some());

    // A second payment attempt is rejected and nothing moves.
    let err = ledger
        .pay_invoice(
            TENANT,
            &account.id,
            &invoice.id,
            dec!(850.40),
            TransactionMeta::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Ledger(LedgerError::AlreadyPaid(_))));
    let accounts = nestfolio_core::accounts::AccountRepository::new(pool);
    assert_eq!(
        accounts.get_by_id(TENANT, &account.id).unwrap().balance,
        dec!(1149.60)
    );
}

#[test]
fn yield_accrual_matches_the_projection_math() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());

    let plain = common::create_account(&pool, "Checking", dec!(1000));
    let earning = common::create_account_with_yield(&pool, "CDB", dec!(1000), Some(dec!(12)));

    let accruals = ledger.accrue_monthly_yield(TENANT).unwrap();
    assert_eq!(accruals.len(), 1);
    assert_eq!(accruals[0].account_id, earning.id);
    assert_eq!(accruals[0].interest, dec!(10.00));
    assert_eq!(
        accruals[0].new_balance,
        project_balance(dec!(1000), dec!(12), 1)
    );

    let accounts = nestfolio_core::accounts::AccountRepository::new(pool.clone());
    assert_eq!(
        accounts.get_by_id(TENANT, &plain.id).unwrap().balance,
        dec!(1000)
    );

    // The accrual is logged as a system credit.
    let log = TransactionRepository::new(pool)
        .list_by_account(TENANT, &earning.id)
        .unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].is_system);
}

#[test]
fn log_pages_newest_first_and_finds_income_linked_rows() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());
    let transactions = TransactionRepository::new(pool.clone());

    let account = common::create_account(&pool, "Checking", dec!(0));

    // Five credits; the second and fourth belong to one income entry.
    for (i, amount) in [dec!(10), dec!(20), dec!(30), dec!(40), dec!(50)]
        .into_iter()
        .enumerate()
    {
        let meta = if i % 2 == 1 {
            TransactionMeta {
                income_id: Some("salary-1".to_string()),
                ..Default::default()
            }
        } else {
            TransactionMeta::default()
        };
        ledger.credit(TENANT, &account.id, amount, meta).unwrap();
    }

    let page = transactions.list_paged(TENANT, 1, 2).unwrap();
    assert_eq!(page.total_row_count, 5);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].amount, dec!(50));
    assert_eq!(page.data[1].amount, dec!(40));

    let last_page = transactions.list_paged(TENANT, 3, 2).unwrap();
    assert_eq!(last_page.data.len(), 1);
    assert_eq!(last_page.data[0].amount, dec!(10));

    // Page numbers below 1 clamp to the first page.
    let clamped = transactions.list_paged(TENANT, 0, 2).unwrap();
    assert_eq!(clamped.data[0].amount, dec!(50));

    let linked = transactions.list_by_income(TENANT, "salary-1").unwrap();
    assert_eq!(linked.len(), 2);
    assert_eq!(linked[0].amount, dec!(20));
    assert_eq!(linked[1].amount, dec!(40));
}

#[test]
fn tenants_cannot_reach_each_other_accounts() {
    let (pool, _dir) = common::setup_pool();
    let ledger = LedgerService::new(pool.clone());

    let account = common::create_account(&pool, "Checking", dec!(500));

    let err = ledger
        .credit("family-b", &account.id, dec!(10), TransactionMeta::default())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
