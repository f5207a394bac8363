use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use super::ledger_model::{LedgerEntry, TransferReceipt, YieldAccrual};
use crate::accounts::AccountRepository;
use crate::constants::YIELD_ACCRUAL_NOTE;
use crate::db::get_connection;
use crate::errors::{Error, LedgerError, Result, ValidationError};
use crate::invoices::InvoiceRepository;
use crate::money::round2;
use crate::transactions::{NewTransaction, TransactionKind, TransactionMeta, TransactionRepository};

/// The only entry point that mutates account balances. Every operation runs
/// one database transaction spanning the balance write and the log append,
/// so the two can never diverge.
pub struct LedgerService {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl LedgerService {
    /// Creates a new LedgerService instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Adds funds to an account and logs a credit
    pub fn credit(
        &self,
        tenant_id: &str,
        account_id: &str,
        amount: Decimal,
        meta: TransactionMeta,
    ) -> Result<LedgerEntry> {
        Self::require_positive(amount)?;

        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, Error, _>(|tx_conn| {
            let account = AccountRepository::get_in_tx(tx_conn, tenant_id, account_id)?;
            let new_balance = account.balance + amount;
            Self::apply(
                tx_conn,
                tenant_id,
                account,
                new_balance,
                TransactionKind::Credit,
                amount,
                None,
                meta,
                false,
            )
        })
    }

    /// Removes funds from an account and logs a debit
    pub fn debit(
        &self,
        tenant_id: &str,
        account_id: &str,
        amount: Decimal,
        meta: TransactionMeta,
    ) -> Result<LedgerEntry> {
        self.debit_internal(tenant_id, account_id, amount, meta, false)
    }

    /// Debit-card purchase entry point: identical checks to `debit`, but the
    /// log entry is system-flagged so the purchase record and the balance
    /// mutation are created in one call and cannot diverge.
    pub fn adjust_for_debit_purchase(
        &self,
        tenant_id: &str,
        account_id: &str,
        amount: Decimal,
        meta: TransactionMeta,
    ) -> Result<LedgerEntry> {
        self.debit_internal(tenant_id, account_id, amount, meta, true)
    }

    /// Moves funds between two accounts of the tenant. Both legs commit in
    /// one transaction and each log entry references the counterpart account.
    pub fn transfer(
        &self,
        tenant_id: &str,
        from_account_id: &str,
        to_account_id: &str,
        amount: Decimal,
        meta: TransactionMeta,
    ) -> Result<TransferReceipt> {
        if from_account_id == to_account_id {
            return Err(Error::Ledger(LedgerError::SameAccountTransfer));
        }
        Self::require_positive(amount)?;

        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, Error, _>(|tx_conn| {
            let source = AccountRepository::get_in_tx(tx_conn, tenant_id, from_account_id)?;
            let destination = AccountRepository::get_in_tx(tx_conn, tenant_id, to_account_id)?;

            if amount > source.balance {
                return Err(Error::Ledger(LedgerError::InsufficientFunds {
                    requested: amount,
                    available: source.balance,
                }));
            }

            let source_balance = source.balance - amount;
            let source_entry = Self::apply(
                tx_conn,
                tenant_id,
                source,
                source_balance,
                TransactionKind::TransferOut,
                amount,
                Some(to_account_id.to_string()),
                meta.clone(),
                false,
            )?;

            let dest_balance = destination.balance + amount;
            let dest_entry = Self::apply(
                tx_conn,
                tenant_id,
                destination,
                dest_balance,
                TransactionKind::TransferIn,
                amount,
                Some(from_account_id.to_string()),
                meta,
                false,
            )?;

            Ok(TransferReceipt {
                source: source_entry.account,
                destination: dest_entry.account,
                outgoing: source_entry.transaction,
                incoming: dest_entry.transaction,
            })
        })
    }

    /// Settles a credit-card invoice from an account: marks the invoice paid,
    /// stamps the payment, debits the account and logs an invoice payment.
    pub fn pay_invoice(
        &self,
        tenant_id: &str,
        account_id: &str,
        invoice_id: &str,
        amount: Decimal,
        mut meta: TransactionMeta,
    ) -> Result<LedgerEntry> {
        Self::require_positive(amount)?;

        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, Error, _>(|tx_conn| {
            let invoice = InvoiceRepository::get_in_tx(tx_conn, tenant_id, invoice_id)?;
            if invoice.is_paid {
                return Err(Error::Ledger(LedgerError::AlreadyPaid(
                    invoice.id.clone(),
                )));
            }

            let account = AccountRepository::get_in_tx(tx_conn, tenant_id, account_id)?;
            if amount > account.balance {
                return Err(Error::Ledger(LedgerError::InsufficientFunds {
                    requested: amount,
                    available: account.balance,
                }));
            }

            let paid_at = Utc::now().naive_utc();
            InvoiceRepository::mark_paid_in_tx(tx_conn, tenant_id, invoice_id, account_id, paid_at)?;

            meta.invoice_id = Some(invoice_id.to_string());
            let new_balance = account.balance - amount;
            Self::apply(
                tx_conn,
                tenant_id,
                account,
                new_balance,
                TransactionKind::InvoicePayment,
                amount,
                None,
                meta,
                false,
            )
        })
    }

    /// Monthly yield job entry point, called once per month by the external
    /// scheduler. Applies a single compounding step to each yield-bearing
    /// account, logging the interest as a system credit. The per-step
    /// rounding matches `projections::project_balance`, so projected and
    /// accrued balances agree.
    pub fn accrue_monthly_yield(&self, tenant_id: &str) -> Result<Vec<YieldAccrual>> {
        let accounts = AccountRepository::new(self.pool.clone()).list_yield_bearing(tenant_id)?;
        let mut accruals = Vec::new();

        for account in accounts {
            let rate = match account.annual_yield_rate {
                Some(rate) if rate > Decimal::ZERO => rate,
                _ => continue,
            };

            let monthly_rate = rate / dec!(12) / dec!(100);
            let new_balance = round2(account.balance * (Decimal::ONE + monthly_rate));
            let interest = new_balance - account.balance;
            if interest <= Decimal::ZERO {
                continue;
            }

            let mut conn = get_connection(&self.pool)?;
            let entry = conn.transaction::<_, Error, _>(|tx_conn| {
                // Re-read inside the transaction; the listing above was a
                // snapshot and the balance may have moved since.
                let current = AccountRepository::get_in_tx(tx_conn, tenant_id, &account.id)?;
                let new_balance = round2(current.balance * (Decimal::ONE + monthly_rate));
                let interest = new_balance - current.balance;
                if interest <= Decimal::ZERO {
                    return Ok(None);
                }

                let meta = TransactionMeta {
                    note: Some(YIELD_ACCRUAL_NOTE.to_string()),
                    ..Default::default()
                };
                Self::apply(
                    tx_conn,
                    tenant_id,
                    current,
                    new_balance,
                    TransactionKind::Credit,
                    interest,
                    None,
                    meta,
                    true,
                )
                .map(Some)
            })?;

            if let Some(entry) = entry {
                debug!(
                    "Accrued {} yield on account {}",
                    entry.transaction.amount, entry.account.id
                );
                accruals.push(YieldAccrual {
                    account_id: entry.account.id,
                    interest: entry.transaction.amount,
                    new_balance: entry.account.balance,
                });
            }
        }

        info!(
            "Monthly yield accrual for tenant {}: {} account(s) credited",
            tenant_id,
            accruals.len()
        );
        Ok(accruals)
    }

    fn debit_internal(
        &self,
        tenant_id: &str,
        account_id: &str,
        amount: Decimal,
        meta: TransactionMeta,
        is_system: bool,
    ) -> Result<LedgerEntry> {
        Self::require_positive(amount)?;

        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, Error, _>(|tx_conn| {
            let account = AccountRepository::get_in_tx(tx_conn, tenant_id, account_id)?;
            if amount > account.balance {
                return Err(Error::Ledger(LedgerError::InsufficientFunds {
                    requested: amount,
                    available: account.balance,
                }));
            }

            let new_balance = account.balance - amount;
            Self::apply(
                tx_conn,
                tenant_id,
                account,
                new_balance,
                TransactionKind::Debit,
                amount,
                None,
                meta,
                is_system,
            )
        })
    }

    /// Writes the new balance and appends the matching log entry. Must be
    /// called inside an open transaction.
    #[allow(clippy::too_many_arguments)]
    fn apply(
        tx_conn: &mut SqliteConnection,
        tenant_id: &str,
        mut account: crate::accounts::Account,
        new_balance: Decimal,
        kind: TransactionKind,
        amount: Decimal,
        counterpart_account_id: Option<String>,
        meta: TransactionMeta,
        is_system: bool,
    ) -> Result<LedgerEntry> {
        AccountRepository::set_balance_in_tx(tx_conn, tenant_id, &account.id, new_balance)?;

        let transaction = TransactionRepository::append_in_tx(
            tx_conn,
            tenant_id,
            NewTransaction {
                account_id: account.id.clone(),
                kind,
                amount,
                transaction_date: Utc::now().naive_utc(),
                destination_account_id: counterpart_account_id,
                meta,
                is_system,
            },
        )?;

        account.balance = new_balance;
        Ok(LedgerEntry {
            account,
            transaction,
        })
    }

    fn require_positive(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(amount)));
        }
        Ok(())
    }
}
