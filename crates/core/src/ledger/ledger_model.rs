use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::transactions::Transaction;

/// Outcome of a single-account ledger operation: the account as it stands
/// after the mutation plus the log entry appended with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub account: Account,
    pub transaction: Transaction,
}

/// Outcome of a transfer: both accounts and both linked log entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub source: Account,
    pub destination: Account,
    pub outgoing: Transaction,
    pub incoming: Transaction,
}

/// One account's share of a monthly yield accrual run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldAccrual {
    pub account_id: String,
    pub interest: Decimal,
    pub new_balance: Decimal,
}
