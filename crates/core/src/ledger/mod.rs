pub mod ledger_model;
pub mod ledger_service;

pub use ledger_model::{LedgerEntry, TransferReceipt, YieldAccrual};
pub use ledger_service::LedgerService;
