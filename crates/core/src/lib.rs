pub mod db;

pub mod accounts;
pub mod bills;
pub mod installments;
pub mod invoices;
pub mod ledger;
pub mod notifications;
pub mod plans;
pub mod projections;
pub mod transactions;

pub mod constants;
pub mod errors;
pub mod lookups;
pub mod money;
pub mod schema;

pub use errors::{Error, Result};
