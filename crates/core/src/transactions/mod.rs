pub mod transactions_constants;
pub mod transactions_model;
pub mod transactions_repository;

pub use transactions_model::{
    NewTransaction, Transaction, TransactionKind, TransactionMeta, TransactionPage,
};
pub use transactions_repository::TransactionRepository;
