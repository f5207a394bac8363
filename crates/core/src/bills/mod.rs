pub mod bills_model;
pub mod bills_repository;
pub mod bills_service;

pub use bills_model::{FixedBill, NewRecurringBill, Recurrence};
pub use bills_repository::FixedBillRepository;
pub use bills_service::FixedBillService;
