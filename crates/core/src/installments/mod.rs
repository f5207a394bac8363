pub mod installments_model;
pub mod installments_repository;
pub mod installments_service;

pub use installments_model::{
    build_schedule, Installment, InstallmentPurchase, InstallmentPurchaseUpdate,
    NewInstallmentPurchase, ScheduleLine,
};
pub use installments_repository::InstallmentRepository;
pub use installments_service::InstallmentService;
