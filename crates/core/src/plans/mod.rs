pub mod emergency_service;
pub mod plans_model;
mod plans_model_tests;
pub mod plans_repository;
pub mod purchase_service;
pub mod retirement_service;

pub use emergency_service::EmergencyFundService;
pub use plans_model::{
    emergency_fund_view, EmergencyFund, EmergencyFundView, NewEmergencyFund, NewPurchasePlan,
    NewRetirementPlan, PurchasePlan, PurchasePlanStatus, PurchasePlanUpdate, PurchasePlanView,
    RetirementOutlook, RetirementPlan,
};
pub use plans_repository::PlanRepository;
pub use purchase_service::PurchasePlanService;
pub use retirement_service::RetirementService;
