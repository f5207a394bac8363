pub mod invoices_model;
pub mod invoices_repository;

pub use invoices_model::{Invoice, NewInvoice};
pub use invoices_repository::InvoiceRepository;
