use diesel::result::Error as DieselError;
use rust_decimal::Decimal;
use thiserror::Error;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger and projection engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger operation rejected: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Installment schedule rejected: {0}")]
    Installment(#[from] InstallmentError),

    #[error("Plan operation rejected: {0}")]
    Plan(#[from] PlanError),

    #[error("Not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] diesel::result::ConnectionError),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Database file access failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Domain violations raised by balance-mutating ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Source and destination accounts must differ")]
    SameAccountTransfer,

    #[error("Invoice '{0}' is already paid")]
    AlreadyPaid(String),
}

#[derive(Error, Debug)]
pub enum InstallmentError {
    #[error("Invalid installment range: starting {starting}, total {total}")]
    InvalidRange { starting: i32, total: i32 },
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("An active retirement plan already exists for this tenant")]
    SingletonConflict,
}

// Diesel's NotFound is the storage-level face of our domain NotFound; every
// other diesel failure is an infrastructure error and stays uninterpreted.
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Error::NotFound("Record not found".to_string()),
            _ => Error::Database(DatabaseError::QueryFailed(err)),
        }
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolCreationFailed(err))
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Database(DatabaseError::Io(err))
    }
}
