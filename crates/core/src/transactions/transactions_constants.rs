/// Outflow kinds that count as living expenses (transfers move money, they
/// don't spend it)
pub const EXPENSE_KINDS: [&str; 2] = ["DEBIT", "INVOICE_PAYMENT"];
