use chrono::NaiveDate;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::notifications_model::{classify_due_date, AlertSource, AlertUrgency, DueAlert};
use crate::bills::FixedBillRepository;
use crate::errors::Result;
use crate::installments::InstallmentRepository;
use crate::invoices::InvoiceRepository;

/// Service that derives due-date alerts from unpaid fixed bills, unpaid
/// installments and open invoices. Alerts are computed per scan and never
/// persisted, so marking an item paid silences it on the next pass.
pub struct NotificationService {
    bills: FixedBillRepository,
    installments: InstallmentRepository,
    invoices: InvoiceRepository,
}

impl NotificationService {
    /// Creates a new NotificationService instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            bills: FixedBillRepository::new(pool.clone()),
            installments: InstallmentRepository::new(pool.clone()),
            invoices: InvoiceRepository::new(pool),
        }
    }

    /// Scans against today's date
    pub fn scan(&self, tenant_id: &str) -> Result<Vec<DueAlert>> {
        self.scan_at(tenant_id, chrono::Utc::now().date_naive())
    }

    /// Scans against an explicit reference date. Overdue alerts come first,
    /// then due-soon, each ordered by due date.
    pub fn scan_at(&self, tenant_id: &str, today: NaiveDate) -> Result<Vec<DueAlert>> {
        let mut alerts = Vec::new();

        for bill in self.bills.list_unpaid(tenant_id)? {
            if let Some((urgency, days)) = classify_due_date(bill.due_date, today) {
                alerts.push(DueAlert {
                    source: AlertSource::FixedBill,
                    source_id: bill.id,
                    urgency,
                    description: bill.name,
                    amount: bill.amount,
                    due_date: bill.due_date,
                    days,
                });
            }
        }

        let purchase_names: HashMap<String, String> = self
            .installments
            .list_purchases(tenant_id)?
            .into_iter()
            .map(|p| (p.id, p.description))
            .collect();

        for installment in self.installments.list_unpaid(tenant_id)? {
            if let Some((urgency, days)) = classify_due_date(installment.due_date, today) {
                let label = purchase_names
                    .get(&installment.purchase_id)
                    .cloned()
                    .unwrap_or_else(|| "Installment purchase".to_string());
                alerts.push(DueAlert {
                    source: AlertSource::Installment,
                    source_id: installment.id,
                    urgency,
                    description: format!(
                        "{} ({}/{})",
                        label, installment.installment_number, installment.total_count
                    ),
                    amount: installment.amount,
                    due_date: installment.due_date,
                    days,
                });
            }
        }

        for invoice in self.invoices.list_open(tenant_id)? {
            if let Some((urgency, days)) = classify_due_date(invoice.due_date, today) {
                alerts.push(DueAlert {
                    source: AlertSource::Invoice,
                    source_id: invoice.id,
                    urgency,
                    description: format!("Card invoice {}", invoice.reference_month),
                    amount: invoice.total_amount,
                    due_date: invoice.due_date,
                    days,
                });
            }
        }

        alerts.sort_by(|a, b| {
            let rank = |alert: &DueAlert| match alert.urgency {
                AlertUrgency::Overdue => 0,
                AlertUrgency::DueSoon => 1,
            };
            rank(a).cmp(&rank(b)).then(a.due_date.cmp(&b.due_date))
        });

        debug!("Due-date scan produced {} alerts", alerts.len());
        Ok(alerts)
    }
}
