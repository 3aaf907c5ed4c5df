//! Port for payments and invoices.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{InvoiceRecord, Payment, PaymentScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {}
}

/// Port for payment records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Payments visible within `scope`, newest first.
    async fn list_payments(
        &self,
        scope: &PaymentScope,
    ) -> Result<Vec<Payment>, PaymentRepositoryError>;

    /// Find a payment by id.
    async fn find_payment(&self, id: &Uuid) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Insert a payment.
    async fn create_payment(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;

    /// Set status to `paid`; `None` when absent.
    async fn mark_paid(&self, id: &Uuid) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Payment joined with party emails and load details.
    async fn invoice(&self, id: &Uuid) -> Result<Option<InvoiceRecord>, PaymentRepositoryError>;
}
