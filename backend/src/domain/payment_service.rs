//! Payments and invoices between shippers and carriers.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{
    AuthenticatedUser, DEFAULT_PAYMENT_METHOD, Error, Invoice, Payment, PaymentDraft,
    PaymentReceipt, PaymentScope, PaymentStatus, Role,
};

fn map_repository_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment repository error: {message}"))
        }
        PaymentRepositoryError::Conflict { message } => Error::conflict(message),
        PaymentRepositoryError::MissingReference { .. } => {
            Error::not_found("Referenced load or payee not found")
        }
    }
}

fn payment_not_found() -> Error {
    Error::not_found("Payment not found")
}

fn may_view(caller: &AuthenticatedUser, payment: &Payment) -> bool {
    caller.is_admin() || payment.involves(caller.id)
}

/// Payment service.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    /// Create the service from its repository and clock.
    pub fn new(payments: Arc<dyn PaymentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { payments, clock }
    }

    /// Payments visible to the caller, newest first.
    pub async fn list_payments(&self, caller: &AuthenticatedUser) -> Result<Vec<Payment>, Error> {
        let scope = if caller.is_admin() {
            PaymentScope::All
        } else {
            PaymentScope::Party(caller.id)
        };
        self.payments
            .list_payments(&scope)
            .await
            .map_err(map_repository_error)
    }

    /// A payment the caller is party to. Others see it as absent.
    pub async fn get_payment(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Payment, Error> {
        self.payments
            .find_payment(&id)
            .await
            .map_err(map_repository_error)?
            .filter(|payment| may_view(caller, payment))
            .ok_or_else(payment_not_found)
    }

    /// Record a pending payment from the shipper to a payee.
    pub async fn create_payment(
        &self,
        caller: &AuthenticatedUser,
        draft: PaymentDraft,
    ) -> Result<PaymentReceipt, Error> {
        caller.require_role(&[Role::Shipper])?;
        let payment = Payment {
            id: Uuid::new_v4(),
            load_id: draft.load_id,
            payer_id: caller.id,
            payee_id: draft.payee_id,
            amount: draft.amount,
            status: PaymentStatus::Pending,
            method: draft
                .method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_owned()),
            created_at: self.clock.utc(),
        };
        self.payments
            .create_payment(&payment)
            .await
            .map_err(map_repository_error)?;
        info!(payment_id = %payment.id, load_id = %payment.load_id, "payment recorded");
        Ok(PaymentReceipt::from(payment))
    }

    /// Mark a payment paid. Only the payer or an admin may confirm.
    pub async fn confirm_payment(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Payment, Error> {
        let payment = self
            .payments
            .find_payment(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(payment_not_found)?;
        if !(caller.is_admin() || payment.payer_id == caller.id) {
            return Err(Error::forbidden(
                "Only the payer or an admin can confirm this payment",
            ));
        }
        let paid = self
            .payments
            .mark_paid(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(payment_not_found)?;
        info!(payment_id = %paid.id, confirmed_by = %caller.id, "payment confirmed");
        Ok(paid)
    }

    /// Invoice for a payment the caller is party to.
    pub async fn invoice(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<Invoice, Error> {
        self.payments
            .invoice(&id)
            .await
            .map_err(map_repository_error)?
            .filter(|record| may_view(caller, &record.payment))
            .map(Invoice::from)
            .ok_or_else(payment_not_found)
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
