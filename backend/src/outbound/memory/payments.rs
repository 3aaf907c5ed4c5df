//! Payments and invoice lookups.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{InvoiceRecord, Payment, PaymentScope, PaymentStatus};

use super::{MemoryStore, newest_first, require_references};

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn list_payments(
        &self,
        scope: &PaymentScope,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(state.payments.iter().filter(|payment| {
            match *scope {
                PaymentScope::All => true,
                PaymentScope::Party(user_id) => {
                    payment.payer_id == user_id || payment.payee_id == user_id
                }
            }
        })))
    }

    async fn find_payment(&self, id: &Uuid) -> Result<Option<Payment>, PaymentRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.payments.iter().find(|payment| payment.id == *id).cloned())
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut state = self.state.lock().await;
        require_references(&[
            (state.load_exists(payment.load_id), "payments_load_id_fkey"),
            (state.user_exists(payment.payer_id), "payments_payer_id_fkey"),
            (state.user_exists(payment.payee_id), "payments_payee_id_fkey"),
        ])?;
        state.payments.push(payment.clone());
        Ok(())
    }

    async fn mark_paid(&self, id: &Uuid) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut state = self.state.lock().await;
        Ok(state
            .payments
            .iter_mut()
            .find(|payment| payment.id == *id)
            .map(|payment| {
                payment.status = PaymentStatus::Paid;
                payment.clone()
            }))
    }

    async fn invoice(&self, id: &Uuid) -> Result<Option<InvoiceRecord>, PaymentRepositoryError> {
        let state = self.state.lock().await;
        let Some(payment) = state.payments.iter().find(|payment| payment.id == *id) else {
            return Ok(None);
        };
        let load = state.loads.iter().find(|load| load.id == payment.load_id);
        let (Some(load), Some(payer_email), Some(payee_email)) = (
            load,
            state.email_of(payment.payer_id),
            state.email_of(payment.payee_id),
        ) else {
            return Ok(None);
        };
        Ok(Some(InvoiceRecord {
            payment: payment.clone(),
            payer_email,
            payee_email,
            load_title: load.title.clone(),
            load_weight_tons: load.weight_tons,
        }))
    }
}
