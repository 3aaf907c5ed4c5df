//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{InvoiceRecord, Payment, PaymentScope, PaymentStatus};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPaymentRow, PaymentRow};
use super::pool::DbPool;
use super::schema::{loads, payments, users};

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

struct InvoiceRow {
    payment: PaymentRow,
    payer_email: String,
    payee_email: String,
    load_title: String,
    load_weight_tons: f64,
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn list_payments(
        &self,
        scope: &PaymentScope,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = payments::table
            .select(PaymentRow::as_select())
            .order(payments::created_at.desc())
            .into_boxed();
        if let PaymentScope::Party(user_id) = *scope {
            query = query.filter(
                payments::payer_id
                    .eq(user_id)
                    .or(payments::payee_id.eq(user_id)),
            );
        }

        let rows: Vec<PaymentRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(PaymentRow::into_payment).collect()
    }

    async fn find_payment(&self, id: &Uuid) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PaymentRow> = payments::table
            .find(id)
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(payments::table)
            .values(&NewPaymentRow::from(payment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn mark_paid(&self, id: &Uuid) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PaymentRow> = diesel::update(payments::table.find(id))
            .set(payments::status.eq(PaymentStatus::Paid.as_str()))
            .returning(PaymentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn invoice(&self, id: &Uuid) -> Result<Option<InvoiceRecord>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = *id;
        let row: Option<InvoiceRow> = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let joined: Option<(PaymentRow, String, f64)> = payments::table
                        .inner_join(loads::table)
                        .filter(payments::id.eq(id))
                        .select((PaymentRow::as_select(), loads::title, loads::weight_tons))
                        .first(conn)
                        .await
                        .optional()?;
                    let Some((payment, load_title, load_weight_tons)) = joined else {
                        return Ok(None);
                    };

                    let payer_email: String = users::table
                        .find(payment.payer_id)
                        .select(users::email)
                        .first(conn)
                        .await?;
                    let payee_email: String = users::table
                        .find(payment.payee_id)
                        .select(users::email)
                        .first(conn)
                        .await?;

                    Ok(Some(InvoiceRow {
                        payment,
                        payer_email,
                        payee_email,
                        load_title,
                        load_weight_tons,
                    }))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(|row| {
            Ok(InvoiceRecord {
                payment: row.payment.into_payment()?,
                payer_email: row.payer_email,
                payee_email: row.payee_email,
                load_title: row.load_title,
                load_weight_tons: row.load_weight_tons,
            })
        })
        .transpose()
    }
}
