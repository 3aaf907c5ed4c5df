//! Payments and invoices.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::text_enum::define_text_enum;

/// Method recorded when the shipper does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "pending";

define_text_enum! {
    /// Settlement state of a payment.
    pub enum PaymentStatus as "status" {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
    }
}

/// Money owed by a payer to a payee for a load.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub load_id: Uuid,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: f64,
    pub status: PaymentStatus,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Human-facing invoice number derived from the payment id.
    ///
    /// # Examples
    /// ```
    /// use fleetflow::domain::invoice_number;
    /// use uuid::Uuid;
    ///
    /// let id = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
    /// assert_eq!(invoice_number(&id), "INV-3FA85F64");
    /// ```
    pub fn invoice_number(&self) -> String {
        invoice_number(&self.id)
    }

    /// Whether `user_id` is the payer or payee.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.payer_id == user_id || self.payee_id == user_id
    }
}

/// `INV-` followed by the first eight hex digits of `id`, upper-cased.
pub fn invoice_number(id: &Uuid) -> String {
    let simple = id.simple().to_string();
    let prefix: String = simple.chars().take(8).collect();
    format!("INV-{}", prefix.to_uppercase())
}

/// Shipper input for charging a load.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub load_id: Uuid,
    pub payee_id: Uuid,
    pub amount: f64,
    pub method: Option<String>,
}

/// Which payments a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentScope {
    All,
    /// Payments where the user pays or is paid.
    Party(Uuid),
}

/// Payment with its derived invoice number, returned on creation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaymentReceipt {
    #[serde(flatten)]
    pub payment: Payment,
    pub invoice_number: String,
}

impl From<Payment> for PaymentReceipt {
    fn from(payment: Payment) -> Self {
        let invoice_number = payment.invoice_number();
        Self {
            payment,
            invoice_number,
        }
    }
}

/// Payment joined with party emails and the load it settles.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub payment: Payment,
    pub payer_email: String,
    pub payee_email: String,
    pub load_title: String,
    pub load_weight_tons: f64,
}

/// Printable invoice view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Invoice {
    pub invoice_number: String,
    pub date: DateTime<Utc>,
    pub payer: String,
    pub payee: String,
    pub load: String,
    pub weight: f64,
    pub amount: f64,
    pub status: PaymentStatus,
    pub method: String,
}

impl From<InvoiceRecord> for Invoice {
    fn from(record: InvoiceRecord) -> Self {
        let InvoiceRecord {
            payment,
            payer_email,
            payee_email,
            load_title,
            load_weight_tons,
        } = record;
        Self {
            invoice_number: payment.invoice_number(),
            date: payment.created_at,
            payer: payer_email,
            payee: payee_email,
            load: load_title,
            weight: load_weight_tons,
            amount: payment.amount,
            status: payment.status,
            method: payment.method,
        }
    }
}
