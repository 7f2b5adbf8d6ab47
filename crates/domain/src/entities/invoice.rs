use chrono::{DateTime, Utc};
use common::ExternalId;
use document_store::{Collection, Document};
use serde::{Deserialize, Serialize};

/// How an invoice was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
        }
    }
}

/// Whether an invoice has been paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

/// A bill for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: ExternalId,
    pub order_id: ExternalId,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Invoice {
    const COLLECTION: Collection = Collection::Invoices;

    fn external_id(&self) -> &ExternalId {
        &self.invoice_id
    }
}

impl Invoice {
    /// Builds a new invoice. Status defaults to pending and the due date to `now`.
    pub fn new(input: NewInvoice, now: DateTime<Utc>) -> Self {
        Self {
            invoice_id: ExternalId::generate(),
            order_id: input.order_id,
            payment_method: input.payment_method,
            payment_status: input.payment_status.unwrap_or_default(),
            payment_due_date: input.payment_due_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoice {
    pub order_id: ExternalId,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_due_date: Option<DateTime<Utc>>,
}

/// Partial update for an invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<ExternalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_due_date: Option<DateTime<Utc>>,
}
