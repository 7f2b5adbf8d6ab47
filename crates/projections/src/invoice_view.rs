//! Invoice view assembly.

use chrono::{DateTime, Utc};
use common::ExternalId;
use document_store::{Collection, DocumentStore, DocumentStoreExt, with_deadline};
use domain::{Invoice, PaymentStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

use crate::error::{Result, ViewError};
use crate::order_view::{LineItemRow, OrderViewPipeline};

/// Rendered in place of a payment method the invoice does not carry.
pub const UNSET_PAYMENT_METHOD: &str = "unset";

/// The externally returned invoice: invoice fields merged with its order's
/// grouped view. Built on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceView {
    pub invoice_id: ExternalId,
    pub order_id: ExternalId,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub payment_due_date: DateTime<Utc>,
    pub table_number: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_due: Decimal,
    pub order_details: Vec<LineItemRow>,
}

/// Builds [`InvoiceView`]s.
pub struct InvoiceAssembler<S: DocumentStore> {
    pipeline: OrderViewPipeline<S>,
    read_deadline: Duration,
}

impl<S: DocumentStore> InvoiceAssembler<S> {
    pub fn new(pipeline: OrderViewPipeline<S>, read_deadline: Duration) -> Self {
        Self {
            pipeline,
            read_deadline,
        }
    }

    /// Fetches the invoice, runs the order view on its order and merges them.
    ///
    /// Fails with `NotFound` if the invoice does not exist, and with
    /// `ReferentialInconsistency` if its order produced no group or did not
    /// resolve.
    #[tracing::instrument(skip(self))]
    pub async fn build_invoice_view(&self, invoice_id: &ExternalId) -> Result<InvoiceView> {
        let invoice = with_deadline(
            "find_by_id",
            self.read_deadline,
            self.pipeline.store().get::<Invoice>(invoice_id),
        )
        .await?
        .ok_or_else(|| ViewError::NotFound {
            collection: Collection::Invoices,
            id: invoice_id.to_string(),
        })?;

        let groups = self.pipeline.compute_order_view(&invoice.order_id).await?;
        let group = match groups.into_iter().next() {
            Some(group) if group.order_id.is_some() => group,
            _ => {
                metrics::counter!("referential_inconsistencies").increment(1);
                tracing::warn!(
                    invoice_id = %invoice.invoice_id,
                    order_id = %invoice.order_id,
                    "invoice order did not resolve"
                );
                return Err(ViewError::ReferentialInconsistency {
                    order_id: invoice.order_id.to_string(),
                });
            }
        };

        metrics::counter!("invoice_views_built").increment(1);

        Ok(InvoiceView {
            payment_method: invoice
                .payment_method
                .map_or(UNSET_PAYMENT_METHOD, |m| m.as_str())
                .to_string(),
            invoice_id: invoice.invoice_id,
            order_id: invoice.order_id,
            payment_status: invoice.payment_status,
            payment_due_date: invoice.payment_due_date,
            table_number: group.table_number,
            payment_due: group.payment_due,
            order_details: group.order_items,
        })
    }
}
