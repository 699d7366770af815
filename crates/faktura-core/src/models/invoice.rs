//! Invoice aggregate root.
//!
//! An invoice exclusively owns its line items: items have no identity or
//! persistence outside the invoice, updates replace the whole item set,
//! and the derived `amount` is recomputed on every item mutation — it is
//! never trusted from caller input. Amounts use exact decimal arithmetic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FakturaError, FakturaResult};
use crate::validation;

/// Invoice status lifecycle.
///
/// Allowed transitions: `Created -> Sent`, `Created -> Cancelled`,
/// `Sent -> Paid`, `Sent -> Cancelled`. `Paid` and `Cancelled` are
/// terminal. Re-setting the current status is accepted as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Created,
    Sent,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        if self == target {
            return true;
        }
        matches!(
            (self, target),
            (Self::Created, Self::Sent)
                | (Self::Created, Self::Cancelled)
                | (Self::Sent, Self::Paid)
                | (Self::Sent, Self::Cancelled)
        )
    }
}

/// A line item, owned exclusively by one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl InvoiceItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Caller-supplied item fields; the item id is assigned on attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    pub quantity: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Uuid,
    /// Invoice number, `INV-YYYY-XXXX`. Globally unique.
    pub number: String,
    pub due_date: DateTime<Utc>,
    pub status: InvoiceStatus,
    /// Ordered, exclusively-owned item set. Never empty.
    pub items: Vec<InvoiceItem>,
    /// Derived total, `sum(quantity * unit_price)` over the items.
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(input: CreateInvoice) -> FakturaResult<Self> {
        validation::validate_invoice_number(&input.number)?;
        let items = Self::build_items(input.items)?;
        let amount = Self::compute_amount(&items);

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            company_id: input.company_id,
            client_id: input.client_id,
            number: input.number,
            due_date: input.due_date,
            status: InvoiceStatus::Created,
            items,
            amount,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the entire item set. The previous items are discarded,
    /// each new item is validated before attachment, and the amount is
    /// recomputed. Replacing with an empty set is rejected.
    pub fn replace_items(&mut self, items: Vec<InvoiceItemInput>) -> FakturaResult<()> {
        let items = Self::build_items(items)?;
        self.amount = Self::compute_amount(&items);
        self.items = items;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_due_date(&mut self, due_date: DateTime<Utc>) {
        self.due_date = due_date;
        self.updated_at = Utc::now();
    }

    /// Move the invoice to `target` if the lifecycle allows it.
    pub fn transition_status(&mut self, target: InvoiceStatus) -> FakturaResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(FakturaError::business_rule(
                format!(
                    "invoice status cannot change from {:?} to {:?}",
                    self.status, target
                ),
                "ILLEGAL_STATUS_TRANSITION",
            ));
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn build_items(inputs: Vec<InvoiceItemInput>) -> FakturaResult<Vec<InvoiceItem>> {
        if inputs.is_empty() {
            return Err(FakturaError::validation(
                "items",
                "invoice must contain at least one item",
                "INVOICE_ITEMS_REQUIRED",
            ));
        }
        inputs
            .into_iter()
            .map(|input| {
                validation::validate_quantity(input.quantity)?;
                validation::validate_unit_price(input.unit_price)?;
                Ok(InvoiceItem {
                    id: Uuid::new_v4(),
                    quantity: input.quantity,
                    unit_price: input.unit_price,
                })
            })
            .collect()
    }

    fn compute_amount(items: &[InvoiceItem]) -> Decimal {
        items.iter().map(InvoiceItem::line_total).sum()
    }
}

/// Fields required to create a new invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub number: String,
    pub due_date: DateTime<Utc>,
    pub items: Vec<InvoiceItemInput>,
}

/// Fields that can be updated on an existing invoice. A present item
/// list replaces the existing set wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInvoice {
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<InvoiceStatus>,
    pub items: Option<Vec<InvoiceItemInput>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemDto {
    pub id: Uuid,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDto {
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Uuid,
    pub number: String,
    pub due_date: DateTime<Utc>,
    pub status: InvoiceStatus,
    pub amount: Decimal,
    pub items: Vec<InvoiceItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Invoice> for InvoiceDto {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            company_id: invoice.company_id,
            client_id: invoice.client_id,
            number: invoice.number.clone(),
            due_date: invoice.due_date,
            status: invoice.status,
            amount: invoice.amount,
            items: invoice
                .items
                .iter()
                .map(|item| InvoiceItemDto {
                    id: item.id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total(),
                })
                .collect(),
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}
