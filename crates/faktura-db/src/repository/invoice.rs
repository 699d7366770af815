//! SurrealDB implementation of [`InvoiceRepository`].
//!
//! The item set is embedded in the invoice row, so an invoice and its
//! items always commit, replace, and disappear as one unit. Amounts and
//! unit prices are stored as decimal strings so they round-trip without
//! floating-point drift. Invoice-number uniqueness is guarded by
//! `idx_invoice_number`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use faktura_core::error::FakturaResult;
use faktura_core::models::invoice::{Invoice, InvoiceItem, InvoiceStatus};
use faktura_core::repository::{InvoiceRepository, PaginatedResult, Pagination};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::{DbError, map_unique_violation};

#[derive(Debug, Serialize, Deserialize)]
struct ItemRow {
    id: String,
    quantity: i64,
    unit_price: String,
}

impl ItemRow {
    fn from_item(item: &InvoiceItem) -> Self {
        Self {
            id: item.id.to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
        }
    }

    fn try_into_item(self) -> Result<InvoiceItem, DbError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| DbError::Decode(format!("invalid item UUID: {e}")))?;
        let unit_price = Decimal::from_str(&self.unit_price)
            .map_err(|e| DbError::Decode(format!("invalid item unit price: {e}")))?;
        Ok(InvoiceItem {
            id,
            quantity: self.quantity,
            unit_price,
        })
    }
}

fn parse_status(s: &str) -> Result<InvoiceStatus, DbError> {
    match s {
        "created" => Ok(InvoiceStatus::Created),
        "sent" => Ok(InvoiceStatus::Sent),
        "paid" => Ok(InvoiceStatus::Paid),
        "cancelled" => Ok(InvoiceStatus::Cancelled),
        other => Err(DbError::Decode(format!("unknown invoice status: {other}"))),
    }
}

fn status_to_string(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Created => "created",
        InvoiceStatus::Sent => "sent",
        InvoiceStatus::Paid => "paid",
        InvoiceStatus::Cancelled => "cancelled",
    }
}

#[derive(Debug, Deserialize)]
struct InvoiceRow {
    company_id: String,
    client_id: String,
    number: String,
    due_date: DateTime<Utc>,
    status: String,
    items: Vec<ItemRow>,
    amount: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct InvoiceRowWithId {
    record_id: String,
    company_id: String,
    client_id: String,
    number: String,
    due_date: DateTime<Utc>,
    status: String,
    items: Vec<ItemRow>,
    amount: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

impl InvoiceRow {
    fn try_into_invoice(self, id: Uuid) -> Result<Invoice, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Decode(format!("invalid invoice company UUID: {e}")))?;
        let client_id = Uuid::parse_str(&self.client_id)
            .map_err(|e| DbError::Decode(format!("invalid invoice client UUID: {e}")))?;
        let status = parse_status(&self.status)?;
        let items = self
            .items
            .into_iter()
            .map(ItemRow::try_into_item)
            .collect::<Result<Vec<_>, DbError>>()?;
        let amount = Decimal::from_str(&self.amount)
            .map_err(|e| DbError::Decode(format!("invalid invoice amount: {e}")))?;

        Ok(Invoice {
            id,
            company_id,
            client_id,
            number: self.number,
            due_date: self.due_date,
            status,
            items,
            amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl InvoiceRowWithId {
    fn try_into_invoice(self) -> Result<Invoice, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid invoice UUID: {e}")))?;
        let row = InvoiceRow {
            company_id: self.company_id,
            client_id: self.client_id,
            number: self.number,
            due_date: self.due_date,
            status: self.status,
            items: self.items,
            amount: self.amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.try_into_invoice(id)
    }
}

/// SurrealDB implementation of the Invoice repository.
#[derive(Clone)]
pub struct SurrealInvoiceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInvoiceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_by_field(
        &self,
        field: &'static str,
        value: Uuid,
        pagination: Pagination,
    ) -> FakturaResult<PaginatedResult<Invoice>> {
        let value_str = value.to_string();

        let mut count_result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM invoice \
                 WHERE {field} = $value GROUP ALL"
            ))
            .bind(("value", value_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * FROM invoice \
                 WHERE {field} = $value \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset"
            ))
            .bind(("value", value_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvoiceRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_invoice())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

impl<C: Connection> InvoiceRepository for SurrealInvoiceRepository<C> {
    async fn create(&self, invoice: &Invoice) -> FakturaResult<Invoice> {
        let id_str = invoice.id.to_string();
        let items: Vec<ItemRow> = invoice.items.iter().map(ItemRow::from_item).collect();

        let result = self
            .db
            .query(
                "CREATE type::thing('invoice', $id) SET \
                 company_id = $company_id, client_id = $client_id, \
                 number = $number, due_date = $due_date, \
                 status = $status, items = $items, amount = $amount, \
                 created_at = $created_at, updated_at = $updated_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", invoice.company_id.to_string()))
            .bind(("client_id", invoice.client_id.to_string()))
            .bind(("number", invoice.number.clone()))
            .bind(("due_date", invoice.due_date))
            .bind(("status", status_to_string(invoice.status)))
            .bind(("items", items))
            .bind(("amount", invoice.amount.to_string()))
            .bind(("created_at", invoice.created_at))
            .bind(("updated_at", invoice.updated_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| {
            map_unique_violation(e, "Invoice number already exists", "INVOICE_NUMBER_EXISTS")
        })?;

        let rows: Vec<InvoiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Invoice".into(),
            id: id_str,
        })?;

        Ok(row.try_into_invoice(invoice.id)?)
    }

    async fn find_by_id(&self, id: Uuid) -> FakturaResult<Option<Invoice>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::thing('invoice', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvoiceRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_invoice(id)?)),
            None => Ok(None),
        }
    }

    async fn find_by_number(&self, number: &str) -> FakturaResult<Option<Invoice>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM invoice \
                 WHERE number = $number",
            )
            .bind(("number", number.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvoiceRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_invoice()?)),
            None => Ok(None),
        }
    }

    async fn exists_by_number(&self, number: &str) -> FakturaResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM invoice \
                 WHERE number = $number GROUP ALL",
            )
            .bind(("number", number.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn update(&self, invoice: &Invoice) -> FakturaResult<Invoice> {
        let id_str = invoice.id.to_string();
        let items: Vec<ItemRow> = invoice.items.iter().map(ItemRow::from_item).collect();

        // A present item list has already replaced the embedded set on
        // the entity; writing the row replaces it in storage atomically.
        let result = self
            .db
            .query(
                "UPDATE type::thing('invoice', $id) SET \
                 due_date = $due_date, status = $status, \
                 items = $items, amount = $amount, \
                 updated_at = $updated_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("due_date", invoice.due_date))
            .bind(("status", status_to_string(invoice.status)))
            .bind(("items", items))
            .bind(("amount", invoice.amount.to_string()))
            .bind(("updated_at", invoice.updated_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<InvoiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Invoice".into(),
            id: id_str,
        })?;

        Ok(row.try_into_invoice(invoice.id)?)
    }

    async fn delete(&self, id: Uuid) -> FakturaResult<()> {
        // Items are embedded in the row, so the unit disappears whole.
        self.db
            .query("DELETE type::thing('invoice', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
        pagination: Pagination,
    ) -> FakturaResult<PaginatedResult<Invoice>> {
        self.list_by_field("company_id", company_id, pagination).await
    }

    async fn list_by_client(
        &self,
        client_id: Uuid,
        pagination: Pagination,
    ) -> FakturaResult<PaginatedResult<Invoice>> {
        self.list_by_field("client_id", client_id, pagination).await
    }
}
