//! Invoice lifecycle: creation, update, status transitions, removal.

use faktura_core::error::{FakturaError, FakturaResult};
use faktura_core::models::invoice::{
    CreateInvoice, Invoice, InvoiceDto, InvoiceStatus, UpdateInvoice,
};
use faktura_core::repository::{
    ClientRepository, CompanyRepository, InvoiceRepository, PaginatedResult, Pagination,
};
use faktura_core::validation;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct InvoiceService<I, C, K>
where
    I: InvoiceRepository,
    C: CompanyRepository,
    K: ClientRepository,
{
    invoice_repo: I,
    company_repo: C,
    client_repo: K,
}

impl<I, C, K> InvoiceService<I, C, K>
where
    I: InvoiceRepository,
    C: CompanyRepository,
    K: ClientRepository,
{
    pub fn new(invoice_repo: I, company_repo: C, client_repo: K) -> Self {
        Self {
            invoice_repo,
            company_repo,
            client_repo,
        }
    }

    /// Create an invoice with its initial item set. The invoice starts
    /// in `Created` status; the amount is computed from the items, never
    /// taken from the caller.
    pub async fn create(&self, input: CreateInvoice) -> FakturaResult<InvoiceDto> {
        debug!(number = %input.number, "invoice creation started");

        validation::validate_invoice_number(&input.number)?;

        if self.invoice_repo.exists_by_number(&input.number).await? {
            warn!(
                number = %input.number,
                "invoice creation failed: invoice number already exists"
            );
            return Err(FakturaError::business_rule(
                "Invoice number already exists",
                "INVOICE_NUMBER_EXISTS",
            ));
        }

        let company = self
            .company_repo
            .find_by_id(input.company_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    company_id = %input.company_id,
                    "invoice creation failed: company not found"
                );
                FakturaError::not_found("Company", input.company_id)
            })?;

        let client = self
            .client_repo
            .find_by_id(input.client_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    client_id = %input.client_id,
                    "invoice creation failed: client not found"
                );
                FakturaError::not_found("Client", input.client_id)
            })?;

        // Item validation and amount computation happen on attachment.
        let invoice = Invoice::new(input)?;
        let created = self.invoice_repo.create(&invoice).await?;

        info!(
            invoice_id = %created.id,
            company_id = %company.id,
            client_id = %client.id,
            amount = %created.amount,
            "invoice created successfully"
        );
        Ok(InvoiceDto::from(&created))
    }

    /// Update due date, status, and/or the item set. A present item
    /// list replaces the existing set wholesale; the amount is
    /// recomputed. A present status must be a legal transition.
    pub async fn update(&self, invoice_id: Uuid, patch: UpdateInvoice) -> FakturaResult<InvoiceDto> {
        debug!(%invoice_id, "invoice update requested");

        let mut invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| {
                warn!(%invoice_id, "invoice update failed: invoice not found");
                FakturaError::not_found("Invoice", invoice_id)
            })?;

        if let Some(due_date) = patch.due_date {
            invoice.set_due_date(due_date);
        }
        if let Some(status) = patch.status {
            invoice.transition_status(status).inspect_err(|_| {
                warn!(
                    %invoice_id,
                    status = ?status,
                    "invoice update failed: illegal status transition"
                );
            })?;
        }
        if let Some(items) = patch.items {
            invoice.replace_items(items)?;
        }

        let updated = self.invoice_repo.update(&invoice).await?;

        info!(%invoice_id, amount = %updated.amount, "invoice updated successfully");
        Ok(InvoiceDto::from(&updated))
    }

    /// Move the invoice to a new lifecycle status. Illegal transitions
    /// are rejected without touching the invoice.
    pub async fn update_status(
        &self,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> FakturaResult<InvoiceDto> {
        debug!(%invoice_id, status = ?status, "invoice status change requested");

        let mut invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| {
                warn!(%invoice_id, "invoice status change failed: invoice not found");
                FakturaError::not_found("Invoice", invoice_id)
            })?;

        invoice.transition_status(status).inspect_err(|_| {
            warn!(
                %invoice_id,
                status = ?status,
                "invoice status change failed: illegal transition"
            );
        })?;

        let updated = self.invoice_repo.update(&invoice).await?;

        info!(%invoice_id, status = ?status, "invoice status changed");
        Ok(InvoiceDto::from(&updated))
    }

    /// Delete an invoice and its owned items as one unit.
    pub async fn delete(&self, invoice_id: Uuid) -> FakturaResult<()> {
        debug!(%invoice_id, "invoice deletion requested");

        let invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| {
                warn!(%invoice_id, "invoice deletion failed: invoice not found");
                FakturaError::not_found("Invoice", invoice_id)
            })?;

        self.invoice_repo.delete(invoice.id).await?;
        info!(%invoice_id, "invoice deleted successfully");
        Ok(())
    }

    pub async fn get_by_id(&self, invoice_id: Uuid) -> FakturaResult<Option<InvoiceDto>> {
        let invoice = self.invoice_repo.find_by_id(invoice_id).await?;
        Ok(invoice.as_ref().map(InvoiceDto::from))
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        pagination: Pagination,
    ) -> FakturaResult<PaginatedResult<InvoiceDto>> {
        let page = self
            .invoice_repo
            .list_by_company(company_id, pagination)
            .await?;
        Ok(map_page(page))
    }

    pub async fn list_by_client(
        &self,
        client_id: Uuid,
        pagination: Pagination,
    ) -> FakturaResult<PaginatedResult<InvoiceDto>> {
        let page = self
            .invoice_repo
            .list_by_client(client_id, pagination)
            .await?;
        Ok(map_page(page))
    }
}

fn map_page(page: PaginatedResult<Invoice>) -> PaginatedResult<InvoiceDto> {
    PaginatedResult {
        items: page.items.iter().map(InvoiceDto::from).collect(),
        total: page.total,
        offset: page.offset,
        limit: page.limit,
    }
}
