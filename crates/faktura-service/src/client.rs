//! Client management under a company.

use faktura_core::error::{FakturaError, FakturaResult};
use faktura_core::models::client::{Client, ClientDto, CreateClient, UpdateClient};
use faktura_core::repository::{
    ClientRepository, CompanyRepository, PaginatedResult, Pagination,
};
use faktura_core::validation;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ClientService<K: ClientRepository, C: CompanyRepository> {
    client_repo: K,
    company_repo: C,
}

impl<K: ClientRepository, C: CompanyRepository> ClientService<K, C> {
    pub fn new(client_repo: K, company_repo: C) -> Self {
        Self {
            client_repo,
            company_repo,
        }
    }

    /// Create a client under an existing company.
    pub async fn create(&self, input: CreateClient) -> FakturaResult<ClientDto> {
        debug!(company_id = %input.company_id, "client creation started");

        validation::validate_person_name("first_name", &input.first_name)?;
        validation::validate_person_name("last_name", &input.last_name)?;
        validation::validate_email(&input.email)?;
        validation::validate_address("address", input.address.as_deref())?;
        validation::validate_address("city", input.city.as_deref())?;
        validation::validate_address("country", input.country.as_deref())?;
        validation::validate_phone_number(input.phone_number.as_deref())?;

        let company = self
            .company_repo
            .find_by_id(input.company_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    company_id = %input.company_id,
                    "client creation failed: company not found"
                );
                FakturaError::not_found("Company", input.company_id)
            })?;

        let client = Client::new(input)?;
        let created = self.client_repo.create(&client).await?;

        info!(
            client_id = %created.id,
            company_id = %company.id,
            "client created successfully"
        );
        Ok(ClientDto::from(&created))
    }

    /// Partial update: each present field is validated then applied;
    /// absent fields are left untouched.
    pub async fn update(&self, client_id: Uuid, patch: UpdateClient) -> FakturaResult<ClientDto> {
        debug!(%client_id, "client update requested");

        let mut client = self
            .client_repo
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| {
                warn!(%client_id, "client update failed: client not found");
                FakturaError::not_found("Client", client_id)
            })?;

        client.apply_update(patch)?;
        let updated = self.client_repo.update(&client).await?;

        info!(%client_id, "client updated successfully");
        Ok(ClientDto::from(&updated))
    }

    pub async fn get(&self, client_id: Uuid) -> FakturaResult<ClientDto> {
        let client = self
            .client_repo
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| FakturaError::not_found("Client", client_id))?;
        Ok(ClientDto::from(&client))
    }

    pub async fn delete(&self, client_id: Uuid) -> FakturaResult<()> {
        debug!(%client_id, "client deletion requested");

        let client = self
            .client_repo
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| {
                warn!(%client_id, "client deletion failed: client not found");
                FakturaError::not_found("Client", client_id)
            })?;

        self.client_repo.delete(client.id).await?;
        info!(%client_id, "client deleted successfully");
        Ok(())
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        pagination: Pagination,
    ) -> FakturaResult<PaginatedResult<ClientDto>> {
        let page = self
            .client_repo
            .list_by_company(company_id, pagination)
            .await?;
        Ok(PaginatedResult {
            items: page.items.iter().map(ClientDto::from).collect(),
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        })
    }
}
