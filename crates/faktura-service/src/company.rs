//! Company creation, partial update, and removal.

use faktura_core::error::{FakturaError, FakturaResult};
use faktura_core::models::company::{Company, CompanyDto, CreateCompany, UpdateCompany};
use faktura_core::models::company_member::CompanyMember;
use faktura_core::repository::{CompanyRepository, UserRepository};
use faktura_core::validation;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct CompanyService<C: CompanyRepository, U: UserRepository> {
    company_repo: C,
    user_repo: U,
}

impl<C: CompanyRepository, U: UserRepository> CompanyService<C, U> {
    pub fn new(company_repo: C, user_repo: U) -> Self {
        Self {
            company_repo,
            user_repo,
        }
    }

    /// Create a company on behalf of an existing user. The company and
    /// the creator's membership are persisted as one atomic unit.
    pub async fn create(
        &self,
        creator_user_id: Uuid,
        input: CreateCompany,
    ) -> FakturaResult<CompanyDto> {
        debug!(%creator_user_id, "company creation started");

        validation::validate_org_num(&input.org_num)?;
        validation::validate_company_name(&input.name)?;

        let creator = self
            .user_repo
            .find_by_id(creator_user_id)
            .await?
            .ok_or_else(|| {
                warn!(%creator_user_id, "company creation failed: creator user not found");
                FakturaError::not_found("User", creator_user_id)
            })?;

        if self.company_repo.exists_by_org_num(&input.org_num).await? {
            warn!(
                org_num = %input.org_num,
                "company creation failed: organisation number already exists"
            );
            return Err(FakturaError::business_rule(
                "Company with organisation number already exists",
                "ORG_NUM_EXISTS",
            ));
        }

        let company = Company::new(input)?;
        let owner = CompanyMember::new(creator.id, company.id);
        let created = self.company_repo.create_with_owner(&company, &owner).await?;

        info!(
            company_id = %created.id,
            user_id = %creator.id,
            "company created successfully"
        );
        Ok(CompanyDto::from(&created))
    }

    /// Apply a partial update; fields absent from the patch keep their
    /// current value.
    pub async fn update(
        &self,
        company_id: Uuid,
        patch: UpdateCompany,
    ) -> FakturaResult<CompanyDto> {
        debug!(%company_id, "company update requested");

        let mut company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| {
                warn!(%company_id, "company update failed: company not found");
                FakturaError::not_found("Company", company_id)
            })?;

        company.apply_update(patch)?;
        let updated = self.company_repo.update(&company).await?;

        info!(%company_id, "company updated successfully");
        Ok(CompanyDto::from(&updated))
    }

    pub async fn get(&self, company_id: Uuid) -> FakturaResult<CompanyDto> {
        Ok(CompanyDto::from(&self.get_entity(company_id).await?))
    }

    /// Resolve the raw entity, for collaborators that need more than
    /// the projection.
    pub async fn get_entity(&self, company_id: Uuid) -> FakturaResult<Company> {
        debug!(%company_id, "fetching company");

        self.company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| {
                warn!(%company_id, "get company failed: company not found");
                FakturaError::not_found("Company", company_id)
            })
    }

    pub async fn delete(&self, company_id: Uuid) -> FakturaResult<()> {
        debug!(%company_id, "company deletion requested");

        let company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| {
                warn!(%company_id, "company deletion failed: company not found");
                FakturaError::not_found("Company", company_id)
            })?;

        self.company_repo.delete(company.id).await?;
        info!(%company_id, "company deleted successfully");
        Ok(())
    }
}
