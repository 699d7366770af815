//! Company membership management.

use faktura_core::error::{FakturaError, FakturaResult};
use faktura_core::logging::mask_email;
use faktura_core::models::company_member::CompanyMember;
use faktura_core::repository::{CompanyMemberRepository, CompanyRepository, UserRepository};
use faktura_core::validation;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct MembershipService<M, C, U>
where
    M: CompanyMemberRepository,
    C: CompanyRepository,
    U: UserRepository,
{
    member_repo: M,
    company_repo: C,
    user_repo: U,
}

impl<M, C, U> MembershipService<M, C, U>
where
    M: CompanyMemberRepository,
    C: CompanyRepository,
    U: UserRepository,
{
    pub fn new(member_repo: M, company_repo: C, user_repo: U) -> Self {
        Self {
            member_repo,
            company_repo,
            user_repo,
        }
    }

    /// Associate an existing user, looked up by email, with a company.
    pub async fn add_user_by_email(
        &self,
        company_id: Uuid,
        email: &str,
    ) -> FakturaResult<CompanyMember> {
        debug!(
            %company_id,
            email = %mask_email(email),
            "add user to company requested"
        );

        validation::validate_not_blank("email", email)?;
        validation::validate_email(email)?;

        let company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| {
                warn!(%company_id, "add user failed: company not found");
                FakturaError::not_found("Company", company_id)
            })?;

        let user = self.user_repo.find_by_email(email).await?.ok_or_else(|| {
            warn!(email = %mask_email(email), "add user failed: user not found");
            FakturaError::not_found("User", email)
        })?;

        if self.member_repo.exists(user.id, company.id).await? {
            warn!(
                user_id = %user.id,
                %company_id,
                "add user failed: user already associated with company"
            );
            return Err(FakturaError::business_rule(
                "User is already associated with this company",
                "USER_ALREADY_ASSOCIATED",
            ));
        }

        let member = self
            .member_repo
            .create(&CompanyMember::new(user.id, company.id))
            .await?;

        info!(user_id = %user.id, %company_id, "user added to company");
        Ok(member)
    }

    /// Remove a user's association with a company. An absent pair is a
    /// not-found condition: the association simply does not exist.
    pub async fn remove_user(&self, company_id: Uuid, user_id: Uuid) -> FakturaResult<()> {
        debug!(%company_id, %user_id, "remove user from company requested");

        let member = self
            .member_repo
            .find(user_id, company_id)
            .await?
            .ok_or_else(|| {
                warn!(%company_id, %user_id, "remove user failed: user not part of company");
                FakturaError::not_found(
                    "CompanyMember",
                    format!("user_id={user_id}, company_id={company_id}"),
                )
            })?;

        self.member_repo
            .delete(member.user_id, member.company_id)
            .await?;

        info!(%user_id, %company_id, "user removed from company");
        Ok(())
    }

    pub async fn list_users_of_company(
        &self,
        company_id: Uuid,
    ) -> FakturaResult<Vec<CompanyMember>> {
        debug!(%company_id, "fetching members of company");
        self.member_repo.list_by_company(company_id).await
    }

    pub async fn list_companies_of_user(&self, user_id: Uuid) -> FakturaResult<Vec<CompanyMember>> {
        debug!(%user_id, "fetching companies of user");
        self.member_repo.list_by_user(user_id).await
    }
}
