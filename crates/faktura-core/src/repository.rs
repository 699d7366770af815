//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. `find_by_*` resolves to
//! `Ok(None)` when the record is absent — turning absence into an error
//! is the caller's decision. Durable uniqueness constraints live at this
//! boundary; the `exists_by_*` checks are a fast pre-check only, and
//! implementations translate constraint violations raised at commit time
//! into the matching business-rule error.

use uuid::Uuid;

use crate::error::FakturaResult;
use crate::models::{
    client::Client,
    company::Company,
    company_member::CompanyMember,
    invoice::Invoice,
    user::User,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait UserRepository: Send + Sync {
    fn create(&self, user: &User) -> impl Future<Output = FakturaResult<User>> + Send;
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = FakturaResult<Option<User>>> + Send;
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = FakturaResult<Option<User>>> + Send;
    fn exists_by_email(&self, email: &str) -> impl Future<Output = FakturaResult<bool>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = FakturaResult<()>> + Send;
}

pub trait CompanyRepository: Send + Sync {
    /// Persist a company together with its creator's membership as one
    /// atomic unit: either both records commit or neither does.
    fn create_with_owner(
        &self,
        company: &Company,
        owner: &CompanyMember,
    ) -> impl Future<Output = FakturaResult<Company>> + Send;
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = FakturaResult<Option<Company>>> + Send;
    fn exists_by_org_num(
        &self,
        org_num: &str,
    ) -> impl Future<Output = FakturaResult<bool>> + Send;
    fn update(&self, company: &Company) -> impl Future<Output = FakturaResult<Company>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = FakturaResult<()>> + Send;
}

pub trait CompanyMemberRepository: Send + Sync {
    fn create(
        &self,
        member: &CompanyMember,
    ) -> impl Future<Output = FakturaResult<CompanyMember>> + Send;
    fn find(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> impl Future<Output = FakturaResult<Option<CompanyMember>>> + Send;
    fn exists(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> impl Future<Output = FakturaResult<bool>> + Send;
    fn delete(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> impl Future<Output = FakturaResult<()>> + Send;
    fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> impl Future<Output = FakturaResult<Vec<CompanyMember>>> + Send;
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = FakturaResult<Vec<CompanyMember>>> + Send;
}

pub trait ClientRepository: Send + Sync {
    fn create(&self, client: &Client) -> impl Future<Output = FakturaResult<Client>> + Send;
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = FakturaResult<Option<Client>>> + Send;
    fn update(&self, client: &Client) -> impl Future<Output = FakturaResult<Client>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = FakturaResult<()>> + Send;
    fn list_by_company(
        &self,
        company_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = FakturaResult<PaginatedResult<Client>>> + Send;
}

pub trait InvoiceRepository: Send + Sync {
    /// The invoice row carries its item set; create and update persist
    /// invoice and items as one unit.
    fn create(&self, invoice: &Invoice) -> impl Future<Output = FakturaResult<Invoice>> + Send;
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = FakturaResult<Option<Invoice>>> + Send;
    fn find_by_number(
        &self,
        number: &str,
    ) -> impl Future<Output = FakturaResult<Option<Invoice>>> + Send;
    fn exists_by_number(
        &self,
        number: &str,
    ) -> impl Future<Output = FakturaResult<bool>> + Send;
    fn update(&self, invoice: &Invoice) -> impl Future<Output = FakturaResult<Invoice>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = FakturaResult<()>> + Send;
    fn list_by_company(
        &self,
        company_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = FakturaResult<PaginatedResult<Invoice>>> + Send;
    fn list_by_client(
        &self,
        client_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = FakturaResult<PaginatedResult<Invoice>>> + Send;
}
