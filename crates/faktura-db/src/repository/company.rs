//! SurrealDB implementation of [`CompanyRepository`].
//!
//! `create_with_owner` writes the company and the creator's membership
//! inside one transaction so a company can never exist without its
//! creator association. Organisation-number uniqueness is guarded by
//! `idx_company_org_num`.

use chrono::{DateTime, Utc};
use faktura_core::error::FakturaResult;
use faktura_core::models::company::Company;
use faktura_core::models::company_member::CompanyMember;
use faktura_core::repository::CompanyRepository;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::{DbError, map_unique_violation};
use crate::transaction::in_transaction;

#[derive(Debug, Deserialize)]
struct CompanyRow {
    org_num: String,
    name: String,
    email: Option<String>,
    phone_number: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

impl CompanyRow {
    fn into_company(self, id: Uuid) -> Company {
        Company {
            id,
            org_num: self.org_num,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
            city: self.city,
            country: self.country,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// SurrealDB implementation of the Company repository.
#[derive(Clone)]
pub struct SurrealCompanyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CompanyRepository for SurrealCompanyRepository<C> {
    async fn create_with_owner(
        &self,
        company: &Company,
        owner: &CompanyMember,
    ) -> FakturaResult<Company> {
        let id_str = company.id.to_string();

        // Both CREATE statements commit or roll back together.
        let sql = in_transaction(
            "CREATE type::thing('company', $id) SET \
             org_num = $org_num, name = $name, email = $email, \
             phone_number = $phone_number, address = $address, \
             city = $city, country = $country, \
             created_at = $created_at, updated_at = $updated_at; \
             CREATE type::thing('company_member', $member_id) SET \
             user_id = $owner_user_id, company_id = $id, \
             created_at = $member_created_at;",
        );

        let result = self
            .db
            .query(sql)
            .bind(("id", id_str.clone()))
            .bind(("org_num", company.org_num.clone()))
            .bind(("name", company.name.clone()))
            .bind(("email", company.email.clone()))
            .bind(("phone_number", company.phone_number.clone()))
            .bind(("address", company.address.clone()))
            .bind(("city", company.city.clone()))
            .bind(("country", company.country.clone()))
            .bind(("created_at", company.created_at))
            .bind(("updated_at", company.updated_at))
            .bind(("member_id", Uuid::new_v4().to_string()))
            .bind(("owner_user_id", owner.user_id.to_string()))
            .bind(("member_created_at", owner.created_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| {
            map_unique_violation(
                e,
                "Company with organisation number already exists",
                "ORG_NUM_EXISTS",
            )
        })?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(company.id))
    }

    async fn find_by_id(&self, id: Uuid) -> FakturaResult<Option<Company>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::thing('company', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| row.into_company(id)))
    }

    async fn exists_by_org_num(&self, org_num: &str) -> FakturaResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM company \
                 WHERE org_num = $org_num GROUP ALL",
            )
            .bind(("org_num", org_num.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn update(&self, company: &Company) -> FakturaResult<Company> {
        let id_str = company.id.to_string();

        // The organisation number is immutable and deliberately absent
        // from the SET list.
        let result = self
            .db
            .query(
                "UPDATE type::thing('company', $id) SET \
                 name = $name, email = $email, \
                 phone_number = $phone_number, address = $address, \
                 city = $city, country = $country, \
                 updated_at = $updated_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", company.name.clone()))
            .bind(("email", company.email.clone()))
            .bind(("phone_number", company.phone_number.clone()))
            .bind(("address", company.address.clone()))
            .bind(("city", company.city.clone()))
            .bind(("country", company.country.clone()))
            .bind(("updated_at", company.updated_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(company.id))
    }

    async fn delete(&self, id: Uuid) -> FakturaResult<()> {
        self.db
            .query("DELETE type::thing('company', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
