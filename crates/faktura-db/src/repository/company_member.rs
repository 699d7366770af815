//! SurrealDB implementation of [`CompanyMemberRepository`].
//!
//! Membership rows have a synthetic record id; their real identity is
//! the (user_id, company_id) pair, kept unique by `idx_member_pair`.

use chrono::{DateTime, Utc};
use faktura_core::error::FakturaResult;
use faktura_core::models::company_member::CompanyMember;
use faktura_core::repository::CompanyMemberRepository;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::{DbError, map_unique_violation};

#[derive(Debug, Deserialize)]
struct MemberRow {
    user_id: String,
    company_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

impl MemberRow {
    fn try_into_member(self) -> Result<CompanyMember, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Decode(format!("invalid member user UUID: {e}")))?;
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Decode(format!("invalid member company UUID: {e}")))?;
        Ok(CompanyMember {
            user_id,
            company_id,
            created_at: self.created_at,
        })
    }
}

fn collect_members(rows: Vec<MemberRow>) -> Result<Vec<CompanyMember>, DbError> {
    rows.into_iter().map(MemberRow::try_into_member).collect()
}

/// SurrealDB implementation of the CompanyMember repository.
#[derive(Clone)]
pub struct SurrealCompanyMemberRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyMemberRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CompanyMemberRepository for SurrealCompanyMemberRepository<C> {
    async fn create(&self, member: &CompanyMember) -> FakturaResult<CompanyMember> {
        let result = self
            .db
            .query(
                "CREATE type::thing('company_member', $id) SET \
                 user_id = $user_id, company_id = $company_id, \
                 created_at = $created_at",
            )
            .bind(("id", Uuid::new_v4().to_string()))
            .bind(("user_id", member.user_id.to_string()))
            .bind(("company_id", member.company_id.to_string()))
            .bind(("created_at", member.created_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| {
            map_unique_violation(
                e,
                "User is already associated with this company",
                "USER_ALREADY_ASSOCIATED",
            )
        })?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "CompanyMember".into(),
            id: format!("user_id={}, company_id={}", member.user_id, member.company_id),
        })?;

        Ok(row.try_into_member()?)
    }

    async fn find(&self, user_id: Uuid, company_id: Uuid) -> FakturaResult<Option<CompanyMember>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM company_member \
                 WHERE user_id = $user_id AND company_id = $company_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_member()?)),
            None => Ok(None),
        }
    }

    async fn exists(&self, user_id: Uuid, company_id: Uuid) -> FakturaResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM company_member \
                 WHERE user_id = $user_id AND company_id = $company_id \
                 GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn delete(&self, user_id: Uuid, company_id: Uuid) -> FakturaResult<()> {
        self.db
            .query(
                "DELETE FROM company_member \
                 WHERE user_id = $user_id AND company_id = $company_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_company(&self, company_id: Uuid) -> FakturaResult<Vec<CompanyMember>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM company_member \
                 WHERE company_id = $company_id ORDER BY created_at ASC",
            )
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        Ok(collect_members(rows)?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> FakturaResult<Vec<CompanyMember>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM company_member \
                 WHERE user_id = $user_id ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        Ok(collect_members(rows)?)
    }
}
