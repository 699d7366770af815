//! SurrealDB implementation of [`ClientRepository`].

use chrono::{DateTime, Utc};
use faktura_core::error::FakturaResult;
use faktura_core::models::client::Client;
use faktura_core::repository::{ClientRepository, PaginatedResult, Pagination};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, Deserialize)]
struct ClientRow {
    company_id: String,
    first_name: String,
    last_name: String,
    email: String,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ClientRowWithId {
    record_id: String,
    company_id: String,
    first_name: String,
    last_name: String,
    email: String,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

impl ClientRow {
    fn try_into_client(self, id: Uuid) -> Result<Client, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Decode(format!("invalid client company UUID: {e}")))?;
        Ok(Client {
            id,
            company_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            address: self.address,
            city: self.city,
            country: self.country,
            phone_number: self.phone_number,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ClientRowWithId {
    fn try_into_client(self) -> Result<Client, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid client UUID: {e}")))?;
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Decode(format!("invalid client company UUID: {e}")))?;
        Ok(Client {
            id,
            company_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            address: self.address,
            city: self.city,
            country: self.country,
            phone_number: self.phone_number,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Client repository.
#[derive(Clone)]
pub struct SurrealClientRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealClientRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ClientRepository for SurrealClientRepository<C> {
    async fn create(&self, client: &Client) -> FakturaResult<Client> {
        let id_str = client.id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::thing('client', $id) SET \
                 company_id = $company_id, \
                 first_name = $first_name, last_name = $last_name, \
                 email = $email, address = $address, city = $city, \
                 country = $country, phone_number = $phone_number, \
                 created_at = $created_at, updated_at = $updated_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", client.company_id.to_string()))
            .bind(("first_name", client.first_name.clone()))
            .bind(("last_name", client.last_name.clone()))
            .bind(("email", client.email.clone()))
            .bind(("address", client.address.clone()))
            .bind(("city", client.city.clone()))
            .bind(("country", client.country.clone()))
            .bind(("phone_number", client.phone_number.clone()))
            .bind(("created_at", client.created_at))
            .bind(("updated_at", client.updated_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Client".into(),
            id: id_str,
        })?;

        Ok(row.try_into_client(client.id)?)
    }

    async fn find_by_id(&self, id: Uuid) -> FakturaResult<Option<Client>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::thing('client', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_client(id)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, client: &Client) -> FakturaResult<Client> {
        let id_str = client.id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::thing('client', $id) SET \
                 first_name = $first_name, last_name = $last_name, \
                 email = $email, address = $address, city = $city, \
                 country = $country, phone_number = $phone_number, \
                 updated_at = $updated_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("first_name", client.first_name.clone()))
            .bind(("last_name", client.last_name.clone()))
            .bind(("email", client.email.clone()))
            .bind(("address", client.address.clone()))
            .bind(("city", client.city.clone()))
            .bind(("country", client.country.clone()))
            .bind(("phone_number", client.phone_number.clone()))
            .bind(("updated_at", client.updated_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Client".into(),
            id: id_str,
        })?;

        Ok(row.try_into_client(client.id)?)
    }

    async fn delete(&self, id: Uuid) -> FakturaResult<()> {
        self.db
            .query("DELETE type::thing('client', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
        pagination: Pagination,
    ) -> FakturaResult<PaginatedResult<Client>> {
        let company_id_str = company_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM client \
                 WHERE company_id = $company_id GROUP ALL",
            )
            .bind(("company_id", company_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM client \
                 WHERE company_id = $company_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("company_id", company_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClientRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_client())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
