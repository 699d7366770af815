//! Client domain model.
//!
//! A client is a billing counterpart owned by a single company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FakturaResult;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    /// Owning company. Referential existence is checked by the service.
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(input: CreateClient) -> FakturaResult<Self> {
        validation::validate_person_name("first_name", &input.first_name)?;
        validation::validate_person_name("last_name", &input.last_name)?;
        validation::validate_email(&input.email)?;
        validation::validate_address("address", input.address.as_deref())?;
        validation::validate_address("city", input.city.as_deref())?;
        validation::validate_address("country", input.country.as_deref())?;
        validation::validate_phone_number(input.phone_number.as_deref())?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            company_id: input.company_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            address: input.address,
            city: input.city,
            country: input.country,
            phone_number: input.phone_number,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update: each present field is validated then
    /// written; absent fields keep their current value.
    pub fn apply_update(&mut self, patch: UpdateClient) -> FakturaResult<()> {
        if let Some(first_name) = patch.first_name {
            validation::validate_person_name("first_name", &first_name)?;
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            validation::validate_person_name("last_name", &last_name)?;
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            validation::validate_email(&email)?;
            self.email = email;
        }
        if let Some(address) = patch.address {
            validation::validate_address("address", Some(&address))?;
            self.address = Some(address);
        }
        if let Some(city) = patch.city {
            validation::validate_address("city", Some(&city))?;
            self.city = Some(city);
        }
        if let Some(country) = patch.country {
            validation::validate_address("country", Some(&country))?;
            self.country = Some(country);
        }
        if let Some(phone_number) = patch.phone_number {
            validation::validate_phone_number(Some(&phone_number))?;
            self.phone_number = Some(phone_number);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Fields required to create a new client under a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
}

/// Fields that can be updated on an existing client.
/// `None` means "no change", not "clear value".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDto {
    pub id: Uuid,
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Client> for ClientDto {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            company_id: client.company_id,
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            email: client.email.clone(),
            address: client.address.clone(),
            city: client.city.clone(),
            country: client.country.clone(),
            phone_number: client.phone_number.clone(),
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}
