//! Company domain model.
//!
//! A company is identified by a Swedish-style organisation number
//! (`NNNNNN-NNNN`), unique across all companies. The creating user is
//! associated to the company through a [`super::company_member`] record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FakturaResult;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    /// Organisation number, `NNNNNN-NNNN`. Immutable after creation.
    pub org_num: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(input: CreateCompany) -> FakturaResult<Self> {
        validation::validate_org_num(&input.org_num)?;
        validation::validate_company_name(&input.name)?;
        if let Some(email) = input.email.as_deref() {
            validation::validate_email(email)?;
        }
        validation::validate_phone_number(input.phone_number.as_deref())?;
        validation::validate_address("address", input.address.as_deref())?;
        validation::validate_address("city", input.city.as_deref())?;
        validation::validate_address("country", input.country.as_deref())?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            org_num: input.org_num,
            name: input.name,
            email: input.email,
            phone_number: input.phone_number,
            address: input.address,
            city: input.city,
            country: input.country,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Absent fields are left untouched; each
    /// present field is validated before it is written.
    pub fn apply_update(&mut self, patch: UpdateCompany) -> FakturaResult<()> {
        if let Some(name) = patch.name {
            validation::validate_company_name(&name)?;
            self.name = name;
        }
        if let Some(email) = patch.email {
            validation::validate_email(&email)?;
            self.email = Some(email);
        }
        if let Some(phone_number) = patch.phone_number {
            validation::validate_phone_number(Some(&phone_number))?;
            self.phone_number = Some(phone_number);
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
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Fields required to create a new company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub org_num: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Fields that can be updated on an existing company.
/// `None` means "no change". The organisation number cannot be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDto {
    pub id: Uuid,
    pub org_num: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            org_num: company.org_num.clone(),
            name: company.name.clone(),
            email: company.email.clone(),
            phone_number: company.phone_number.clone(),
            address: company.address.clone(),
            city: company.city.clone(),
            country: company.country.clone(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}
