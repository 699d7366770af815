//! Company membership association.
//!
//! A pure association record with a composite identity: one row per
//! (user, company) pair. It is created when a user is added to a company
//! and deleted when the user is removed, independently of either side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMember {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CompanyMember {
    pub fn new(user_id: Uuid, company_id: Uuid) -> Self {
        Self {
            user_id,
            company_id,
            created_at: Utc::now(),
        }
    }
}
