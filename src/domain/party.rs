use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// Every party is a person; the role decides which API surface sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Seller,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Seller => "SELLER",
            Role::Owner => "OWNER",
        }
    }

    /// Entity name used in NotFound errors, e.g. "Customer not found".
    pub fn entity_name(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Seller => "Seller",
            Role::Owner => "Owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Role::Customer),
            "SELLER" => Ok(Role::Seller),
            "OWNER" => Ok(Role::Owner),
            other => Err(DomainError::Internal(format!("Unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PersonView {
    pub id: Uuid,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct UpdateProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct StandView {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub price: BigDecimal,
    pub size: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewStandInput {
    pub price: BigDecimal,
    pub size: BigDecimal,
    pub seller_id: Option<Uuid>,
}
