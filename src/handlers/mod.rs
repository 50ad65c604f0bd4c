use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::catalog::StockView;
use crate::domain::party::PersonView;

pub mod customers;
pub mod orders;
pub mod owners;
pub mod sellers;

/// Every success body is `{"success": true, "data": ...}`; failures come out
/// of `AppError` with the same envelope and `success: false`.
pub(crate) fn ok_json<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data }))
}

pub(crate) fn created_json<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(json!({ "success": true, "data": data }))
}

pub(crate) fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

// ── Shared request DTOs ──────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
}

impl From<RegisterRequest> for crate::domain::party::RegisterInput {
    fn from(r: RegisterRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            date_of_birth: r.date_of_birth,
            phone_number: r.phone_number,
            address: r.address,
            email: r.email,
        }
    }
}

#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
}

impl From<UpdateProfileRequest> for crate::domain::party::UpdateProfileInput {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            date_of_birth: r.date_of_birth,
            phone_number: r.phone_number,
            address: r.address,
            email: r.email,
        }
    }
}

// ── Shared response DTOs ─────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonResponse {
    pub id: uuid::Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub created_at: String,
}

impl From<PersonView> for PersonResponse {
    fn from(p: PersonView) -> Self {
        Self {
            id: p.id,
            role: p.role.as_str().to_string(),
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth: p.date_of_birth,
            phone_number: p.phone_number,
            address: p.address,
            email: p.email,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockResponse {
    pub stock_id: uuid::Uuid,
    pub product_id: uuid::Uuid,
    pub seller_id: uuid::Uuid,
    pub name: String,
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub amount: i32,
}

impl From<StockView> for StockResponse {
    fn from(s: StockView) -> Self {
        Self {
            stock_id: s.stock_id,
            product_id: s.product_id,
            seller_id: s.seller_id,
            name: s.name,
            description: s.description,
            price: s.price.to_string(),
            amount: s.amount,
        }
    }
}
