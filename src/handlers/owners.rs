use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::party::{NewStandInput, Role, StandView};
use crate::errors::AppError;
use crate::AppPartyService;

use super::{created_json, no_content, ok_json, PersonResponse, RegisterRequest, UpdateProfileRequest};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStandRequest {
    /// Monthly lease price as a decimal string.
    pub price: String,
    /// Floor area in square meters.
    pub size: String,
    pub seller_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StandResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub price: String,
    pub size: String,
}

impl From<StandView> for StandResponse {
    fn from(s: StandView) -> Self {
        Self {
            id: s.id,
            owner_id: s.owner_id,
            seller_id: s.seller_id,
            price: s.price.to_string(),
            size: s.size.to_string(),
        }
    }
}

fn parse_decimal(raw: &str, field: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw)
        .map_err(|e| AppError::Validation(format!("Invalid {field} '{raw}': {e}")))
}

// ── Owner CRUD ───────────────────────────────────────────────────────────────

/// GET /api/owners
#[utoipa::path(
    get,
    path = "/api/owners",
    responses((status = 200, description = "All registered owners", body = [PersonResponse])),
    tag = "owners"
)]
pub async fn list_owners(svc: web::Data<AppPartyService>) -> Result<HttpResponse, AppError> {
    let owners = web::block(move || svc.list(Role::Owner))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        owners
            .into_iter()
            .map(PersonResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/owners
#[utoipa::path(
    post,
    path = "/api/owners",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Owner registered", body = PersonResponse),
        (status = 409, description = "Email already exists"),
    ),
    tag = "owners"
)]
pub async fn create_owner(
    svc: web::Data<AppPartyService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let owner = web::block(move || svc.register(Role::Owner, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created_json(PersonResponse::from(owner)))
}

/// GET /api/owners/{id}
#[utoipa::path(
    get,
    path = "/api/owners/{id}",
    params(("id" = Uuid, Path, description = "Owner UUID")),
    responses(
        (status = 200, description = "Owner found", body = PersonResponse),
        (status = 404, description = "Owner not found"),
    ),
    tag = "owners"
)]
pub async fn get_owner(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let owner = web::block(move || svc.get(Role::Owner, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or_else(|| AppError::NotFound("Owner not found".to_string()))?;

    Ok(ok_json(PersonResponse::from(owner)))
}

/// PUT /api/owners/{id}
#[utoipa::path(
    put,
    path = "/api/owners/{id}",
    params(("id" = Uuid, Path, description = "Owner UUID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Owner updated", body = PersonResponse),
        (status = 404, description = "Owner not found"),
    ),
    tag = "owners"
)]
pub async fn update_owner(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let owner = web::block(move || svc.update_profile(Role::Owner, id, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(PersonResponse::from(owner)))
}

/// DELETE /api/owners/{id}
#[utoipa::path(
    delete,
    path = "/api/owners/{id}",
    params(("id" = Uuid, Path, description = "Owner UUID")),
    responses(
        (status = 204, description = "Owner deleted"),
        (status = 404, description = "Owner not found"),
    ),
    tag = "owners"
)]
pub async fn delete_owner(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || svc.delete(Role::Owner, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(no_content())
}

// ── Stands ───────────────────────────────────────────────────────────────────

/// POST /api/owners/{id}/stands
#[utoipa::path(
    post,
    path = "/api/owners/{id}/stands",
    params(("id" = Uuid, Path, description = "Owner UUID")),
    request_body = CreateStandRequest,
    responses(
        (status = 201, description = "Stand created", body = StandResponse),
        (status = 404, description = "Owner or seller not found"),
    ),
    tag = "owners"
)]
pub async fn create_stand(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
    body: web::Json<CreateStandRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = path.into_inner();
    let body = body.into_inner();
    let input = NewStandInput {
        price: parse_decimal(&body.price, "price")?,
        size: parse_decimal(&body.size, "size")?,
        seller_id: body.seller_id,
    };

    let stand = web::block(move || svc.create_stand(owner_id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created_json(StandResponse::from(stand)))
}

/// GET /api/owners/{id}/stands
#[utoipa::path(
    get,
    path = "/api/owners/{id}/stands",
    params(("id" = Uuid, Path, description = "Owner UUID")),
    responses(
        (status = 200, description = "The owner's stands", body = [StandResponse]),
        (status = 404, description = "Owner not found"),
    ),
    tag = "owners"
)]
pub async fn list_stands(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let owner_id = path.into_inner();
    let stands = web::block(move || svc.list_stands(owner_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        stands
            .into_iter()
            .map(StandResponse::from)
            .collect::<Vec<_>>(),
    ))
}
