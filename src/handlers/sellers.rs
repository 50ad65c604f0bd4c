use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::NewProductInput;
use crate::domain::party::Role;
use crate::errors::AppError;
use crate::{AppCatalogService, AppPartyService};

use super::{
    created_json, no_content, ok_json, PersonResponse, RegisterRequest, StockResponse,
    UpdateProfileRequest,
};

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub initial_stock: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAmountParams {
    pub amount: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PriceParams {
    /// Decimal price as a string, e.g. "9.99"
    pub price: String,
}

fn parse_price(raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw)
        .map_err(|e| AppError::Validation(format!("Invalid price '{raw}': {e}")))
}

// ── Seller CRUD ──────────────────────────────────────────────────────────────

/// GET /api/sellers
#[utoipa::path(
    get,
    path = "/api/sellers",
    responses((status = 200, description = "All registered sellers", body = [PersonResponse])),
    tag = "sellers"
)]
pub async fn list_sellers(svc: web::Data<AppPartyService>) -> Result<HttpResponse, AppError> {
    let sellers = web::block(move || svc.list(Role::Seller))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        sellers
            .into_iter()
            .map(PersonResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/sellers
#[utoipa::path(
    post,
    path = "/api/sellers",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Seller registered", body = PersonResponse),
        (status = 409, description = "Email already exists"),
    ),
    tag = "sellers"
)]
pub async fn create_seller(
    svc: web::Data<AppPartyService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let seller = web::block(move || svc.register(Role::Seller, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created_json(PersonResponse::from(seller)))
}

/// GET /api/sellers/{id}
#[utoipa::path(
    get,
    path = "/api/sellers/{id}",
    params(("id" = Uuid, Path, description = "Seller UUID")),
    responses(
        (status = 200, description = "Seller found", body = PersonResponse),
        (status = 404, description = "Seller not found"),
    ),
    tag = "sellers"
)]
pub async fn get_seller(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let seller = web::block(move || svc.get(Role::Seller, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or_else(|| AppError::NotFound("Seller not found".to_string()))?;

    Ok(ok_json(PersonResponse::from(seller)))
}

/// PUT /api/sellers/{id}
#[utoipa::path(
    put,
    path = "/api/sellers/{id}",
    params(("id" = Uuid, Path, description = "Seller UUID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Seller updated", body = PersonResponse),
        (status = 404, description = "Seller not found"),
    ),
    tag = "sellers"
)]
pub async fn update_seller(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let seller = web::block(move || svc.update_profile(Role::Seller, id, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(PersonResponse::from(seller)))
}

/// DELETE /api/sellers/{id}
#[utoipa::path(
    delete,
    path = "/api/sellers/{id}",
    params(("id" = Uuid, Path, description = "Seller UUID")),
    responses(
        (status = 204, description = "Seller deleted"),
        (status = 404, description = "Seller not found"),
        (status = 409, description = "Seller has sold items referenced by orders"),
    ),
    tag = "sellers"
)]
pub async fn delete_seller(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || svc.delete(Role::Seller, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(no_content())
}

// ── Product management ───────────────────────────────────────────────────────

/// POST /api/sellers/{id}/products
#[utoipa::path(
    post,
    path = "/api/sellers/{id}/products",
    params(("id" = Uuid, Path, description = "Seller UUID")),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product and stock entry created", body = StockResponse),
        (status = 404, description = "Seller not found"),
    ),
    tag = "sellers"
)]
pub async fn add_product(
    svc: web::Data<AppCatalogService>,
    path: web::Path<Uuid>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let seller_id = path.into_inner();
    let body = body.into_inner();
    let price = parse_price(&body.price)?;
    let input = NewProductInput {
        name: body.name,
        description: body.description,
        price,
        initial_stock: body.initial_stock,
    };

    let stock = web::block(move || svc.add_product(seller_id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created_json(StockResponse::from(stock)))
}

/// GET /api/sellers/{id}/products
#[utoipa::path(
    get,
    path = "/api/sellers/{id}/products",
    params(("id" = Uuid, Path, description = "Seller UUID")),
    responses(
        (status = 200, description = "The seller's stock entries", body = [StockResponse]),
        (status = 404, description = "Seller not found"),
    ),
    tag = "sellers"
)]
pub async fn seller_products(
    svc: web::Data<AppCatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let seller_id = path.into_inner();
    let stocks = web::block(move || svc.list_for_seller(seller_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        stocks
            .into_iter()
            .map(StockResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// PUT /api/sellers/{id}/products/{stock_id}/stock?amount=N
#[utoipa::path(
    put,
    path = "/api/sellers/{id}/products/{stock_id}/stock",
    params(
        ("id" = Uuid, Path, description = "Seller UUID"),
        ("stock_id" = Uuid, Path, description = "Product stock UUID"),
        ("amount" = i32, Query, description = "New stock amount"),
    ),
    responses(
        (status = 200, description = "Stock updated", body = StockResponse),
        (status = 404, description = "Product stock not found"),
        (status = 409, description = "Stock belongs to another seller"),
    ),
    tag = "sellers"
)]
pub async fn update_stock(
    svc: web::Data<AppCatalogService>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<StockAmountParams>,
) -> Result<HttpResponse, AppError> {
    let (seller_id, stock_id) = path.into_inner();
    let amount = query.into_inner().amount;
    let stock = web::block(move || svc.set_stock(seller_id, stock_id, amount))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(StockResponse::from(stock)))
}

/// PUT /api/sellers/{id}/products/{stock_id}/price?price=P
#[utoipa::path(
    put,
    path = "/api/sellers/{id}/products/{stock_id}/price",
    params(
        ("id" = Uuid, Path, description = "Seller UUID"),
        ("stock_id" = Uuid, Path, description = "Product stock UUID"),
        ("price" = String, Query, description = "New unit price as a decimal string"),
    ),
    responses(
        (status = 200, description = "Price updated", body = StockResponse),
        (status = 404, description = "Product stock not found"),
        (status = 409, description = "Stock belongs to another seller"),
    ),
    tag = "sellers"
)]
pub async fn update_price(
    svc: web::Data<AppCatalogService>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<PriceParams>,
) -> Result<HttpResponse, AppError> {
    let (seller_id, stock_id) = path.into_inner();
    let price = parse_price(&query.into_inner().price)?;
    let stock = web::block(move || svc.set_price(seller_id, stock_id, price))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(StockResponse::from(stock)))
}

/// DELETE /api/sellers/{id}/products/{stock_id}
#[utoipa::path(
    delete,
    path = "/api/sellers/{id}/products/{stock_id}",
    params(
        ("id" = Uuid, Path, description = "Seller UUID"),
        ("stock_id" = Uuid, Path, description = "Product stock UUID"),
    ),
    responses(
        (status = 204, description = "Stock entry removed"),
        (status = 404, description = "Product stock not found"),
        (status = 409, description = "Stock belongs to another seller or is referenced by orders"),
    ),
    tag = "sellers"
)]
pub async fn remove_product(
    svc: web::Data<AppCatalogService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (seller_id, stock_id) = path.into_inner();
    web::block(move || svc.remove_stock(seller_id, stock_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(no_content())
}
