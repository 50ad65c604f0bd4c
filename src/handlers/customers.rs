use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::CartView;
use crate::domain::party::Role;
use crate::errors::AppError;
use crate::{AppCartService, AppCatalogService, AppPartyService};

use super::{
    created_json, no_content, ok_json, PersonResponse, RegisterRequest, StockResponse,
    UpdateProfileRequest,
};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_stock_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityParams {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub product_stock_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price captured at first add, as a decimal string.
    pub price_at_add: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub cart_id: Uuid,
    pub customer_id: Uuid,
    pub items: Vec<CartItemResponse>,
    /// Σ quantity × price_at_add, recomputed per read.
    pub total_amount: String,
    pub total_items: i32,
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        let total_amount = cart.total_amount().to_string();
        let total_items = cart.total_items();
        Self {
            cart_id: cart.cart_id,
            customer_id: cart.customer_id,
            items: cart
                .items
                .into_iter()
                .map(|i| CartItemResponse {
                    line_total: i.line_total().to_string(),
                    id: i.id,
                    product_stock_id: i.product_stock_id,
                    product_name: i.product_name,
                    quantity: i.quantity,
                    price_at_add: i.price_at_add.to_string(),
                })
                .collect(),
            total_amount,
            total_items,
        }
    }
}

// ── Customer CRUD ────────────────────────────────────────────────────────────

/// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    responses((status = 200, description = "All registered customers", body = [PersonResponse])),
    tag = "customers"
)]
pub async fn list_customers(svc: web::Data<AppPartyService>) -> Result<HttpResponse, AppError> {
    let customers = web::block(move || svc.list(Role::Customer))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        customers
            .into_iter()
            .map(PersonResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Customer registered", body = PersonResponse),
        (status = 409, description = "Email already exists"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    svc: web::Data<AppPartyService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let customer = web::block(move || svc.register(Role::Customer, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created_json(PersonResponse::from(customer)))
}

/// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Customer found", body = PersonResponse),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let customer = web::block(move || svc.get(Role::Customer, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

    Ok(ok_json(PersonResponse::from(customer)))
}

/// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Customer updated", body = PersonResponse),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let customer = web::block(move || svc.update_profile(Role::Customer, id, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(PersonResponse::from(customer)))
}

/// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    svc: web::Data<AppPartyService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || svc.delete(Role::Customer, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(no_content())
}

// ── Shopping ─────────────────────────────────────────────────────────────────

/// GET /api/customers/products
#[utoipa::path(
    get,
    path = "/api/customers/products",
    responses((status = 200, description = "Stock entries with amount > 0", body = [StockResponse])),
    tag = "customers"
)]
pub async fn available_products(
    svc: web::Data<AppCatalogService>,
) -> Result<HttpResponse, AppError> {
    let stocks = web::block(move || svc.list_available())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        stocks
            .into_iter()
            .map(StockResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/customers/{id}/cart
#[utoipa::path(
    get,
    path = "/api/customers/{id}/cart",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "The customer's cart, created empty on first read", body = CartResponse),
        (status = 404, description = "Customer not found"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    svc: web::Data<AppCartService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let cart = web::block(move || svc.get_cart(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(CartResponse::from(cart)))
}

/// POST /api/customers/{id}/cart
#[utoipa::path(
    post,
    path = "/api/customers/{id}/cart",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Insufficient stock or invalid quantity"),
        (status = 404, description = "Customer or product not found"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    svc: web::Data<AppCartService>,
    path: web::Path<Uuid>,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let body = body.into_inner();
    let cart =
        web::block(move || svc.add_item(customer_id, body.product_stock_id, body.quantity))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(CartResponse::from(cart)))
}

/// DELETE /api/customers/{id}/cart
#[utoipa::path(
    delete,
    path = "/api/customers/{id}/cart",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 204, description = "Cart emptied"),
        (status = 404, description = "Customer has no cart"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    svc: web::Data<AppCartService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    web::block(move || svc.clear(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(no_content())
}

/// DELETE /api/customers/{id}/cart/items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}/cart/items/{item_id}",
    params(
        ("id" = Uuid, Path, description = "Customer UUID"),
        ("item_id" = Uuid, Path, description = "Cart item UUID"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Customer or cart item not found"),
        (status = 409, description = "Cart item belongs to another customer"),
    ),
    tag = "cart"
)]
pub async fn remove_cart_item(
    svc: web::Data<AppCartService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (customer_id, item_id) = path.into_inner();
    let cart = web::block(move || svc.remove_item(customer_id, item_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(CartResponse::from(cart)))
}

/// PUT /api/customers/{id}/cart/items/{item_id}?quantity=N
///
/// A quantity of zero or less removes the item.
#[utoipa::path(
    put,
    path = "/api/customers/{id}/cart/items/{item_id}",
    params(
        ("id" = Uuid, Path, description = "Customer UUID"),
        ("item_id" = Uuid, Path, description = "Cart item UUID"),
        ("quantity" = i32, Query, description = "New quantity; <= 0 removes the item"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Insufficient stock"),
        (status = 404, description = "Customer or cart item not found"),
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    svc: web::Data<AppCartService>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<UpdateQuantityParams>,
) -> Result<HttpResponse, AppError> {
    let (customer_id, item_id) = path.into_inner();
    let quantity = query.into_inner().quantity;
    let cart = web::block(move || svc.update_quantity(customer_id, item_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(CartResponse::from(cart)))
}
