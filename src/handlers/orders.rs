use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{CheckoutRequest as DomainCheckout, OrderView};
use crate::domain::status::OrderStatus;
use crate::errors::AppError;
use crate::AppOrderService;

use super::{created_json, ok_json};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub billing_address: String,
    pub payment_method: String,
    pub order_notes: Option<String>,
}

impl From<CheckoutRequest> for DomainCheckout {
    fn from(r: CheckoutRequest) -> Self {
        Self {
            shipping_address: r.shipping_address,
            billing_address: r.billing_address,
            payment_method: r.payment_method,
            order_notes: r.order_notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusParams {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_stock_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price frozen at checkout, as a decimal string.
    pub price_at_order: String,
    pub total_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_date: String,
    pub total_amount: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub status: OrderStatus,
    pub order_notes: Option<String>,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            customer_id: o.customer_id,
            order_date: o.order_date.to_rfc3339(),
            total_amount: o.total_amount.to_string(),
            shipping_address: o.shipping_address,
            billing_address: o.billing_address,
            payment_method: o.payment_method,
            payment_status: o.payment_status,
            status: o.status,
            order_notes: o.order_notes,
            items: o
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    total_price: i.total_price().to_string(),
                    id: i.id,
                    product_stock_id: i.product_stock_id,
                    product_name: i.product_name,
                    quantity: i.quantity,
                    price_at_order: i.price_at_order.to_string(),
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/customers/{id}/checkout
///
/// Converts the customer's cart into an order. Stock validation, order
/// creation, stock decrement and cart clearing run in one database
/// transaction; payment is simulated and always confirms.
#[utoipa::path(
    post,
    path = "/api/customers/{id}/checkout",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty cart or insufficient stock"),
        (status = 404, description = "Customer or cart not found"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    svc: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let body = body.into_inner();
    let order = web::block(move || svc.checkout(customer_id, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created_json(OrderResponse::from(order)))
}

/// GET /api/customers/{id}/orders
#[utoipa::path(
    get,
    path = "/api/customers/{id}/orders",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses((status = 200, description = "The customer's orders, newest first", body = [OrderResponse])),
    tag = "orders"
)]
pub async fn customer_orders(
    svc: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let orders = web::block(move || svc.list_for_customer(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        orders
            .into_iter()
            .map(OrderResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    svc: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = web::block(move || svc.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(ok_json(OrderResponse::from(order)))
}

/// PUT /api/orders/{id}/status?status=X
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("status" = String, Query, description = "New order status"),
    ),
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    svc: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    query: web::Query<StatusParams>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status: OrderStatus = query.into_inner().status.parse().map_err(AppError::from)?;
    let order = web::block(move || svc.update_status(order_id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(OrderResponse::from(order)))
}

/// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    responses((status = 200, description = "All orders, newest first", body = [OrderResponse])),
    tag = "orders"
)]
pub async fn list_orders(svc: web::Data<AppOrderService>) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || svc.list_all())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_json(
        orders
            .into_iter()
            .map(OrderResponse::from)
            .collect::<Vec<_>>(),
    ))
}
