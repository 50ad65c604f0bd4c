use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::OrderStatus;

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_stock_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Cart price frozen at checkout time.
    pub price_at_order: BigDecimal,
}

impl OrderItemView {
    pub fn total_price(&self) -> BigDecimal {
        &self.price_at_order * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub shipping_address: String,
    pub billing_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub status: OrderStatus,
    pub order_notes: Option<String>,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub billing_address: String,
    pub payment_method: String,
    pub order_notes: Option<String>,
}
