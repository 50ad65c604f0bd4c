use bigdecimal::BigDecimal;
use uuid::Uuid;

/// One seller's inventory record for a product, joined with the product row.
#[derive(Debug, Clone)]
pub struct StockView {
    pub stock_id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub amount: i32,
}

#[derive(Debug, Clone)]
pub struct NewProductInput {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    /// Absent means the seller starts with nothing on the shelf.
    pub initial_stock: Option<i32>,
}
