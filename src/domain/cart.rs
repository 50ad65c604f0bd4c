use bigdecimal::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: Uuid,
    pub product_stock_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price captured when the item was first added; a later price change
    /// in the catalog never reaches this cart.
    pub price_at_add: BigDecimal,
}

impl CartItemView {
    pub fn line_total(&self) -> BigDecimal {
        &self.price_at_add * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub cart_id: Uuid,
    pub customer_id: Uuid,
    pub items: Vec<CartItemView>,
}

impl CartView {
    /// Σ quantity × price_at_add. Recomputed on every read; there is no
    /// stored aggregate to drift from.
    pub fn total_amount(&self) -> BigDecimal {
        self.items
            .iter()
            .map(CartItemView::line_total)
            .sum::<BigDecimal>()
    }

    pub fn total_items(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn item(quantity: i32, price: &str) -> CartItemView {
        CartItemView {
            id: Uuid::new_v4(),
            product_stock_id: Uuid::new_v4(),
            product_name: "apples".to_string(),
            quantity,
            price_at_add: BigDecimal::from_str(price).expect("valid decimal"),
        }
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = CartView {
            cart_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            items: vec![],
        };
        assert_eq!(cart.total_amount(), BigDecimal::from(0));
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn total_is_sum_of_quantity_times_price_at_add() {
        let cart = CartView {
            cart_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            items: vec![item(3, "5.0"), item(2, "1.25")],
        };
        assert_eq!(cart.total_amount(), BigDecimal::from_str("17.5").unwrap());
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn line_total_multiplies_without_rounding() {
        let line = item(7, "5.0");
        assert_eq!(line.line_total(), BigDecimal::from_str("35.0").unwrap());
    }
}
