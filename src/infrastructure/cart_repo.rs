use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{CartItemView, CartView};
use crate::domain::errors::DomainError;
use crate::domain::party::Role;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, product_stocks, products, shopping_carts};

use super::models::{
    CartItemRow, NewCartItemRow, NewShoppingCartRow, ProductRow, ProductStockRow, ShoppingCartRow,
};
use super::require_person;

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn find_cart(
    conn: &mut PgConnection,
    customer_id: Uuid,
) -> Result<Option<ShoppingCartRow>, DomainError> {
    let cart = shopping_carts::table
        .filter(shopping_carts::customer_id.eq(customer_id))
        .select(ShoppingCartRow::as_select())
        .first(conn)
        .optional()?;
    Ok(cart)
}

/// Returns the customer's cart row, creating one on first use.
fn find_or_create_cart(
    conn: &mut PgConnection,
    customer_id: Uuid,
) -> Result<ShoppingCartRow, DomainError> {
    if let Some(cart) = find_cart(conn, customer_id)? {
        return Ok(cart);
    }
    let cart = diesel::insert_into(shopping_carts::table)
        .values(&NewShoppingCartRow {
            id: Uuid::new_v4(),
            customer_id,
        })
        .get_result::<ShoppingCartRow>(conn)?;
    Ok(cart)
}

/// Items in insertion order, joined with product names for display.
fn build_view(conn: &mut PgConnection, cart: &ShoppingCartRow) -> Result<CartView, DomainError> {
    let rows = cart_items::table
        .inner_join(product_stocks::table.inner_join(products::table))
        .filter(cart_items::cart_id.eq(cart.id))
        .order(cart_items::created_at.asc())
        .select((CartItemRow::as_select(), products::name))
        .load::<(CartItemRow, String)>(conn)?;

    Ok(CartView {
        cart_id: cart.id,
        customer_id: cart.customer_id,
        items: rows
            .into_iter()
            .map(|(item, product_name)| CartItemView {
                id: item.id,
                product_stock_id: item.product_stock_id,
                product_name,
                quantity: item.quantity,
                price_at_add: item.price_at_add,
            })
            .collect(),
    })
}

fn load_stock(
    conn: &mut PgConnection,
    stock_id: Uuid,
) -> Result<(ProductStockRow, ProductRow), DomainError> {
    product_stocks::table
        .inner_join(products::table)
        .filter(product_stocks::id.eq(stock_id))
        .select((ProductStockRow::as_select(), ProductRow::as_select()))
        .first(conn)
        .optional()?
        .ok_or(DomainError::NotFound("Product"))
}

/// Loads a cart item and verifies it sits in this customer's cart.
fn load_owned_item(
    conn: &mut PgConnection,
    customer_id: Uuid,
    cart_item_id: Uuid,
) -> Result<(CartItemRow, ShoppingCartRow), DomainError> {
    let item = cart_items::table
        .filter(cart_items::id.eq(cart_item_id))
        .select(CartItemRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(DomainError::NotFound("Cart item"))?;

    let cart = shopping_carts::table
        .filter(shopping_carts::id.eq(item.cart_id))
        .select(ShoppingCartRow::as_select())
        .first(conn)?;

    if cart.customer_id != customer_id {
        return Err(DomainError::Conflict(
            "Cart item does not belong to this customer".to_string(),
        ));
    }
    Ok((item, cart))
}

impl CartRepository for DieselCartRepository {
    fn get_or_create(&self, customer_id: Uuid) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, customer_id, Role::Customer)?;
            let cart = find_or_create_cart(conn, customer_id)?;
            build_view(conn, &cart)
        })
    }

    fn add_item(
        &self,
        customer_id: Uuid,
        product_stock_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, customer_id, Role::Customer)?;
            let (stock, product) = load_stock(conn, product_stock_id)?;
            let cart = find_or_create_cart(conn, customer_id)?;

            let existing = cart_items::table
                .filter(cart_items::cart_id.eq(cart.id))
                .filter(cart_items::product_stock_id.eq(product_stock_id))
                .select(CartItemRow::as_select())
                .first(conn)
                .optional()?;

            match existing {
                Some(item) => {
                    // Top-up: the whole new total must fit the current stock,
                    // and the price recorded at first add stays.
                    let new_quantity = item.quantity + quantity;
                    if stock.amount < new_quantity {
                        return Err(DomainError::InsufficientStock {
                            product: product.name,
                        });
                    }
                    diesel::update(cart_items::table.find(item.id))
                        .set(cart_items::quantity.eq(new_quantity))
                        .execute(conn)?;
                }
                None => {
                    if stock.amount < quantity {
                        return Err(DomainError::InsufficientStock {
                            product: product.name,
                        });
                    }
                    diesel::insert_into(cart_items::table)
                        .values(&NewCartItemRow {
                            id: Uuid::new_v4(),
                            cart_id: cart.id,
                            product_stock_id,
                            quantity,
                            price_at_add: product.price,
                        })
                        .execute(conn)?;
                }
            }

            build_view(conn, &cart)
        })
    }

    fn update_quantity(
        &self,
        customer_id: Uuid,
        cart_item_id: Uuid,
        new_quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, customer_id, Role::Customer)?;
            let (item, cart) = load_owned_item(conn, customer_id, cart_item_id)?;

            let (stock, product) = load_stock(conn, item.product_stock_id)?;
            if stock.amount < new_quantity {
                return Err(DomainError::InsufficientStock {
                    product: product.name,
                });
            }

            diesel::update(cart_items::table.find(item.id))
                .set(cart_items::quantity.eq(new_quantity))
                .execute(conn)?;

            build_view(conn, &cart)
        })
    }

    fn remove_item(&self, customer_id: Uuid, cart_item_id: Uuid) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, customer_id, Role::Customer)?;
            let (item, cart) = load_owned_item(conn, customer_id, cart_item_id)?;

            diesel::delete(cart_items::table.find(item.id)).execute(conn)?;

            build_view(conn, &cart)
        })
    }

    fn clear(&self, customer_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, customer_id, Role::Customer)?;
            let cart =
                find_cart(conn, customer_id)?.ok_or(DomainError::NotFound("Shopping cart"))?;

            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart.id)))
                .execute(conn)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::super::test_support::{product_input, register_person, setup_db};
    use super::*;
    use crate::domain::ports::{CatalogRepository, PartyRepository};
    use crate::infrastructure::{DieselCatalogRepository, DieselPartyRepository};

    struct Fixture {
        pool: crate::db::DbPool,
        carts: DieselCartRepository,
        catalog: DieselCatalogRepository,
        customer_id: Uuid,
        stock_id: Uuid,
        seller_id: Uuid,
    }

    /// One customer, one seller, one product: amount 10 at price 5.00.
    async fn fixture() -> (
        testcontainers::ContainerAsync<testcontainers::GenericImage>,
        Fixture,
    ) {
        let (container, pool) = setup_db().await;
        let parties = DieselPartyRepository::new(pool.clone());
        let catalog = DieselCatalogRepository::new(pool.clone());

        let customer = parties
            .register(Role::Customer, register_person("customer@example.com"))
            .expect("register customer failed");
        let seller = parties
            .register(Role::Seller, register_person("seller@example.com"))
            .expect("register seller failed");
        let stock = catalog
            .add_product(seller.id, product_input("apples", "5.00", 10))
            .expect("add product failed");

        (
            container,
            Fixture {
                pool: pool.clone(),
                carts: DieselCartRepository::new(pool),
                catalog,
                customer_id: customer.id,
                stock_id: stock.stock_id,
                seller_id: seller.id,
            },
        )
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[tokio::test]
    async fn get_or_create_persists_an_empty_cart() {
        let (_container, fx) = fixture().await;

        let cart = fx.carts.get_or_create(fx.customer_id).expect("get failed");
        assert!(cart.items.is_empty());

        let again = fx.carts.get_or_create(fx.customer_id).expect("get failed");
        assert_eq!(again.cart_id, cart.cart_id);
    }

    #[tokio::test]
    async fn add_item_records_price_at_add() {
        let (_container, fx) = fixture().await;

        let cart = fx
            .carts
            .add_item(fx.customer_id, fx.stock_id, 3)
            .expect("add failed");

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_amount(), dec("15.00"));
    }

    #[tokio::test]
    async fn repeated_adds_merge_and_keep_first_price() {
        let (_container, fx) = fixture().await;

        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 3)
            .expect("first add failed");

        // A price change between adds must not touch the recorded unit price.
        fx.catalog
            .set_price(fx.seller_id, fx.stock_id, dec("9.00"))
            .expect("set_price failed");

        let cart = fx
            .carts
            .add_item(fx.customer_id, fx.stock_id, 4)
            .expect("second add failed");

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 7);
        assert_eq!(cart.items[0].price_at_add, dec("5.00"));
        assert_eq!(cart.total_amount(), dec("35.00"));
    }

    #[tokio::test]
    async fn top_up_validates_the_new_total_against_stock() {
        let (_container, fx) = fixture().await;

        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 8)
            .expect("first add failed");

        let err = fx
            .carts
            .add_item(fx.customer_id, fx.stock_id, 3)
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    #[tokio::test]
    async fn add_beyond_stock_fails_and_leaves_stock_untouched() {
        let (_container, fx) = fixture().await;

        let err = fx
            .carts
            .add_item(fx.customer_id, fx.stock_id, 11)
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));

        let available = fx.catalog.list_available().expect("list failed");
        assert_eq!(available[0].amount, 10);
    }

    #[tokio::test]
    async fn update_quantity_revalidates_stock() {
        let (_container, fx) = fixture().await;

        let cart = fx
            .carts
            .add_item(fx.customer_id, fx.stock_id, 2)
            .expect("add failed");
        let item_id = cart.items[0].id;

        let err = fx
            .carts
            .update_quantity(fx.customer_id, item_id, 11)
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));

        let cart = fx
            .carts
            .update_quantity(fx.customer_id, item_id, 9)
            .expect("update failed");
        assert_eq!(cart.items[0].quantity, 9);
    }

    #[tokio::test]
    async fn remove_item_checks_cart_ownership() {
        let (_container, fx) = fixture().await;
        let parties = DieselPartyRepository::new(fx.pool.clone());

        let cart = fx
            .carts
            .add_item(fx.customer_id, fx.stock_id, 2)
            .expect("add failed");
        let item_id = cart.items[0].id;

        let other = parties
            .register(Role::Customer, register_person("other@example.com"))
            .expect("register failed");

        let err = fx.carts.remove_item(other.id, item_id).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let cart = fx
            .carts
            .remove_item(fx.customer_id, item_id)
            .expect("remove failed");
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn clear_without_a_cart_is_not_found() {
        let (_container, fx) = fixture().await;

        let err = fx.carts.clear(fx.customer_id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Shopping cart")));

        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 2)
            .expect("add failed");
        fx.carts.clear(fx.customer_id).expect("clear failed");

        let cart = fx.carts.get_or_create(fx.customer_id).expect("get failed");
        assert!(cart.items.is_empty());
    }
}
