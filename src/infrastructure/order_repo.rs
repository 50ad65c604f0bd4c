use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{CheckoutRequest, OrderItemView, OrderView};
use crate::domain::party::Role;
use crate::domain::ports::OrderRepository;
use crate::domain::status::OrderStatus;
use crate::schema::{cart_items, order_items, orders, product_stocks, products, shopping_carts};

use super::models::{
    CartItemRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, ProductStockRow,
    ShoppingCartRow,
};
use super::require_person;

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, DomainError> {
    raw.parse::<OrderStatus>()
        .map_err(|_| DomainError::Internal(format!("Corrupt order status '{raw}' in store")))
}

fn build_view(conn: &mut PgConnection, order: OrderRow) -> Result<OrderView, DomainError> {
    let rows = order_items::table
        .inner_join(product_stocks::table.inner_join(products::table))
        .filter(order_items::order_id.eq(order.id))
        .order(order_items::created_at.asc())
        .select((OrderItemRow::as_select(), products::name))
        .load::<(OrderItemRow, String)>(conn)?;

    let status = parse_status(&order.status)?;
    Ok(OrderView {
        id: order.id,
        customer_id: order.customer_id,
        order_date: order.order_date,
        total_amount: order.total_amount,
        shipping_address: order.shipping_address,
        billing_address: order.billing_address,
        payment_method: order.payment_method,
        payment_status: order.payment_status,
        status,
        order_notes: order.order_notes,
        items: rows
            .into_iter()
            .map(|(item, product_name)| OrderItemView {
                id: item.id,
                product_stock_id: item.product_stock_id,
                product_name,
                quantity: item.quantity,
                price_at_order: item.price_at_order,
            })
            .collect(),
    })
}

impl OrderRepository for DieselOrderRepository {
    fn checkout(
        &self,
        customer_id: Uuid,
        request: CheckoutRequest,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, customer_id, Role::Customer)?;

            let cart: ShoppingCartRow = shopping_carts::table
                .filter(shopping_carts::customer_id.eq(customer_id))
                .select(ShoppingCartRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Shopping cart"))?;

            let items = cart_items::table
                .inner_join(product_stocks::table.inner_join(products::table))
                .filter(cart_items::cart_id.eq(cart.id))
                .order(cart_items::created_at.asc())
                .select((
                    CartItemRow::as_select(),
                    ProductStockRow::as_select(),
                    products::name,
                ))
                .load::<(CartItemRow, ProductStockRow, String)>(conn)?;

            if items.is_empty() {
                return Err(DomainError::EmptyCart);
            }

            // Pre-flight stock check so the common failure surfaces before any
            // write; the conditional decrement below remains the authority
            // under concurrency.
            for (item, stock, name) in &items {
                if stock.amount < item.quantity {
                    return Err(DomainError::InsufficientStock {
                        product: name.clone(),
                    });
                }
            }

            let total_amount: BigDecimal = items
                .iter()
                .map(|(item, _, _)| &item.price_at_add * BigDecimal::from(item.quantity))
                .sum();

            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    customer_id,
                    order_date: Utc::now(),
                    total_amount,
                    shipping_address: request.shipping_address,
                    billing_address: request.billing_address,
                    payment_method: request.payment_method,
                    payment_status: "PENDING".to_string(),
                    status: OrderStatus::Pending.as_str().to_string(),
                    order_notes: request.order_notes,
                })
                .execute(conn)?;

            // Cart pricing becomes immutable order pricing here.
            let new_items: Vec<NewOrderItemRow> = items
                .iter()
                .map(|(item, _, _)| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id,
                    product_stock_id: item.product_stock_id,
                    quantity: item.quantity,
                    price_at_order: item.price_at_add.clone(),
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            // Conditional decrement: a concurrent checkout that got here first
            // makes the predicate fail, which rolls the whole order back.
            for (item, stock, name) in &items {
                let updated = diesel::update(
                    product_stocks::table
                        .filter(product_stocks::id.eq(stock.id))
                        .filter(product_stocks::amount.ge(item.quantity)),
                )
                .set((
                    product_stocks::amount.eq(product_stocks::amount - item.quantity),
                    product_stocks::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

                if updated == 0 {
                    return Err(DomainError::InsufficientStock {
                        product: name.clone(),
                    });
                }
            }

            // The cart row survives, empty.
            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart.id)))
                .execute(conn)?;

            // Simulated payment: there is no gateway, every order confirms.
            let order = diesel::update(orders::table.find(order_id))
                .set((
                    orders::payment_status.eq("CONFIRMED"),
                    orders::status.eq(OrderStatus::Confirmed.as_str()),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .get_result::<OrderRow>(conn)?;

            build_view(conn, order)
        })
    }

    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(order_id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        order.map(|o| build_view(&mut conn, o)).transpose()
    }

    fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::customer_id.eq(customer_id))
            .order(orders::order_date.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|o| build_view(&mut conn, o))
            .collect()
    }

    fn list_all(&self) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .order(orders::order_date.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|o| build_view(&mut conn, o))
            .collect()
    }

    fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<(OrderStatus, OrderView), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let existing = orders::table
                .find(order_id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Order"))?;
            let previous = parse_status(&existing.status)?;

            let order = diesel::update(orders::table.find(order_id))
                .set((
                    orders::status.eq(new_status.as_str()),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .get_result::<OrderRow>(conn)?;

            Ok((previous, build_view(conn, order)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::super::test_support::{product_input, register_person, setup_db};
    use super::*;
    use crate::domain::ports::{CartRepository, CatalogRepository, PartyRepository};
    use crate::infrastructure::{
        DieselCartRepository, DieselCatalogRepository, DieselPartyRepository,
    };

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn checkout_request() -> CheckoutRequest {
        CheckoutRequest {
            shipping_address: "1 Main St".to_string(),
            billing_address: "1 Main St".to_string(),
            payment_method: "CREDIT_CARD".to_string(),
            order_notes: None,
        }
    }

    struct Fixture {
        pool: crate::db::DbPool,
        orders: DieselOrderRepository,
        carts: DieselCartRepository,
        catalog: DieselCatalogRepository,
        customer_id: Uuid,
        seller_id: Uuid,
        stock_id: Uuid,
    }

    /// Customer with empty cart; one product, amount 10, price 5.00.
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
                orders: DieselOrderRepository::new(pool.clone()),
                carts: DieselCartRepository::new(pool),
                catalog,
                customer_id: customer.id,
                seller_id: seller.id,
                stock_id: stock.stock_id,
            },
        )
    }

    fn stock_amount(fx: &Fixture) -> i32 {
        let stocks = fx
            .catalog
            .list_for_seller(fx.seller_id)
            .expect("list failed");
        stocks[0].amount
    }

    #[tokio::test]
    async fn checkout_snapshots_cart_and_decrements_stock() {
        let (_container, fx) = fixture().await;

        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 3)
            .expect("add failed");
        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 4)
            .expect("add failed");

        let order = fx
            .orders
            .checkout(fx.customer_id, checkout_request())
            .expect("checkout failed");

        assert_eq!(order.total_amount, dec("35.00"));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, "CONFIRMED");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 7);
        assert_eq!(order.items[0].price_at_order, dec("5.00"));
        assert_eq!(order.items[0].total_price(), dec("35.00"));

        assert_eq!(stock_amount(&fx), 3);
        let cart = fx.carts.get_or_create(fx.customer_id).expect("get failed");
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn checkout_without_a_cart_is_not_found() {
        let (_container, fx) = fixture().await;

        let err = fx
            .orders
            .checkout(fx.customer_id, checkout_request())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Shopping cart")));
    }

    #[tokio::test]
    async fn checkout_on_empty_cart_fails_without_writes() {
        let (_container, fx) = fixture().await;

        fx.carts.get_or_create(fx.customer_id).expect("get failed");
        let err = fx
            .orders
            .checkout(fx.customer_id, checkout_request())
            .unwrap_err();
        assert!(matches!(err, DomainError::EmptyCart));

        assert!(fx
            .orders
            .list_for_customer(fx.customer_id)
            .expect("list failed")
            .is_empty());
        assert_eq!(stock_amount(&fx), 10);
    }

    #[tokio::test]
    async fn stale_cart_fails_checkout_atomically() {
        let (_container, fx) = fixture().await;

        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 8)
            .expect("add failed");
        // Seller shrinks the shelf after the item went into the cart.
        fx.catalog
            .set_stock(fx.seller_id, fx.stock_id, 5)
            .expect("set_stock failed");

        let err = fx
            .orders
            .checkout(fx.customer_id, checkout_request())
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));

        // No order, no decrement, cart intact.
        assert!(fx
            .orders
            .list_for_customer(fx.customer_id)
            .expect("list failed")
            .is_empty());
        assert_eq!(stock_amount(&fx), 5);
        let cart = fx.carts.get_or_create(fx.customer_id).expect("get failed");
        assert_eq!(cart.total_items(), 8);
    }

    #[tokio::test]
    async fn concurrent_checkouts_cannot_overdraw_stock() {
        let (_container, fx) = fixture().await;
        let parties = DieselPartyRepository::new(fx.pool.clone());

        let other = parties
            .register(Role::Customer, register_person("other@example.com"))
            .expect("register failed");

        // Both carts pass the add-time stock check (7 ≤ 10), but 14 > 10.
        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 7)
            .expect("add failed");
        fx.carts
            .add_item(other.id, fx.stock_id, 7)
            .expect("add failed");

        let repo_a = DieselOrderRepository::new(fx.pool.clone());
        let repo_b = DieselOrderRepository::new(fx.pool.clone());
        let customer_a = fx.customer_id;
        let customer_b = other.id;

        let task_a =
            tokio::task::spawn_blocking(move || repo_a.checkout(customer_a, checkout_request()));
        let task_b =
            tokio::task::spawn_blocking(move || repo_b.checkout(customer_b, checkout_request()));

        let results = [
            task_a.await.expect("task a panicked"),
            task_b.await.expect("task b panicked"),
        ];

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one checkout may win the last stock");
        assert!(results.iter().any(|r| matches!(
            r,
            Err(DomainError::InsufficientStock { .. })
        )));
        assert_eq!(stock_amount(&fx), 3);
    }

    #[tokio::test]
    async fn orders_list_newest_first() {
        let (_container, fx) = fixture().await;

        for _ in 0..3 {
            fx.carts
                .add_item(fx.customer_id, fx.stock_id, 1)
                .expect("add failed");
            fx.orders
                .checkout(fx.customer_id, checkout_request())
                .expect("checkout failed");
        }

        let orders = fx
            .orders
            .list_for_customer(fx.customer_id)
            .expect("list failed");
        assert_eq!(orders.len(), 3);
        assert!(orders[0].order_date >= orders[1].order_date);
        assert!(orders[1].order_date >= orders[2].order_date);
    }

    #[tokio::test]
    async fn update_status_returns_previous_status() {
        let (_container, fx) = fixture().await;

        fx.carts
            .add_item(fx.customer_id, fx.stock_id, 1)
            .expect("add failed");
        let order = fx
            .orders
            .checkout(fx.customer_id, checkout_request())
            .expect("checkout failed");

        let (previous, updated) = fx
            .orders
            .update_status(order.id, OrderStatus::Shipped)
            .expect("update failed");
        assert_eq!(previous, OrderStatus::Confirmed);
        assert_eq!(updated.status, OrderStatus::Shipped);

        let err = fx
            .orders
            .update_status(Uuid::new_v4(), OrderStatus::Shipped)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Order")));
    }
}
