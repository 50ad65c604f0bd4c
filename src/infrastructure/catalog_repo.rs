use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{NewProductInput, StockView};
use crate::domain::errors::DomainError;
use crate::domain::party::Role;
use crate::domain::ports::CatalogRepository;
use crate::schema::{product_stocks, products};

use super::models::{NewProductRow, NewProductStockRow, ProductRow, ProductStockRow};
use super::require_person;

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view((stock, product): (ProductStockRow, ProductRow)) -> StockView {
    StockView {
        stock_id: stock.id,
        product_id: product.id,
        seller_id: stock.seller_id,
        name: product.name,
        description: product.description,
        price: product.price,
        amount: stock.amount,
    }
}

/// Loads a stock row joined with its product, or `NotFound`.
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
        .ok_or(DomainError::NotFound("Product stock"))
}

/// The stock row must belong to the acting seller; a mismatch is a conflict,
/// not a missing entity.
fn check_ownership(stock: &ProductStockRow, seller_id: Uuid) -> Result<(), DomainError> {
    if stock.seller_id != seller_id {
        return Err(DomainError::Conflict(
            "Product does not belong to this seller".to_string(),
        ));
    }
    Ok(())
}

impl CatalogRepository for DieselCatalogRepository {
    fn list_available(&self) -> Result<Vec<StockView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = product_stocks::table
            .inner_join(products::table)
            .filter(product_stocks::amount.gt(0))
            .order(products::name.asc())
            .select((ProductStockRow::as_select(), ProductRow::as_select()))
            .load::<(ProductStockRow, ProductRow)>(&mut conn)?;

        Ok(rows.into_iter().map(to_view).collect())
    }

    fn add_product(
        &self,
        seller_id: Uuid,
        input: NewProductInput,
    ) -> Result<StockView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, seller_id, Role::Seller)?;

            let product = diesel::insert_into(products::table)
                .values(&NewProductRow {
                    id: Uuid::new_v4(),
                    name: input.name,
                    description: input.description,
                    price: input.price,
                })
                .get_result::<ProductRow>(conn)?;

            let stock = diesel::insert_into(product_stocks::table)
                .values(&NewProductStockRow {
                    id: Uuid::new_v4(),
                    product_id: product.id,
                    seller_id,
                    amount: input.initial_stock.unwrap_or(0),
                })
                .get_result::<ProductStockRow>(conn)?;

            Ok(to_view((stock, product)))
        })
    }

    fn list_for_seller(&self, seller_id: Uuid) -> Result<Vec<StockView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, seller_id, Role::Seller)?;

            let rows = product_stocks::table
                .inner_join(products::table)
                .filter(product_stocks::seller_id.eq(seller_id))
                .order(products::name.asc())
                .select((ProductStockRow::as_select(), ProductRow::as_select()))
                .load::<(ProductStockRow, ProductRow)>(conn)?;

            Ok(rows.into_iter().map(to_view).collect())
        })
    }

    fn set_stock(
        &self,
        seller_id: Uuid,
        stock_id: Uuid,
        new_amount: i32,
    ) -> Result<StockView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let (stock, product) = load_stock(conn, stock_id)?;
            check_ownership(&stock, seller_id)?;

            // Overwrites unconditionally; pending carts are not consulted.
            let stock = diesel::update(product_stocks::table.find(stock_id))
                .set((
                    product_stocks::amount.eq(new_amount),
                    product_stocks::updated_at.eq(diesel::dsl::now),
                ))
                .get_result::<ProductStockRow>(conn)?;

            Ok(to_view((stock, product)))
        })
    }

    fn set_price(
        &self,
        seller_id: Uuid,
        stock_id: Uuid,
        new_price: BigDecimal,
    ) -> Result<StockView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let (stock, product) = load_stock(conn, stock_id)?;
            check_ownership(&stock, seller_id)?;

            let product = diesel::update(products::table.find(product.id))
                .set(products::price.eq(new_price))
                .get_result::<ProductRow>(conn)?;

            Ok(to_view((stock, product)))
        })
    }

    fn remove_stock(&self, seller_id: Uuid, stock_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let (stock, product) = load_stock(conn, stock_id)?;
            check_ownership(&stock, seller_id)?;

            // The product row is owned by exactly this stock entry, so it
            // goes too.
            diesel::delete(product_stocks::table.find(stock.id)).execute(conn)?;
            diesel::delete(products::table.find(product.id)).execute(conn)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{product_input, register_person, setup_db};
    use super::*;
    use crate::domain::order::CheckoutRequest;
    use crate::domain::ports::{CartRepository, OrderRepository, PartyRepository};
    use crate::infrastructure::{
        DieselCartRepository, DieselOrderRepository, DieselPartyRepository,
    };

    #[tokio::test]
    async fn add_product_defaults_initial_stock_to_zero() {
        let (_container, pool) = setup_db().await;
        let parties = DieselPartyRepository::new(pool.clone());
        let catalog = DieselCatalogRepository::new(pool);

        let seller = parties
            .register(Role::Seller, register_person("seller@example.com"))
            .expect("register failed");

        let mut input = product_input("apples", "5.00", 10);
        input.initial_stock = None;
        let stock = catalog.add_product(seller.id, input).expect("add failed");

        assert_eq!(stock.amount, 0);
        // Zero-stock products are not available to customers.
        assert!(catalog.list_available().expect("list failed").is_empty());
    }

    #[tokio::test]
    async fn list_available_filters_out_empty_stock() {
        let (_container, pool) = setup_db().await;
        let parties = DieselPartyRepository::new(pool.clone());
        let catalog = DieselCatalogRepository::new(pool);

        let seller = parties
            .register(Role::Seller, register_person("seller@example.com"))
            .expect("register failed");
        catalog
            .add_product(seller.id, product_input("apples", "5.00", 10))
            .expect("add failed");
        catalog
            .add_product(seller.id, product_input("pears", "3.00", 0))
            .expect("add failed");

        let available = catalog.list_available().expect("list failed");
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "apples");
    }

    #[tokio::test]
    async fn set_stock_and_price_enforce_ownership() {
        let (_container, pool) = setup_db().await;
        let parties = DieselPartyRepository::new(pool.clone());
        let catalog = DieselCatalogRepository::new(pool);

        let seller = parties
            .register(Role::Seller, register_person("seller@example.com"))
            .expect("register failed");
        let intruder = parties
            .register(Role::Seller, register_person("other@example.com"))
            .expect("register failed");
        let stock = catalog
            .add_product(seller.id, product_input("apples", "5.00", 10))
            .expect("add failed");

        let err = catalog.set_stock(intruder.id, stock.stock_id, 99).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        let err = catalog
            .set_price(intruder.id, stock.stock_id, "9.99".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let updated = catalog
            .set_stock(seller.id, stock.stock_id, 42)
            .expect("set_stock failed");
        assert_eq!(updated.amount, 42);
    }

    #[tokio::test]
    async fn set_stock_on_missing_entry_is_not_found() {
        let (_container, pool) = setup_db().await;
        let parties = DieselPartyRepository::new(pool.clone());
        let catalog = DieselCatalogRepository::new(pool);

        let seller = parties
            .register(Role::Seller, register_person("seller@example.com"))
            .expect("register failed");

        let err = catalog
            .set_stock(seller.id, Uuid::new_v4(), 5)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Product stock")));
    }

    #[tokio::test]
    async fn remove_stock_deletes_entry() {
        let (_container, pool) = setup_db().await;
        let parties = DieselPartyRepository::new(pool.clone());
        let catalog = DieselCatalogRepository::new(pool);

        let seller = parties
            .register(Role::Seller, register_person("seller@example.com"))
            .expect("register failed");
        let stock = catalog
            .add_product(seller.id, product_input("apples", "5.00", 10))
            .expect("add failed");

        catalog
            .remove_stock(seller.id, stock.stock_id)
            .expect("remove failed");
        assert!(catalog
            .list_for_seller(seller.id)
            .expect("list failed")
            .is_empty());
    }

    #[tokio::test]
    async fn remove_stock_referenced_by_an_order_is_conflict() {
        let (_container, pool) = setup_db().await;
        let parties = DieselPartyRepository::new(pool.clone());
        let carts = DieselCartRepository::new(pool.clone());
        let orders = DieselOrderRepository::new(pool.clone());
        let catalog = DieselCatalogRepository::new(pool);

        let seller = parties
            .register(Role::Seller, register_person("seller@example.com"))
            .expect("register failed");
        let customer = parties
            .register(Role::Customer, register_person("customer@example.com"))
            .expect("register failed");
        let stock = catalog
            .add_product(seller.id, product_input("apples", "5.00", 10))
            .expect("add failed");

        carts
            .add_item(customer.id, stock.stock_id, 2)
            .expect("add to cart failed");
        orders
            .checkout(
                customer.id,
                CheckoutRequest {
                    shipping_address: "1 Main St".to_string(),
                    billing_address: "1 Main St".to_string(),
                    payment_method: "CREDIT_CARD".to_string(),
                    order_notes: None,
                },
            )
            .expect("checkout failed");

        // Order history pins the stock row; the delete must fail cleanly.
        let err = catalog
            .remove_stock(seller.id, stock.stock_id)
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(
            catalog.list_for_seller(seller.id).expect("list failed").len(),
            1
        );

        // Deleting the seller cascades into the same reference and also
        // conflicts instead of erroring out as internal.
        let err = parties.delete(Role::Seller, seller.id).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
