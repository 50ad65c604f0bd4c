use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::CartView;
use super::catalog::{NewProductInput, StockView};
use super::errors::DomainError;
use super::order::{CheckoutRequest, OrderView};
use super::party::{NewStandInput, PersonView, RegisterInput, Role, StandView, UpdateProfileInput};
use super::status::OrderStatus;

pub trait PartyRepository: Send + Sync + 'static {
    /// Fails with `Conflict` when the email is already registered, whatever
    /// the role of the existing person.
    fn register(&self, role: Role, input: RegisterInput) -> Result<PersonView, DomainError>;
    /// Role-scoped lookup: a person stored under a different role is `None`.
    fn find(&self, role: Role, id: Uuid) -> Result<Option<PersonView>, DomainError>;
    fn list(&self, role: Role) -> Result<Vec<PersonView>, DomainError>;
    fn update_profile(
        &self,
        role: Role,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<PersonView, DomainError>;
    fn delete(&self, role: Role, id: Uuid) -> Result<(), DomainError>;

    fn create_stand(&self, owner_id: Uuid, input: NewStandInput) -> Result<StandView, DomainError>;
    fn list_stands(&self, owner_id: Uuid) -> Result<Vec<StandView>, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    /// Stock entries with amount > 0.
    fn list_available(&self) -> Result<Vec<StockView>, DomainError>;
    fn add_product(&self, seller_id: Uuid, input: NewProductInput)
        -> Result<StockView, DomainError>;
    fn list_for_seller(&self, seller_id: Uuid) -> Result<Vec<StockView>, DomainError>;
    fn set_stock(
        &self,
        seller_id: Uuid,
        stock_id: Uuid,
        new_amount: i32,
    ) -> Result<StockView, DomainError>;
    fn set_price(
        &self,
        seller_id: Uuid,
        stock_id: Uuid,
        new_price: BigDecimal,
    ) -> Result<StockView, DomainError>;
    fn remove_stock(&self, seller_id: Uuid, stock_id: Uuid) -> Result<(), DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    /// Returns the customer's cart, creating and persisting an empty one on
    /// first use.
    fn get_or_create(&self, customer_id: Uuid) -> Result<CartView, DomainError>;
    fn add_item(
        &self,
        customer_id: Uuid,
        product_stock_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError>;
    fn update_quantity(
        &self,
        customer_id: Uuid,
        cart_item_id: Uuid,
        new_quantity: i32,
    ) -> Result<CartView, DomainError>;
    fn remove_item(&self, customer_id: Uuid, cart_item_id: Uuid) -> Result<CartView, DomainError>;
    fn clear(&self, customer_id: Uuid) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Converts the customer's cart into an order in one transaction: stock
    /// validation, order + item rows, stock decrement and cart clearing all
    /// commit or roll back together.
    fn checkout(&self, customer_id: Uuid, request: CheckoutRequest)
        -> Result<OrderView, DomainError>;
    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError>;
    /// Orders for one customer, newest first.
    fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    fn list_all(&self) -> Result<Vec<OrderView>, DomainError>;
    /// Overwrites the status unconditionally, returning the previous status
    /// alongside the updated order.
    fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<(OrderStatus, OrderView), DomainError>;
}
