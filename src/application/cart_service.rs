use uuid::Uuid;

use crate::domain::cart::CartView;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

pub struct CartService<R> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_cart(&self, customer_id: Uuid) -> Result<CartView, DomainError> {
        self.repo.get_or_create(customer_id)
    }

    pub fn add_item(
        &self,
        customer_id: Uuid,
        product_stock_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::Validation(
                "Quantity must be positive".to_string(),
            ));
        }
        self.repo.add_item(customer_id, product_stock_id, quantity)
    }

    /// A non-positive quantity removes the item instead of storing zero.
    pub fn update_quantity(
        &self,
        customer_id: Uuid,
        cart_item_id: Uuid,
        new_quantity: i32,
    ) -> Result<CartView, DomainError> {
        if new_quantity <= 0 {
            return self.repo.remove_item(customer_id, cart_item_id);
        }
        self.repo
            .update_quantity(customer_id, cart_item_id, new_quantity)
    }

    pub fn remove_item(
        &self,
        customer_id: Uuid,
        cart_item_id: Uuid,
    ) -> Result<CartView, DomainError> {
        self.repo.remove_item(customer_id, cart_item_id)
    }

    pub fn clear(&self, customer_id: Uuid) -> Result<(), DomainError> {
        self.repo.clear(customer_id)
    }
}
