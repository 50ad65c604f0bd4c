use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{CheckoutRequest, OrderView};
use crate::domain::ports::OrderRepository;
use crate::domain::status::OrderStatus;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn checkout(
        &self,
        customer_id: Uuid,
        request: CheckoutRequest,
    ) -> Result<OrderView, DomainError> {
        if request.shipping_address.trim().is_empty() || request.billing_address.trim().is_empty() {
            return Err(DomainError::Validation(
                "Shipping and billing addresses are required".to_string(),
            ));
        }
        if request.payment_method.trim().is_empty() {
            return Err(DomainError::Validation(
                "Payment method is required".to_string(),
            ));
        }
        self.repo.checkout(customer_id, request)
    }

    pub fn get_order(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(order_id)
    }

    pub fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list_for_customer(customer_id)
    }

    pub fn list_all(&self) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list_all()
    }

    /// Overwrites the status unconditionally; a move that does not follow the
    /// fulfilment sequence is allowed but logged so admin overrides stay
    /// visible.
    pub fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        let (previous, order) = self.repo.update_status(order_id, new_status)?;
        if !previous.is_forward_transition(new_status) {
            log::warn!(
                "Order {} status moved {} -> {} outside the fulfilment sequence",
                order_id,
                previous,
                new_status
            );
        }
        Ok(order)
    }
}
