use thiserror::Error;

/// Business-rule failures. Every variant is scoped to a single request;
/// nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Insufficient stock for product: {product}")]
    InsufficientStock { product: String },

    #[error("Shopping cart is empty")]
    EmptyCart,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
