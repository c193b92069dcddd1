use thiserror::Error;
use uuid::Uuid;

use super::status::TransitionError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Product {0} not found")]
    ProductNotFound(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
