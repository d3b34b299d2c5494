pub mod models;
pub mod lifecycle;
pub mod pricing;
pub mod repository;

pub use lifecycle::LifecycleState;
pub use models::{Order, OrderDraft, OrderId, OrderStatus, Priority};
pub use repository::OrderRepository;

use chrono::{DateTime, Utc};

/// A single failed input check. Callers fix the input and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Client name is required")]
    BlankClientName,
    #[error("Product description is required")]
    BlankProductDescription,
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(i32),
    #[error("Deadline {deadline} is earlier than order date {order_date}")]
    DeadlineBeforeOrderDate {
        order_date: DateTime<Utc>,
        deadline: DateTime<Utc>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend failure: {0}")]
    Backend(String),
    #[error("Order number already exists: {0}")]
    DuplicateOrderNumber(String),
    #[error("Stored order record is unreadable: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

pub type CoreResult<T> = Result<T, CoreError>;
pub type StorageResult<T> = Result<T, StorageError>;
