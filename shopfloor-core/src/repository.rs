use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Order, OrderId, OrderStatus, Priority};
use crate::StorageResult;

/// Persistence collaborator for orders.
///
/// Date ranges are inclusive on both ends and filter on `order_date`.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order and return the id storage assigned. `order.id` is ignored.
    async fn add(&self, order: &Order) -> StorageResult<OrderId>;

    async fn find(&self, id: OrderId) -> StorageResult<Option<Order>>;

    /// Replace the mutable fields of an existing order. `order_number` and
    /// `order_date` are never overwritten. Returns `false` if the id is unknown.
    async fn update(&self, order: &Order) -> StorageResult<bool>;

    async fn delete(&self, id: OrderId) -> StorageResult<bool>;

    /// Every order, newest id first
    async fn list_all(&self) -> StorageResult<Vec<Order>>;

    /// Orders placed within `[start, end]`, newest order date first
    async fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<Order>>;

    async fn query_by_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>>;

    /// Active orders whose deadline is before `now`, earliest deadline first
    async fn query_overdue(&self, now: DateTime<Utc>) -> StorageResult<Vec<Order>>;

    async fn sum_cost_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Decimal>;

    async fn count_by_priority(&self, priority: Priority) -> StorageResult<i64>;
}
