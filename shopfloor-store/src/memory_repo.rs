use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopfloor_core::{Order, OrderId, OrderRepository, OrderStatus, Priority, StorageError, StorageResult};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    orders: BTreeMap<OrderId, Order>,
    last_id: OrderId,
}

/// Process-local order store. Ids are never reused, even after deletes.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    inner: RwLock<Inner>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn in_range(order: &Order, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    order.order_date >= start && order.order_date <= end
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add(&self, order: &Order) -> StorageResult<OrderId> {
        let mut inner = self.inner.write().await;

        if inner.orders.values().any(|o| o.order_number == order.order_number) {
            return Err(StorageError::DuplicateOrderNumber(order.order_number.clone()));
        }

        inner.last_id += 1;
        let id = inner.last_id;
        let mut stored = order.clone();
        stored.id = id;
        inner.orders.insert(id, stored);
        Ok(id)
    }

    async fn find(&self, id: OrderId) -> StorageResult<Option<Order>> {
        Ok(self.inner.read().await.orders.get(&id).cloned())
    }

    async fn update(&self, order: &Order) -> StorageResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.orders.get_mut(&order.id) else {
            return Ok(false);
        };

        existing.client_name = order.client_name.clone();
        existing.product_description = order.product_description.clone();
        existing.quantity = order.quantity;
        existing.priority = order.priority;
        existing.deadline = order.deadline;
        existing.cost = order.cost;
        existing.status = order.status;
        Ok(true)
    }

    async fn delete(&self, id: OrderId) -> StorageResult<bool> {
        Ok(self.inner.write().await.orders.remove(&id).is_some())
    }

    async fn list_all(&self) -> StorageResult<Vec<Order>> {
        Ok(self.inner.read().await.orders.values().rev().cloned().collect())
    }

    async fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| in_range(o, start, end))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn query_by_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn query_overdue(&self, now: DateTime<Utc>) -> StorageResult<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.is_overdue_at(now))
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.deadline);
        Ok(orders)
    }

    async fn sum_cost_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Decimal> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .values()
            .filter(|o| in_range(o, start, end))
            .map(|o| o.cost)
            .sum())
    }

    async fn count_by_priority(&self, priority: Priority) -> StorageResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.orders.values().filter(|o| o.priority == priority).count() as i64)
    }
}
