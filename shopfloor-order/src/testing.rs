use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopfloor_core::{Order, OrderId, OrderRepository, OrderStatus, Priority, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Vec-backed repository that counts every call and can be told to fail
#[derive(Default)]
pub struct RecordingRepository {
    orders: Mutex<Vec<Order>>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingRepository {
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Mutex::new(orders),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    fn enter(&self) -> StorageResult<std::sync::MutexGuard<'_, Vec<Order>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("connection refused".to_string()));
        }
        Ok(self.orders.lock().unwrap())
    }
}

#[async_trait]
impl OrderRepository for RecordingRepository {
    async fn add(&self, order: &Order) -> StorageResult<OrderId> {
        let mut orders = self.enter()?;
        let id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let mut stored = order.clone();
        stored.id = id;
        orders.push(stored);
        Ok(id)
    }

    async fn find(&self, id: OrderId) -> StorageResult<Option<Order>> {
        Ok(self.enter()?.iter().find(|o| o.id == id).cloned())
    }

    async fn update(&self, order: &Order) -> StorageResult<bool> {
        let mut orders = self.enter()?;
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: OrderId) -> StorageResult<bool> {
        let mut orders = self.enter()?;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() != before)
    }

    async fn list_all(&self) -> StorageResult<Vec<Order>> {
        Ok(self.enter()?.clone())
    }

    async fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<Order>> {
        Ok(self
            .enter()?
            .iter()
            .filter(|o| o.order_date >= start && o.order_date <= end)
            .cloned()
            .collect())
    }

    async fn query_by_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>> {
        Ok(self.enter()?.iter().filter(|o| o.status == status).cloned().collect())
    }

    async fn query_overdue(&self, now: DateTime<Utc>) -> StorageResult<Vec<Order>> {
        Ok(self.enter()?.iter().filter(|o| o.is_overdue_at(now)).cloned().collect())
    }

    async fn sum_cost_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Decimal> {
        Ok(self
            .enter()?
            .iter()
            .filter(|o| o.order_date >= start && o.order_date <= end)
            .map(|o| o.cost)
            .sum())
    }

    async fn count_by_priority(&self, priority: Priority) -> StorageResult<i64> {
        Ok(self.enter()?.iter().filter(|o| o.priority == priority).count() as i64)
    }
}

pub fn order(
    id: OrderId,
    status: OrderStatus,
    priority: Priority,
    cost: Decimal,
    order_date: DateTime<Utc>,
    deadline: DateTime<Utc>,
) -> Order {
    Order {
        id,
        order_number: format!("MP-{}-{:03}", order_date.format("%Y%m%d"), 100 + id),
        client_name: "Acme".to_string(),
        product_description: "Bracket".to_string(),
        quantity: 1,
        priority,
        order_date,
        deadline,
        cost,
        status,
    }
}
