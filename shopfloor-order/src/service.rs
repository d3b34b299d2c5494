use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopfloor_core::lifecycle::{state_of, Direction};
use shopfloor_core::{
    pricing, CoreResult, Order, OrderDraft, OrderId, OrderRepository, OrderStatus, Priority,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::finance::OrderStatistics;
use crate::numbering::generate_order_number;

/// Entry point for every order mutation.
///
/// Writes validate before touching storage and propagate storage failures.
/// Listing and statistics reads are fail-soft: a storage error is logged and
/// an empty result returned.
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Validate, number, price and persist a new order
    pub async fn create_order(&self, draft: OrderDraft) -> CoreResult<OrderId> {
        let now = Utc::now();
        let order_number = match draft.order_number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => number.to_string(),
            _ => generate_order_number(now.date_naive()),
        };

        let order = draft.into_order(order_number, now)?;

        let id = self.repo.add(&order).await.map_err(|e| {
            error!("Failed to store order {}: {}", order.order_number, e);
            e
        })?;

        info!(
            "Created order {} (id {}) for {}: {} x {}, cost {}",
            order.order_number, id, order.client_name, order.quantity, order.priority, order.cost
        );
        Ok(id)
    }

    /// Replace an order's editable fields.
    ///
    /// Returns `Ok(false)` when the id does not exist. The stored order number,
    /// order date and status are kept regardless of what the caller sends;
    /// status moves only through [`advance_status`](Self::advance_status) and
    /// [`revert_status`](Self::revert_status). Cost is persisted as given; call
    /// [`Order::reprice`] first to recompute it.
    pub async fn update_order(&self, mut order: Order) -> CoreResult<bool> {
        order.validate_details()?;

        let Some(existing) = self.repo.find(order.id).await? else {
            return Ok(false);
        };
        order.order_number = existing.order_number;
        order.order_date = existing.order_date;
        order.status = existing.status;
        // Deadline is checked against the stored order date
        order.validate()?;

        let updated = self.repo.update(&order).await.map_err(|e| {
            error!("Failed to update order {}: {}", order.id, e);
            e
        })?;

        if updated {
            info!("Updated order {} ({})", order.order_number, order.id);
        }
        Ok(updated)
    }

    pub async fn delete_order(&self, id: OrderId) -> CoreResult<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            info!("Deleted order {}", id);
        }
        Ok(deleted)
    }

    pub async fn get_order_by_id(&self, id: OrderId) -> CoreResult<Option<Order>> {
        Ok(self.repo.find(id).await?)
    }

    pub async fn get_all_orders(&self) -> Vec<Order> {
        self.repo.list_all().await.unwrap_or_else(|e| {
            warn!("Listing orders failed, returning empty list: {}", e);
            Vec::new()
        })
    }

    pub async fn get_orders_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Order> {
        self.repo.query_by_date_range(start, end).await.unwrap_or_else(|e| {
            warn!("Range query {} - {} failed, returning empty list: {}", start, end, e);
            Vec::new()
        })
    }

    pub async fn get_orders_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.repo.query_by_status(status).await.unwrap_or_else(|e| {
            warn!("Status query {} failed, returning empty list: {}", status.code(), e);
            Vec::new()
        })
    }

    /// Price preview for an unsaved order
    pub fn calculate_order_cost(&self, quantity: i32, priority: Priority) -> Decimal {
        pricing::calculate_cost(quantity, priority)
    }

    pub async fn get_order_statistics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> OrderStatistics {
        let orders = self.get_orders_by_date_range(start, end).await;
        OrderStatistics::from_orders(&orders)
    }

    pub async fn total_revenue(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
        self.repo.sum_cost_in_range(start, end).await.unwrap_or_else(|e| {
            warn!("Revenue query failed, reporting zero: {}", e);
            Decimal::ZERO
        })
    }

    pub async fn count_by_priority(&self, priority: Priority) -> i64 {
        self.repo.count_by_priority(priority).await.unwrap_or_else(|e| {
            warn!("Priority count for {} failed, reporting zero: {}", priority.code(), e);
            0
        })
    }

    /// Move an order one stage forward. `None` if the order does not exist.
    pub async fn advance_status(&self, id: OrderId) -> CoreResult<Option<OrderStatus>> {
        self.step_status(id, Direction::Forward).await
    }

    /// Move an order one stage back. `None` if the order does not exist.
    pub async fn revert_status(&self, id: OrderId) -> CoreResult<Option<OrderStatus>> {
        self.step_status(id, Direction::Backward).await
    }

    async fn step_status(&self, id: OrderId, direction: Direction) -> CoreResult<Option<OrderStatus>> {
        let Some(mut order) = self.repo.find(id).await? else {
            return Ok(None);
        };

        let state = state_of(order.status);
        if !state.allows(direction) {
            // Boundary stage: nothing to persist
            return Ok(Some(order.status));
        }

        let from = order.status;
        order.status = state.target(direction);
        if !self.repo.update(&order).await? {
            return Ok(None);
        }

        info!("Order {} moved {} -> {}", order.order_number, from.code(), order.status.code());
        Ok(Some(order.status))
    }
}
