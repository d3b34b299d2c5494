use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopfloor_core::{Order, OrderId, OrderRepository, OrderStatus, Priority, StorageError, StorageResult};
use sqlx::PgPool;

const ORDER_COLUMNS: &str = "id, order_number, client_name, product_description, quantity, \
     priority, order_date, deadline, cost, status";

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_number: String,
    client_name: String,
    product_description: String,
    quantity: i32,
    priority: String,
    order_date: DateTime<Utc>,
    deadline: DateTime<Utc>,
    cost: Decimal,
    status: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = StorageError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| StorageError::Corrupt(format!("order {}: {}", row.id, e)))?;
        let priority = Priority::ALL
            .into_iter()
            .find(|p| p.code() == row.priority)
            .ok_or_else(|| {
                StorageError::Corrupt(format!("order {}: unknown priority {}", row.id, row.priority))
            })?;

        Ok(Order {
            id: row.id,
            order_number: row.order_number,
            client_name: row.client_name,
            product_description: row.product_description,
            quantity: row.quantity,
            priority,
            order_date: row.order_date,
            deadline: row.deadline,
            cost: row.cost,
            status,
        })
    }
}

fn into_orders(rows: Vec<OrderRow>) -> StorageResult<Vec<Order>> {
    rows.into_iter().map(Order::try_from).collect()
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn add(&self, order: &Order) -> StorageResult<OrderId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (order_number, client_name, product_description, quantity, priority, order_date, deadline, cost, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&order.order_number)
        .bind(&order.client_name)
        .bind(&order.product_description)
        .bind(order.quantity)
        .bind(order.priority.code())
        .bind(order.order_date)
        .bind(order.deadline)
        .bind(order.cost)
        .bind(order.status.code())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                StorageError::DuplicateOrderNumber(order.order_number.clone())
            }
            _ => StorageError::backend(&e),
        })?;

        Ok(id)
    }

    async fn find(&self, id: OrderId) -> StorageResult<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::backend)?;

        row.map(Order::try_from).transpose()
    }

    async fn update(&self, order: &Order) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET client_name = $2, product_description = $3, quantity = $4, priority = $5,
                deadline = $6, cost = $7, status = $8
            WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(&order.client_name)
        .bind(&order.product_description)
        .bind(order.quantity)
        .bind(order.priority.code())
        .bind(order.deadline)
        .bind(order.cost)
        .bind(order.status.code())
        .execute(&self.pool)
        .await
        .map_err(StorageError::backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: OrderId) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> StorageResult<Vec<Order>> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id DESC"))
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::backend)?;

        into_orders(rows)
    }

    async fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_date BETWEEN $1 AND $2 ORDER BY order_date DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::backend)?;

        into_orders(rows)
    }

    async fn query_by_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE status = $1 ORDER BY order_date DESC"
        ))
        .bind(status.code())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::backend)?;

        into_orders(rows)
    }

    async fn query_overdue(&self, now: DateTime<Utc>) -> StorageResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE deadline < $1 AND status NOT IN ($2, $3) ORDER BY deadline ASC"
        ))
        .bind(now)
        .bind(OrderStatus::Completed.code())
        .bind(OrderStatus::Shipped.code())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::backend)?;

        into_orders(rows)
    }

    async fn sum_cost_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Decimal> {
        let total: Option<Decimal> =
            sqlx::query_scalar("SELECT SUM(cost) FROM orders WHERE order_date BETWEEN $1 AND $2")
                .bind(start)
                .bind(end)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::backend)?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }

    async fn count_by_priority(&self, priority: Priority) -> StorageResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE priority = $1")
            .bind(priority.code())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn row(status: &str, priority: &str) -> OrderRow {
        let placed = Utc.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap();
        OrderRow {
            id: 7,
            order_number: "MP-20260203-555".to_string(),
            client_name: "Acme".to_string(),
            product_description: "Bracket".to_string(),
            quantity: 4,
            priority: priority.to_string(),
            order_date: placed,
            deadline: placed,
            cost: dec!(7200),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let order = Order::try_from(row("QUALITY_CONTROL", "HIGH")).unwrap();

        assert_eq!(order.id, 7);
        assert_eq!(order.status, OrderStatus::QualityControl);
        assert_eq!(order.priority, Priority::High);
        assert_eq!(order.cost, dec!(7200));
    }

    #[test]
    fn test_cost_column_keeps_full_precision() {
        let schema = include_str!("../../migrations/0001_create_orders.sql");
        let cost_column = schema
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("cost "))
            .unwrap();

        assert_eq!(cost_column, "cost NUMERIC NOT NULL,");
    }

    #[test]
    fn test_unreadable_rows_are_corrupt() {
        assert!(matches!(
            Order::try_from(row("LOST", "HIGH")),
            Err(StorageError::Corrupt(_))
        ));
        assert!(matches!(
            Order::try_from(row("NEW", "URGENT")),
            Err(StorageError::Corrupt(_))
        ));
    }
}
