use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfloor_core::Order;

/// Dashboard figures over a set of orders. Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStatistics {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    /// New + InProgress
    pub pending_orders: usize,
    /// Completed + Shipped
    pub completed_orders: usize,
}

impl OrderStatistics {
    pub fn from_orders(orders: &[Order]) -> Self {
        let total_revenue = total_cost(orders);

        Self {
            total_orders: orders.len(),
            total_revenue,
            average_order_value: average_cost(orders).unwrap_or(Decimal::ZERO),
            pending_orders: orders.iter().filter(|o| o.status.is_pending()).count(),
            completed_orders: orders.iter().filter(|o| !o.status.is_active()).count(),
        }
    }
}

pub fn total_cost<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Decimal {
    orders.into_iter().map(|o| o.cost).sum()
}

/// Mean cost, `None` for an empty set
pub fn average_cost(orders: &[Order]) -> Option<Decimal> {
    if orders.is_empty() {
        return None;
    }
    Some(total_cost(orders) / Decimal::from(orders.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::order;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use shopfloor_core::{OrderStatus, Priority};

    #[test]
    fn test_empty_statistics() {
        let stats = OrderStatistics::from_orders(&[]);

        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.average_order_value, Decimal::ZERO);
    }

    #[test]
    fn test_statistics_buckets() {
        let date = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
        let deadline = date + Duration::days(10);
        let orders = vec![
            order(1, OrderStatus::New, Priority::High, dec!(2700), date, deadline),
            order(2, OrderStatus::InProgress, Priority::Low, dec!(1800), date, deadline),
            order(3, OrderStatus::QualityControl, Priority::Medium, dec!(2250), date, deadline),
            order(4, OrderStatus::Completed, Priority::Medium, dec!(4500), date, deadline),
            order(5, OrderStatus::Shipped, Priority::High, dec!(5400), date, deadline),
        ];

        let stats = OrderStatistics::from_orders(&orders);

        assert_eq!(stats.total_orders, 5);
        assert_eq!(stats.total_revenue, dec!(16650));
        assert_eq!(stats.average_order_value, dec!(3330));
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.completed_orders, 2);
    }

    #[test]
    fn test_average_keeps_fraction() {
        let date = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
        let orders = vec![
            order(1, OrderStatus::New, Priority::Low, dec!(1800), date, date),
            order(2, OrderStatus::New, Priority::Low, dec!(1801), date, date),
        ];
        assert_eq!(average_cost(&orders), Some(dec!(1800.5)));
    }
}
