use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pricing;
use crate::ValidationError;

pub type OrderId = i64;

/// Production stage of an order, in lifecycle order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    InProgress,
    QualityControl,
    Completed,
    Shipped,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::InProgress,
        OrderStatus::QualityControl,
        OrderStatus::Completed,
        OrderStatus::Shipped,
    ];

    /// Storage code, matching the serde representation
    pub fn code(self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::QualityControl => "QUALITY_CONTROL",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Shipped => "SHIPPED",
        }
    }

    /// Still on the shop floor: neither completed nor shipped
    pub fn is_active(self) -> bool {
        !matches!(self, OrderStatus::Completed | OrderStatus::Shipped)
    }

    pub fn is_pending(self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::InProgress)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Urgency tier, drives the cost multiplier
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Report iteration order
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn code(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Lenient parse used for caller input. Unrecognized labels fall back to `Medium`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label) || p.code().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One production order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub client_name: String,
    pub product_description: String,
    pub quantity: i32,
    pub priority: Priority,
    pub order_date: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub cost: Decimal,
    pub status: OrderStatus,
}

impl Order {
    /// Run every field check. Fails on the first broken rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            &self.client_name,
            &self.product_description,
            self.quantity,
            self.order_date,
            self.deadline,
        )
    }

    /// Field checks that hold regardless of which order date ends up stored
    pub fn validate_details(&self) -> Result<(), ValidationError> {
        validate_details(&self.client_name, &self.product_description, self.quantity)
    }

    /// Recompute `cost` from quantity and priority, discarding any manual override
    pub fn reprice(&mut self) {
        self.cost = pricing::calculate_cost(self.quantity, self.priority);
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now && self.status.is_active()
    }

    /// Whole days elapsed since the deadline, zero if it has not passed
    pub fn days_overdue_at(&self, now: DateTime<Utc>) -> i64 {
        if self.deadline >= now {
            return 0;
        }
        (now - self.deadline).num_days()
    }
}

/// Caller input for a new order. Missing optional fields get defaults at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(default)]
    pub order_number: Option<String>,
    pub client_name: String,
    pub product_description: String,
    pub quantity: i32,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    pub deadline: DateTime<Utc>,
    /// Manual cost entered by an editor, replaces the computed one
    #[serde(default)]
    pub cost: Option<Decimal>,
}

impl OrderDraft {
    pub fn resolved_priority(&self) -> Priority {
        self.priority
            .as_deref()
            .map(Priority::from_label)
            .unwrap_or_default()
    }

    /// Cost preview for the current quantity and priority
    pub fn estimated_cost(&self) -> Decimal {
        pricing::calculate_cost(self.quantity, self.resolved_priority())
    }

    /// Build the unsaved order. `id` stays 0 until storage assigns one.
    pub fn into_order(self, order_number: String, now: DateTime<Utc>) -> Result<Order, ValidationError> {
        let priority = self.resolved_priority();
        let order_date = self.order_date.unwrap_or(now);

        validate_fields(
            &self.client_name,
            &self.product_description,
            self.quantity,
            order_date,
            self.deadline,
        )?;

        let cost = self
            .cost
            .unwrap_or_else(|| pricing::calculate_cost(self.quantity, priority));

        Ok(Order {
            id: 0,
            order_number,
            client_name: self.client_name.trim().to_string(),
            product_description: self.product_description.trim().to_string(),
            quantity: self.quantity,
            priority,
            order_date,
            deadline: self.deadline,
            cost,
            status: OrderStatus::New,
        })
    }
}

pub fn validate_fields(
    client_name: &str,
    product_description: &str,
    quantity: i32,
    order_date: DateTime<Utc>,
    deadline: DateTime<Utc>,
) -> Result<(), ValidationError> {
    validate_details(client_name, product_description, quantity)?;
    if deadline < order_date {
        return Err(ValidationError::DeadlineBeforeOrderDate { order_date, deadline });
    }
    Ok(())
}

/// Checks that do not involve the order date
pub fn validate_details(
    client_name: &str,
    product_description: &str,
    quantity: i32,
) -> Result<(), ValidationError> {
    if client_name.trim().is_empty() {
        return Err(ValidationError::BlankClientName);
    }
    if product_description.trim().is_empty() {
        return Err(ValidationError::BlankProductDescription);
    }
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity(quantity));
    }
    Ok(())
}
