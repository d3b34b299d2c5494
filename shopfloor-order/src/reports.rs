//! Report generation over a window of orders.
//!
//! Each [`ReportKind`] has a pure builder taking the already-fetched orders, so
//! the grouping rules can be tested without storage. [`ReportAggregator`] does
//! the fetching and falls back to an empty order set when storage fails.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfloor_core::{Order, OrderId, OrderRepository, OrderStatus, Priority};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::finance::{average_cost, total_cost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    AllOrders,
    ByStatus,
    ByPriority,
    Overdue,
    Financial,
    Active,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::AllOrders,
        ReportKind::ByStatus,
        ReportKind::ByPriority,
        ReportKind::Overdue,
        ReportKind::Financial,
        ReportKind::Active,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::AllOrders => "All Orders",
            ReportKind::ByStatus => "Orders by Status",
            ReportKind::ByPriority => "Orders by Priority",
            ReportKind::Overdue => "Overdue Orders",
            ReportKind::Financial => "Financial Report",
            ReportKind::Active => "Active Orders",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::AllOrders => "all-orders",
            ReportKind::ByStatus => "by-status",
            ReportKind::ByPriority => "by-priority",
            ReportKind::Overdue => "overdue",
            ReportKind::Financial => "financial",
            ReportKind::Active => "active",
        }
    }

    /// Accepts a display label or a slug, ignoring case
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        ReportKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(input) || k.slug().eq_ignore_ascii_case(input))
    }
}

/// Inclusive reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllOrdersReport {
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub total_cost: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusGroup {
    pub status: OrderStatus,
    pub label: &'static str,
    pub count: usize,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub period: ReportPeriod,
    pub groups: Vec<StatusGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityGroup {
    pub priority: Priority,
    pub count: usize,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityReport {
    pub period: ReportPeriod,
    pub groups: Vec<PriorityGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueEntry {
    pub id: OrderId,
    pub order_number: String,
    pub client_name: String,
    pub status: OrderStatus,
    pub deadline: DateTime<Utc>,
    pub days_overdue: i64,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueReport {
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub total_cost: Decimal,
    pub orders: Vec<OverdueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    pub period: ReportPeriod,
    pub total_revenue: Decimal,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_order_value: Option<Decimal>,
    pub months: Vec<MonthlyTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveReport {
    pub period: ReportPeriod,
    pub count: usize,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Report {
    AllOrders(AllOrdersReport),
    ByStatus(StatusReport),
    ByPriority(PriorityReport),
    Overdue(OverdueReport),
    Financial(FinancialReport),
    Active(ActiveReport),
    /// Requested kind did not match any report
    Unknown { requested: String },
}

// ============================================================================
// Builders
// ============================================================================

pub fn all_orders_report(orders: &[Order], period: ReportPeriod, now: DateTime<Utc>) -> AllOrdersReport {
    AllOrdersReport {
        period,
        generated_at: now,
        count: orders.len(),
        total_cost: total_cost(orders),
        average_cost: average_cost(orders),
    }
}

/// Groups in lifecycle order; statuses with no orders are left out
pub fn status_report(orders: &[Order], period: ReportPeriod) -> StatusReport {
    let mut buckets: BTreeMap<OrderStatus, (usize, Decimal)> = BTreeMap::new();
    for order in orders {
        let bucket = buckets.entry(order.status).or_insert((0, Decimal::ZERO));
        bucket.0 += 1;
        bucket.1 += order.cost;
    }

    let groups = buckets
        .into_iter()
        .map(|(status, (count, total_cost))| StatusGroup {
            status,
            label: status.label(),
            count,
            total_cost,
        })
        .collect();

    StatusReport { period, groups }
}

/// High, Medium, Low; priorities with no orders are left out
pub fn priority_report(orders: &[Order], period: ReportPeriod) -> PriorityReport {
    let groups = Priority::ALL
        .into_iter()
        .filter_map(|priority| {
            let matching: Vec<&Order> = orders.iter().filter(|o| o.priority == priority).collect();
            if matching.is_empty() {
                return None;
            }
            Some(PriorityGroup {
                priority,
                count: matching.len(),
                total_cost: total_cost(matching),
            })
        })
        .collect();

    PriorityReport { period, groups }
}

/// Overdue is judged against `now`, not the reporting window
pub fn overdue_report(orders: &[Order], now: DateTime<Utc>) -> OverdueReport {
    let mut overdue: Vec<&Order> = orders.iter().filter(|o| o.is_overdue_at(now)).collect();
    overdue.sort_by_key(|o| o.deadline);

    let entries: Vec<OverdueEntry> = overdue
        .iter()
        .map(|o| OverdueEntry {
            id: o.id,
            order_number: o.order_number.clone(),
            client_name: o.client_name.clone(),
            status: o.status,
            deadline: o.deadline,
            days_overdue: o.days_overdue_at(now),
            cost: o.cost,
        })
        .collect();

    OverdueReport {
        generated_at: now,
        count: entries.len(),
        total_cost: total_cost(overdue),
        orders: entries,
    }
}

pub fn financial_report(orders: &[Order], period: ReportPeriod) -> FinancialReport {
    let mut by_month: BTreeMap<(i32, u32), (usize, Decimal)> = BTreeMap::new();
    for order in orders {
        let key = (order.order_date.year(), order.order_date.month());
        let bucket = by_month.entry(key).or_insert((0, Decimal::ZERO));
        bucket.0 += 1;
        bucket.1 += order.cost;
    }

    FinancialReport {
        period,
        total_revenue: total_cost(orders),
        count: orders.len(),
        average_order_value: average_cost(orders),
        months: by_month
            .into_iter()
            .map(|((year, month), (count, total_cost))| MonthlyTotal {
                year,
                month,
                count,
                total_cost,
            })
            .collect(),
    }
}

pub fn active_report(orders: &[Order], period: ReportPeriod) -> ActiveReport {
    let active: Vec<&Order> = orders.iter().filter(|o| o.status.is_active()).collect();
    ActiveReport {
        period,
        count: active.len(),
        total_cost: total_cost(active),
    }
}

// ============================================================================
// Aggregator
// ============================================================================

pub struct ReportAggregator {
    repo: Arc<dyn OrderRepository>,
}

impl ReportAggregator {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    pub async fn generate_report(
        &self,
        kind: ReportKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Report {
        self.generate_report_at(kind, start, end, Utc::now()).await
    }

    /// Resolve `name` with [`ReportKind::parse`]; unmatched names produce [`Report::Unknown`]
    pub async fn generate_named_report(
        &self,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Report {
        match ReportKind::parse(name) {
            Some(kind) => self.generate_report(kind, start, end).await,
            None => {
                debug!("Unknown report type requested: {}", name);
                Report::Unknown {
                    requested: name.to_string(),
                }
            }
        }
    }

    pub async fn generate_report_at(
        &self,
        kind: ReportKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Report {
        let period = ReportPeriod::new(start, end);
        debug!("Generating {} report for {} - {}", kind.slug(), start, end);

        if kind == ReportKind::Overdue {
            let orders = self.overdue_orders(now).await;
            return Report::Overdue(overdue_report(&orders, now));
        }

        let orders = self.orders_in(period).await;
        match kind {
            ReportKind::AllOrders => Report::AllOrders(all_orders_report(&orders, period, now)),
            ReportKind::ByStatus => Report::ByStatus(status_report(&orders, period)),
            ReportKind::ByPriority => Report::ByPriority(priority_report(&orders, period)),
            ReportKind::Financial => Report::Financial(financial_report(&orders, period)),
            ReportKind::Active => Report::Active(active_report(&orders, period)),
            ReportKind::Overdue => Report::Overdue(overdue_report(&orders, now)),
        }
    }

    async fn orders_in(&self, period: ReportPeriod) -> Vec<Order> {
        self.repo
            .query_by_date_range(period.start, period.end)
            .await
            .unwrap_or_else(|e| {
                warn!("Report range query failed, using empty order set: {}", e);
                Vec::new()
            })
    }

    async fn overdue_orders(&self, now: DateTime<Utc>) -> Vec<Order> {
        self.repo.query_overdue(now).await.unwrap_or_else(|e| {
            warn!("Overdue query failed, using empty order set: {}", e);
            Vec::new()
        })
    }
}

// ============================================================================
// Text rendering
// ============================================================================

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

struct Money(Decimal);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Period: {} - {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

impl fmt::Display for AllOrdersReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REPORT: {}", ReportKind::AllOrders.label())?;
        writeln!(f, "{}", self.period)?;
        writeln!(f, "Generated: {}", self.generated_at.format(TIMESTAMP_FORMAT))?;
        writeln!(f, "Total orders: {}", self.count)?;
        writeln!(f, "Total cost: {}", Money(self.total_cost))?;
        if let Some(average) = self.average_cost {
            writeln!(f, "Average cost: {}", Money(average))?;
        }
        Ok(())
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REPORT: {}", ReportKind::ByStatus.label())?;
        writeln!(f, "{}", self.period)?;
        for group in &self.groups {
            writeln!(f)?;
            writeln!(f, "Status: {}", group.label)?;
            writeln!(f, "Count: {}", group.count)?;
            writeln!(f, "Total cost: {}", Money(group.total_cost))?;
        }
        Ok(())
    }
}

impl fmt::Display for PriorityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REPORT: {}", ReportKind::ByPriority.label())?;
        writeln!(f, "{}", self.period)?;
        for group in &self.groups {
            writeln!(f)?;
            writeln!(f, "Priority: {}", group.priority)?;
            writeln!(f, "Count: {}", group.count)?;
            writeln!(f, "Total cost: {}", Money(group.total_cost))?;
        }
        Ok(())
    }
}

impl fmt::Display for OverdueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REPORT: {}", ReportKind::Overdue.label())?;
        writeln!(f, "Generated: {}", self.generated_at.format(TIMESTAMP_FORMAT))?;
        writeln!(f, "Total overdue orders: {}", self.count)?;
        if self.orders.is_empty() {
            return Ok(());
        }
        writeln!(f, "Total overdue cost: {}", Money(self.total_cost))?;
        for entry in &self.orders {
            writeln!(f)?;
            writeln!(f, "Order: {}", entry.order_number)?;
            writeln!(f, "Client: {}", entry.client_name)?;
            writeln!(f, "Days overdue: {}", entry.days_overdue)?;
        }
        Ok(())
    }
}

impl fmt::Display for FinancialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FINANCIAL REPORT")?;
        writeln!(f, "{}", self.period)?;
        writeln!(f)?;
        writeln!(f, "Total revenue: {}", Money(self.total_revenue))?;
        writeln!(f, "Order count: {}", self.count)?;
        let Some(average) = self.average_order_value else {
            return Ok(());
        };
        writeln!(f, "Average order value: {}", Money(average))?;
        writeln!(f)?;
        writeln!(f, "By month:")?;
        for month in &self.months {
            let name = NaiveDate::from_ymd_opt(month.year, month.month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| format!("{}-{:02}", month.year, month.month));
            writeln!(
                f,
                "{:<20}: {:>12} ({} orders)",
                name,
                Money(month.total_cost).to_string(),
                month.count
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ActiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REPORT: {}", ReportKind::Active.label())?;
        writeln!(f, "{}", self.period)?;
        writeln!(f, "Active orders: {}", self.count)?;
        writeln!(f, "Total cost of active orders: {}", Money(self.total_cost))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::AllOrders(report) => report.fmt(f),
            Report::ByStatus(report) => report.fmt(f),
            Report::ByPriority(report) => report.fmt(f),
            Report::Overdue(report) => report.fmt(f),
            Report::Financial(report) => report.fmt(f),
            Report::Active(report) => report.fmt(f),
            Report::Unknown { .. } => writeln!(f, "Unknown report type"),
        }
    }
}
