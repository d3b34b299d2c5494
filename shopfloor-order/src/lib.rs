pub mod finance;
pub mod numbering;
pub mod reports;
pub mod service;

#[cfg(test)]
mod testing;

pub use finance::OrderStatistics;
pub use reports::{Report, ReportAggregator, ReportKind, ReportPeriod};
pub use service::OrderService;
