use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::Priority;

/// Shop rate per produced unit
pub const BASE_UNIT_COST: Decimal = dec!(1500);

pub fn priority_multiplier(priority: Priority) -> Decimal {
    match priority {
        Priority::High => dec!(1.8),
        Priority::Medium => dec!(1.5),
        Priority::Low => dec!(1.2),
    }
}

/// Cost of an order: `quantity * BASE_UNIT_COST * multiplier`
pub fn calculate_cost(quantity: i32, priority: Priority) -> Decimal {
    Decimal::from(quantity) * BASE_UNIT_COST * priority_multiplier(priority)
}

/// Same as [`calculate_cost`] for a raw priority label; unknown labels price as `Medium`
pub fn calculate_cost_for_label(quantity: i32, priority: &str) -> Decimal {
    calculate_cost(quantity, Priority::from_label(priority))
}
