use chrono::NaiveDate;
use rand::Rng;

pub const ORDER_NUMBER_PREFIX: &str = "MP";

/// `MP-YYYYMMDD-NNN` with a random three-digit suffix.
///
/// Uniqueness is left to storage; the suffix only keeps collisions rare for a
/// shop that books a handful of orders a day.
pub fn generate_order_number(date: NaiveDate) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(100..1000);
    format!("{}-{}-{}", ORDER_NUMBER_PREFIX, date.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();

        for _ in 0..50 {
            let number = generate_order_number(date);
            let parts: Vec<&str> = number.split('-').collect();

            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], "MP");
            assert_eq!(parts[1], "20260109");
            assert_eq!(parts[2].len(), 3);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
