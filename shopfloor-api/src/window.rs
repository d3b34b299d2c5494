use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::AppError;

/// `?start=&end=` query, both RFC 3339. Missing bounds fall back to a window
/// ending now.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl WindowQuery {
    pub fn resolve(
        &self,
        default_days: i64,
        now: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        let end = self.end.unwrap_or(now);
        let start = match self.start {
            Some(start) => start,
            // Oversized windows clamp to the earliest representable instant
            None => Duration::try_days(default_days)
                .and_then(|window| end.checked_sub_signed(window))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        };
        if start > end {
            return Err(AppError::ValidationError(format!(
                "Range start {} is after end {}",
                start, end
            )));
        }
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults_to_trailing_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();

        let (start, end) = WindowQuery::default().resolve(30, now).unwrap();

        assert_eq!(end, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_oversized_default_window_clamps() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();

        let (start, end) = WindowQuery::default().resolve(i64::MAX, now).unwrap();
        assert_eq!(start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(end, now);

        let (start, _) = WindowQuery::default().resolve(400_000_000, now).unwrap();
        assert_eq!(start, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let now = Utc::now();
        let query = WindowQuery {
            start: Some(now),
            end: Some(now - Duration::days(1)),
        };

        assert!(matches!(query.resolve(30, now), Err(AppError::ValidationError(_))));
    }
}
