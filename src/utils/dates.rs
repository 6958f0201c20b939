use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

use crate::error::ApiError;

/// Current instant in server-local time; all cutoff math runs on this.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today_local() -> NaiveDate {
    now_local().date()
}

/// Inclusive (first day, last day) bounds of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}

/// Parses a `YYYY-MM` query parameter into month bounds; `None` falls back
/// to the current month.
pub fn parse_month(month: Option<&str>) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let (year, month) = match month {
        Some(raw) => {
            let mut parts = raw.splitn(2, '-');
            let year = parts.next().and_then(|p| p.parse::<i32>().ok());
            let month = parts.next().and_then(|p| p.parse::<u32>().ok());
            match (year, month) {
                (Some(y), Some(m)) => (y, m),
                _ => return Err(invalid_month(raw)),
            }
        }
        None => {
            let today = today_local();
            (today.year(), today.month())
        }
    };

    month_bounds(year, month).ok_or_else(|| invalid_month(&format!("{year}-{month:02}")))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("Invalid date: {raw}, expected YYYY-MM-DD")))
}

fn invalid_month(raw: &str) -> ApiError {
    ApiError::Validation(format!("Invalid month: {raw}, expected YYYY-MM"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_bounds_are_inclusive() {
        assert_eq!(month_bounds(2026, 8), Some((d(2026, 8, 1), d(2026, 8, 31))));
        assert_eq!(month_bounds(2026, 12), Some((d(2026, 12, 1), d(2026, 12, 31))));
    }

    #[test]
    fn february_handles_leap_years() {
        assert_eq!(month_bounds(2024, 2), Some((d(2024, 2, 1), d(2024, 2, 29))));
        assert_eq!(month_bounds(2026, 2), Some((d(2026, 2, 1), d(2026, 2, 28))));
    }

    #[test]
    fn parse_month_accepts_yyyy_mm() {
        let (from, to) = parse_month(Some("2026-02")).unwrap();
        assert_eq!(from, d(2026, 2, 1));
        assert_eq!(to, d(2026, 2, 28));
    }

    #[test]
    fn parse_month_rejects_garbage() {
        assert!(parse_month(Some("2026")).is_err());
        assert!(parse_month(Some("2026-13")).is_err());
        assert!(parse_month(Some("not-a-month")).is_err());
    }

    #[test]
    fn parse_month_defaults_to_current() {
        let (from, to) = parse_month(None).unwrap();
        let today = today_local();
        assert_eq!(from.month(), today.month());
        assert!(from <= today && today <= to);
    }

    #[test]
    fn parse_date_validates_format() {
        assert_eq!(parse_date("2026-08-29").unwrap(), d(2026, 8, 29));
        assert!(parse_date("29/08/2026").is_err());
    }
}
