use chrono::{Days, NaiveDate};

/// Normalize a raw check-in date to `MM/DD/YYYY` with zero-padded month and
/// day.
///
/// The portal reports dates as `M/D/YYYY` or `M-D-YYYY` with one- or
/// two-digit month and day. Already-normalized dates pass through unchanged.
/// An entry that does not split into month/day/year is kept trimmed but
/// otherwise untouched so it is never silently dropped.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let parts: Vec<&str> = trimmed.split(['/', '-']).collect();
    if parts.len() != 3 {
        tracing::warn!("Unrecognized date format, keeping as-is: {}", trimmed);
        return trimmed.to_string();
    }
    format!("{:0>2}/{:0>2}/{}", parts[0], parts[1], parts[2])
}

/// The trailing 365-day window ending at `today`, both bounds inclusive.
pub fn trailing_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Days::new(365), today)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_single_digit_month_and_day() {
        assert_eq!(normalize_date("3/4/2024"), "03/04/2024");
    }

    #[test]
    fn accepts_dash_separators() {
        assert_eq!(normalize_date("3-4-2024"), "03/04/2024");
    }

    #[test]
    fn is_idempotent() {
        assert_eq!(normalize_date("03/04/2024"), "03/04/2024");
        assert_eq!(normalize_date(&normalize_date("12-31-2023")), "12/31/2023");
    }

    #[test]
    fn keeps_double_digit_fields() {
        assert_eq!(normalize_date("11/25/2024"), "11/25/2024");
    }

    #[test]
    fn passes_through_unrecognized_entries() {
        assert_eq!(normalize_date("not a date"), "not a date");
        assert_eq!(normalize_date("  2024  "), "2024");
    }

    #[test]
    fn window_spans_365_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let (from, to) = trailing_window(today);
        assert_eq!(to, today);
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
