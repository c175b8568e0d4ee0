// 📅 Due-Date Model - Tenant ledgers encode "pay on day N of month"
//
// A ledger due date is a fixed day number that may not exist in every
// month ("31" in April, "30" in February). It has to survive parsing as a
// plain year/month/day triple so the clamping rule can map it onto the
// month's genuine last day, instead of being rejected up front by a
// validated date type.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// DUE DATE
// ============================================================================

/// DueDate - Calendar-lax date triple from the tenant ledger
///
/// Unlike `NaiveDate`, this can hold literals such as `2024-04-31`
/// ("last day of April" intent). `adjust()` turns it into a real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DueDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        DueDate { year, month, day }
    }

    /// Parse a ledger due-date cell
    ///
    /// Accepts `YYYY-MM-DD` and the bank export's `DD.MM.YYYY`.
    /// Anything else returns `None`; an absent due date is expected ledger
    /// noise, not an error.
    ///
    /// # Examples
    /// ```
    /// use rent_recon::DueDate;
    ///
    /// assert_eq!(DueDate::parse("2024-04-31"), Some(DueDate::new(2024, 4, 31)));
    /// assert_eq!(DueDate::parse("15.03.2024"), Some(DueDate::new(2024, 3, 15)));
    /// assert_eq!(DueDate::parse("last friday"), None);
    /// ```
    pub fn parse(text: &str) -> Option<DueDate> {
        let text = text.trim();

        if let Some((y, m, d)) = split_triple(text, '-') {
            // ISO order: year-month-day
            return DueDate::checked(y, m, d);
        }

        if let Some((d, m, y)) = split_triple(text, '.') {
            // Dotted order: day.month.year
            return DueDate::checked(y, m, d);
        }

        None
    }

    fn checked(year: i64, month: i64, day: i64) -> Option<DueDate> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(DueDate {
            year: i32::try_from(year).ok()?,
            month: month as u32,
            day: day as u32,
        })
    }

    /// Map the ledger day number onto a real calendar date
    ///
    /// Clamping rules:
    /// - day 31 in a month whose last day is earlier → that last day
    /// - February 29/30 when February ends on the 28th → February 28
    /// - otherwise the date is kept as-is
    ///
    /// Returns `None` when the triple still is not a real calendar date
    /// after clamping; the caller treats that the same as a missing date.
    pub fn adjust(&self) -> Option<NaiveDate> {
        let last = last_day_of_month(self.year, self.month)?;

        if self.day == 31 && last < 31 {
            return NaiveDate::from_ymd_opt(self.year, self.month, last);
        }

        if self.month == 2 && (self.day == 29 || self.day == 30) && last < 29 {
            return NaiveDate::from_ymd_opt(self.year, self.month, last);
        }

        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Last day number of a month (28-31)
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next.pred_opt()?.day())
}

fn split_triple(text: &str, sep: char) -> Option<(i64, i64, i64)> {
    let mut parts = text.split(sep);
    let a = parts.next()?.trim().parse::<i64>().ok()?;
    let b = parts.next()?.trim().parse::<i64>().ok()?;
    let c = parts.next()?.trim().parse::<i64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b, c))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(DueDate::parse("2024-03-15"), Some(DueDate::new(2024, 3, 15)));
        assert_eq!(DueDate::parse(" 2024-03-15 "), Some(DueDate::new(2024, 3, 15)));
    }

    #[test]
    fn test_parse_dotted_date() {
        assert_eq!(DueDate::parse("15.03.2024"), Some(DueDate::new(2024, 3, 15)));
    }

    #[test]
    fn test_parse_keeps_invalid_day_literals() {
        // "Pay on the 31st" in a 30-day month must survive parsing
        assert_eq!(DueDate::parse("2024-04-31"), Some(DueDate::new(2024, 4, 31)));
        assert_eq!(DueDate::parse("30.02.2023"), Some(DueDate::new(2023, 2, 30)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(DueDate::parse(""), None);
        assert_eq!(DueDate::parse("soon"), None);
        assert_eq!(DueDate::parse("2024-13-01"), None);
        assert_eq!(DueDate::parse("2024-00-10"), None);
        assert_eq!(DueDate::parse("2024-03-32"), None);
        assert_eq!(DueDate::parse("2024-03"), None);
        assert_eq!(DueDate::parse("2024-03-15-9"), None);
    }

    #[test]
    fn test_adjust_clamps_day_31() {
        assert_eq!(
            DueDate::new(2024, 4, 31).adjust(),
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
        assert_eq!(
            DueDate::new(2024, 6, 31).adjust(),
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert_eq!(
            DueDate::new(2023, 2, 31).adjust(),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );
    }

    #[test]
    fn test_adjust_clamps_february_non_leap() {
        assert_eq!(
            DueDate::new(2023, 2, 29).adjust(),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );
        assert_eq!(
            DueDate::new(2023, 2, 30).adjust(),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );
    }

    #[test]
    fn test_adjust_keeps_valid_dates() {
        assert_eq!(
            DueDate::new(2024, 1, 31).adjust(),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
        assert_eq!(
            DueDate::new(2024, 3, 15).adjust(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        // Leap year: February 29 is a real date, no clamp
        assert_eq!(
            DueDate::new(2024, 2, 29).adjust(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_adjust_feb_30_in_leap_year_stays_invalid() {
        // Leap February ends on the 29th, so the `last < 29` clamp never
        // fires and day 30 remains unrepresentable.
        assert_eq!(DueDate::new(2024, 2, 30).adjust(), None);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 1), Some(31));
        assert_eq!(last_day_of_month(2024, 2), Some(29));
        assert_eq!(last_day_of_month(2023, 2), Some(28));
        assert_eq!(last_day_of_month(2024, 4), Some(30));
        assert_eq!(last_day_of_month(2024, 12), Some(31));
    }
}
