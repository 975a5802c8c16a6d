// src/business_days.rs
use chrono::{Datelike, NaiveDate, Weekday};

/// True for Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The smallest date strictly after `date` that falls on a weekday.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut cursor = date.succ_opt().expect("date within chrono range");
    while !is_business_day(cursor) {
        cursor = cursor.succ_opt().expect("date within chrono range");
    }
    cursor
}

/// Identity on weekdays; rolls a weekend date forward to Monday.
pub fn first_business_day_on_or_after(date: NaiveDate) -> NaiveDate {
    if is_business_day(date) {
        date
    } else {
        next_business_day(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    #[test]
    fn weekdays_are_business_days() {
        assert!(is_business_day(d("2025-04-07"))); // Monday
        assert!(is_business_day(d("2025-04-11"))); // Friday
        assert!(!is_business_day(d("2025-04-12"))); // Saturday
        assert!(!is_business_day(d("2025-04-13"))); // Sunday
    }

    #[test]
    fn next_business_day_skips_weekend() {
        assert_eq!(next_business_day(d("2025-04-11")), d("2025-04-14")); // Fri -> Mon
        assert_eq!(next_business_day(d("2025-04-12")), d("2025-04-14")); // Sat -> Mon
        assert_eq!(next_business_day(d("2025-04-09")), d("2025-04-10")); // Wed -> Thu
    }

    #[test]
    fn on_or_after_is_identity_on_weekdays() {
        assert_eq!(first_business_day_on_or_after(d("2025-04-10")), d("2025-04-10"));
        assert_eq!(first_business_day_on_or_after(d("2025-04-13")), d("2025-04-14"));
    }
}
