// src/distributor_tests.rs

#[cfg(test)]
mod tests {
    use crate::business_days::is_business_day;
    use crate::config::DistributorConfig;
    use crate::distributor::{distribute, ClaimError};
    use crate::models::{EntryMeta, HoursClaim};
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid test time")
    }

    fn meta() -> EntryMeta {
        EntryMeta {
            client_id: "acme".to_string(),
            requester_name: "Alice".to_string(),
            demand_id: Some("d-1".to_string()),
            channel: Some("email".to_string()),
            activity: Some("support".to_string()),
            status: Some("open".to_string()),
        }
    }

    fn claim(total_hours: Decimal, start: &str) -> HoursClaim {
        HoursClaim {
            total_hours,
            start_date: Some(d(start)),
            hourly_rate: dec!(120),
            meta: meta(),
        }
    }

    fn config() -> DistributorConfig {
        DistributorConfig::default()
    }

    #[test]
    fn single_entry_for_whole_hours() {
        let entries = distribute(&claim(dec!(8), "2025-04-09"), &config()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, d("2025-04-09"));
        assert_eq!(entries[0].start_time, t(9, 0));
        assert_eq!(entries[0].end_time, t(17, 0));
        assert_eq!(entries[0].derived_hours(), dec!(8));
        assert_eq!(entries[0].hourly_rate, dec!(120));
        assert_eq!(entries[0].meta, meta());
    }

    #[test]
    fn single_entry_fractional_hours_round_to_minutes() {
        let entries = distribute(&claim(dec!(7.5), "2025-04-09"), &config()).unwrap();
        assert_eq!(entries[0].end_time, t(16, 30));
        assert_eq!(entries[0].derived_hours(), dec!(7.5));
    }

    #[test]
    fn minute_rounding_carries_into_the_hour() {
        // 0.999h -> 59.94 minutes -> rounds to 60 -> rolls into the hour.
        let entries = distribute(&claim(dec!(2.999), "2025-04-09"), &config()).unwrap();
        assert_eq!(entries[0].end_time, t(12, 0));
        assert_eq!(entries[0].derived_hours(), dec!(3));
    }

    #[test]
    fn end_time_past_midnight_clamps_to_23() {
        // 09:00 + 15h would be 24:00; clamped, shortening the entry below the
        // claimed total. Long-standing behavior, pinned deliberately.
        let entries = distribute(&claim(dec!(15), "2025-04-09"), &config()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].end_time, t(23, 0));
        assert_eq!(entries[0].derived_hours(), dec!(14));

        let entries = distribute(&claim(dec!(24), "2025-04-09"), &config()).unwrap();
        assert_eq!(entries[0].end_time, t(23, 0));
    }

    #[test]
    fn single_entry_never_lands_on_a_weekend() {
        // Saturday start rolls forward to Monday.
        let entries = distribute(&claim(dec!(8), "2025-04-12"), &config()).unwrap();
        assert_eq!(entries[0].date, d("2025-04-14"));

        let entries = distribute(&claim(dec!(8), "2025-04-13"), &config()).unwrap();
        assert_eq!(entries[0].date, d("2025-04-14"));
    }

    #[test]
    fn bulk_claim_splits_into_daily_capped_entries() {
        let entries = distribute(&claim(dec!(25), "2025-04-07"), &config()).unwrap();
        assert_eq!(entries.len(), 4);
        let dates: Vec<_> = entries.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                d("2025-04-07"),
                d("2025-04-08"),
                d("2025-04-09"),
                d("2025-04-10")
            ]
        );
        let hours: Vec<_> = entries.iter().map(|e| e.derived_hours()).collect();
        assert_eq!(hours, vec![dec!(8), dec!(8), dec!(8), dec!(1)]);
    }

    #[test]
    fn bulk_claim_skips_weekends() {
        // 30h from a Friday: Fri 8, (weekend skipped), Mon 8, Tue 8, Wed 6.
        let entries = distribute(&claim(dec!(30), "2025-04-11"), &config()).unwrap();
        let dates: Vec<_> = entries.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                d("2025-04-11"),
                d("2025-04-14"),
                d("2025-04-15"),
                d("2025-04-16")
            ]
        );
        assert!(entries.iter().all(|e| is_business_day(e.date)));
        let total: Decimal = entries.iter().map(|e| e.derived_hours()).sum();
        assert_eq!(total, dec!(30));
    }

    #[test]
    fn bulk_claim_starting_on_weekend_begins_monday() {
        let entries = distribute(&claim(dec!(26), "2025-04-12"), &config()).unwrap();
        assert_eq!(entries[0].date, d("2025-04-14"));
        assert!(entries.iter().all(|e| is_business_day(e.date)));
        let total: Decimal = entries.iter().map(|e| e.derived_hours()).sum();
        assert_eq!(total, dec!(26));
    }

    #[test]
    fn bulk_claim_sum_is_exact_for_fractional_totals() {
        let entries = distribute(&claim(dec!(25.5), "2025-04-07"), &config()).unwrap();
        let total: Decimal = entries.iter().map(|e| e.derived_hours()).sum();
        assert_eq!(total, dec!(25.5));
        assert!(entries
            .iter()
            .all(|e| e.derived_hours() <= config().daily_cap_hours));
    }

    #[test]
    fn entries_are_chronological() {
        let entries = distribute(&claim(dec!(40), "2025-04-07"), &config()).unwrap();
        for pair in entries.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn non_positive_hours_rejected() {
        let err = distribute(&claim(Decimal::ZERO, "2025-04-07"), &config()).unwrap_err();
        assert_eq!(err, ClaimError::NonPositiveHours(Decimal::ZERO));

        let err = distribute(&claim(dec!(-4), "2025-04-07"), &config()).unwrap_err();
        assert!(matches!(err, ClaimError::NonPositiveHours(_)));
    }

    #[test]
    fn missing_start_date_rejected() {
        let mut claim = claim(dec!(8), "2025-04-07");
        claim.start_date = None;
        let err = distribute(&claim, &config()).unwrap_err();
        assert_eq!(err, ClaimError::MissingStartDate);
    }

    #[test]
    fn distribution_is_idempotent() {
        let claim = claim(dec!(33.25), "2025-04-09");
        let first = distribute(&claim, &config()).unwrap();
        let second = distribute(&claim, &config()).unwrap();
        assert_eq!(first, second);
    }
}
