// src/distributor.rs
//
// Turns a lump "total hours" claim into discrete, business-day-bounded time
// entries. Pure: same claim in, same entries out, input never mutated.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::debug;

use crate::business_days::{first_business_day_on_or_after, is_business_day};
use crate::config::DistributorConfig;
use crate::models::{EntryError, HoursClaim, TimeEntry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("claim total hours must be positive, got {0}")]
    NonPositiveHours(Decimal),
    #[error("claim is missing a start date")]
    MissingStartDate,
    #[error("date calculation overflow while distributing entries")]
    DateOverflow,
    #[error(transparent)]
    Entry(#[from] EntryError),
}

/// Distributes `claim.total_hours` into time entries.
///
/// Claims at or under the split threshold become a single entry on the first
/// business day on or after the start date. Larger claims are split into
/// per-business-day entries of at most `daily_cap_hours` each, in
/// chronological order, with weekends never allocated.
pub fn distribute(
    claim: &HoursClaim,
    config: &DistributorConfig,
) -> Result<Vec<TimeEntry>, ClaimError> {
    if claim.total_hours <= Decimal::ZERO {
        return Err(ClaimError::NonPositiveHours(claim.total_hours));
    }
    let start_date = claim.start_date.ok_or(ClaimError::MissingStartDate)?;

    let mut entries = Vec::new();
    if claim.total_hours <= config.single_entry_max_hours {
        let date = first_business_day_on_or_after(start_date);
        entries.push(build_entry(claim, config, date, claim.total_hours)?);
    } else {
        let mut remaining = claim.total_hours;
        let mut date = start_date;
        while remaining > Decimal::ZERO {
            if !is_business_day(date) {
                date = date.succ_opt().ok_or(ClaimError::DateOverflow)?;
                continue;
            }
            let allocated = remaining.min(config.daily_cap_hours);
            entries.push(build_entry(claim, config, date, allocated)?);
            remaining -= allocated;
            date = date.succ_opt().ok_or(ClaimError::DateOverflow)?;
        }
    }

    debug!(
        "Distributed {}h starting {} into {} entries",
        claim.total_hours,
        start_date,
        entries.len()
    );
    Ok(entries)
}

fn build_entry(
    claim: &HoursClaim,
    config: &DistributorConfig,
    date: NaiveDate,
    hours: Decimal,
) -> Result<TimeEntry, ClaimError> {
    let start = NaiveTime::from_hms_opt(config.workday_start_hour, 0, 0)
        .ok_or(ClaimError::DateOverflow)?;
    let end = end_time_for(config.workday_start_hour, hours);
    Ok(TimeEntry::new(
        date,
        start,
        end,
        claim.hourly_rate,
        claim.meta.clone(),
    )?)
}

/// Computes the wall-clock end time for `hours` of work from the workday
/// start. Minutes come from the fractional part rounded to the nearest
/// integer, with 60-minute overflow rolled into the hour.
///
/// An end time at or past 24:00 is clamped to 23:00. This silently shortens
/// the entry below the claimed hours; it is long-standing behavior the
/// reports depend on, kept until product decides otherwise.
fn end_time_for(start_hour: u32, hours: Decimal) -> NaiveTime {
    let whole = hours.trunc().to_u32().unwrap_or(0);
    let mut minute = (hours.fract() * dec!(60))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0);
    let mut hour = start_hour + whole;
    if minute >= 60 {
        hour += 1;
        minute -= 60;
    }
    if hour >= 24 {
        hour = 23;
        minute = 0;
    }
    NaiveTime::from_hms_opt(hour, minute, 0).expect("hour < 24 and minute < 60 after carry")
}
