// src/models.rs
//
// Core records for the time & billing engine. All hour and money figures are
// `Decimal` (never floats), all dates are date-only `NaiveDate`.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry end time {end} is not after start time {start}")]
    EndNotAfterStart { start: NaiveTime, end: NaiveTime },
    #[error("entry hourly rate {0} is negative")]
    NegativeRate(Decimal),
}

/// Metadata shared by every entry generated from one claim: which client the
/// work was for, who asked for it, and how it was channelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub client_id: String,
    pub requester_name: String,
    pub demand_id: Option<String>,
    pub channel: Option<String>,
    pub activity: Option<String>,
    pub status: Option<String>,
}

/// One dated, time-bounded unit of logged billable work.
///
/// `derived_hours` and `derived_amount` are always recomputed from the
/// start/end pair; they are never accepted as independent input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hourly_rate: Decimal,
    pub meta: EntryMeta,
}

impl TimeEntry {
    pub fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        hourly_rate: Decimal,
        meta: EntryMeta,
    ) -> Result<Self, EntryError> {
        if end_time <= start_time {
            return Err(EntryError::EndNotAfterStart {
                start: start_time,
                end: end_time,
            });
        }
        if hourly_rate < Decimal::ZERO {
            return Err(EntryError::NegativeRate(hourly_rate));
        }
        Ok(Self {
            date,
            start_time,
            end_time,
            hourly_rate,
            meta,
        })
    }

    /// Duration of the entry in decimal hours, recomputed from the wall-clock
    /// bounds (minute precision).
    pub fn derived_hours(&self) -> Decimal {
        let minutes = (self.end_time - self.start_time).num_minutes();
        Decimal::from(minutes) / dec!(60)
    }

    pub fn derived_amount(&self) -> Decimal {
        self.derived_hours() * self.hourly_rate
    }
}

/// Transient input from the UI: a lump "total hours" figure the distributor
/// turns into discrete entries. Never persisted as-is.
///
/// `start_date` stays optional at this boundary: a claim arriving without one
/// is rejected by the distributor rather than made unrepresentable, since the
/// form can submit it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursClaim {
    pub total_hours: Decimal,
    pub start_date: Option<NaiveDate>,
    pub hourly_rate: Decimal,
    pub meta: EntryMeta,
}

/// A scoped unit of client work. Sold hours (revenue side) and estimated
/// hours (cost side) are tracked separately and never assumed equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub id: String,
    pub client_id: String,
    pub estimated_hours: Decimal,
    pub sold_hours: Decimal,
    pub sale_price: Decimal,
    pub internal_hourly_cost: Decimal,
}

/// A person at a client who can request work. The hierarchy is flat:
/// a coordinator never points at another coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub is_coordinator: bool,
    pub coordinator_id: Option<String>,
    pub active: bool,
}

/// One filtered service record carried into a report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub date: NaiveDate,
    pub requester_name: String,
    pub demand_id: Option<String>,
    pub activity: Option<String>,
    pub status: Option<String>,
    pub hours: Decimal,
    pub amount: Decimal,
}

/// Client metadata handed opaquely to the document renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub client_id: String,
    pub client_name: String,
}

/// The records and CC addresses resolved to a single outbound report
/// recipient. Built per report run, discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientGroup {
    pub recipient_email: String,
    pub cc_emails: BTreeSet<String>,
    pub entries: Vec<ServiceRecord>,
}

impl RecipientGroup {
    pub fn new(recipient_email: String) -> Self {
        Self {
            recipient_email,
            cc_emails: BTreeSet::new(),
            entries: Vec::new(),
        }
    }
}
