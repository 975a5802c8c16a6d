// src/store.rs
//
// Contract for the external record store. Persistence lives behind this
// trait; the engine only moves plain records across it. `insert_time_entries`
// is all-or-nothing from the engine's perspective: a partial insert is a
// store failure mode, not something the engine compensates for.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::models::{Demand, Requester, ServiceRecord, TimeEntry};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("demand not found: {0}")]
    DemandNotFound(String),
    #[error("insert rejected, no entries were persisted: {0}")]
    InsertRejected(String),
}

/// Filter shape the report screen sends when listing service records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilters {
    pub demand_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<String>,
}

/// A demand's hour figures as stored: estimated (cost side) and sold
/// (revenue side), tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandHours {
    pub estimated: Decimal,
    pub sold: Decimal,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_service_records(
        &self,
        client_id: &str,
        filters: &RecordFilters,
    ) -> Result<Vec<ServiceRecord>, StoreError>;

    async fn list_requesters(&self, client_id: &str) -> Result<Vec<Requester>, StoreError>;

    async fn get_demand_hours(&self, demand_id: &str) -> Result<DemandHours, StoreError>;

    /// Live sum of derived hours over the entries referencing this demand.
    /// Never cached: progress always reflects the current entry set.
    async fn sum_logged_hours(&self, demand_id: &str) -> Result<Decimal, StoreError>;

    async fn insert_time_entries(&self, entries: Vec<TimeEntry>) -> Result<(), StoreError>;
}

/// In-memory store used in tests and local runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    service_records: HashMap<String, Vec<ServiceRecord>>,
    requesters: HashMap<String, Vec<Requester>>,
    demands: HashMap<String, Demand>,
    time_entries: Vec<TimeEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_service_records(&self, client_id: &str, records: Vec<ServiceRecord>) {
        let mut inner = self.inner.lock().expect("memory store lock");
        inner
            .service_records
            .entry(client_id.to_string())
            .or_default()
            .extend(records);
    }

    pub fn seed_requesters(&self, client_id: &str, roster: Vec<Requester>) {
        let mut inner = self.inner.lock().expect("memory store lock");
        inner.requesters.insert(client_id.to_string(), roster);
    }

    pub fn seed_demand(&self, demand: Demand) {
        let mut inner = self.inner.lock().expect("memory store lock");
        inner.demands.insert(demand.id.clone(), demand);
    }

    pub fn time_entries(&self) -> Vec<TimeEntry> {
        self.inner
            .lock()
            .expect("memory store lock")
            .time_entries
            .clone()
    }
}

fn matches_filters(record: &ServiceRecord, filters: &RecordFilters) -> bool {
    if let Some(demand_id) = &filters.demand_id {
        if record.demand_id.as_ref() != Some(demand_id) {
            return false;
        }
    }
    if let Some(from) = filters.date_from {
        if record.date < from {
            return false;
        }
    }
    if let Some(to) = filters.date_to {
        if record.date > to {
            return false;
        }
    }
    if let Some(status) = &filters.status {
        if record.status.as_ref() != Some(status) {
            return false;
        }
    }
    true
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_service_records(
        &self,
        client_id: &str,
        filters: &RecordFilters,
    ) -> Result<Vec<ServiceRecord>, StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        Ok(inner
            .service_records
            .get(client_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| matches_filters(r, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_requesters(&self, client_id: &str) -> Result<Vec<Requester>, StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        Ok(inner.requesters.get(client_id).cloned().unwrap_or_default())
    }

    async fn get_demand_hours(&self, demand_id: &str) -> Result<DemandHours, StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        inner
            .demands
            .get(demand_id)
            .map(|d| DemandHours {
                estimated: d.estimated_hours,
                sold: d.sold_hours,
            })
            .ok_or_else(|| StoreError::DemandNotFound(demand_id.to_string()))
    }

    async fn sum_logged_hours(&self, demand_id: &str) -> Result<Decimal, StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        Ok(inner
            .time_entries
            .iter()
            .filter(|e| e.meta.demand_id.as_deref() == Some(demand_id))
            .map(|e| e.derived_hours())
            .sum())
    }

    async fn insert_time_entries(&self, entries: Vec<TimeEntry>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store lock");
        inner.time_entries.extend(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_deserialize_from_ui_payload() {
        let filters: RecordFilters = serde_json::from_str(
            r#"{"demand_id":"d-1","date_from":"2025-04-01","date_to":null,"status":"done"}"#,
        )
        .expect("valid filter payload");
        assert_eq!(filters.demand_id.as_deref(), Some("d-1"));
        assert_eq!(filters.date_from, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(filters.date_to, None);
        assert_eq!(filters.status.as_deref(), Some("done"));
    }
}
