// src/billing_service.rs
//
// Service layer over the pure engine: persists distributed entries, computes
// live demand metrics, and runs report dispatch against the external
// collaborators. Holds no cross-call state; callers serialize report
// generation per client.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::DistributorConfig;
use crate::distributor::distribute;
use crate::models::{Demand, HoursClaim, ReportMeta};
use crate::reconcile::{margin, progress, MarginReport, ProgressReport};
use crate::report_batcher::{batch, DispatchSummary, DocumentRenderer, MailSender};
use crate::store::{RecordFilters, RecordStore};

pub struct BillingService {
    store: Arc<dyn RecordStore>,
    renderer: Arc<dyn DocumentRenderer>,
    sender: Arc<dyn MailSender>,
    config: DistributorConfig,
}

impl BillingService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn DocumentRenderer>,
        sender: Arc<dyn MailSender>,
    ) -> Self {
        Self::with_config(store, renderer, sender, DistributorConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn DocumentRenderer>,
        sender: Arc<dyn MailSender>,
        config: DistributorConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            sender,
            config,
        }
    }

    /// Distributes a claim into entries and persists them. Returns how many
    /// entries were created. The insert is all-or-nothing per the store
    /// contract; a rejected claim produces nothing.
    pub async fn log_hours_claim(&self, claim: &HoursClaim) -> Result<usize> {
        let entries = distribute(claim, &self.config)
            .with_context(|| format!("distributing claim for client {}", claim.meta.client_id))?;
        let count = entries.len();
        self.store
            .insert_time_entries(entries)
            .await
            .context("persisting distributed time entries")?;
        info!(
            "Logged {} time entries from a {}h claim for client {}",
            count, claim.total_hours, claim.meta.client_id
        );
        Ok(count)
    }

    /// Utilization metrics for a demand, computed against the live entry set.
    pub async fn demand_progress(&self, demand_id: &str) -> Result<ProgressReport> {
        let hours = self
            .store
            .get_demand_hours(demand_id)
            .await
            .with_context(|| format!("loading hour figures for demand {demand_id}"))?;
        let logged = self
            .store
            .sum_logged_hours(demand_id)
            .await
            .with_context(|| format!("summing logged hours for demand {demand_id}"))?;
        Ok(progress(hours.estimated, logged))
    }

    /// Profitability metrics over a demand's stored financial figures.
    pub fn demand_margin(&self, demand: &Demand) -> MarginReport {
        margin(
            demand.sale_price,
            demand.estimated_hours,
            demand.internal_hourly_cost,
        )
    }

    /// Pulls the filtered records and requester roster for one client and
    /// runs a full report batch. Per-group failures are tallied in the
    /// summary, never raised.
    pub async fn send_report(
        &self,
        client_id: &str,
        filters: &RecordFilters,
        meta: &ReportMeta,
    ) -> Result<DispatchSummary> {
        let records = self
            .store
            .list_service_records(client_id, filters)
            .await
            .with_context(|| format!("listing service records for client {client_id}"))?;
        let roster = self
            .store
            .list_requesters(client_id)
            .await
            .with_context(|| format!("listing requesters for client {client_id}"))?;
        info!(
            "Generating report for client {}: {} record(s), roster of {}",
            client_id,
            records.len(),
            roster.len()
        );
        let summary = batch(
            records,
            &roster,
            meta,
            self.renderer.as_ref(),
            self.sender.as_ref(),
        )
        .await;
        info!("{}", summary.feedback());
        Ok(summary)
    }
}
