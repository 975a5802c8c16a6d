// src/lib.rs
//
// Time & billing reconciliation engine for consulting service reports.
//
// The pure core (entry distribution, progress/margin reconciliation,
// recipient resolution) never does I/O; the batcher and the billing service
// reach the outside world only through the `RecordStore`, `DocumentRenderer`
// and `MailSender` traits.

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod billing_service;
pub mod business_days;
pub mod config;
pub mod distributor;
pub mod models;
pub mod recipients;
pub mod reconcile;
pub mod report_batcher;
pub mod store;

mod distributor_tests;

pub use billing_service::BillingService;
pub use config::DistributorConfig;
pub use distributor::{distribute, ClaimError};
pub use models::{
    Demand, EntryMeta, HoursClaim, RecipientGroup, ReportMeta, Requester, ServiceRecord, TimeEntry,
};
pub use recipients::{resolve, ResolvedRecipient, RosterError};
pub use reconcile::{margin, progress, MarginReport, ProgressReport, Severity};
pub use report_batcher::{batch, DispatchSummary, DocumentRenderer, MailSender};
pub use store::{DemandHours, MemoryStore, RecordFilters, RecordStore, StoreError};

/// Installs a global fmt subscriber. `RUST_LOG` takes precedence; defaults
/// to INFO. Safe to call more than once (later calls are no-ops).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
