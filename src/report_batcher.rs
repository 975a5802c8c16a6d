// src/report_batcher.rs
//
// Groups filtered service records by resolved recipient and dispatches one
// rendered document per group through the external renderer and mail sender.
// Groups are dispatched strictly one at a time, in formation order, and a
// failing group never blocks delivery to the rest.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::{RecipientGroup, ReportMeta, Requester, ServiceRecord};
use crate::recipients;

/// Renders a report document for one recipient group. Black box: the engine
/// never inspects the bytes.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(
        &self,
        entries: &[ServiceRecord],
        meta: &ReportMeta,
    ) -> anyhow::Result<Vec<u8>>;
}

/// Delivers a rendered report. `Ok(false)` means the transport accepted the
/// call but the send did not go through; the engine does not retry either way.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, cc: &[String], attachment: &[u8]) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub sent_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
}

impl DispatchSummary {
    /// The caller-facing feedback line shown after a report run.
    pub fn feedback(&self) -> String {
        format!(
            "Sent: {}. {} records had no destination email.",
            self.sent_count, self.skipped_count
        )
    }
}

/// Resolves each record's recipient and groups records by the resolved
/// address, in first-seen order. Grouping keys are the exact address string;
/// addresses differing only in case or whitespace form distinct groups, as
/// they always have. Returns the groups and how many records were dropped
/// for having no destination.
pub fn group(records: Vec<ServiceRecord>, roster: &[Requester]) -> (Vec<RecipientGroup>, usize) {
    let mut groups: Vec<RecipientGroup> = Vec::new();
    let mut index_by_email: HashMap<String, usize> = HashMap::new();
    let mut skipped_count = 0;

    for record in records {
        let resolved = recipients::resolve(&record.requester_name, roster);
        let Some(to) = resolved.to else {
            skipped_count += 1;
            continue;
        };
        let index = *index_by_email.entry(to.clone()).or_insert_with(|| {
            groups.push(RecipientGroup::new(to));
            groups.len() - 1
        });
        if let Some(cc) = resolved.cc {
            groups[index].cc_emails.insert(cc);
        }
        groups[index].entries.push(record);
    }

    (groups, skipped_count)
}

/// Dispatches groups sequentially, awaiting each render+send to completion
/// before starting the next. Render errors, send errors and `send == false`
/// all tally the group as failed and the loop continues; there is no retry
/// and no mid-batch cancellation.
pub async fn dispatch(
    groups: Vec<RecipientGroup>,
    meta: &ReportMeta,
    renderer: &dyn DocumentRenderer,
    sender: &dyn MailSender,
) -> (usize, usize) {
    let mut sent_count = 0;
    let mut failed_count = 0;

    for group in groups {
        let document = match renderer.render(&group.entries, meta).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    "Render failed for recipient {} ({} entries): {:#}",
                    group.recipient_email,
                    group.entries.len(),
                    e
                );
                failed_count += 1;
                continue;
            }
        };

        let cc: Vec<String> = group.cc_emails.iter().cloned().collect();
        match sender.send(&group.recipient_email, &cc, &document).await {
            Ok(true) => {
                info!(
                    "Report sent to {} ({} entries, {} cc)",
                    group.recipient_email,
                    group.entries.len(),
                    cc.len()
                );
                sent_count += 1;
            }
            Ok(false) => {
                warn!("Send reported failure for {}", group.recipient_email);
                failed_count += 1;
            }
            Err(e) => {
                warn!("Send errored for {}: {:#}", group.recipient_email, e);
                failed_count += 1;
            }
        }
    }

    (sent_count, failed_count)
}

/// One full report run over pre-filtered records for a single client:
/// group, then dispatch, then summarize. Holds no state between runs;
/// callers serialize report generation per client.
pub async fn batch(
    records: Vec<ServiceRecord>,
    roster: &[Requester],
    meta: &ReportMeta,
    renderer: &dyn DocumentRenderer,
    sender: &dyn MailSender,
) -> DispatchSummary {
    let (groups, skipped_count) = group(records, roster);
    info!(
        "Batched {} recipient group(s) for client {} ({} record(s) skipped)",
        groups.len(),
        meta.client_id,
        skipped_count
    );
    let (sent_count, failed_count) = dispatch(groups, meta, renderer, sender).await;
    DispatchSummary {
        sent_count,
        skipped_count,
        failed_count,
    }
}
