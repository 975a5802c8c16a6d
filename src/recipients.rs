// src/recipients.rs
//
// Recipient resolution over a client's requester roster, plus the roster
// invariants themselves (flat two-level hierarchy, soft-delete guard).

use thiserror::Error;
use tracing::debug;

use crate::models::Requester;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("requester not found: {id}")]
    NotFound { id: String },
    #[error("coordinator {id} must not point at another coordinator ({coordinator_id})")]
    CoordinatorHasCoordinator { id: String, coordinator_id: String },
    #[error("requester {id} points at unknown coordinator {coordinator_id}")]
    UnknownCoordinator { id: String, coordinator_id: String },
    #[error("requester {id} points at {coordinator_id}, who is not a coordinator")]
    NotACoordinator { id: String, coordinator_id: String },
    #[error("coordinator {id} still has {count} active subordinate(s)")]
    HasActiveSubordinates { id: String, count: usize },
}

/// Where a report for one requester should go. `to = None` means the record
/// is undeliverable; resolution never fails, the caller counts these as
/// skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRecipient {
    pub to: Option<String>,
    pub cc: Option<String>,
}

impl ResolvedRecipient {
    fn unresolved() -> Self {
        Self::default()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Resolves the effective recipient for `requester_name`.
///
/// A requester with a coordinator escalates: the report goes to the
/// coordinator and the requester is CC'd. A coordinator link that cannot
/// produce an address (missing roster member, or coordinator without an
/// email on file) resolves to nothing rather than falling back to the
/// requester's own email; product has been asked whether that gap is
/// intended, and until then it is kept as-is.
pub fn resolve(requester_name: &str, roster: &[Requester]) -> ResolvedRecipient {
    let wanted = normalize(requester_name);
    let Some(requester) = roster
        .iter()
        .find(|r| r.active && normalize(&r.name) == wanted)
    else {
        debug!("No active requester matched '{}'", requester_name);
        return ResolvedRecipient::unresolved();
    };

    if let Some(coordinator_id) = &requester.coordinator_id {
        let coordinator = roster.iter().find(|r| &r.id == coordinator_id);
        return match coordinator.and_then(|c| c.email.clone()) {
            Some(to) => ResolvedRecipient {
                to: Some(to),
                cc: requester.email.clone(),
            },
            None => {
                debug!(
                    "Requester '{}' has coordinator link {} but no coordinator email; unresolved",
                    requester.name, coordinator_id
                );
                ResolvedRecipient::unresolved()
            }
        };
    }

    ResolvedRecipient {
        to: requester.email.clone(),
        cc: None,
    }
}

/// Checks the flat-hierarchy invariants over a whole roster: no coordinator
/// points upward, and every coordinator link lands on an actual coordinator.
pub fn validate_roster(roster: &[Requester]) -> Result<(), RosterError> {
    for requester in roster {
        let Some(coordinator_id) = &requester.coordinator_id else {
            continue;
        };
        if requester.is_coordinator {
            return Err(RosterError::CoordinatorHasCoordinator {
                id: requester.id.clone(),
                coordinator_id: coordinator_id.clone(),
            });
        }
        match roster.iter().find(|r| &r.id == coordinator_id) {
            None => {
                return Err(RosterError::UnknownCoordinator {
                    id: requester.id.clone(),
                    coordinator_id: coordinator_id.clone(),
                })
            }
            Some(target) if !target.is_coordinator => {
                return Err(RosterError::NotACoordinator {
                    id: requester.id.clone(),
                    coordinator_id: coordinator_id.clone(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Soft-deletes a requester. Deactivating a coordinator that still has
/// active subordinates is rejected.
pub fn deactivate(roster: &mut [Requester], requester_id: &str) -> Result<(), RosterError> {
    let Some(index) = roster.iter().position(|r| r.id == requester_id) else {
        return Err(RosterError::NotFound {
            id: requester_id.to_string(),
        });
    };
    if roster[index].is_coordinator {
        let count = roster
            .iter()
            .filter(|r| r.active && r.coordinator_id.as_deref() == Some(requester_id))
            .count();
        if count > 0 {
            return Err(RosterError::HasActiveSubordinates {
                id: requester_id.to_string(),
                count,
            });
        }
    }
    roster[index].active = false;
    Ok(())
}
