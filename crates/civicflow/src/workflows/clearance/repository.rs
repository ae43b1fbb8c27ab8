use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationId, ApplicationKind, ApplicationStatus, ApprovalRecord, ClearanceType,
};

/// Stored record for one application: identity, lifecycle status, and the
/// append-only decision ledger retained as an audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub kind: ApplicationKind,
    pub status: ApplicationStatus,
    pub ledger: Vec<ApprovalRecord>,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations must guarantee at most one committed decision per
/// `(application, clearance_type)`; the evaluator only reads and cannot
/// enforce that itself.
pub trait LedgerRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;

    /// Append a decision and return the refreshed record, so callers always
    /// recompute state from what was actually committed.
    fn append_decision(
        &self,
        id: &ApplicationId,
        decision: ApprovalRecord,
    ) -> Result<ApplicationRecord, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("decision already recorded for {}", .clearance.label())]
    DuplicateDecision { clearance: ClearanceType },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when an application reaches a phase another
/// subsystem acts on (tax payment, certificate release, revision notice).
pub trait ProgressNotifier: Send + Sync {
    fn publish(&self, notice: WorkflowNotice) -> Result<(), NotifyError>;
}

/// Notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNotice {
    pub template: String,
    pub application_id: ApplicationId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
