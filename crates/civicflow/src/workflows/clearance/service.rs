use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::catalog::CatalogSet;
use super::domain::{
    ApplicationId, ApplicationKind, ApplicationStatus, ApprovalRecord,
};
use super::evaluation::{assessed_fees, evaluate, ApplicationState};
use super::gate::{decide, ProgressionDecision, ProgressionState};
use super::repository::{
    ApplicationRecord, LedgerRepository, NotifyError, ProgressNotifier, RepositoryError,
    WorkflowNotice,
};

/// Service composing the catalog set, ledger repository, and progression
/// gate into the workflow the portal's departments drive.
pub struct ClearanceWorkflowService<R, N> {
    catalogs: CatalogSet,
    repository: Arc<R>,
    notifier: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R, N> ClearanceWorkflowService<R, N>
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, catalogs: CatalogSet) -> Self {
        Self {
            catalogs,
            repository,
            notifier,
        }
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    /// Open a new application with an empty ledger.
    pub fn open(&self, kind: ApplicationKind) -> Result<ApplicationRecord, WorkflowServiceError> {
        let record = ApplicationRecord {
            application_id: next_application_id(),
            kind,
            status: ApplicationStatus::Submitted,
            ledger: Vec::new(),
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Record one department's decision and recompute the progression.
    ///
    /// The caller must have authorized the deciding official for the
    /// clearance beforehand; the core assumes submitted records are
    /// pre-authorized. Once the application is paid or released the
    /// ledger is closed and further decisions are refused.
    pub fn record_decision(
        &self,
        application_id: &ApplicationId,
        decision: ApprovalRecord,
    ) -> Result<DecisionOutcome, WorkflowServiceError> {
        let current = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        if matches!(
            current.status,
            ApplicationStatus::Paid | ApplicationStatus::Released
        ) {
            return Err(WorkflowServiceError::ClosedLedger {
                status: current.status,
            });
        }

        let record = self.repository.append_decision(application_id, decision)?;

        let catalog = self.catalogs.for_kind(record.kind);
        let state = evaluate(catalog, &record.ledger);
        let progression = decide(&state);

        let status = match progression.state {
            ProgressionState::InProgress => ApplicationStatus::InProgress,
            ProgressionState::ReadyForPayment => ApplicationStatus::ReadyForPayment,
            ProgressionState::Rejected => ApplicationStatus::Rejected,
        };
        if status != record.status {
            self.repository.update_status(application_id, status)?;
        }

        match progression.state {
            ProgressionState::ReadyForPayment => {
                let mut details = BTreeMap::new();
                details.insert(
                    "assessed_fees".to_string(),
                    format!("{:.2}", assessed_fees(&record.ledger)),
                );
                self.notifier.publish(WorkflowNotice {
                    template: "ready_for_payment".to_string(),
                    application_id: record.application_id.clone(),
                    details,
                })?;
            }
            ProgressionState::Rejected => {
                let mut details = BTreeMap::new();
                details.insert(
                    "rejected".to_string(),
                    progression
                        .rejected
                        .iter()
                        .map(|clearance| clearance.label())
                        .collect::<Vec<_>>()
                        .join(","),
                );
                self.notifier.publish(WorkflowNotice {
                    template: "assessment_rejected".to_string(),
                    application_id: record.application_id.clone(),
                    details,
                })?;
            }
            ProgressionState::InProgress => {}
        }

        Ok(DecisionOutcome {
            application_id: record.application_id,
            status,
            state,
            decision: progression,
        })
    }

    /// Fetch an application and its freshly evaluated progress.
    pub fn progress(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationProgress, WorkflowServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;

        let catalog = self.catalogs.for_kind(record.kind);
        let state = evaluate(catalog, &record.ledger);
        let decision = decide(&state);
        let fees = assessed_fees(&record.ledger);

        Ok(ApplicationProgress {
            application_id: record.application_id,
            kind: record.kind,
            status: record.status,
            state,
            decision,
            assessed_fees: fees,
        })
    }

    /// Mark the assessed fees as paid. Driven by the payment subsystem once
    /// the gate reports `READY_FOR_PAYMENT`.
    pub fn mark_paid(&self, application_id: &ApplicationId) -> Result<(), WorkflowServiceError> {
        self.transition(application_id, ApplicationStatus::ReadyForPayment, ApplicationStatus::Paid)
    }

    /// Mark the certificate as released after payment.
    pub fn mark_released(
        &self,
        application_id: &ApplicationId,
    ) -> Result<(), WorkflowServiceError> {
        self.transition(application_id, ApplicationStatus::Paid, ApplicationStatus::Released)
    }

    fn transition(
        &self,
        application_id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<(), WorkflowServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status != expected {
            return Err(WorkflowServiceError::InvalidTransition {
                from: record.status,
                to: next,
            });
        }

        self.repository.update_status(application_id, next)?;
        Ok(())
    }
}

/// Outcome returned to the caller that submitted a decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionOutcome {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    pub state: ApplicationState,
    pub decision: ProgressionDecision,
}

/// Read model for one application's progress through the clearances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationProgress {
    pub application_id: ApplicationId,
    pub kind: ApplicationKind,
    pub status: ApplicationStatus,
    pub state: ApplicationState,
    pub decision: ProgressionDecision,
    pub assessed_fees: f64,
}

/// Error raised by the workflow service.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("cannot move from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("ledger is closed for a {} application", .status.label())]
    ClosedLedger { status: ApplicationStatus },
}
