//! Multi-department clearance workflow for permit and business applications.
//!
//! An ordered catalog of required clearances gates each application; each
//! department independently approves or rejects its own clearance, and the
//! pure evaluator plus progression gate decide whether the application keeps
//! collecting decisions, advances to tax payment, or halts on a rejection.

pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod gate;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    standard_catalog, CatalogError, CatalogSet, ClearanceCatalog, BUILDING_PERMIT_CLEARANCES,
    NEW_BUSINESS_CLEARANCES,
};
pub use domain::{
    ApplicationId, ApplicationKind, ApplicationStatus, ApprovalRecord, ClearanceType, OfficialRef,
};
pub use evaluation::{assessed_fees, evaluate, ApplicationState};
pub use gate::{decide, ProgressionDecision, ProgressionState};
pub use repository::{
    ApplicationRecord, LedgerRepository, NotifyError, ProgressNotifier, RepositoryError,
    WorkflowNotice,
};
pub use router::clearance_router;
pub use schema::{evaluate_snapshot, parse_ledger, LedgerWarning, ParsedLedger, SnapshotEvaluation};
pub use service::{
    ApplicationProgress, ClearanceWorkflowService, DecisionOutcome, WorkflowServiceError,
};
