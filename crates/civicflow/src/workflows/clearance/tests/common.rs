use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::clearance::catalog::{CatalogSet, ClearanceCatalog};
use crate::workflows::clearance::domain::{
    ApplicationId, ApplicationKind, ApplicationStatus, ApprovalRecord, ClearanceType, OfficialRef,
};
use crate::workflows::clearance::repository::{
    ApplicationRecord, LedgerRepository, NotifyError, ProgressNotifier, RepositoryError,
    WorkflowNotice,
};
use crate::workflows::clearance::router::clearance_router;
use crate::workflows::clearance::service::ClearanceWorkflowService;

pub(super) fn official() -> OfficialRef {
    OfficialRef {
        first_name: "Teresa".to_string(),
        last_name: "Abad".to_string(),
    }
}

pub(super) fn record(
    approval_type: ClearanceType,
    approved: bool,
    required: bool,
) -> ApprovalRecord {
    ApprovalRecord {
        approval_type,
        approved,
        required,
        remarks: None,
        fee: None,
        decided_by: official(),
        decided_at: Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).single().expect("valid"),
    }
}

pub(super) fn rejection(approval_type: ClearanceType, remarks: &str) -> ApprovalRecord {
    ApprovalRecord {
        remarks: Some(remarks.to_string()),
        ..record(approval_type, false, true)
    }
}

pub(super) fn catalog(entries: &[ClearanceType]) -> ClearanceCatalog {
    ClearanceCatalog::new(ApplicationKind::BuildingPermit, entries.to_vec())
        .expect("non-empty catalog")
}

pub(super) fn catalogs() -> CatalogSet {
    CatalogSet::standard().expect("standard catalogs")
}

pub(super) fn build_service() -> (
    ClearanceWorkflowService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service =
        ClearanceWorkflowService::new(repository.clone(), notifier.clone(), catalogs());
    (service, repository, notifier)
}

pub(super) fn router_with_service(
    service: ClearanceWorkflowService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    clearance_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl LedgerRepository for MemoryRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn append_decision(
        &self,
        id: &ApplicationId,
        decision: ApprovalRecord,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record
            .ledger
            .iter()
            .any(|existing| existing.approval_type == decision.approval_type)
        {
            return Err(RepositoryError::DuplicateDecision {
                clearance: decision.approval_type,
            });
        }
        record.ledger.push(decision);
        Ok(record.clone())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.status = status;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<WorkflowNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<WorkflowNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ProgressNotifier for MemoryNotifier {
    fn publish(&self, notice: WorkflowNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl LedgerRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_decision(
        &self,
        _id: &ApplicationId,
        _decision: ApprovalRecord,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
