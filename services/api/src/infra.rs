use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use civicflow::workflows::clearance::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApprovalRecord, LedgerRepository,
    NotifyError, ProgressNotifier, RepositoryError, WorkflowNotice,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory ledger store. Enforces the one-decision-per-clearance
/// constraint the production store carries as a uniqueness index.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLedgerRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl LedgerRepository for InMemoryLedgerRepository {
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
pub(crate) struct InMemoryProgressNotifier {
    events: Arc<Mutex<Vec<WorkflowNotice>>>,
}

impl ProgressNotifier for InMemoryProgressNotifier {
    fn publish(&self, notice: WorkflowNotice) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryProgressNotifier {
    pub(crate) fn events(&self) -> Vec<WorkflowNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}
