use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicationId, ApplicationKind, ApprovalRecord, ClearanceType, OfficialRef,
};
use super::repository::{LedgerRepository, ProgressNotifier, RepositoryError};
use super::schema::evaluate_snapshot;
use super::service::{ClearanceWorkflowService, WorkflowServiceError};

/// Router builder exposing HTTP endpoints for the clearance workflow.
pub fn clearance_router<R, N>(service: Arc<ClearanceWorkflowService<R, N>>) -> Router
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    Router::new()
        .route("/api/v1/clearance/applications", post(open_handler::<R, N>))
        .route(
            "/api/v1/clearance/applications/:application_id",
            get(progress_handler::<R, N>),
        )
        .route(
            "/api/v1/clearance/applications/:application_id/decisions",
            post(decision_handler::<R, N>),
        )
        .route(
            "/api/v1/clearance/applications/:application_id/payment",
            post(payment_handler::<R, N>),
        )
        .route(
            "/api/v1/clearance/applications/:application_id/release",
            post(release_handler::<R, N>),
        )
        .route("/api/v1/clearance/evaluate", post(evaluate_handler::<R, N>))
        .route("/api/v1/clearance/catalogs/:kind", get(catalog_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct OpenApplicationRequest {
    pub kind: ApplicationKind,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub approval_type: ClearanceType,
    pub approved: bool,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub fee: Option<f64>,
    pub decided_by: OfficialRef,
    /// Defaults to the submission time; the evaluator itself never reads
    /// the clock.
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

fn default_required() -> bool {
    true
}

impl DecisionRequest {
    fn into_record(self) -> ApprovalRecord {
        ApprovalRecord {
            approval_type: self.approval_type,
            approved: self.approved,
            required: self.required,
            remarks: self.remarks,
            fee: self.fee,
            decided_by: self.decided_by,
            decided_at: self.decided_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub kind: ApplicationKind,
    #[serde(default)]
    pub ledger: Vec<serde_json::Value>,
}

pub(crate) async fn open_handler<R, N>(
    State(service): State<Arc<ClearanceWorkflowService<R, N>>>,
    axum::Json(request): axum::Json<OpenApplicationRequest>,
) -> Response
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    match service.open(request.kind) {
        Ok(record) => {
            let payload = json!({
                "application_id": record.application_id.0,
                "kind": record.kind.label(),
                "status": record.status.label(),
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R, N>(
    State(service): State<Arc<ClearanceWorkflowService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.progress(&id) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<R, N>(
    State(service): State<Arc<ClearanceWorkflowService<R, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.record_decision(&id, request.into_record()) {
        Ok(outcome) => (StatusCode::ACCEPTED, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn payment_handler<R, N>(
    State(service): State<Arc<ClearanceWorkflowService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.mark_paid(&id) {
        Ok(()) => {
            let payload = json!({ "application_id": id.0, "status": "paid" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn release_handler<R, N>(
    State(service): State<Arc<ClearanceWorkflowService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.mark_released(&id) {
        Ok(()) => {
            let payload = json!({ "application_id": id.0, "status": "released" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

/// Stateless evaluation over a raw ledger payload, for the portal pages
/// that already fetched an application detail from the legacy backend.
pub(crate) async fn evaluate_handler<R, N>(
    State(service): State<Arc<ClearanceWorkflowService<R, N>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    let catalog = service.catalogs().for_kind(request.kind);
    let snapshot = evaluate_snapshot(catalog, &request.ledger);
    (StatusCode::OK, axum::Json(snapshot)).into_response()
}

pub(crate) async fn catalog_handler<R, N>(
    State(service): State<Arc<ClearanceWorkflowService<R, N>>>,
    Path(kind): Path<String>,
) -> Response
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    let Some(kind) = ApplicationKind::parse(&kind) else {
        let payload = json!({ "error": format!("unknown application kind '{kind}'") });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    let catalog = service.catalogs().for_kind(kind);
    let clearances: Vec<&'static str> = catalog
        .entries()
        .iter()
        .map(|clearance| clearance.label())
        .collect();
    let payload = json!({ "kind": kind.label(), "clearances": clearances });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn error_response(error: WorkflowServiceError) -> Response {
    let status = match &error {
        WorkflowServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        WorkflowServiceError::Repository(RepositoryError::Conflict)
        | WorkflowServiceError::Repository(RepositoryError::DuplicateDecision { .. }) => {
            StatusCode::CONFLICT
        }
        WorkflowServiceError::InvalidTransition { .. }
        | WorkflowServiceError::ClosedLedger { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowServiceError::Repository(RepositoryError::Unavailable(_))
        | WorkflowServiceError::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
