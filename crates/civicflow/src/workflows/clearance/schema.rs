use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::catalog::ClearanceCatalog;
use super::domain::ApprovalRecord;
use super::evaluation::{evaluate, ApplicationState};
use super::gate::{decide, ProgressionDecision};

/// Non-fatal note about a ledger entry that failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerWarning {
    pub index: usize,
    pub detail: String,
}

impl fmt::Display for LedgerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ledger entry {}: {}", self.index, self.detail)
    }
}

/// Result of validating a raw backend ledger payload.
#[derive(Debug, Clone)]
pub struct ParsedLedger {
    pub records: Vec<ApprovalRecord>,
    pub warnings: Vec<LedgerWarning>,
}

/// Validate loosely-shaped ledger entries as fetched from the portal
/// backend's application-detail endpoint.
///
/// A malformed entry is skipped with a warning; one bad record never aborts
/// the whole evaluation.
pub fn parse_ledger(entries: &[Value]) -> ParsedLedger {
    let mut records = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<ApprovalRecord>(entry.clone()) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(index, error = %err, "skipping malformed ledger entry");
                warnings.push(LedgerWarning {
                    index,
                    detail: err.to_string(),
                });
            }
        }
    }

    ParsedLedger { records, warnings }
}

/// One-shot evaluation for callers holding the backend's raw ledger payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEvaluation {
    pub state: ApplicationState,
    pub decision: ProgressionDecision,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<LedgerWarning>,
}

pub fn evaluate_snapshot(catalog: &ClearanceCatalog, entries: &[Value]) -> SnapshotEvaluation {
    let ParsedLedger { records, warnings } = parse_ledger(entries);
    let state = evaluate(catalog, &records);
    let decision = decide(&state);

    SnapshotEvaluation {
        state,
        decision,
        warnings,
    }
}
