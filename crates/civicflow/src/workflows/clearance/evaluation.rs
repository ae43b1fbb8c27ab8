use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::ClearanceCatalog;
use super::domain::{ApprovalRecord, ClearanceType};

/// Derived view over one application's ledger. Recomputed on every read;
/// it has no identity or persistence of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationState {
    /// Catalog entries with no ledger record yet, in catalog order. The
    /// first entry is the clearance the next department should decide.
    pub outstanding: Vec<ClearanceType>,
    /// Clearances decided `required && !approved`, in ledger order.
    pub rejected: Vec<ClearanceType>,
    pub fully_cleared: bool,
    pub has_rejection: bool,
}

impl ApplicationState {
    pub fn current_clearance(&self) -> Option<ClearanceType> {
        if self.has_rejection {
            None
        } else {
            self.outstanding.first().copied()
        }
    }
}

/// Compute the application state from the catalog and the decision ledger.
///
/// Pure and deterministic: no clock, no randomness, no caching. Two policy
/// points worth calling out:
/// - a record with `required == false` satisfies its catalog slot whatever
///   its `approved` flag says, and never counts as a rejection;
/// - a ledger type outside the catalog (stale or legacy data) is excluded
///   from `outstanding` but still reported in `rejected` when applicable.
pub fn evaluate(catalog: &ClearanceCatalog, ledger: &[ApprovalRecord]) -> ApplicationState {
    let decided: BTreeSet<ClearanceType> =
        ledger.iter().map(|record| record.approval_type).collect();

    let outstanding: Vec<ClearanceType> = catalog
        .entries()
        .iter()
        .copied()
        .filter(|clearance| !decided.contains(clearance))
        .collect();

    let rejected: Vec<ClearanceType> = ledger
        .iter()
        .filter(|record| record.required && !record.approved)
        .map(|record| record.approval_type)
        .collect();

    ApplicationState {
        fully_cleared: outstanding.is_empty(),
        has_rejection: !rejected.is_empty(),
        outstanding,
        rejected,
    }
}

/// Sum of fees assessed by departments that required and approved their
/// clearance, feeding the tax-assessment handoff.
pub fn assessed_fees(ledger: &[ApprovalRecord]) -> f64 {
    ledger
        .iter()
        .filter(|record| record.required && record.approved)
        .filter_map(|record| record.fee)
        .sum()
}
