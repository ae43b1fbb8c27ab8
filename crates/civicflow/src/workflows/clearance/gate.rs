use serde::{Deserialize, Serialize};

use super::domain::ClearanceType;
use super::evaluation::ApplicationState;

/// Caller-facing workflow phase derived from the evaluated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressionState {
    InProgress,
    ReadyForPayment,
    Rejected,
}

impl ProgressionState {
    pub const fn label(self) -> &'static str {
        match self {
            ProgressionState::InProgress => "IN_PROGRESS",
            ProgressionState::ReadyForPayment => "READY_FOR_PAYMENT",
            ProgressionState::Rejected => "REJECTED",
        }
    }
}

/// Next allowed action for the caller embedding the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionDecision {
    pub state: ProgressionState,
    /// The single clearance the next authorized department should decide.
    /// Present only while the application is in progress.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_clearance: Option<ClearanceType>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub rejected: Vec<ClearanceType>,
}

/// Translate the evaluated state into a progression decision.
///
/// One rejected required clearance halts the whole workflow even when every
/// other clearance is satisfied; the applicant must revise and resubmit.
pub fn decide(state: &ApplicationState) -> ProgressionDecision {
    if state.has_rejection {
        return ProgressionDecision {
            state: ProgressionState::Rejected,
            current_clearance: None,
            rejected: state.rejected.clone(),
        };
    }

    if state.fully_cleared {
        return ProgressionDecision {
            state: ProgressionState::ReadyForPayment,
            current_clearance: None,
            rejected: Vec::new(),
        };
    }

    ProgressionDecision {
        state: ProgressionState::InProgress,
        current_clearance: state.outstanding.first().copied(),
        rejected: Vec::new(),
    }
}
