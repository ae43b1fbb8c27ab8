use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for permit and business applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Application families handled by the municipal portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    BuildingPermit,
    NewBusiness,
}

impl ApplicationKind {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationKind::BuildingPermit => "building_permit",
            ApplicationKind::NewBusiness => "new_business",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "building_permit" | "building" => Some(Self::BuildingPermit),
            "new_business" | "business" => Some(Self::NewBusiness),
            _ => None,
        }
    }
}

/// Department disciplines that issue clearances against an application.
///
/// The wire form matches the portal backend's SCREAMING_SNAKE_CASE tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearanceType {
    Zoning,
    Architectural,
    Structural,
    Electrical,
    Mechanical,
    Fire,
    Sanitary,
    Plumbing,
    Interior,
    Electronics,
    Occupancy,
    Health,
    Environment,
    Market,
}

impl ClearanceType {
    pub const fn label(self) -> &'static str {
        match self {
            ClearanceType::Zoning => "ZONING",
            ClearanceType::Architectural => "ARCHITECTURAL",
            ClearanceType::Structural => "STRUCTURAL",
            ClearanceType::Electrical => "ELECTRICAL",
            ClearanceType::Mechanical => "MECHANICAL",
            ClearanceType::Fire => "FIRE",
            ClearanceType::Sanitary => "SANITARY",
            ClearanceType::Plumbing => "PLUMBING",
            ClearanceType::Interior => "INTERIOR",
            ClearanceType::Electronics => "ELECTRONICS",
            ClearanceType::Occupancy => "OCCUPANCY",
            ClearanceType::Health => "HEALTH",
            ClearanceType::Environment => "ENVIRONMENT",
            ClearanceType::Market => "MARKET",
        }
    }
}

/// Official who signed a clearance decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialRef {
    pub first_name: String,
    pub last_name: String,
}

impl OfficialRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One department's decision on one application.
///
/// The ledger holds at most one record per clearance type; the storage
/// layer enforces that uniqueness, the core treats the ledger as
/// append-only and already de-duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub approval_type: ClearanceType,
    pub approved: bool,
    pub required: bool,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub fee: Option<f64>,
    pub decided_by: OfficialRef,
    pub decided_at: DateTime<Utc>,
}

/// Stored lifecycle status tracked for each application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    InProgress,
    ReadyForPayment,
    Paid,
    Released,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::ReadyForPayment => "ready_for_payment",
            ApplicationStatus::Paid => "paid",
            ApplicationStatus::Released => "released",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}
