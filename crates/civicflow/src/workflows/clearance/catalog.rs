use super::domain::{ApplicationKind, ClearanceType};

/// Ordered clearance catalog for building permits. The order is the order
/// departments are prompted in, so it must not be rearranged casually.
pub const BUILDING_PERMIT_CLEARANCES: &[ClearanceType] = &[
    ClearanceType::Zoning,
    ClearanceType::Architectural,
    ClearanceType::Structural,
    ClearanceType::Electrical,
    ClearanceType::Mechanical,
    ClearanceType::Fire,
    ClearanceType::Sanitary,
    ClearanceType::Plumbing,
    ClearanceType::Interior,
    ClearanceType::Electronics,
];

/// Ordered clearance catalog for new business registrations.
pub const NEW_BUSINESS_CLEARANCES: &[ClearanceType] = &[
    ClearanceType::Zoning,
    ClearanceType::Occupancy,
    ClearanceType::Health,
    ClearanceType::Environment,
    ClearanceType::Market,
    ClearanceType::Fire,
];

pub fn standard_catalog(kind: ApplicationKind) -> &'static [ClearanceType] {
    match kind {
        ApplicationKind::BuildingPermit => BUILDING_PERMIT_CLEARANCES,
        ApplicationKind::NewBusiness => NEW_BUSINESS_CLEARANCES,
    }
}

/// Clearance requirements for one application kind, validated non-empty at
/// construction so the evaluator never sees an empty catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearanceCatalog {
    kind: ApplicationKind,
    entries: Vec<ClearanceType>,
}

impl ClearanceCatalog {
    pub fn new(
        kind: ApplicationKind,
        entries: Vec<ClearanceType>,
    ) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty { kind });
        }
        Ok(Self { kind, entries })
    }

    pub fn standard(kind: ApplicationKind) -> Result<Self, CatalogError> {
        Self::new(kind, standard_catalog(kind).to_vec())
    }

    pub fn kind(&self) -> ApplicationKind {
        self.kind
    }

    pub fn entries(&self) -> &[ClearanceType] {
        &self.entries
    }

    pub fn contains(&self, clearance: ClearanceType) -> bool {
        self.entries.contains(&clearance)
    }
}

/// Catalog misconfiguration is a deployment error surfaced while loading
/// configuration, never during evaluation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no clearances configured for {}", .kind.label())]
    Empty { kind: ApplicationKind },
}

/// Catalogs for every supported application kind, built once at startup.
#[derive(Debug, Clone)]
pub struct CatalogSet {
    building_permit: ClearanceCatalog,
    new_business: ClearanceCatalog,
}

impl CatalogSet {
    pub fn standard() -> Result<Self, CatalogError> {
        Ok(Self {
            building_permit: ClearanceCatalog::standard(ApplicationKind::BuildingPermit)?,
            new_business: ClearanceCatalog::standard(ApplicationKind::NewBusiness)?,
        })
    }

    pub fn for_kind(&self, kind: ApplicationKind) -> &ClearanceCatalog {
        match kind {
            ApplicationKind::BuildingPermit => &self.building_permit,
            ApplicationKind::NewBusiness => &self.new_business,
        }
    }
}
