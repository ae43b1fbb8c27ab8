use crate::infra::{InMemoryLedgerRepository, InMemoryProgressNotifier};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;

use civicflow::error::AppError;
use civicflow::workflows::clearance::{
    standard_catalog, ApplicationKind, ApprovalRecord, CatalogSet, ClearanceType,
    ClearanceWorkflowService, OfficialRef, ProgressionState,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Application kind to walk through (building_permit or new_business)
    #[arg(long, default_value = "building_permit", value_parser = parse_kind)]
    pub(crate) kind: ApplicationKind,
    /// Have this clearance reject the application instead of approving it
    #[arg(long, value_parser = parse_clearance)]
    pub(crate) reject: Option<ClearanceType>,
}

fn parse_kind(raw: &str) -> Result<ApplicationKind, String> {
    ApplicationKind::parse(raw).ok_or_else(|| format!("unknown application kind '{raw}'"))
}

fn parse_clearance(raw: &str) -> Result<ClearanceType, String> {
    let tag = raw.trim().to_ascii_uppercase();
    serde_json::from_value(serde_json::Value::String(tag))
        .map_err(|_| format!("unknown clearance type '{raw}'"))
}

fn demo_official(clearance: ClearanceType) -> OfficialRef {
    // One stand-in signatory per department keeps the transcript readable.
    OfficialRef {
        first_name: "Demo".to_string(),
        last_name: format!("{} Officer", clearance.label()),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { kind, reject } = args;

    println!("Clearance workflow demo ({})", kind.label());

    let repository = Arc::new(InMemoryLedgerRepository::default());
    let notifier = Arc::new(InMemoryProgressNotifier::default());
    let catalogs = CatalogSet::standard().map_err(|source| {
        civicflow::config::ConfigError::Catalog { source }
    })?;
    let service = Arc::new(ClearanceWorkflowService::new(
        repository,
        notifier.clone(),
        catalogs,
    ));

    let opened = service.open(kind)?;
    println!(
        "- Opened application {} -> status {}",
        opened.application_id.0,
        opened.status.label()
    );

    for clearance in standard_catalog(kind) {
        let approved = reject != Some(*clearance);
        let outcome = service.record_decision(
            &opened.application_id,
            ApprovalRecord {
                approval_type: *clearance,
                approved,
                required: true,
                remarks: (!approved).then(|| "demo rejection".to_string()),
                fee: Some(120.0),
                decided_by: demo_official(*clearance),
                decided_at: Utc::now(),
            },
        )?;

        println!(
            "  {} {} -> {}",
            clearance.label(),
            if approved { "approved" } else { "rejected" },
            outcome.decision.state.label()
        );

        match outcome.decision.state {
            ProgressionState::InProgress => {
                if let Some(next) = outcome.decision.current_clearance {
                    println!("    next up: {}", next.label());
                }
            }
            ProgressionState::Rejected => {
                println!(
                    "    assessment halted; revise and resubmit ({})",
                    outcome
                        .decision
                        .rejected
                        .iter()
                        .map(|rejected| rejected.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                break;
            }
            ProgressionState::ReadyForPayment => {}
        }
    }

    let progress = service.progress(&opened.application_id)?;
    println!(
        "- Final assessment: status {} | assessed fees {:.2}",
        progress.status.label(),
        progress.assessed_fees
    );

    if progress.decision.state == ProgressionState::ReadyForPayment {
        service.mark_paid(&opened.application_id)?;
        service.mark_released(&opened.application_id)?;
        let released = service.progress(&opened.application_id)?;
        println!(
            "- Payment and release complete -> status {}",
            released.status.label()
        );
    }

    println!("Notifications dispatched:");
    for notice in notifier.events() {
        println!("  - {} for {}", notice.template, notice.application_id.0);
    }

    Ok(())
}
