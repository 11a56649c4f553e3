//! Report command

use crate::app::{OutputFormat, ReportArgs};
use crate::output;
use anyhow::{anyhow, Result};
use sitewise_core::store::REPORTS_COLLECTION;
use sitewise_core::{project, DocumentStore, MasterAnalysisReport, Role, SiteWiseError};

pub fn run(args: ReportArgs, store: &dyn DocumentStore, format: OutputFormat) -> Result<()> {
    let stored = match args.id {
        Some(ref id) => {
            let id = id.trim_start_matches('#');
            store
                .list(REPORTS_COLLECTION)?
                .into_iter()
                .find(|doc| doc.id == id)
                .ok_or_else(|| SiteWiseError::InvalidInput(format!("no report with id {}", id)))?
        }
        None => store
            .latest(REPORTS_COLLECTION)?
            .ok_or_else(|| anyhow!("No stored reports. Run `sitewise analyze <file>` first."))?,
    };

    let report: MasterAnalysisReport = serde_json::from_value(stored.data)?;
    let role: Role = args.role.parse().unwrap_or(Role::Guest);
    tracing::debug!("Projecting report {} for {}", stored.id, role);

    print!("{}", output::format_projection(&project(&report, role), format));
    Ok(())
}
