//! Analyze command

use crate::app::{AnalyzeArgs, OutputFormat};
use crate::output;
use anyhow::{Context, Result};
use sitewise_core::store::REPORTS_COLLECTION;
use sitewise_core::{
    project, AnalysisPipeline, DocumentSource, DocumentStore, LlmGateway, Role,
};
use std::sync::Arc;

pub async fn run(
    args: AnalyzeArgs,
    gateway: Arc<LlmGateway>,
    store: &dyn DocumentStore,
    format: OutputFormat,
) -> Result<()> {
    let source = DocumentSource::open(&args.file)
        .await
        .with_context(|| format!("opening {}", args.file.display()))?;

    let report = AnalysisPipeline::new(gateway).run(source).await?;

    let stored_id = if args.no_save {
        None
    } else {
        let stored = store.save(REPORTS_COLLECTION, serde_json::to_value(&report)?)?;
        Some(stored.id)
    };

    match args.role {
        Some(role) => {
            let role: Role = role.parse().unwrap_or(Role::Guest);
            print!("{}", output::format_projection(&project(&report, role), format));
        }
        None => print!(
            "{}",
            output::format_report(&report, stored_id.as_deref(), format)
        ),
    }
    Ok(())
}
