//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use serde::Serialize;
use sitewise_core::store::{QUERIES_COLLECTION, REPORTS_COLLECTION};
use sitewise_core::{Config, DocumentStore, ModelTier};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    completion_configured: bool,
    deployment: String,
    fast_deployment: String,
    ocr_configured: bool,
    store: String,
    reports: usize,
    queries: usize,
}

pub fn run(config: &Config, store: &dyn DocumentStore, format: OutputFormat) -> Result<()> {
    let status = Status {
        completion_configured: config.llm.is_configured(),
        deployment: config.llm.deployment_for(ModelTier::Capable).to_string(),
        fast_deployment: config.llm.deployment_for(ModelTier::Fast).to_string(),
        ocr_configured: config.ocr.is_configured(),
        store: match config.store.database_path {
            Some(ref path) => format!("sqlite:{}", path.display()),
            None => format!("files:{}", config.store.directory.display()),
        },
        reports: store.list(REPORTS_COLLECTION)?.len(),
        queries: store.list(QUERIES_COLLECTION)?.len(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Cli => {
            println!("Completion:      {}", service_label(status.completion_configured));
            println!("  Deployment:    {}", status.deployment);
            println!("  Fast:          {}", status.fast_deployment);
            println!("Document OCR:    {}", service_label(status.ocr_configured));
            println!();
            println!("Store:           {}", status.store);
            println!("  Reports:       {}", status.reports);
            println!("  Queries:       {}", status.queries);
        }
    }
    Ok(())
}

fn service_label(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "simulated"
    }
}
