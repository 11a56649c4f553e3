//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use sitewise_core::search::ScoredDocument;
use sitewise_core::{
    ExtractedDocument, MasterAnalysisReport, RoleProjection, StoredDocument, StructuredResponse,
};

/// Format a structured answer
pub fn format_structured(response: &StructuredResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::to_pretty(response),
        OutputFormat::Cli => json::to_pretty(&response.data),
    }
}

/// Format extracted document text
pub fn format_extraction(document: &ExtractedDocument, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_extraction(document),
        OutputFormat::Cli => terminal::format_extraction(document),
    }
}

/// Format search results
pub fn format_search_results(results: &[ScoredDocument], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::to_pretty(&results),
        OutputFormat::Cli => terminal::format_search_results(results),
    }
}

/// Format a full master report
pub fn format_report(
    report: &MasterAnalysisReport,
    stored_id: Option<&str>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => json::format_report(report, stored_id),
        OutputFormat::Cli => terminal::format_report(report, stored_id),
    }
}

/// Format a role projection
pub fn format_projection(projection: &RoleProjection, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::to_pretty(projection),
        OutputFormat::Cli => terminal::format_projection(projection),
    }
}

/// Format stored history
pub fn format_history(documents: &[StoredDocument], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::to_pretty(&documents),
        OutputFormat::Cli => terminal::format_history(documents),
    }
}
