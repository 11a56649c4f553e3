//! JSON output formatter

use serde::Serialize;
use sitewise_core::{ExtractedDocument, MasterAnalysisReport};

pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string()) + "\n"
}

pub fn format_extraction(document: &ExtractedDocument) -> String {
    to_pretty(&serde_json::json!({
        "text": document.text,
        "confidence": document.confidence,
        "source": document.source,
    }))
}

pub fn format_report(report: &MasterAnalysisReport, stored_id: Option<&str>) -> String {
    to_pretty(&serde_json::json!({
        "id": stored_id,
        "report": report,
    }))
}
