//! Terminal output formatter

use sitewise_core::report::{AdminView, ComplianceStatus, EngineerView, SupervisorView};
use sitewise_core::search::ScoredDocument;
use sitewise_core::{
    ExtractedDocument, MasterAnalysisReport, ResponseSource, RoleProjection, StoredDocument,
};
use std::fmt::Write;

pub fn format_extraction(document: &ExtractedDocument) -> String {
    let mut output = document.text.trim_end().to_string();
    output.push('\n');
    if document.source == ResponseSource::Simulated {
        output.push_str("\n(simulated extraction)\n");
    } else if let Some(confidence) = document.confidence {
        let _ = writeln!(output, "\n(confidence {:.1}%)", confidence * 100.0);
    }
    output
}

pub fn format_search_results(results: &[ScoredDocument]) -> String {
    if results.is_empty() {
        return "No results\n".to_string();
    }

    let mut output = String::new();
    for result in results {
        let pct = result
            .semantic_match_percentage
            .unwrap_or(result.vector_score * 100.0);
        let _ = writeln!(output, "{:>3.0}% {}", pct, result.document.title);
        let _ = writeln!(output, "     {}", result.document.summary);
        if let Some(ref reason) = result.relevance_reason {
            let _ = writeln!(output, "     why: {}", reason);
        }
        if !result.document.tags.is_empty() {
            let tags: Vec<&str> = result.document.tags.iter().map(String::as_str).collect();
            let _ = writeln!(output, "     tags: {}", tags.join(", "));
        }
    }
    output
}

pub fn format_report(report: &MasterAnalysisReport, stored_id: Option<&str>) -> String {
    let count = |status: ComplianceStatus| {
        report
            .compliance
            .iter()
            .filter(|rule| rule.status == status)
            .count()
    };

    let mut output = String::new();
    let _ = writeln!(output, "Project:     {}", report.blueprint.project_scope);
    let _ = writeln!(output, "Materials:   {}", report.blueprint.materials.len());
    let _ = writeln!(
        output,
        "Cost:        {:.0} {}",
        report.cost.total, report.cost.currency
    );
    let _ = writeln!(
        output,
        "Risk index:  {:.0} ({} hazards)",
        report.risk.risk_index,
        report.risk.hazards.len()
    );
    let _ = writeln!(
        output,
        "Compliance:  {} pass, {} warn, {} fail",
        count(ComplianceStatus::Pass),
        count(ComplianceStatus::Warn),
        count(ComplianceStatus::Fail)
    );
    let _ = writeln!(output, "Latency:     {} ms", report.telemetry.latency_ms);
    if report.telemetry.simulated_ocr {
        output.push_str("(document text was simulated)\n");
    }
    if let Some(id) = stored_id {
        let _ = writeln!(output, "Stored as:   #{}", id);
    }
    output
}

pub fn format_projection(projection: &RoleProjection) -> String {
    match projection {
        RoleProjection::Engineer(view) => format_engineer(view),
        RoleProjection::Supervisor(view) => format_supervisor(view),
        RoleProjection::Admin(view) => format_admin(view),
    }
}

fn format_engineer(view: &EngineerView) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Scope: {}", view.project_scope);

    let _ = writeln!(output, "\nConflicts ({}):", view.conflicts.len());
    for conflict in &view.conflicts {
        let _ = writeln!(
            output,
            "  [{}] {}  {} ({:.0}%)",
            status_label(conflict.status),
            conflict.rule_id,
            conflict.comment,
            conflict.confidence * 100.0
        );
    }

    let _ = writeln!(output, "\nMaterials ({}):", view.materials.len());
    for material in &view.materials {
        match (material.quantity, material.unit.as_deref()) {
            (Some(quantity), Some(unit)) => {
                let _ = writeln!(output, "  - {}  {} {}", material.name, quantity, unit);
            }
            (Some(quantity), None) => {
                let _ = writeln!(output, "  - {}  {}", material.name, quantity);
            }
            _ => {
                let _ = writeln!(output, "  - {}", material.name);
            }
        }
    }
    output
}

fn format_supervisor(view: &SupervisorView) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Approval readiness:  {:.1}", view.approval_readiness_score);
    let _ = writeln!(
        output,
        "Cost impact:         {:.0} {}",
        view.cost_impact_estimate, view.currency
    );
    let _ = writeln!(output, "Delay impact:        {} days", view.delay_impact_days);
    let _ = writeln!(output, "Approval blockers:   {}", view.approval_blocker_count);
    let _ = writeln!(
        output,
        "Redesign required:   {}",
        if view.redesign_required { "yes" } else { "no" }
    );
    output
}

fn format_admin(view: &AdminView) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "OCR accuracy:             {:.1}%", view.ocr_accuracy);
    let _ = writeln!(
        output,
        "Extraction failure rate:  {:.2}%",
        view.extraction_failure_rate * 100.0
    );
    let _ = writeln!(output, "Jurisdiction:             {}", view.jurisdiction);
    let _ = writeln!(output, "Regulation version:       {}", view.regulation_version);
    let _ = writeln!(output, "Pipeline latency:         {} ms", view.pipeline_latency_ms);
    output
}

pub fn format_history(documents: &[StoredDocument]) -> String {
    if documents.is_empty() {
        return "No entries\n".to_string();
    }

    let mut output = String::new();
    for doc in documents {
        let _ = writeln!(
            output,
            "#{}  {}  {}",
            doc.id,
            doc.created_at.format("%Y-%m-%d %H:%M:%S"),
            summarize(&doc.data)
        );
    }
    output
}

/// One-line description of a stored report or query
fn summarize(data: &serde_json::Value) -> String {
    if let Some(query) = data["query"].as_str() {
        let hits = data["results"].as_array().map_or(0, Vec::len);
        return format!("{:?} ({} results)", query, hits);
    }
    match data["blueprint"]["projectScope"].as_str() {
        Some(scope) => truncate(scope, 60),
        None => "-".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", head)
}

fn status_label(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Pass => "pass",
        ComplianceStatus::Warn => "warn",
        ComplianceStatus::Fail => "fail",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_query_entry() {
        let data = json!({ "query": "seismic", "results": [{}, {}, {}] });
        assert_eq!(summarize(&data), "\"seismic\" (3 results)");
    }

    #[test]
    fn test_summarize_report_entry() {
        let data = json!({ "blueprint": { "projectScope": "G+4 RCC block" } });
        assert_eq!(summarize(&data), "G+4 RCC block");
        assert_eq!(summarize(&json!({})), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_empty_search() {
        assert_eq!(format_search_results(&[]), "No results\n");
    }
}
