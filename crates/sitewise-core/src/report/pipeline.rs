//! Analysis pipeline: document in, master report out
//!
//! OCR first, then blueprint extraction, then cost, risk and compliance in
//! parallel. Each stage goes through the gateway, so an unconfigured
//! deployment still produces a complete (simulated) report.

use super::model::{
    BlueprintExtraction, ComplianceRule, ComplianceStatus, CostReport, MasterAnalysisReport,
    PipelineTelemetry, RiskAssessment,
};
use crate::config::ModelTier;
use crate::error::{Result, SiteWiseError};
use crate::llm::{DocumentSource, LlmGateway, ResponseSource, StructuredRequest};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Structured stages counted toward the extraction failure rate
const STRUCTURED_STAGES: f64 = 4.0;

/// Document text sent as context is capped at this many characters
const MAX_CONTEXT_CHARS: usize = 12_000;

/// Drives the gateway to build a master analysis report
pub struct AnalysisPipeline {
    gateway: Arc<LlmGateway>,
}

impl AnalysisPipeline {
    pub fn new(gateway: Arc<LlmGateway>) -> Self {
        Self { gateway }
    }

    /// Run the full analysis for one document
    pub async fn run(&self, source: DocumentSource) -> Result<MasterAnalysisReport> {
        let start = Instant::now();
        let source_name = source.name().to_string();
        tracing::info!("Analyzing {}", source_name);

        let document = self.gateway.extract_document(source).await?;
        let text = truncate_chars(&document.text, MAX_CONTEXT_CHARS);
        tracing::debug!(
            "Extracted {} chars ({:?})",
            document.text.len(),
            document.source
        );
        let simulated_ocr = document.source == ResponseSource::Simulated;
        if simulated_ocr {
            tracing::warn!(
                "Text for {} is simulated; findings do not reflect the document",
                source_name
            );
        }

        let blueprint_payload = self
            .gateway
            .complete_structured(&blueprint_request(text))
            .await?
            .data;
        let blueprint: BlueprintExtraction = decode("blueprint", &blueprint_payload)?;

        let context = format!(
            "PROJECT SCOPE: {}\n\nDOCUMENT TEXT:\n{}",
            blueprint.project_scope, text
        );
        let cost_req = cost_request(&context);
        let risk_req = risk_request(&context);
        let compliance_req = compliance_request(&context);
        let (cost_response, risk_response, compliance_response) = futures::try_join!(
            self.gateway.complete_structured(&cost_req),
            self.gateway.complete_structured(&risk_req),
            self.gateway.complete_structured(&compliance_req),
        )?;

        let cost: CostReport = decode("cost", &cost_response.data)?;
        let risk: RiskAssessment = decode("risk", &risk_response.data)?;
        let compliance = compliance_rules(&compliance_response.data)?;

        let empty_stages = [
            &blueprint_payload,
            &cost_response.data,
            &risk_response.data,
            &compliance_response.data,
        ]
        .iter()
        .filter(|payload| is_empty_payload(payload))
        .count();

        let telemetry = PipelineTelemetry {
            latency_ms: start.elapsed().as_millis() as u64,
            ocr_confidence: document.confidence,
            extraction_failure_rate: Some(empty_stages as f64 / STRUCTURED_STAGES),
            simulated_ocr,
        };

        tracing::info!(
            "Analysis finished in {}ms: {} rules, {} failing, risk {}",
            telemetry.latency_ms,
            compliance.len(),
            compliance
                .iter()
                .filter(|r| r.status != ComplianceStatus::Pass)
                .count(),
            risk.risk_index
        );

        Ok(MasterAnalysisReport {
            blueprint,
            cost,
            risk,
            compliance,
            telemetry,
            generated_at: Utc::now(),
        })
    }
}

fn blueprint_request(text: &str) -> StructuredRequest {
    StructuredRequest::new(
        "Extract the blueprint project scope and the bill of materials from the document \
         in the previous message.",
    )
    .with_schema_hint(r#"{"projectScope": "...", "materials": [{"name": "...", "quantity": 0, "unit": "..."}]}"#)
    .with_context(text)
    .with_tier(ModelTier::Fast)
}

fn cost_request(context: &str) -> StructuredRequest {
    StructuredRequest::new(
        "Estimate the construction cost (capex) for this project with a line-item breakdown.",
    )
    .with_schema_hint(r#"{"total": 0, "currency": "INR", "breakdown": [{"item": "...", "amount": 0}]}"#)
    .with_context(context)
}

fn risk_request(context: &str) -> StructuredRequest {
    StructuredRequest::new(
        "Assess structural and site risk for this project on a 0-100 index and list the hazards.",
    )
    .with_schema_hint(r#"{"riskIndex": 0, "hazards": [{"category": "...", "description": "...", "severity": "..."}]}"#)
    .with_context(context)
}

fn compliance_request(context: &str) -> StructuredRequest {
    StructuredRequest::new(
        "Evaluate code compliance for this project. Report every rule checked with status \
         pass, warn or fail, and list violations separately.",
    )
    .with_schema_hint(r#"{"overallStatus": "...", "violations": [{"ruleId": "...", "comment": "..."}], "rules": [{"ruleId": "...", "status": "pass|warn|fail", "description": "...", "comment": "..."}]}"#)
    .with_context(context)
}

fn decode<T: DeserializeOwned + Default>(stage: &str, payload: &Value) -> Result<T> {
    if is_empty_payload(payload) {
        tracing::warn!("{} stage returned an empty payload", stage);
        return Ok(T::default());
    }
    serde_json::from_value(payload.clone())
        .map_err(|e| SiteWiseError::MalformedOutput(format!("{} payload: {}", stage, e)))
}

/// Rule evaluations from a compliance payload. Falls back to treating
/// listed violations as failures when the model omits the `rules` array.
fn compliance_rules(payload: &Value) -> Result<Vec<ComplianceRule>> {
    if payload.get("rules").is_some() {
        return serde_json::from_value(payload["rules"].clone())
            .map_err(|e| SiteWiseError::MalformedOutput(format!("compliance rules: {}", e)));
    }

    let Some(violations) = payload.get("violations").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(violations
        .iter()
        .filter_map(|v| {
            let rule_id = v["ruleId"].as_str()?.to_string();
            let status = v["status"]
                .as_str()
                .map(|s| ComplianceStatus::from(s.to_string()))
                .unwrap_or(ComplianceStatus::Fail);
            Some(ComplianceRule {
                rule_id,
                status,
                description: v["description"].as_str().unwrap_or_default().to_string(),
                comment: v["comment"].as_str().unwrap_or_default().to_string(),
            })
        })
        .collect())
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
