//! Master analysis report
//!
//! Every field defaults so payloads from the gateway decode even when the
//! model leaves keys out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unified result of one analysis run. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterAnalysisReport {
    #[serde(default)]
    pub blueprint: BlueprintExtraction,
    #[serde(default)]
    pub cost: CostReport,
    #[serde(default)]
    pub risk: RiskAssessment,
    #[serde(default)]
    pub compliance: Vec<ComplianceRule>,
    #[serde(default)]
    pub telemetry: PipelineTelemetry,
    pub generated_at: DateTime<Utc>,
}

impl MasterAnalysisReport {
    /// Rules whose status is not `pass`
    pub fn failing_rules(&self) -> impl Iterator<Item = &ComplianceRule> {
        self.compliance
            .iter()
            .filter(|rule| rule.status != ComplianceStatus::Pass)
    }

    pub fn failure_count(&self) -> usize {
        self.failing_rules().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlueprintExtraction {
    pub project_scope: String,
    pub materials: Vec<Material>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostReport {
    pub total: f64,
    pub currency: String,
    pub breakdown: Vec<CostLine>,
}

impl Default for CostReport {
    fn default() -> Self {
        Self {
            total: 0.0,
            currency: "INR".to_string(),
            breakdown: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostLine {
    pub item: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAssessment {
    /// 0-100
    pub risk_index: f64,
    pub hazards: Vec<Hazard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hazard {
    pub category: String,
    pub description: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRule {
    pub rule_id: String,
    pub status: ComplianceStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comment: String,
}

/// Outcome of one compliance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ComplianceStatus {
    Pass,
    Warn,
    Fail,
}

impl From<String> for ComplianceStatus {
    /// Lenient: anything that is not clearly a pass or a fail is a warning
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pass" | "passed" | "ok" | "compliant" => Self::Pass,
            "fail" | "failed" | "non-compliant" | "noncompliant" | "violation" => Self::Fail,
            _ => Self::Warn,
        }
    }
}

/// Pipeline measurements recorded alongside the findings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineTelemetry {
    pub latency_ms: u64,
    /// Mean OCR word confidence in `[0, 1]`
    pub ocr_confidence: Option<f64>,
    /// Share of structured stages that came back empty
    pub extraction_failure_rate: Option<f64>,
    /// Document text came from the simulated extractor, not the scan
    pub simulated_ocr: bool,
}
