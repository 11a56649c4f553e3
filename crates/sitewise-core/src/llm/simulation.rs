//! Deterministic stand-ins for the hosted services
//!
//! Used when credentials are absent and when a live provider fails, so the
//! rest of the system stays exercisable offline. Payload shapes match what a
//! live deployment returns for the same prompt family.

use super::traits::{
    DocumentExtractionProvider, DocumentPayload, Extraction, StructuredCompletionProvider,
    StructuredRequest,
};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Prompt family recognised by the simulator, in matching order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationFamily {
    Vision,
    Synthesis,
    Compliance,
    Risk,
    Cost,
    Blueprint,
}

/// Pick the family for a request. Only the prompt is scanned; the context
/// may contain arbitrary document text.
pub fn classify(request: &StructuredRequest) -> Option<SimulationFamily> {
    if request.image_base64.is_some() {
        return Some(SimulationFamily::Vision);
    }

    let prompt = request.prompt.to_lowercase();
    if prompt.contains("semanticmatchpercentage") {
        Some(SimulationFamily::Synthesis)
    } else if prompt.contains("compliance") {
        Some(SimulationFamily::Compliance)
    } else if prompt.contains("risk") || prompt.contains("hazard") {
        Some(SimulationFamily::Risk)
    } else if prompt.contains("cost") || prompt.contains("capex") {
        Some(SimulationFamily::Cost)
    } else if prompt.contains("blueprint") && prompt.contains("extract") {
        Some(SimulationFamily::Blueprint)
    } else {
        None
    }
}

/// Simulated JSON payload for a request; `{}` when no family matches
pub fn simulate(request: &StructuredRequest) -> Value {
    match classify(request) {
        Some(SimulationFamily::Vision) => vision_payload(),
        Some(SimulationFamily::Synthesis) => synthesis_payload(request.context.as_deref()),
        Some(SimulationFamily::Compliance) => compliance_payload(),
        Some(SimulationFamily::Risk) => risk_payload(),
        Some(SimulationFamily::Cost) => cost_payload(),
        Some(SimulationFamily::Blueprint) => blueprint_payload(),
        None => json!({}),
    }
}

fn compliance_payload() -> Value {
    json!({
        "overallStatus": "Warning",
        "violations": [
            {
                "ruleId": "IS-13920",
                "severity": "High",
                "description": "Ductile detailing of beam-column joints in seismic zones",
                "comment": "Confining hoop spacing at column ends on grid C exceeds 100 mm within the joint region."
            },
            {
                "ruleId": "NBC-2016-P4-4.4",
                "severity": "Medium",
                "description": "Fire egress travel distance",
                "comment": "Travel distance from the east wing exceeds 30 m without a second protected exit."
            }
        ],
        "rules": [
            {
                "ruleId": "IS-456",
                "status": "pass",
                "description": "Reinforced concrete nominal cover",
                "comment": "40 mm cover satisfies moderate exposure."
            },
            {
                "ruleId": "IS-1893",
                "status": "pass",
                "description": "Seismic design base shear",
                "comment": "Zone IV coefficients applied with importance factor 1.2."
            },
            {
                "ruleId": "IS-13920",
                "status": "warn",
                "description": "Ductile detailing of beam-column joints in seismic zones",
                "comment": "Confining hoop spacing at column ends on grid C exceeds 100 mm within the joint region."
            },
            {
                "ruleId": "NBC-2016-P4-4.4",
                "status": "fail",
                "description": "Fire egress travel distance",
                "comment": "Travel distance from the east wing exceeds 30 m without a second protected exit."
            }
        ]
    })
}

fn risk_payload() -> Value {
    json!({
        "riskIndex": 42,
        "hazards": [
            {
                "category": "Structural",
                "description": "Soft storey at ground-level parking",
                "severity": "High"
            },
            {
                "category": "Geotechnical",
                "description": "Expansive clay below footing level",
                "severity": "Medium"
            },
            {
                "category": "Site Safety",
                "description": "Unprotected slab edges during podium works",
                "severity": "Medium"
            }
        ]
    })
}

fn cost_payload() -> Value {
    json!({
        "total": 48_500_000,
        "currency": "INR",
        "breakdown": [
            { "item": "Substructure", "amount": 9_200_000 },
            { "item": "Superstructure (RCC frame)", "amount": 21_400_000 },
            { "item": "MEP services", "amount": 8_900_000 },
            { "item": "Finishes", "amount": 6_300_000 },
            { "item": "Contingency", "amount": 2_700_000 }
        ]
    })
}

fn blueprint_payload() -> Value {
    json!({
        "projectScope": "G+4 reinforced concrete residential block with basement parking, 2,400 m2 built-up area",
        "materials": [
            { "name": "M25 concrete", "quantity": 620, "unit": "m3" },
            { "name": "Fe500D reinforcement", "quantity": 74, "unit": "t" },
            { "name": "AAC blocks 200 mm", "quantity": 3100, "unit": "m2" },
            { "name": "Structural steel sections", "quantity": 11.5, "unit": "t" }
        ]
    })
}

fn vision_payload() -> Value {
    json!({
        "detectedElements": [
            { "type": "column", "count": 24 },
            { "type": "beam", "count": 41 },
            { "type": "staircase", "count": 2 }
        ],
        "annotations": ["GRID A-F / 1-6", "ALL DIMENSIONS IN MM"],
        "dimensions": ["Typical bay 6000 x 4500", "Floor to floor 3150"],
        "confidence": 0.87
    })
}

/// Annotate the candidates carried in the context with fixed, descending
/// match percentages. Unreadable context gives an empty result list.
fn synthesis_payload(context: Option<&str>) -> Value {
    let candidates = context.map(parse_candidates).unwrap_or_default();
    let total = candidates.len();

    let results: Vec<Value> = candidates
        .into_iter()
        .enumerate()
        .map(|(idx, mut candidate)| {
            let title = candidate["title"].as_str().unwrap_or("untitled").to_string();
            if let Some(obj) = candidate.as_object_mut() {
                obj.insert(
                    "semanticMatchPercentage".to_string(),
                    json!(92u32.saturating_sub(7 * idx as u32).max(50)),
                );
                obj.insert(
                    "relevanceReason".to_string(),
                    json!(format!(
                        "Ranked {} of {} by vector similarity; '{}' covers the query's subject area.",
                        idx + 1,
                        total,
                        title
                    )),
                );
            }
            candidate
        })
        .collect();

    json!({ "results": results })
}

fn parse_candidates(context: &str) -> Vec<Value> {
    let json_str = match (context.find('['), context.rfind(']')) {
        (Some(start), Some(end)) if start < end => &context[start..=end],
        _ => return Vec::new(),
    };
    serde_json::from_str::<Vec<Value>>(json_str)
        .map(|items| items.into_iter().filter(Value::is_object).collect())
        .unwrap_or_default()
}

/// Completion provider that always answers from the simulator
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedCompletion;

#[async_trait]
impl StructuredCompletionProvider for SimulatedCompletion {
    async fn complete(&self, request: &StructuredRequest) -> Result<String> {
        tracing::debug!("Simulating completion ({:?})", classify(request));
        Ok(simulate(request).to_string())
    }

    fn name(&self) -> &str {
        "simulated"
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Demo engineering document returned by the simulated extractor
pub const SIMULATED_DOCUMENT_TEXT: &str = "\
PROJECT: Riverside Residences, Block B
DRAWING: S-101 General Arrangement, Rev C

1. STRUCTURAL SYSTEM
Reinforced concrete moment-resisting frame, G+4 with one basement level.
Seismic Zone IV, importance factor 1.2, medium soil (Type II).
Columns 450 x 450 mm, M25 concrete, Fe500D reinforcement.

2. FOUNDATIONS
Isolated footings at 2.1 m below natural ground level on expansive clay.
Allowable bearing pressure 180 kN/m2 per geotechnical report GR-07.

3. MATERIALS SCHEDULE
M25 concrete 620 m3; Fe500D reinforcement 74 t; AAC blocks 200 mm 3100 m2;
structural steel sections 11.5 t for the roof canopy.

4. FIRE AND LIFE SAFETY
Single protected staircase serves the east wing; travel distance 34 m.
Sprinklers to basement parking per NBC 2016 Part 4.

5. NOTES
Confining hoops at column ends spaced 150 mm on grid C; verify against
ductile detailing requirements before issue for construction.
";

/// Extraction provider that waits a fixed latency and returns the demo document
#[derive(Debug, Clone)]
pub struct SimulatedExtractor {
    latency: Duration,
}

impl SimulatedExtractor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl DocumentExtractionProvider for SimulatedExtractor {
    async fn extract(&self, document: &DocumentPayload) -> Result<Extraction> {
        tracing::debug!(
            "Simulating extraction for {} ({} bytes)",
            document.name,
            document.bytes.len()
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(Extraction {
            text: SIMULATED_DOCUMENT_TEXT.to_string(),
            confidence: None,
        })
    }

    fn name(&self) -> &str {
        "simulated"
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_family() {
        let value = simulate(&StructuredRequest::new("What is the compliance status?"));
        assert_eq!(value["overallStatus"], "Warning");
        assert_eq!(value["violations"][0]["ruleId"], "IS-13920");
        assert!(value["violations"].is_array());
    }

    #[test]
    fn test_cost_family_accepts_capex() {
        let value = simulate(&StructuredRequest::new("Summarise CAPEX for block B"));
        assert!(value["total"].is_number());
        assert_eq!(value["currency"], "INR");
        assert!(value["breakdown"].is_array());
    }

    #[test]
    fn test_cost_breakdown_sums_to_total() {
        let value = cost_payload();
        let sum: i64 = value["breakdown"]
            .as_array()
            .unwrap()
            .iter()
            .map(|line| line["amount"].as_i64().unwrap())
            .sum();
        assert_eq!(sum, value["total"].as_i64().unwrap());
    }

    #[test]
    fn test_risk_family_matches_hazard() {
        let value = simulate(&StructuredRequest::new("List site hazards"));
        assert!(value["riskIndex"].is_number());
        assert_eq!(value["hazards"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_blueprint_needs_both_keywords() {
        let value = simulate(&StructuredRequest::new("Extract blueprint scope"));
        assert!(value["projectScope"].is_string());

        let value = simulate(&StructuredRequest::new("Describe the blueprint"));
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_any_image_is_vision() {
        let request = StructuredRequest::new("What is the compliance status?").with_image("AAAA");
        assert_eq!(classify(&request), Some(SimulationFamily::Vision));
        assert!(simulate(&request)["detectedElements"].is_array());
    }

    #[test]
    fn test_unrecognised_prompt_is_empty_object() {
        let value = simulate(&StructuredRequest::new("hello there"));
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_context_does_not_select_family() {
        let request = StructuredRequest::new("hello there").with_context("compliance risk cost");
        assert_eq!(classify(&request), None);
    }

    #[test]
    fn test_synthesis_annotates_candidates_in_order() {
        let context = json!([
            { "title": "Seismic Failure Report", "summary": "s", "tags": [], "vectorScore": 0.8 },
            { "title": "Concrete Curing Guide", "summary": "c", "tags": [], "vectorScore": 0.7 }
        ])
        .to_string();
        let request = StructuredRequest::new("Attach semanticMatchPercentage and relevanceReason")
            .with_context(context);
        let value = simulate(&request);
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["title"], "Seismic Failure Report");
        assert_eq!(results[0]["semanticMatchPercentage"], 92);
        assert_eq!(results[1]["semanticMatchPercentage"], 85);
        assert!(results[1]["relevanceReason"]
            .as_str()
            .unwrap()
            .contains("Concrete Curing Guide"));
    }

    #[test]
    fn test_synthesis_without_candidates() {
        let request = StructuredRequest::new("semanticMatchPercentage please");
        assert_eq!(simulate(&request), json!({ "results": [] }));
    }

    #[tokio::test]
    async fn test_simulated_extractor_returns_demo_document() {
        let extractor = SimulatedExtractor::new(Duration::ZERO);
        let extraction = extractor
            .extract(&DocumentPayload {
                name: "s-101.pdf".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap();
        assert!(extraction.text.contains("STRUCTURAL SYSTEM"));
        assert!(extraction.confidence.is_none());
    }
}
