//! Role-scoped views of a master analysis report
//!
//! Each view is a pure function of the report. Views expose disjoint fields
//! so a role sees only what it needs.

use super::model::{ComplianceStatus, MasterAnalysisReport, Material};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Confidence attached to every engineer-facing conflict
pub const CONFLICT_CONFIDENCE: f64 = 0.95;

/// Shown when the report carries no OCR telemetry
pub const DEFAULT_OCR_ACCURACY: f64 = 99.2;
pub const DEFAULT_EXTRACTION_FAILURE_RATE: f64 = 0.003;

pub const JURISDICTION: &str = "IN / National Building Code";
pub const REGULATION_VERSION: &str = "NBC 2016 with IS 1893:2016 and IS 13920:2016";

/// Caller role supplied by the authentication layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Engineer,
    Supervisor,
    Admin,
    Guest,
}

impl FromStr for Role {
    type Err = Infallible;

    /// Case-insensitive; unknown strings become `Guest`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "engineer" => Role::Engineer,
            "supervisor" => Role::Supervisor,
            "admin" => Role::Admin,
            _ => Role::Guest,
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Engineer => "Engineer",
            Role::Supervisor => "Supervisor",
            Role::Admin => "Admin",
            Role::Guest => "Guest",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerView {
    pub project_scope: String,
    pub conflicts: Vec<Conflict>,
    pub materials: Vec<Material>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub rule_id: String,
    pub status: ComplianceStatus,
    pub comment: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorView {
    pub approval_readiness_score: f64,
    pub cost_impact_estimate: f64,
    pub currency: String,
    pub delay_impact_days: u32,
    pub approval_blocker_count: usize,
    pub redesign_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    /// Percentage
    pub ocr_accuracy: f64,
    pub extraction_failure_rate: f64,
    pub jurisdiction: String,
    pub regulation_version: String,
    pub pipeline_latency_ms: u64,
}

/// One of the three role-scoped shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoleProjection {
    Engineer(EngineerView),
    Supervisor(SupervisorView),
    Admin(AdminView),
}

/// Project a report for a role. Guests get the engineer view.
pub fn project(report: &MasterAnalysisReport, role: Role) -> RoleProjection {
    match role {
        Role::Supervisor => RoleProjection::Supervisor(supervisor_view(report)),
        Role::Admin => RoleProjection::Admin(admin_view(report)),
        Role::Engineer | Role::Guest => RoleProjection::Engineer(engineer_view(report)),
    }
}

pub fn engineer_view(report: &MasterAnalysisReport) -> EngineerView {
    let conflicts = report
        .failing_rules()
        .map(|rule| Conflict {
            rule_id: rule.rule_id.clone(),
            status: rule.status,
            comment: rule.comment.clone(),
            confidence: CONFLICT_CONFIDENCE,
        })
        .collect();

    EngineerView {
        project_scope: report.blueprint.project_scope.clone(),
        conflicts,
        materials: report.blueprint.materials.clone(),
    }
}

pub fn supervisor_view(report: &MasterAnalysisReport) -> SupervisorView {
    let failures = report.failure_count();
    let hazards = report.risk.hazards.len();
    let risk_index = report.risk.risk_index;

    SupervisorView {
        approval_readiness_score: approval_readiness(failures, risk_index),
        cost_impact_estimate: report.cost.total,
        currency: report.cost.currency.clone(),
        delay_impact_days: delay_impact_days(failures, hazards),
        approval_blocker_count: failures,
        redesign_required: failures > 2 || risk_index > 60.0,
    }
}

pub fn admin_view(report: &MasterAnalysisReport) -> AdminView {
    let telemetry = &report.telemetry;
    AdminView {
        ocr_accuracy: telemetry
            .ocr_confidence
            .map(|c| c * 100.0)
            .unwrap_or(DEFAULT_OCR_ACCURACY),
        extraction_failure_rate: telemetry
            .extraction_failure_rate
            .unwrap_or(DEFAULT_EXTRACTION_FAILURE_RATE),
        jurisdiction: JURISDICTION.to_string(),
        regulation_version: REGULATION_VERSION.to_string(),
        pipeline_latency_ms: telemetry.latency_ms,
    }
}

/// `max(0, 100 - 15 * failures - risk / 2)`
pub fn approval_readiness(failures: usize, risk_index: f64) -> f64 {
    (100.0 - 15.0 * failures as f64 - risk_index / 2.0).max(0.0)
}

/// Zero without failures, else `3 * failures + 2 * hazards`
pub fn delay_impact_days(failures: usize, hazards: usize) -> u32 {
    if failures == 0 {
        0
    } else {
        (3 * failures + 2 * hazards) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{
        BlueprintExtraction, ComplianceRule, CostReport, Hazard, PipelineTelemetry,
        RiskAssessment,
    };
    use chrono::Utc;
    use serde_json::Value;

    fn rule(id: &str, status: ComplianceStatus) -> ComplianceRule {
        ComplianceRule {
            rule_id: id.to_string(),
            status,
            description: format!("{} check", id),
            comment: format!("{} comment", id),
        }
    }

    fn hazard(description: &str) -> Hazard {
        Hazard {
            category: "Structural".to_string(),
            description: description.to_string(),
            severity: "High".to_string(),
        }
    }

    fn report(rules: Vec<ComplianceRule>, risk_index: f64, hazards: usize) -> MasterAnalysisReport {
        MasterAnalysisReport {
            blueprint: BlueprintExtraction {
                project_scope: "G+4 residential block".to_string(),
                materials: vec![Material {
                    name: "M25 concrete".to_string(),
                    quantity: Some(620.0),
                    unit: Some("m3".to_string()),
                }],
            },
            cost: CostReport {
                total: 48_500_000.0,
                currency: "INR".to_string(),
                breakdown: vec![],
            },
            risk: RiskAssessment {
                risk_index,
                hazards: (0..hazards).map(|i| hazard(&format!("hazard {}", i))).collect(),
            },
            compliance: rules,
            telemetry: PipelineTelemetry::default(),
            generated_at: Utc::now(),
        }
    }

    fn keys(projection: &RoleProjection) -> Vec<String> {
        match serde_json::to_value(projection).unwrap() {
            Value::Object(map) => map.keys().cloned().collect(),
            other => panic!("projection is not an object: {}", other),
        }
    }

    fn mixed_report() -> MasterAnalysisReport {
        report(
            vec![
                rule("IS-456", ComplianceStatus::Pass),
                rule("IS-13920", ComplianceStatus::Warn),
                rule("NBC-4.4", ComplianceStatus::Fail),
            ],
            42.0,
            3,
        )
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("engineer".parse::<Role>().unwrap(), Role::Engineer);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Supervisor ".parse::<Role>().unwrap(), Role::Supervisor);
        assert_eq!("contractor".parse::<Role>().unwrap(), Role::Guest);
    }

    #[test]
    fn test_engineer_view_lists_non_passing_rules() {
        let view = engineer_view(&mixed_report());
        assert_eq!(view.conflicts.len(), 2);
        assert_eq!(view.conflicts[0].rule_id, "IS-13920");
        assert_eq!(view.conflicts[1].comment, "NBC-4.4 comment");
        assert!(view
            .conflicts
            .iter()
            .all(|c| c.confidence == CONFLICT_CONFIDENCE));
        assert_eq!(view.materials.len(), 1);
    }

    #[test]
    fn test_guest_gets_engineer_view() {
        let report = mixed_report();
        assert_eq!(project(&report, Role::Guest), project(&report, Role::Engineer));
    }

    #[test]
    fn test_views_are_disjoint() {
        let report = mixed_report();
        let engineer = keys(&project(&report, Role::Engineer));
        let supervisor = keys(&project(&report, Role::Supervisor));
        let admin = keys(&project(&report, Role::Admin));

        assert!(!engineer.contains(&"costImpactEstimate".to_string()));
        assert!(!engineer.contains(&"ocrAccuracy".to_string()));
        assert!(!admin.contains(&"conflicts".to_string()));

        for key in &engineer {
            assert!(!supervisor.contains(key) && !admin.contains(key), "{}", key);
        }
        for key in &supervisor {
            assert!(!admin.contains(key), "{}", key);
        }
    }

    #[test]
    fn test_supervisor_scenario_three_failures_high_risk() {
        let report = report(
            vec![
                rule("A", ComplianceStatus::Fail),
                rule("B", ComplianceStatus::Fail),
                rule("C", ComplianceStatus::Warn),
                rule("D", ComplianceStatus::Pass),
            ],
            70.0,
            2,
        );
        let view = supervisor_view(&report);
        assert!(view.redesign_required);
        assert_eq!(view.approval_blocker_count, 3);
        assert_eq!(view.delay_impact_days, 3 * 3 + 2 * 2);
        assert_eq!(view.approval_readiness_score, 20.0);
    }

    #[test]
    fn test_supervisor_clean_report() {
        let report = report(vec![rule("A", ComplianceStatus::Pass)], 20.0, 4);
        let view = supervisor_view(&report);
        assert_eq!(view.delay_impact_days, 0);
        assert_eq!(view.approval_readiness_score, 90.0);
        assert!(!view.redesign_required);
        assert_eq!(view.cost_impact_estimate, 48_500_000.0);
        assert_eq!(view.currency, "INR");
    }

    #[test]
    fn test_redesign_thresholds() {
        let two_failures = report(
            vec![rule("A", ComplianceStatus::Fail), rule("B", ComplianceStatus::Fail)],
            60.0,
            0,
        );
        assert!(!supervisor_view(&two_failures).redesign_required);

        let risky = report(vec![], 60.5, 0);
        assert!(supervisor_view(&risky).redesign_required);
    }

    #[test]
    fn test_readiness_decreases_with_failures() {
        let mut previous = approval_readiness(0, 10.0);
        for failures in 1..=6 {
            let score = approval_readiness(failures, 10.0);
            assert!(score < previous);
            previous = score;
        }
        assert_eq!(approval_readiness(7, 10.0), 0.0);
    }

    #[test]
    fn test_readiness_decreases_with_risk() {
        let mut previous = approval_readiness(1, 0.0);
        for step in 1..=16 {
            let score = approval_readiness(1, step as f64 * 10.0);
            if previous > 0.0 {
                assert!(score < previous);
            } else {
                assert_eq!(score, 0.0);
            }
            previous = score;
        }
    }

    #[test]
    fn test_admin_defaults_without_telemetry() {
        let view = admin_view(&mixed_report());
        assert_eq!(view.ocr_accuracy, DEFAULT_OCR_ACCURACY);
        assert_eq!(view.extraction_failure_rate, DEFAULT_EXTRACTION_FAILURE_RATE);
        assert_eq!(view.jurisdiction, JURISDICTION);
    }

    #[test]
    fn test_admin_uses_recorded_telemetry() {
        let mut report = mixed_report();
        report.telemetry = PipelineTelemetry {
            latency_ms: 2300,
            ocr_confidence: Some(0.5),
            extraction_failure_rate: Some(0.25),
            simulated_ocr: false,
        };
        let view = admin_view(&report);
        assert_eq!(view.ocr_accuracy, 50.0);
        assert_eq!(view.extraction_failure_rate, 0.25);
        assert_eq!(view.pipeline_latency_ms, 2300);
    }

    #[test]
    fn test_projection_leaves_report_untouched() {
        let report = mixed_report();
        let before = report.clone();
        for role in [Role::Engineer, Role::Supervisor, Role::Admin, Role::Guest] {
            let _ = project(&report, role);
        }
        assert_eq!(report, before);
    }
}
