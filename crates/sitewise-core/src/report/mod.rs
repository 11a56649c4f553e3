//! Report aggregation and role projection
//!
//! Provides:
//! - The master analysis report model
//! - The pipeline that assembles it through the gateway
//! - Pure role-scoped projections

mod model;
mod pipeline;
mod projection;

pub use model::{
    BlueprintExtraction, ComplianceRule, ComplianceStatus, CostLine, CostReport, Hazard,
    MasterAnalysisReport, Material, PipelineTelemetry, RiskAssessment,
};
pub use pipeline::AnalysisPipeline;
pub use projection::{
    admin_view, approval_readiness, delay_impact_days, engineer_view, project, supervisor_view,
    AdminView, Conflict, EngineerView, Role, RoleProjection, SupervisorView,
    CONFLICT_CONFIDENCE, DEFAULT_EXTRACTION_FAILURE_RATE, DEFAULT_OCR_ACCURACY, JURISDICTION,
    REGULATION_VERSION,
};
