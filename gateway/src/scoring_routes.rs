//! Scoring API Routes
//!
//! - POST /economic/calculate-score, /economic/optimize
//! - POST /quality/assess, /environmental/assess
//! - POST /transportation/calculate, /tradeoff/analyze
//! - POST /compute (kind-tagged request)
//! - GET /{service} and /{service}/health

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use supplier_scoring::{
    CostInput, EconomicAssessment, EnvironmentalAssessment, EnvironmentalInput, QualityAssessment,
    QualityInput, Scorers, ScoringOutcome, ScoringRequest, SourcingPlan, SupplierQuote,
    TradeoffAnalysis, TradeoffRequest, TransportAssessment, TransportInput,
};

use crate::response::{ApiError, ApiResponse, ScoringJson};

/// Shared, immutable scorer set
#[derive(Clone)]
pub struct ScoringState {
    pub scorers: Arc<Scorers>,
}

impl ScoringState {
    pub fn new(scorers: Scorers) -> Self {
        Self {
            scorers: Arc::new(scorers),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ========== Request/Response Types ==========

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub message: &'static str,
    pub endpoints: &'static [&'static str],
}

pub const SERVICES: [ServiceDescriptor; 5] = [
    ServiceDescriptor {
        service: "economic",
        message: "Economic scoring and sourcing optimization",
        endpoints: &["POST /calculate-score", "POST /optimize"],
    },
    ServiceDescriptor {
        service: "quality",
        message: "Quality compliance and risk assessment",
        endpoints: &["POST /assess"],
    },
    ServiceDescriptor {
        service: "environmental",
        message: "Environmental impact and sustainability assessment",
        endpoints: &["POST /assess"],
    },
    ServiceDescriptor {
        service: "transportation",
        message: "Transportation emissions and efficiency scoring",
        endpoints: &["POST /calculate"],
    },
    ServiceDescriptor {
        service: "tradeoff",
        message: "Multi-criteria tradeoff analysis",
        endpoints: &["POST /analyze"],
    },
];

// ========== Route Handlers ==========

pub async fn calculate_economic(
    State(state): State<ScoringState>,
    ScoringJson(input): ScoringJson<CostInput>,
) -> ApiResult<EconomicAssessment> {
    Ok(ApiResponse::ok(state.scorers.economic.score(&input)?))
}

pub async fn optimize_sourcing(
    State(state): State<ScoringState>,
    ScoringJson(quotes): ScoringJson<Vec<SupplierQuote>>,
) -> ApiResult<SourcingPlan> {
    Ok(ApiResponse::ok(state.scorers.economic.optimize_sourcing(&quotes)?))
}

pub async fn assess_quality(
    State(state): State<ScoringState>,
    ScoringJson(input): ScoringJson<QualityInput>,
) -> ApiResult<QualityAssessment> {
    Ok(ApiResponse::ok(state.scorers.quality.score(&input)?))
}

pub async fn assess_environmental(
    State(state): State<ScoringState>,
    ScoringJson(input): ScoringJson<EnvironmentalInput>,
) -> ApiResult<EnvironmentalAssessment> {
    Ok(ApiResponse::ok(state.scorers.environmental.score(&input)?))
}

pub async fn calculate_transportation(
    State(state): State<ScoringState>,
    ScoringJson(input): ScoringJson<TransportInput>,
) -> ApiResult<TransportAssessment> {
    Ok(ApiResponse::ok(state.scorers.transportation.score(&input)?))
}

pub async fn analyze_tradeoff(
    State(state): State<ScoringState>,
    ScoringJson(req): ScoringJson<TradeoffRequest>,
) -> ApiResult<TradeoffAnalysis> {
    Ok(ApiResponse::ok(
        state.scorers.tradeoff.score(&req.input, &req.weights)?,
    ))
}

/// Kind-tagged entry point covering every scorer
pub async fn compute(
    State(state): State<ScoringState>,
    ScoringJson(request): ScoringJson<ScoringRequest>,
) -> ApiResult<ScoringOutcome> {
    Ok(ApiResponse::ok(state.scorers.compute(&request)?))
}

// ========== Router ==========

pub fn scoring_routes(state: ScoringState) -> Router {
    let mut router = Router::new()
        .route("/economic/calculate-score", post(calculate_economic))
        .route("/economic/optimize", post(optimize_sourcing))
        .route("/quality/assess", post(assess_quality))
        .route("/environmental/assess", post(assess_environmental))
        .route("/transportation/calculate", post(calculate_transportation))
        .route("/tradeoff/analyze", post(analyze_tradeoff))
        .route("/compute", post(compute))
        .with_state(state);

    for descriptor in SERVICES {
        let service = descriptor.service;
        router = router
            .route(
                &format!("/{}", service),
                get(move || async move { Json(descriptor) }),
            )
            .route(
                &format!("/{}/health", service),
                get(move || async move {
                    Json(serde_json::json!({
                        "status": "healthy",
                        "service": service,
                    }))
                }),
            );
    }

    router
}
