//! RC Frame Solver HTTP Server

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use rc_frame_solver::prelude::*;

const DEFAULT_ADDR: &str = "0.0.0.0:8086";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    #[serde(default)]
    grid: Option<GridGeometry>,
    #[serde(default)]
    model: Option<ModelData>,
    #[serde(default)]
    loads: Vec<NodeLoad>,
    #[serde(default)]
    options: Option<SolverOptions>,
}

/// Explicit nodes and elements; equation indices are allocated on receipt
#[derive(Debug, Deserialize)]
struct ModelData {
    nodes: Vec<Node>,
    elements: Vec<Element>,
}

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<ResultsData>,
}

#[derive(Debug, Serialize)]
struct ResultsData {
    node_displacements: Vec<NodeDisplacementResult>,
    reactions: Vec<ReactionResult>,
    member_forces: Vec<MemberForceResult>,
    summary: AnalysisSummary,
}

#[derive(Debug, Serialize)]
struct NodeDisplacementResult {
    node: usize,
    #[serde(flatten)]
    displacement: NodeDisplacement,
}

#[derive(Debug, Serialize)]
struct ReactionResult {
    node: usize,
    #[serde(flatten)]
    reaction: Reactions,
}

#[derive(Debug, Serialize)]
struct MemberForceResult {
    element: usize,
    kind: ElementKind,
    i_end: MemberForces,
    j_end: MemberForces,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn analyze(Json(request): Json<AnalysisRequest>) -> impl IntoResponse {
    match run_analysis(request) {
        Ok(results) => (
            StatusCode::OK,
            Json(AnalysisResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Err(e) => {
            warn!("Analysis request failed: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(AnalysisResponse {
                    success: false,
                    error: Some(e.to_string()),
                    results: None,
                }),
            )
        }
    }
}

fn run_analysis(request: AnalysisRequest) -> FrameResult<ResultsData> {
    let options = request.options.unwrap_or_default();
    let model = match (request.grid, request.model) {
        (Some(grid), None) => FrameModel::from_grid_with_limit(&grid, options.max_dofs)?,
        (None, Some(data)) => FrameModel::from_parts(data.nodes, data.elements)?,
        _ => {
            return Err(ValidationError::InvalidGrid(
                "request must carry exactly one of `grid` or `model`".to_string(),
            )
            .into())
        }
    };

    let results = model.analyze(&request.loads, &options)?;

    let node_displacements = results
        .displacements()
        .iter()
        .map(|&(node, displacement)| NodeDisplacementResult { node, displacement })
        .collect();

    let reactions = results
        .reactions()
        .iter()
        .map(|&(node, reaction)| ReactionResult { node, reaction })
        .collect();

    let member_forces = results
        .all_element_forces()
        .iter()
        .map(|f| MemberForceResult {
            element: f.element,
            kind: f.kind,
            i_end: f.at_i(),
            j_end: f.at_j(),
        })
        .collect();

    Ok(ResultsData {
        node_displacements,
        reactions,
        member_forces,
        summary: results.summary().clone(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .layer(cors);

    let addr: SocketAddr = std::env::var("FRAME_SOLVER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .context("FRAME_SOLVER_ADDR is not a socket address")?;

    info!("RC Frame Solver listening on http://{}", addr);
    info!("  Health check: GET  /health");
    info!("  Analysis:     POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
