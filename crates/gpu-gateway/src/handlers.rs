//! Route handlers.
//!
//! Public routes: `GET /`, `GET /health`. Protected routes (bearer auth):
//! `GET /gpu-status`, `POST /compute`, `POST /batch-compute`.

use crate::domain::error::{ApiError, ApiResult};
use crate::domain::types::{
    BatchComputeResponse, ComputeResponse, HealthResponse, ServiceInfo, StatusResponse,
};
use crate::domain::validation::{validate_batch, validate_compute};
use crate::middleware::ClientIp;
use crate::service::AppState;
use axum::extract::{FromRequest, State};
use axum::Json;
use gpu_compute::ComputationRequest;
use tracing::info;

/// Characters of request data echoed into logs
const LOGGED_DATA_CHARS: usize = 50;

/// JSON body extractor whose rejections render as `{"detail": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);

/// `GET /`
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::running())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.engine.config().gpu_available))
}

/// `GET /gpu-status`
pub async fn gpu_status(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
) -> Json<StatusResponse> {
    info!(%client_ip, "GPU status request");
    Json(StatusResponse::new(state.engine.status()))
}

/// `POST /compute`
pub async fn compute(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidJson(request): ValidJson<ComputationRequest>,
) -> ApiResult<Json<ComputeResponse>> {
    validate_compute(&request, &state.limits)?;

    info!(
        %client_ip,
        data = %preview(&request.data),
        priority = %request.priority,
        "Computation request"
    );

    let computation = state.engine.run(&request.data, &request.parameters).await;

    Ok(Json(ComputeResponse::new(
        computation,
        request.priority,
        client_ip,
    )))
}

/// `POST /batch-compute`
pub async fn batch_compute(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidJson(requests): ValidJson<Vec<ComputationRequest>>,
) -> ApiResult<Json<BatchComputeResponse>> {
    validate_batch(&requests, &state.limits)?;

    info!(%client_ip, batch_size = requests.len(), "Batch computation request");

    let report = state.engine.run_batch(&requests).await;
    info!(
        total = report.total_requests,
        successful = report.successful,
        failed = report.failed,
        "Batch computation finished"
    );

    Ok(Json(BatchComputeResponse::new(report, client_ip)))
}

/// First characters of `data`, for logging.
fn preview(data: &str) -> String {
    data.chars().take(LOGGED_DATA_CHARS).collect()
}
