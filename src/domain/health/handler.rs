use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::AppState;

use super::dto::{HealthState, HealthStatus};
use super::service;

/// 서비스 상태 확인
///
/// 추론 API 연결 상태와 서버 가동 시간을 반환합니다. Unhealthy면 503을
/// 돌려 로드밸런서가 인스턴스를 제외할 수 있게 합니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "정상 또는 성능 저하", body = HealthStatus),
        (status = 503, description = "업스트림 연결 불가", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let status = service::check_health(state.ai_client.as_ref()).await;

    let http_status = match status.status {
        HealthState::Healthy | HealthState::Degraded => StatusCode::OK,
        HealthState::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(status))
}
