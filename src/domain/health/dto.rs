use serde::Serialize;
use utoipa::ToSchema;

/// 전체 서비스 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
}

/// 개별 의존성 점검 결과
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckResult {
    /// 점검 성공 여부
    pub status: bool,
    /// 응답 지연 (밀리초). 타임아웃이면 없음
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// 실패 사유
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn success(latency_ms: u64) -> Self {
        Self {
            status: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn failure(latency_ms: u64, error: String) -> Self {
        Self {
            status: false,
            latency_ms: Some(latency_ms),
            error: Some(error),
        }
    }

    pub fn timeout() -> Self {
        Self {
            status: false,
            latency_ms: None,
            error: Some("health check timed out".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthChecks {
    /// 추론 API 연결 상태
    pub inference_api: CheckResult,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    pub uptime_secs: u64,
    pub checks: HealthChecks,
}
