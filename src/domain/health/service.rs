//! 헬스체크 서비스
//!
//! 추론 API 연결 상태를 타임아웃을 걸고 확인하며, 결과를 30초간 캐싱해
//! 헬스체크 폭주가 업스트림 호출 폭주로 번지지 않게 합니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::time::timeout;

use super::dto::{CheckResult, HealthChecks, HealthState, HealthStatus};
use crate::domain::chat::client::AiClientTrait;

/// 서버 시작 시간 (전역)
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// 헬스체크 결과 캐시 (전역)
static HEALTH_CACHE: std::sync::OnceLock<Arc<RwLock<Option<CachedHealth>>>> =
    std::sync::OnceLock::new();

/// 헬스체크 타임아웃 (5초)
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Degraded 상태 임계값 (2초)
const DEGRADED_THRESHOLD: Duration = Duration::from_secs(2);

/// 캐시 유효 시간 (30초)
const CACHE_DURATION: Duration = Duration::from_secs(30);

struct CachedHealth {
    result: CheckResult,
    cached_at: Instant,
}

fn get_health_cache() -> Arc<RwLock<Option<CachedHealth>>> {
    HEALTH_CACHE
        .get_or_init(|| Arc::new(RwLock::new(None)))
        .clone()
}

/// 서버 시작 시간 초기화. main에서 서버 시작 시 호출해야 합니다.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

pub fn get_uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// 전체 헬스 체크 수행 (캐싱 적용)
pub async fn check_health(ai_client: &dyn AiClientTrait) -> HealthStatus {
    let uptime = get_uptime_secs();
    let inference_check = check_inference_cached(ai_client).await;

    let status = determine_health_state(&inference_check);

    HealthStatus {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime,
        checks: HealthChecks {
            inference_api: inference_check,
        },
    }
}

/// 추론 API 상태에 따른 전체 상태 결정
fn determine_health_state(check: &CheckResult) -> HealthState {
    if !check.status {
        return HealthState::Unhealthy;
    }

    if let Some(latency) = check.latency_ms {
        if latency >= DEGRADED_THRESHOLD.as_millis() as u64 {
            return HealthState::Degraded;
        }
    }

    HealthState::Healthy
}

async fn check_inference_cached(ai_client: &dyn AiClientTrait) -> CheckResult {
    let cache = get_health_cache();

    {
        let cached = cache.read().await;
        if let Some(ref c) = *cached {
            if c.cached_at.elapsed() < CACHE_DURATION {
                tracing::debug!(
                    cache_age_secs = c.cached_at.elapsed().as_secs(),
                    "Using cached health check result"
                );
                return c.result.clone();
            }
        }
    }

    tracing::debug!("Performing fresh health check");
    let result = check_inference_fresh(ai_client).await;

    {
        let mut cached = cache.write().await;
        *cached = Some(CachedHealth {
            result: result.clone(),
            cached_at: Instant::now(),
        });
    }

    result
}

async fn check_inference_fresh(ai_client: &dyn AiClientTrait) -> CheckResult {
    let start = Instant::now();

    let result = timeout(HEALTH_CHECK_TIMEOUT, ai_client.check_connectivity()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => {
            tracing::info!(latency_ms, "Inference API health check passed");
            CheckResult::success(latency_ms)
        }
        Ok(Err(e)) => {
            tracing::warn!(latency_ms, error = %e, "Inference API health check failed");
            CheckResult::failure(latency_ms, e.to_string())
        }
        Err(_) => {
            tracing::warn!("Inference API health check timed out");
            CheckResult::timeout()
        }
    }
}
