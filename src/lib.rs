//! 운세 채팅 서버
//!
//! 한국어 운세 채팅의 프롬프트 강제·응답 검증 파이프라인을 감싼 axum HTTP
//! 서비스입니다. 인증과 자격 증명 저장은 외부 셸의 책임이며, 이 크레이트는
//! 채팅 오케스트레이션만 소유합니다.

pub mod config;
pub mod domain;
pub mod error;
pub mod global;
pub mod response;
pub mod shutdown;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use config::AppConfig;
use domain::chat::client::OpenAiClient;
use domain::chat::service::ChatService;

pub use domain::chat::client::AiClientTrait;

/// 요청 핸들러가 공유하는 애플리케이션 상태
///
/// 요청별 상태(메시지 목록, 검사 결과)는 모두 해당 요청 태스크에 지역적이라
/// 여기에는 불변 협력자만 들어 있습니다.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub ai_client: Arc<dyn AiClientTrait>,
}

/// 프로덕션 상태 구성: async-openai 클라이언트로 오케스트레이터를 만듭니다.
pub fn create_app_state(config: &AppConfig) -> AppState {
    let ai_client: Arc<dyn AiClientTrait> = Arc::new(OpenAiClient::new(config));
    let chat_service = Arc::new(ChatService::new(
        ai_client.clone(),
        config.max_tokens,
        config.rewrite_max_tokens,
    ));

    AppState {
        chat_service,
        ai_client,
    }
}

/// 라우터 구성 (레이트리밋 레이어는 main에서 추가)
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(domain::chat::handler::chat))
        .route("/health", get(domain::health::handler::health))
        .layer(middleware::from_fn(global::middleware::request_tracing))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 테스트용 라우터: 모델 클라이언트를 목으로 대체합니다.
pub fn create_test_router_with_mock(mock: impl AiClientTrait + 'static) -> Router {
    let ai_client: Arc<dyn AiClientTrait> = Arc::new(mock);
    let chat_service = Arc::new(ChatService::new(ai_client.clone(), 1024, 200));

    create_router(AppState {
        chat_service,
        ai_client,
    })
}
