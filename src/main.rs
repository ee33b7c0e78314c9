use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use dotenvy::dotenv;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use unse_server::config::AppConfig;
use unse_server::domain::chat::dto::{ChatMessage, ChatRequest, ChatResponse, Role};
use unse_server::domain::health::dto::{CheckResult, HealthChecks, HealthState, HealthStatus};
use unse_server::response::{BaseResponse, ErrorResponse};
use unse_server::{create_app_state, create_router, domain, shutdown};

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::chat::handler::chat,
        domain::health::handler::health,
    ),
    components(
        schemas(
            ChatRequest,
            ChatMessage,
            Role,
            ChatResponse,
            BaseResponse<ChatResponse>,
            ErrorResponse,
            HealthStatus,
            HealthState,
            HealthChecks,
            CheckResult,
        )
    ),
    tags(
        (name = "Chat", description = "운세 채팅 API"),
        (name = "Health", description = "상태 확인 API")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install metrics recorder");

    let config = AppConfig::from_env();
    let state = create_app_state(&config);

    domain::health::service::init_start_time();

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish()
            .expect("Invalid rate limit configuration"),
    );

    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/metrics",
            get(move || {
                let handle = prometheus_handle.clone();
                async move { handle.render() }
            }),
        )
        .layer(GovernorLayer {
            config: governor_conf,
        });

    let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("SERVER_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .expect("Failed to bind server address");

    tracing::info!(host = %host, port, model = %config.model_id, "Starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown::shutdown_signal())
    .await
    .expect("Server error");
}
