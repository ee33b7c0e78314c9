use std::env;

/// 환경 변수 기반 서버 설정. 프로세스 시작 시 한 번 로드하며 이후 변경되지
/// 않습니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_api_base: String,
    /// 추론에 사용할 모델 ID
    pub model_id: String,
    /// 1차 생성 최대 토큰 수
    pub max_tokens: u16,
    /// 교정 재작성 최대 토큰 수
    pub rewrite_max_tokens: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set"),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model_id: env::var("MODEL_ID").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            max_tokens: env_u16("MAX_TOKENS", 1024),
            rewrite_max_tokens: env_u16("REWRITE_MAX_TOKENS", 200),
        }
    }
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
