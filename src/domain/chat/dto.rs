use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 대화 메시지 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 대화 메시지
///
/// 제어 메시지는 `user` 역할이면서 내용이 예약된 대괄호 태그로 시작하는
/// 메시지입니다. 모델 페이로드에는 그대로 전달되지만, 사용자의 실제 질문을
/// 추출할 때는 제외됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: Role,
    #[schema(example = "오늘 운세 알려줘")]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// 생년월일 제어 태그 (`[생년월일] YYYY-MM-DD`)
pub const BIRTHDATE_TAG: &str = "[생년월일]";
/// 운세 기준 날짜 제어 태그 (`[운세날짜] YYYY-MM-DD`)
pub const TARGET_DATE_TAG: &str = "[운세날짜]";
/// 운세 종류 제어 태그 (`[운세|type:<kind>]`)
pub const HOROSCOPE_TAG_PREFIX: &str = "[운세|";

/// 제어 메시지 여부 판별
pub fn is_control_message(message: &ChatMessage) -> bool {
    if message.role != Role::User {
        return false;
    }
    let content = message.content.trim_start();
    content.starts_with(BIRTHDATE_TAG)
        || content.starts_with(TARGET_DATE_TAG)
        || content.starts_with(HOROSCOPE_TAG_PREFIX)
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct ChatRequest {
    /// 대화 히스토리 (제어 태그 포함 가능)
    #[validate(length(min = 1, message = "메시지는 최소 1개 이상이어야 합니다."))]
    pub messages: Vec<ChatMessage>,

    /// true면 text/event-stream으로 응답합니다.
    #[serde(default)]
    #[schema(example = false)]
    pub stream: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    #[schema(example = "오늘 당신의 운세는 '활기찬 하루' 입니다.")]
    pub reply: String,
}
