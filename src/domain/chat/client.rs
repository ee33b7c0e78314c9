//! 모델 추론 클라이언트
//!
//! 오케스트레이터는 `AiClientTrait`만 알고, 실제 OpenAI 호환 API 호출은
//! `OpenAiClient`가 담당합니다. 테스트에서는 이 트레이트를 목으로 대체합니다.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::config::AppConfig;
use crate::error::AppError;

use super::dto::{ChatMessage, Role};

/// 모델 추론 능력의 추상화
///
/// `complete`는 전체 텍스트를 버퍼링해 반환합니다. 스트리밍 전송 여부는
/// 핸들러의 전송 단계에서 결정하며, 검증 로직은 항상 완성된 텍스트를
/// 다룹니다.
#[async_trait::async_trait]
pub trait AiClientTrait: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u16,
    ) -> Result<String, AppError>;

    /// 업스트림 연결 확인 (헬스체크용)
    async fn check_connectivity(&self) -> Result<(), AppError>;
}

/// async-openai 기반 프로덕션 구현
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &AppConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.openai_api_key.clone())
            .with_api_base(config.openai_api_base.clone());

        Self {
            client: Client::with_config(openai_config),
            model: config.model_id.clone(),
        }
    }

    fn convert_messages(
        messages: &[ChatMessage],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AppError> {
        messages
            .iter()
            .map(|msg| {
                let converted = match msg.role {
                    Role::System => ChatCompletionRequestMessage::System(
                        ChatCompletionRequestSystemMessageArgs::default()
                            .content(msg.content.clone())
                            .build()
                            .map_err(|e| {
                                AppError::InternalError(format!("Failed to build message: {}", e))
                            })?,
                    ),
                    Role::User => ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(msg.content.clone())
                            .build()
                            .map_err(|e| {
                                AppError::InternalError(format!("Failed to build message: {}", e))
                            })?,
                    ),
                    Role::Assistant => ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessageArgs::default()
                            .content(msg.content.clone())
                            .build()
                            .map_err(|e| {
                                AppError::InternalError(format!("Failed to build message: {}", e))
                            })?,
                    ),
                };
                Ok(converted)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl AiClientTrait for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u16,
    ) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::convert_messages(messages)?)
            .max_tokens(max_tokens)
            .temperature(0.7)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Inference API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::InternalError("No response from inference API".to_string()))
    }

    async fn check_connectivity(&self) -> Result<(), AppError> {
        self.client
            .models()
            .list()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Inference API error: {}", e)))?;
        Ok(())
    }
}
