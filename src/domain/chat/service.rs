//! 채팅 오케스트레이터
//!
//! 조립 → 생성 → 검증 → (필요 시) 교정 재작성 한 번의 흐름을 담당합니다.
//! 모델 호출은 항상 순차적입니다. 재작성은 첫 번째 출력에 의존하기 때문에
//! 두 호출을 동시에 보낼 수 없습니다.

use std::sync::Arc;

use crate::error::AppError;

use super::client::AiClientTrait;
use super::dto::ChatMessage;
use super::prompt;
use super::validator;

pub struct ChatService {
    client: Arc<dyn AiClientTrait>,
    max_tokens: u16,
    rewrite_max_tokens: u16,
}

impl ChatService {
    pub fn new(client: Arc<dyn AiClientTrait>, max_tokens: u16, rewrite_max_tokens: u16) -> Self {
        Self {
            client,
            max_tokens,
            rewrite_max_tokens,
        }
    }

    /// 대화 히스토리에 대한 최종 응답 텍스트를 생성합니다.
    ///
    /// 첫 번째 생성이 검증을 통과하면 그대로 반환합니다. 정책 위반이면
    /// 교정 지시를 user 턴으로 덧붙여 한 번만 재작성하고, 그 결과는 재검증
    /// 여부와 무관하게 최종 응답이 됩니다. 두 번 실패한 응답도 무한 재시도
    /// 대신 호출자에게 반환합니다.
    ///
    /// 첫 번째 호출이 실패하면 그대로 전파하고 재작성을 시도하지 않습니다.
    /// 재작성 호출이 실패하면 검증 전 첫 번째 텍스트로 폴백합니다.
    pub async fn respond(&self, history: &[ChatMessage]) -> Result<String, AppError> {
        let assembled = prompt::build(history);

        let first = self.client.complete(&assembled, self.max_tokens).await?;

        let verdict = validator::check(&first);
        if verdict.ok {
            return Ok(first);
        }

        tracing::warn!(
            reason = ?verdict.reason,
            response_length = first.len(),
            "Policy violation detected, issuing corrective rewrite"
        );

        let mut rewrite_messages = assembled;
        rewrite_messages.push(ChatMessage::user(rewrite_instruction(&first)));

        match self
            .client
            .complete(&rewrite_messages, self.rewrite_max_tokens)
            .await
        {
            Ok(rewritten) => {
                tracing::info!(
                    rewritten_length = rewritten.len(),
                    "Corrective rewrite completed"
                );
                Ok(rewritten)
            }
            Err(e) => {
                // 언어라도 맞는 응답을 돌려주는 쪽이 요청 실패보다 낫다.
                tracing::error!(error = %e, "Corrective rewrite failed, returning first-pass text");
                Ok(first)
            }
        }
    }
}

/// 교정 재작성 지시문을 만듭니다. 원문을 인용 부호 이스케이프 후 포함합니다.
fn rewrite_instruction(original: &str) -> String {
    format!(
        "다음 텍스트에는 날짜·요일·띠와 같은 검증되지 않은 정보가 포함되어 있을 수 있습니다. 해당 텍스트에서 운세 핵심 요약만을 추출하여, 한 문장으로 \"오늘 당신의 운세는 <한 줄 요약> 입니다.\" 형태로 재작성해주십시오. 절대 날짜·요일·띠 관련 문장을 포함하거나 생성하지 마십시오. 원문: \"{}\"",
        original.replace('"', "\\\"")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::dto::Role;
    use std::sync::Mutex;

    /// 호출별 응답을 순서대로 돌려주고 수신 메시지를 기록하는 목 클라이언트
    struct ScriptedClient {
        responses: Mutex<Vec<Result<String, AppError>>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String, AppError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> Vec<ChatMessage> {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    #[async_trait::async_trait]
    impl AiClientTrait for ScriptedClient {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _max_tokens: u16,
        ) -> Result<String, AppError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.responses.lock().unwrap().remove(0)
        }

        async fn check_connectivity(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn service_with(client: Arc<ScriptedClient>) -> ChatService {
        ChatService::new(client, 1024, 200)
    }

    #[tokio::test]
    async fn clean_first_pass_invokes_model_once() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(
            "오늘 당신의 운세는 '활기찬 하루' 입니다.".to_string(),
        )]));
        let service = service_with(client.clone());

        let history = vec![
            ChatMessage::user("[생년월일] 1990-03-21"),
            ChatMessage::user("오늘 운세 알려줘"),
        ];
        let reply = service.respond(&history).await.unwrap();

        assert_eq!(reply, "오늘 당신의 운세는 '활기찬 하루' 입니다.");
        assert_eq!(client.call_count(), 1);
        // 조립된 페이로드에 별자리 사실이 포함되어야 한다.
        assert!(client.call(0)[0].content.contains("양자리"));
    }

    #[tokio::test]
    async fn violating_response_triggers_exactly_one_rewrite() {
        // 두 번 모두 위반 텍스트를 돌려줘도 호출은 정확히 두 번이어야 한다.
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("당신의 띠는 소띠입니다.".to_string()),
            Ok("오늘은 금요일이라 운이 좋습니다.".to_string()),
        ]));
        let service = service_with(client.clone());

        let history = vec![ChatMessage::user("오늘 운세 알려줘")];
        let reply = service.respond(&history).await.unwrap();

        assert_eq!(client.call_count(), 2);
        // 두 번째 출력이 다시 위반이어도 그대로 반환
        assert_eq!(reply, "오늘은 금요일이라 운이 좋습니다.");
    }

    #[tokio::test]
    async fn rewrite_turn_keeps_system_instruction() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("fortune is good".to_string()),
            Ok("오늘 당신의 운세는 '맑음' 입니다.".to_string()),
        ]));
        let service = service_with(client.clone());

        let history = vec![ChatMessage::user("오늘 운세 알려줘")];
        let reply = service.respond(&history).await.unwrap();

        assert_eq!(reply, "오늘 당신의 운세는 '맑음' 입니다.");

        let rewrite_call = client.call(1);
        assert_eq!(rewrite_call[0].role, Role::System);
        let last = rewrite_call.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last.content.contains("오늘 당신의 운세는"));
        assert!(last.content.contains("원문:"));
        assert!(last.content.contains("fortune is good"));
    }

    #[tokio::test]
    async fn first_pass_failure_propagates_without_rewrite() {
        let client = Arc::new(ScriptedClient::new(vec![Err(AppError::ExternalApiError(
            "timeout".to_string(),
        ))]));
        let service = service_with(client.clone());

        let history = vec![ChatMessage::user("오늘 운세 알려줘")];
        let result = service.respond(&history).await;

        assert!(matches!(result, Err(AppError::ExternalApiError(_))));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn rewrite_failure_falls_back_to_first_text() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("당신의 띠는 소띠입니다.".to_string()),
            Err(AppError::ExternalApiError("timeout".to_string())),
        ]));
        let service = service_with(client.clone());

        let history = vec![ChatMessage::user("오늘 운세 알려줘")];
        let reply = service.respond(&history).await.unwrap();

        assert_eq!(reply, "당신의 띠는 소띠입니다.");
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn rewrite_instruction_escapes_quotes() {
        let instruction = rewrite_instruction("오늘은 \"수\"요일입니다");
        assert!(instruction.contains("\\\"수\\\""));
    }
}
