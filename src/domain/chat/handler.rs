use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::Stream;
use validator::Validate;

use crate::error::AppError;
use crate::response::{BaseResponse, ErrorResponse};
use crate::AppState;

use super::dto::{ChatRequest, ChatResponse};
use super::prompt;

/// 운세 채팅
///
/// 대화 히스토리를 받아 모델 응답을 생성합니다. 히스토리에 `[생년월일]`
/// 태그가 있으면 별자리 정보가 프롬프트에 포함되고, 정책 위반 응답은 한 번의
/// 교정 재작성을 거칩니다. `stream: true`면 같은 최종 텍스트를
/// text/event-stream으로 전송합니다.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "응답 생성 성공", body = BaseResponse<ChatResponse>),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 429, description = "요청 한도 초과", body = ErrorResponse),
        (status = 500, description = "서버 에러", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    // JSON 파싱 에러 처리
    let Json(request) = request.map_err(AppError::from)?;

    tracing::info!(
        message_count = request.messages.len(),
        stream = request.stream,
        "Chat request received"
    );

    // 입력 검증
    request.validate()?;

    if let Some(question) = prompt::visible_question(&request.messages) {
        tracing::debug!(question_length = question.len(), "User question identified");
    }

    // 오케스트레이터 호출 (조립 → 생성 → 검증 → 필요 시 재작성)
    let reply = state.chat_service.respond(&request.messages).await?;

    tracing::info!(reply_length = reply.len(), "Chat reply generated");

    if request.stream {
        Ok(Sse::new(sse_events(reply))
            .keep_alive(KeepAlive::default())
            .into_response())
    } else {
        Ok(Json(BaseResponse::success(ChatResponse { reply })).into_response())
    }
}

/// 최종 텍스트를 SSE 이벤트 스트림으로 변환합니다.
///
/// 각 이벤트의 data는 `{"response": "<조각>"}` 형태의 JSON 한 줄입니다.
/// 검증은 이미 전체 텍스트에 대해 끝난 상태이므로 여기서는 전송 형태만
/// 바꿉니다.
fn sse_events(text: String) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::iter(chunk_text(&text).into_iter().map(|chunk| {
        Ok(Event::default().data(serde_json::json!({ "response": chunk }).to_string()))
    }))
}

/// 텍스트를 문자 단위 16자 조각으로 나눕니다. 멀티바이트 한글 경계를
/// 지키기 위해 바이트가 아닌 문자 기준으로 자릅니다.
fn chunk_text(text: &str) -> Vec<String> {
    text.chars()
        .collect::<Vec<char>>()
        .chunks(16)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_reassemble_to_original_text() {
        let text = "오늘 당신의 운세는 '활기찬 하루' 입니다. 새로운 시도를 해보세요.";

        let chunks = chunk_text(text);

        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 16));
        assert_eq!(chunks.len(), (text.chars().count() + 15) / 16);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("").is_empty());
    }
}
