//! 운세 채팅 시스템 프롬프트와 모델 페이로드 조립
//!
//! 모든 대화는 서버가 강제하는 단일 시스템 프롬프트로 시작합니다. 클라이언트가
//! 보낸 system 역할 메시지는 어떤 경우에도 전달하지 않습니다.

use super::dto::{ChatMessage, Role, BIRTHDATE_TAG};
use super::zodiac;

/// 모든 대화에 강제 적용되는 시스템 프롬프트
pub const SYSTEM_PROMPT: &str = r#"당신은 한국어만 사용해야 하는 문법·표기·사실관계(고유명사 포함) 교정·검증 도우미입니다.
1) 모든 응답은 한국어(표준 한국어)만 사용하십시오. 다른 언어로 답변하거나 일부 설명을 영어로 표기하지 마십시오.
2) 입력 텍스트에 대해 문법, 맞춤법, 띄어쓰기, 어휘 및 문체(격식 수준)를 점검하고 가능한 교정안을 제시하십시오.
3) 문장 내 고유명사(인명, 지명, 기관명, 제품/브랜드 등)를 교차검증하고 공식 표기/권장 표기(로마자 표기 포함)와 사실관계(예: 직책/소속)가 정확한지 확인하십시오.
4) 각 변경 제안은 적당한 길이의 형식로 제공하십시오: 원문 -> 수정안 : 변경 사유 : 참고출처(가능 시) : 확신도(높음/보통/낮음).
5) 외부 검색이 가능하면 신뢰할 수 있는 출처(공식 웹사이트, 표준국어대사전, 주요 언론 등)를 우선 활용하고, 불가능하면 '검증 불가(내부 지식 기반)'로 명시하십시오.
6) 사용자들이 운세를 쉽게 이해 가능하도록 직관적으로 운세를 출력해주고 한자 등등의 다른 언어들은 사용하지 말고 대답하십시오.
7) 운세를 출력할 때, 사용자가 제공하지 않았거나 검증할 수 없는 날짜·요일·띠(예: "당신의 생년월일인 2008년 3월 1일을 기준으로, 2025년 11월 28일은 [수]요일입니다" 또는 "당신의 띠는 [소]띠입니다")와 같은 사실은 절대 생성하지 마십시오. 이러한 정보는 사용자가 명시적으로 제공했거나, 신뢰 가능한 출처로 검증 가능한 경우에만 포함할 수 있습니다.
8) 사용자가 운세를 요청하거나 생년월일을 제공할 때, 결과는 항상 가장 먼저 다음 형식의 문장으로 시작해야 합니다: "오늘 당신의 운세는 <한 줄 요약> 입니다." 그 외 추가 설명(추천 행동 등)은 한두 문장으로 간결하게 덧붙일 수 있으나, 날짜·요일·띠 관련 정보를 포함하지 마십시오. (필요 시 신뢰도/출처를 함께 명시)
9) 운세 관련 정보가 부수적으로 날짜·요일·띠를 포함해야 하는 경우에는, 반드시 계산 근거(예: '서기 YYYY-MM-DD를 태양력으로 변환한 결과 X')와 함께 '확신도'를 명시하되, 사용자가 요청하지 않는 한 기본 출력에서는 배제하십시오.
10) 운세를 보여줄 시 텍스트를 너무 길게 생성하지 않습니다 중간 정도의 길이로 생성합니다.
11) 사실관계가 불일치하거나 불확실한 경우, 가능한 수정안과 함께 '확인 필요'로 표시해 사용자에게 후속 질문을 유도하십시오."#;

/// 히스토리에서 첫 번째 생년월일 태그의 날짜 부분을 추출합니다.
fn extract_birthdate(history: &[ChatMessage]) -> Option<&str> {
    history.iter().find_map(|msg| {
        if msg.role != Role::User {
            return None;
        }
        let content = msg.content.trim_start();
        let rest = content.strip_prefix(BIRTHDATE_TAG)?;
        let date = rest.trim();
        (!date.is_empty()).then_some(date)
    })
}

/// 별자리 정보를 시스템 프롬프트에 덧붙일 사실 블록으로 만듭니다.
///
/// 모델이 다시 계산하거나 의심할 대상이 아닌, 서버가 계산한 확정 사실로
/// 전달합니다.
fn zodiac_fact_block(sign: &zodiac::ZodiacSign) -> String {
    format!(
        "\n\n[계산된 별자리 정보]\n별자리: {} ({})\n기간: {}\n특성: {}\n위 별자리 정보는 서버가 사용자의 생년월일로부터 계산한 확정 사실입니다. 다시 계산하거나 의심하지 말고 그대로 활용하십시오.",
        sign.name,
        sign.name_en,
        sign.range_label(),
        sign.traits
    )
}

/// 모델에 보낼 최종 메시지 목록을 조립합니다.
///
/// 1. 히스토리의 system 메시지는 모두 버립니다. 시스템 슬롯은 서버의
///    기본 지시문만 차지할 수 있습니다.
/// 2. 생년월일 태그가 있고 별자리 계산에 성공하면 사실 블록을 지시문 뒤에
///    덧붙입니다. 날짜가 잘못되었으면 별자리 정보 없이 진행합니다.
/// 3. 결과는 항상 인덱스 0에 시스템 메시지 하나, 그 뒤에 원래 순서 그대로의
///    비-system 히스토리입니다. 내용은 어느 단계에서도 수정하지 않습니다.
pub fn build(history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut instruction = SYSTEM_PROMPT.to_string();

    if let Some(sign) = extract_birthdate(history).and_then(zodiac::sign_for) {
        instruction.push_str(&zodiac_fact_block(sign));
    }

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(instruction));
    messages.extend(
        history
            .iter()
            .filter(|msg| msg.role != Role::System)
            .cloned(),
    );
    messages
}

/// 히스토리에서 사용자가 실제로 입력한 질문을 찾습니다.
///
/// 제어 태그 메시지는 데이터 운반용이므로 질문으로 치지 않습니다. 로깅과
/// 표시 용도로만 쓰이며, 모델 페이로드에서는 어떤 메시지도 제외되지
/// 않습니다.
pub fn visible_question(history: &[ChatMessage]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|msg| msg.role == Role::User && !super::dto::is_control_message(msg))
        .map(|msg| msg.content.as_str())
}
