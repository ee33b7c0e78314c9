//! 운세 채팅 도메인
//!
//! 프롬프트 강제와 응답 검증 파이프라인: 별자리 계산(zodiac) → 메시지 조립
//! (prompt) → 모델 호출(client) → 정책 검사(validator) → 제한된 교정 재작성
//! (service) 순으로 이어집니다.

pub mod client;
pub mod dto;
pub mod handler;
pub mod prompt;
pub mod service;
pub mod validator;
pub mod zodiac;
