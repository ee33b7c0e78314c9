//! 모델 응답 정책 검사
//!
//! 모델이 지어낸 날짜·요일·띠 주장과 한국어가 아닌 문자를 탐지합니다.
//! 이 모듈은 분류만 하며, 모델 호출이나 재작성은 오케스트레이터의 몫입니다.

/// 검사 위반 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationReason {
    None,
    /// 지어낸 날짜·요일·띠 관련 문구 포함
    ForbiddenFact,
    /// 한글 이외의 문자 체계(라틴, 키릴, 가나, 한자) 포함
    ForeignScript,
}

/// 응답 한 건에 대한 검사 결과. 요청마다 새로 생성되며 저장되지 않습니다.
#[derive(Debug, Clone)]
pub struct ValidationVerdict {
    pub ok: bool,
    pub reason: ViolationReason,
    /// 재작성 경로를 탄 경우 교정된 텍스트 (오케스트레이터가 채움)
    pub corrected_text: Option<String>,
}

/// 금지 문구 목록
///
/// 사용자가 제공하지 않은 사실을 모델이 생성했음을 나타내는 문구들입니다.
/// 대소문자 구분 부분 문자열 포함 검사로 적용합니다. 단어 단위 항목(요일,
/// 띠, 생년월일)은 정상적인 문장에도 걸릴 수 있는 넓은 그물이지만, 목록을
/// 좁히는 일은 제품 결정 사항이므로 그대로 유지합니다.
pub const FORBIDDEN_PATTERNS: [&str; 12] = [
    "요일",
    "띠",
    "생년월일",
    "당신의 생년월일",
    "를 기준으로",
    "제 생년월일",
    "저의 생년월일",
    "제 생일",
    "저의 생일",
    "당신의 띠",
    "나의 띠",
    "내 띠",
];

/// 한글 이외의 문자 체계가 섞여 있는지 검사합니다.
///
/// 한글 음절(U+AC00~U+D7A3)과 자모/호환 자모는 허용 대상이므로 검사하지
/// 않습니다. 문장 부호·숫자·공백도 위반이 아닙니다.
fn contains_foreign_script(text: &str) -> bool {
    text.chars().any(|c| {
        c.is_ascii_alphabetic()
            || ('\u{0400}'..='\u{04FF}').contains(&c) // 키릴
            || ('\u{3040}'..='\u{309F}').contains(&c) // 히라가나
            || ('\u{30A0}'..='\u{30FF}').contains(&c) // 가타카나
            || ('\u{4E00}'..='\u{9FFF}').contains(&c) // 한자 (CJK 통합)
    })
}

/// 응답 텍스트를 검사해 교정 재작성이 필요한지 판정합니다.
///
/// 금지 문구 검사가 먼저, 외국 문자 검사가 그다음입니다. 둘 다 없으면
/// 통과입니다.
pub fn check(text: &str) -> ValidationVerdict {
    if FORBIDDEN_PATTERNS.iter().any(|p| text.contains(p)) {
        return ValidationVerdict {
            ok: false,
            reason: ViolationReason::ForbiddenFact,
            corrected_text: None,
        };
    }

    if contains_foreign_script(text) {
        return ValidationVerdict {
            ok: false,
            reason: ViolationReason::ForeignScript,
            corrected_text: None,
        };
    }

    ValidationVerdict {
        ok: true,
        reason: ViolationReason::None,
        corrected_text: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fabricated_birthdate_claim_is_forbidden() {
        let verdict =
            check("당신의 생년월일인 2008년 3월 1일을 기준으로, 2025년 11월 28일은 수요일입니다.");
        assert!(!verdict.ok);
        assert_eq!(verdict.reason, ViolationReason::ForbiddenFact);
    }

    #[test]
    fn animal_year_claim_is_forbidden() {
        let verdict = check("당신의 띠는 소띠입니다.");
        assert!(!verdict.ok);
        assert_eq!(verdict.reason, ViolationReason::ForbiddenFact);
    }

    #[test]
    fn clean_korean_response_passes() {
        let verdict = check("오늘 당신의 운세는 '활기찬 하루' 입니다. 새로운 시도를 해보세요.");
        assert!(verdict.ok);
        assert_eq!(verdict.reason, ViolationReason::None);
        assert!(verdict.corrected_text.is_none());
    }

    #[test]
    fn latin_text_is_foreign_script() {
        let verdict = check("오늘의 운세는 good luck입니다");
        assert!(!verdict.ok);
        assert_eq!(verdict.reason, ViolationReason::ForeignScript);
    }

    #[test]
    fn cjk_ideographs_are_foreign_script() {
        let verdict = check("오늘의 운세는 大吉입니다");
        assert!(!verdict.ok);
        assert_eq!(verdict.reason, ViolationReason::ForeignScript);
    }

    #[test]
    fn kana_is_foreign_script() {
        assert!(!check("오늘은 ラッキー한 날").ok);
        assert!(!check("오늘은 うん이 좋은 날").ok);
    }

    #[test]
    fn cyrillic_is_foreign_script() {
        assert!(!check("오늘의 운세는 удача입니다").ok);
    }

    #[test]
    fn hangul_punctuation_and_digits_pass() {
        let verdict = check("오늘의 운세는 좋습니다! 점수: 87점, '최고'의 하루.");
        assert!(verdict.ok);
    }

    #[test]
    fn forbidden_fact_takes_precedence_over_script() {
        let verdict = check("your 생년월일 is unknown");
        assert_eq!(verdict.reason, ViolationReason::ForbiddenFact);
    }

    #[test]
    fn known_false_positive_surface_is_preserved() {
        // "요일"이 일반 문맥에 쓰여도 걸린다. 의도된 과탐지이다.
        let verdict = check("오늘의 요일별 운세를 알려드릴 수는 없습니다.");
        assert!(!verdict.ok);
        assert_eq!(verdict.reason, ViolationReason::ForbiddenFact);
    }
}
