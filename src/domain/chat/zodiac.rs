//! 12별자리(서양 점성술) 계산
//!
//! 생년월일(YYYY-MM-DD)로부터 별자리를 결정합니다. 12개 구간은 1년을 빈틈과
//! 겹침 없이 순환 분할하며, 연도 경계를 넘는 구간(염소자리 12/22~1/19)만
//! `start > end`입니다.

use chrono::{Datelike, NaiveDate};

/// 별자리 한 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZodiacSign {
    /// 한글 이름 (예: "양자리")
    pub name: &'static str,
    /// 영문 이름 (예: "Aries")
    pub name_en: &'static str,
    /// 시작일, MMDD (예: 321 = 3월 21일)
    pub start: u16,
    /// 종료일, MMDD
    pub end: u16,
    /// AI 운세 생성 시 참고하는 핵심 특성
    pub traits: &'static str,
}

/// 12별자리 데이터 (양자리부터 물고기자리까지)
pub const ZODIAC_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign {
        name: "양자리",
        name_en: "Aries",
        start: 321,
        end: 419,
        traits: "에너지와 추진력이 강해 신속한 결단이 필요한 시점에 유리합니다. 다만 성급함을 조절할 필요가 있습니다.",
    },
    ZodiacSign {
        name: "황소자리",
        name_en: "Taurus",
        start: 420,
        end: 520,
        traits: "안정적이고 꾸준한 흐름이 들어오며 재정·물질적 성취에 강세가 보입니다. 고집이 갈등 요인이 될 수 있습니다.",
    },
    ZodiacSign {
        name: "쌍둥이자리",
        name_en: "Gemini",
        start: 521,
        end: 621,
        traits: "커뮤니케이션 능력이 강화되며 새로운 정보, 인맥, 기회가 늘어납니다. 과한 선택지로 인해 집중 분산이 발생할 수 있습니다.",
    },
    ZodiacSign {
        name: "게자리",
        name_en: "Cancer",
        start: 622,
        end: 722,
        traits: "감정적 유대 및 가정·인간관계 중심의 변화가 있습니다. 안정과 보호 본능이 강화되며 내적 성찰에 적합합니다.",
    },
    ZodiacSign {
        name: "사자자리",
        name_en: "Leo",
        start: 723,
        end: 822,
        traits: "자신감과 리더십이 상승합니다. 창작, 표현, 대외적 활동에 유리하며 주목받는 기회가 증가합니다.",
    },
    ZodiacSign {
        name: "처녀자리",
        name_en: "Virgo",
        start: 823,
        end: 923,
        traits: "분석력·정밀함·실무 능력이 상승합니다. 건강 관리와 정리·정돈 분야에서 좋은 성과가 있습니다.",
    },
    ZodiacSign {
        name: "천칭자리",
        name_en: "Libra",
        start: 924,
        end: 1022,
        traits: "협력·균형·중재에 강세가 있으며 새로운 인간관계가 열립니다. 우유부단함이 단점으로 나타날 수 있습니다.",
    },
    ZodiacSign {
        name: "전갈자리",
        name_en: "Scorpio",
        start: 1023,
        end: 1122,
        traits: "집중력·통찰·변화가 핵심입니다. 숨겨진 정보나 심층 분석에 능하며 권력 구조 변동에도 강합니다.",
    },
    ZodiacSign {
        name: "사수자리",
        name_en: "Sagittarius",
        start: 1123,
        end: 1221,
        traits: "확장·모험·학습 분야에서 성장 기회가 큽니다. 이동·여행·지식 습득에 유리합니다.",
    },
    ZodiacSign {
        name: "염소자리",
        name_en: "Capricorn",
        start: 1222,
        end: 119,
        traits: "목표 달성 능력이 강화되며 책임·규율·현실적 성과에 강세가 있습니다. 장기 프로젝트에 적합합니다.",
    },
    ZodiacSign {
        name: "물병자리",
        name_en: "Aquarius",
        start: 120,
        end: 218,
        traits: "혁신·독창성·기술 분야에서 기회가 큽니다. 기존 틀을 벗어나는 변화가 유리하게 작용합니다.",
    },
    ZodiacSign {
        name: "물고기자리",
        name_en: "Pisces",
        start: 219,
        end: 320,
        traits: "직관·감성·창의성이 크게 강화됩니다. 예술·감성적 작업에 유리하지만 현실감 저하에 주의가 필요합니다.",
    },
];

impl ZodiacSign {
    /// MMDD 값이 이 구간에 포함되는지 검사합니다.
    ///
    /// 연도 경계를 넘는 구간(start > end)은 OR, 나머지는 AND 판정입니다.
    /// 경계일은 양쪽 끝 모두 포함입니다.
    fn contains(&self, mmdd: u16) -> bool {
        if self.start > self.end {
            mmdd >= self.start || mmdd <= self.end
        } else {
            self.start <= mmdd && mmdd <= self.end
        }
    }

    /// "MM-DD ~ MM-DD" 형태의 구간 표기
    pub fn range_label(&self) -> String {
        format!(
            "{:02}-{:02} ~ {:02}-{:02}",
            self.start / 100,
            self.start % 100,
            self.end / 100,
            self.end % 100
        )
    }
}

/// 생년월일 문자열로 별자리를 찾습니다.
///
/// 정확히 10자이고 실제 존재하는 `YYYY-MM-DD` 날짜일 때만 `Some`을
/// 반환합니다. 그 외의 입력은 오류가 아니라 "별자리 계산 불가"로 취급하며,
/// 호출자는 별자리 정보를 생략해야지 기본값으로 대체해서는 안 됩니다.
pub fn sign_for(date: &str) -> Option<&'static ZodiacSign> {
    if date.len() != 10 {
        return None;
    }
    // 2024-13-40, 2000-02-30 같은 달력에 없는 날짜를 걸러낸다.
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let mmdd = (parsed.month() * 100 + parsed.day()) as u16;

    ZODIAC_SIGNS.iter().find(|sign| sign.contains(mmdd))
}
