//! 캡처 결과 및 상태 이벤트 모델.
//!
//! 컨트롤러가 틱마다 발행하는 이벤트와 창 단위 처리 결과를 정의한다.

use std::fmt;
use std::path::PathBuf;

/// 창 단위 스킵 사유 (에러가 아닌 일시적 조건)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 재조회한 창 제목이 비어 있음
    BlankTitle,
    /// 일치하는 규칙 없음
    NoMatchingRule,
    /// 최소화된 창
    Minimized,
    /// 보이지 않는 창
    Hidden,
    /// 캡처 도중 창 제목이 바뀜
    TitleDrift {
        /// 매칭에 사용한 제목
        matched: String,
        /// 캡처 직후 제목
        current: String,
    },
    /// 최근 저장 이미지와 중복
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BlankTitle => write!(f, "빈 창 제목"),
            SkipReason::NoMatchingRule => write!(f, "일치하는 규칙 없음"),
            SkipReason::Minimized => write!(f, "최소화된 창"),
            SkipReason::Hidden => write!(f, "보이지 않는 창"),
            SkipReason::TitleDrift { matched, current } => {
                write!(f, "창 제목 변경: '{matched}' → '{current}'")
            }
            SkipReason::Duplicate => write!(f, "중복 이미지"),
        }
    }
}

/// 창 단위 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOutcome {
    /// 저장 완료 (저장 경로)
    Saved(PathBuf),
    /// 스킵
    Skipped(SkipReason),
}

/// 한 틱의 처리 요약
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// 저장된 파일 경로 (창 순서대로)
    pub saved: Vec<PathBuf>,
    /// 스킵된 창 수
    pub skipped: usize,
    /// 실패한 창 수
    pub failed: usize,
    /// 프로세스 미지정 또는 창 없음으로 틱 전체를 건너뛰었는지
    pub idle: bool,
}

impl TickReport {
    /// 아무 작업 없이 끝난 틱
    pub fn idle() -> Self {
        Self {
            idle: true,
            ..Self::default()
        }
    }
}

/// UI 상태 표시용 캡처 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// 틱 시작
    TickStarted { process: String },
    /// 프로세스 창을 찾지 못함
    ProcessNotFound { process: String },
    /// 열거된 창 수
    WindowCount { process: String, count: usize },
    /// 스크린샷 저장 완료
    Saved { title: String, path: PathBuf },
    /// 창 스킵
    Skipped { title: String, reason: SkipReason },
    /// 창 처리 실패
    Failed { title: String, message: String },
    /// 선택된 프로세스의 창 제목 목록 갱신 (빈 목록 = 실행 중이지만 보이는 창 없음)
    WindowsUpdated { process: String, titles: Vec<String> },
    /// 선택된 프로세스가 실행 중이 아님
    ProcessNotRunning { process: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_reason_mentions_both_titles() {
        let reason = SkipReason::TitleDrift {
            matched: "Doc A".to_string(),
            current: "Doc B".to_string(),
        };
        let text = reason.to_string();
        assert!(text.contains("Doc A"));
        assert!(text.contains("Doc B"));
    }

    #[test]
    fn idle_report_is_empty() {
        let report = TickReport::idle();
        assert!(report.idle);
        assert!(report.saved.is_empty());
        assert_eq!(report.failed, 0);
    }
}
