//! 캡처 컨텍스트 포트.
//!
//! 구현: [`crate::config_manager::ConfigManager`]

use crate::config::CaptureSettings;
use crate::models::rule::Rule;

/// 틱 하나가 사용하는 설정 묶음
///
/// 프로세스, 규칙, 캡처 설정을 한 번에 읽은 값이다. 틱 도중 설정이 바뀌어도
/// 이 값은 바뀌지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureContext {
    /// 대상 프로세스 이름 (앞뒤 공백 제거, 미선택이면 빈 문자열)
    pub process: String,
    /// 규칙 목록 (순서 = 우선순위)
    pub rules: Vec<Rule>,
    /// 캡처 설정
    pub settings: CaptureSettings,
}

/// 대상 프로세스와 규칙 목록 제공자
pub trait ProcessContextProvider: Send + Sync {
    /// 현재 선택된 프로세스 이름 (미선택이면 빈 문자열)
    fn current_process(&self) -> String;

    /// 현재 규칙 목록 스냅샷 (순서 = 우선순위)
    fn current_rules(&self) -> Vec<Rule>;

    /// 프로세스 + 규칙 + 설정을 서로 어긋나지 않게 한 번에 읽기
    fn capture_context(&self) -> CaptureContext;
}

/// 캡처 설정 제공자
pub trait SettingsProvider: Send + Sync {
    /// 현재 캡처 설정 스냅샷
    fn current_settings(&self) -> CaptureSettings;
}
