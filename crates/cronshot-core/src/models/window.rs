//! 창 정보 모델.
//!
//! 열거 호출마다 새로 생성되며 틱 사이에 보존되지 않는다.

use std::fmt;

/// 플랫폼 창 핸들 (불투명 식별자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// 열거된 창 정보 (제목 + 핸들)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// 열거 시점의 창 제목
    pub title: String,
    /// 창 핸들
    pub handle: WindowHandle,
}

impl WindowInfo {
    pub fn new(title: impl Into<String>, handle: WindowHandle) -> Self {
        Self {
            title: title.into(),
            handle,
        }
    }
}
