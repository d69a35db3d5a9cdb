//! 창 시스템 포트.
//!
//! 구현: `cronshot-vision` crate (xcap 기반 / NoOp)

use image::RgbaImage;

use crate::error::CoreError;
use crate::models::window::{WindowHandle, WindowInfo};

/// OS 창 열거/조회/캡처
pub trait WindowSystem: Send + Sync {
    /// 지정 프로세스의 보이는 창 목록 (제목 + 핸들)
    fn enumerate_windows(&self, process_name: &str) -> Result<Vec<WindowInfo>, CoreError>;

    /// 현재 시점의 창 제목 (창이 사라졌으면 빈 문자열)
    fn window_title(&self, handle: WindowHandle) -> String;

    /// 최소화 여부
    fn is_minimized(&self, handle: WindowHandle) -> bool;

    /// 화면 표시 여부
    fn is_visible(&self, handle: WindowHandle) -> bool;

    /// 창 이미지 캡처 (오프스크린 렌더)
    fn capture_window(&self, handle: WindowHandle) -> Result<RgbaImage, CoreError>;
}
