//! 창 시스템 어댑터.
//!
//! - [`XcapWindowSystem`]: xcap 기반 창 열거/캡처 (`native-capture` feature)
//! - [`NoOpWindowSystem`]: 창이 없는 환경용 (헤드리스, 테스트)

use cronshot_core::error::CoreError;
use cronshot_core::models::window::{WindowHandle, WindowInfo};
use cronshot_core::ports::window::WindowSystem;
use image::RgbaImage;

/// 창이 하나도 없는 창 시스템
///
/// `native-capture` feature 없이 빌드했거나 디스플레이가 없는 환경에서 사용.
/// 틱은 항상 "창 0개"로 끝난다.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpWindowSystem;

impl WindowSystem for NoOpWindowSystem {
    fn enumerate_windows(&self, _process_name: &str) -> Result<Vec<WindowInfo>, CoreError> {
        Ok(Vec::new())
    }

    fn window_title(&self, _handle: WindowHandle) -> String {
        String::new()
    }

    fn is_minimized(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn is_visible(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn capture_window(&self, handle: WindowHandle) -> Result<RgbaImage, CoreError> {
        Err(CoreError::WindowNotFound(format!(
            "NoOp 창 시스템에는 창 {handle} 없음"
        )))
    }
}

#[cfg(feature = "native-capture")]
pub use native::XcapWindowSystem;

#[cfg(feature = "native-capture")]
mod native {
    use super::*;
    use cronshot_core::naming::same_process;
    use parking_lot::Mutex;
    use sysinfo::{Pid, ProcessesToUpdate, System};
    use tracing::{debug, warn};
    use xcap::Window;

    /// xcap 기반 창 시스템
    ///
    /// 핸들은 xcap 창 ID. 매 호출마다 창 목록을 새로 조회하므로
    /// 닫힌 창은 제목 빈 문자열 / 보이지 않음으로 관측된다.
    pub struct XcapWindowSystem {
        sys: Mutex<System>,
    }

    impl XcapWindowSystem {
        pub fn new() -> Self {
            Self {
                sys: Mutex::new(System::new()),
            }
        }

        fn find_window(&self, handle: WindowHandle) -> Option<Window> {
            let windows = match Window::all() {
                Ok(windows) => windows,
                Err(e) => {
                    warn!("창 목록 조회 실패: {e}");
                    return None;
                }
            };
            windows
                .into_iter()
                .find(|w| w.id().is_ok_and(|id| u64::from(id) == handle.0))
        }

        /// 창 소유 프로세스 이름 (sysinfo 우선, 실패 시 xcap app_name)
        fn owner_name(&self, window: &Window) -> Option<String> {
            if let Ok(pid) = window.pid() {
                let pid = Pid::from_u32(pid);
                let mut sys = self.sys.lock();
                sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
                if let Some(process) = sys.process(pid) {
                    return Some(process.name().to_string_lossy().to_string());
                }
            }
            window.app_name().ok()
        }
    }

    impl Default for XcapWindowSystem {
        fn default() -> Self {
            Self::new()
        }
    }

    fn has_area(window: &Window) -> bool {
        matches!((window.width(), window.height()), (Ok(w), Ok(h)) if w > 0 && h > 0)
    }

    impl WindowSystem for XcapWindowSystem {
        fn enumerate_windows(&self, process_name: &str) -> Result<Vec<WindowInfo>, CoreError> {
            let windows = Window::all()
                .map_err(|e| CoreError::Capture(format!("창 목록 조회 실패: {e}")))?;

            let mut found = Vec::new();
            for window in windows {
                if !has_area(&window) {
                    continue;
                }
                let Some(owner) = self.owner_name(&window) else {
                    continue;
                };
                if !same_process(&owner, process_name) {
                    continue;
                }
                let Ok(id) = window.id() else {
                    continue;
                };
                let title = window.title().unwrap_or_default();
                found.push(WindowInfo::new(title, WindowHandle(u64::from(id))));
            }

            debug!("프로세스 {process_name:?} 창 {}개", found.len());
            Ok(found)
        }

        fn window_title(&self, handle: WindowHandle) -> String {
            self.find_window(handle)
                .and_then(|w| w.title().ok())
                .unwrap_or_default()
        }

        fn is_minimized(&self, handle: WindowHandle) -> bool {
            self.find_window(handle)
                .and_then(|w| w.is_minimized().ok())
                .unwrap_or(false)
        }

        fn is_visible(&self, handle: WindowHandle) -> bool {
            self.find_window(handle).is_some_and(|w| has_area(&w))
        }

        fn capture_window(&self, handle: WindowHandle) -> Result<RgbaImage, CoreError> {
            let window = self
                .find_window(handle)
                .ok_or_else(|| CoreError::WindowNotFound(format!("창 {handle}")))?;

            let image = window
                .capture_image()
                .map_err(|e| CoreError::Capture(format!("창 {handle} 캡처 실패: {e}")))?;

            debug!("창 캡처 완료: {handle} {}x{}", image.width(), image.height());
            Ok(image)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_has_no_windows() {
        let ws = NoOpWindowSystem;
        assert!(ws.enumerate_windows("chrome.exe").unwrap().is_empty());
        assert_eq!(ws.window_title(WindowHandle(1)), "");
        assert!(!ws.is_visible(WindowHandle(1)));
        assert!(!ws.is_minimized(WindowHandle(1)));
    }

    #[test]
    fn noop_capture_is_window_not_found() {
        let err = NoOpWindowSystem.capture_window(WindowHandle(0x2a)).unwrap_err();
        assert!(matches!(err, CoreError::WindowNotFound(_)));
    }

    #[test]
    fn noop_usable_as_port() {
        let ws: std::sync::Arc<dyn WindowSystem> = std::sync::Arc::new(NoOpWindowSystem);
        assert!(ws.enumerate_windows("x").unwrap().is_empty());
    }
}
