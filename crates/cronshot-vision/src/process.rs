//! 실행 중인 프로세스 목록 (sysinfo).
//!
//! `ProcessLister` 포트 구현. 캡처 대상 선택(`--list-processes`)과
//! 창 목록 감시기의 "프로세스 없음" 판정에 쓰인다.

use cronshot_core::error::CoreError;
use cronshot_core::ports::process::ProcessLister;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

/// sysinfo 기반 프로세스 목록 제공자
pub struct SysinfoProcessLister {
    sys: Mutex<System>,
}

impl SysinfoProcessLister {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProcessLister {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLister for SysinfoProcessLister {
    fn process_names(&self) -> Result<Vec<String>, CoreError> {
        let mut sys = self.sys.lock();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let names = sorted_unique_names(
            sys.processes()
                .values()
                .map(|p| p.name().to_string_lossy().to_string()),
        );
        debug!("실행 중인 프로세스 이름 {}개", names.len());
        Ok(names)
    }
}

/// 빈 이름 제외, 중복 제거 후 대소문자 무시 정렬
///
/// 대소문자만 다른 이름은 둘 다 남긴다.
pub fn sorted_unique_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .collect();
    let mut names: Vec<String> = unique.into_iter().collect();
    names.sort_by_cached_key(|name| name.to_lowercase());
    names
}
