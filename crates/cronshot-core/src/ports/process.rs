//! 실행 중인 프로세스 조회 포트.
//!
//! 구현: `cronshot-vision::process::SysinfoProcessLister`

use crate::error::CoreError;
use crate::naming::same_process;

/// 실행 중인 프로세스 이름 목록 제공자
pub trait ProcessLister: Send + Sync {
    /// 실행 중인 프로세스 이름 (중복 제거, 대소문자 무시 정렬)
    fn process_names(&self) -> Result<Vec<String>, CoreError>;

    /// 해당 이름의 프로세스가 실행 중인지 (`.exe` 및 대소문자 무시)
    fn is_running(&self, process_name: &str) -> Result<bool, CoreError> {
        Ok(self
            .process_names()?
            .iter()
            .any(|name| same_process(name, process_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<&'static str>);

    impl ProcessLister for Fixed {
        fn process_names(&self) -> Result<Vec<String>, CoreError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn is_running_ignores_case_and_exe_suffix() {
        let lister = Fixed(vec!["explorer.exe", "Code.exe"]);
        assert!(lister.is_running("code").unwrap());
        assert!(lister.is_running("EXPLORER.EXE").unwrap());
        assert!(!lister.is_running("chrome.exe").unwrap());
        assert!(!lister.is_running("").unwrap());
    }
}
