//! 애플리케이션 설정 구조체.
//!
//! 저장 경로, 캡처 주기, 중복 제거, 대상 프로세스, 창 규칙 등
//! 런타임 설정을 정의한다. [`crate::config_manager::ConfigManager`]가 JSON 파일로 관리.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::rule::Rule;

/// 기본 캡처 주기 (초)
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// 기본 중복 판정 임계값 (100 = 픽셀 완전 일치)
pub const DEFAULT_DEDUPE_THRESHOLD: u32 = 100;

/// 중복 판정 임계값 허용 범위
pub const MIN_DEDUPE_THRESHOLD: u32 = 1;
pub const MAX_DEDUPE_THRESHOLD: u32 = 100;

/// 기본 저장 폴더 이름 (사진 폴더 하위)
pub const APP_FOLDER_NAME: &str = "CronShot";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 스크린샷 루트 디렉토리
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
    /// 자동 캡처 주기 (초)
    #[serde(default = "default_interval_secs")]
    pub screenshot_interval_sec: u64,
    /// 중복 제거 활성화
    #[serde(default)]
    pub dedupe_enabled: bool,
    /// 중복 판정 임계값 (1~100, 100이면 픽셀 완전 비교)
    #[serde(default = "default_dedupe_threshold")]
    pub dedupe_threshold: u32,
    /// 캡처 대상 프로세스 이름
    #[serde(default)]
    pub current_process: String,
    /// 실행 직후 자동 캡처 시작
    #[serde(default)]
    pub auto_capture_enabled: bool,
    /// 창 규칙 목록 (순서 = 우선순위)
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            storage_root: default_storage_root(),
            screenshot_interval_sec: default_interval_secs(),
            dedupe_enabled: false,
            dedupe_threshold: default_dedupe_threshold(),
            current_process: String::new(),
            auto_capture_enabled: false,
            rules: Vec::new(),
        }
    }

    /// 범위를 벗어난 값을 보정
    ///
    /// - 캡처 주기 0 → 기본값
    /// - 임계값 → [1, 100]
    /// - 빈 저장 경로 → 기본 경로
    pub fn normalize(&mut self) {
        if self.screenshot_interval_sec == 0 {
            self.screenshot_interval_sec = DEFAULT_INTERVAL_SECS;
        }
        self.dedupe_threshold = self
            .dedupe_threshold
            .clamp(MIN_DEDUPE_THRESHOLD, MAX_DEDUPE_THRESHOLD);
        if self.storage_root.as_os_str().is_empty() {
            self.storage_root = default_storage_root();
        }
    }

    /// 캡처 파이프라인이 읽는 설정 스냅샷
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            storage_root: self.storage_root.clone(),
            interval_secs: self.screenshot_interval_sec,
            dedupe_enabled: self.dedupe_enabled,
            dedupe_threshold: self.dedupe_threshold,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// 캡처 설정 스냅샷 (틱마다 새로 읽음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// 스크린샷 루트 디렉토리
    pub storage_root: PathBuf,
    /// 캡처 주기 (초)
    pub interval_secs: u64,
    /// 중복 제거 활성화
    pub dedupe_enabled: bool,
    /// 중복 판정 임계값
    pub dedupe_threshold: u32,
}

impl CaptureSettings {
    /// 캡처 주기를 Duration으로 반환 (최소 1초)
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        AppConfig::default_config().capture_settings()
    }
}

/// 기본 저장 경로: 사용자 사진 폴더/CronShot
///
/// 사진 폴더가 없으면 홈 디렉토리, 그것도 없으면 현재 디렉토리 기준.
pub fn default_storage_root() -> PathBuf {
    let base = directories::UserDirs::new()
        .and_then(|dirs| {
            dirs.picture_dir()
                .map(|p| p.to_path_buf())
                .or_else(|| Some(dirs.home_dir().to_path_buf()))
        })
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_FOLDER_NAME)
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_dedupe_threshold() -> u32 {
    DEFAULT_DEDUPE_THRESHOLD
}
