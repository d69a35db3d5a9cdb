//! 중복 캡처 판정.
//!
//! 대상 폴더의 가장 최근 PNG와 새 캡처를 비교해 저장을 건너뛸지 결정한다.
//! - 임계값 100 이상: 크기 + 모든 RGBA 바이트 완전 일치
//! - 임계값 100 미만: 평균 해시 유사도(%) >= 임계값

use cronshot_core::config::CaptureSettings;
use cronshot_core::error::CoreError;
use cronshot_core::naming::storage_dir;
use image::RgbaImage;
use std::path::Path;
use tracing::{debug, warn};

use crate::hash::{average_hash_16x16, similarity};
use crate::storage::load_latest_png;

/// 픽셀 완전 비교로 전환되는 임계값
pub const EXACT_MATCH_THRESHOLD: u32 = 100;

/// 중복 제거 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupePolicy {
    /// 활성화 여부
    pub enabled: bool,
    /// 유사도 임계값 (%)
    pub threshold: u32,
}

impl DedupePolicy {
    pub fn new(enabled: bool, threshold: u32) -> Self {
        Self { enabled, threshold }
    }

    /// 캡처 설정에서 정책 추출
    pub fn from_settings(settings: &CaptureSettings) -> Self {
        Self::new(settings.dedupe_enabled, settings.dedupe_threshold)
    }

    pub fn disabled() -> Self {
        Self::new(false, EXACT_MATCH_THRESHOLD)
    }
}

/// 새 캡처 저장을 건너뛸지 판정
///
/// 대상 폴더는 저장 경로 규칙(`root/프로세스/[고정/]폴더`)으로 계산한다.
/// 폴더가 없거나 PNG가 없으면 항상 `false` (첫 캡처는 저장).
/// 이전 PNG를 디코딩할 수 없으면 비교할 대상이 없는 것으로 보고 `false`.
pub fn should_skip(
    image: &RgbaImage,
    storage_root: &Path,
    process_name: &str,
    fixed_folder: &str,
    folder: &str,
    policy: &DedupePolicy,
) -> Result<bool, CoreError> {
    if !policy.enabled {
        return Ok(false);
    }
    let dir = storage_dir(storage_root, process_name, fixed_folder, folder);
    is_duplicate_of_latest(image, &dir, policy.threshold)
}

/// 디렉토리의 가장 최근 PNG와 비교
pub fn is_duplicate_of_latest(
    image: &RgbaImage,
    dir: &Path,
    threshold: u32,
) -> Result<bool, CoreError> {
    let previous = match load_latest_png(dir) {
        Ok(Some(previous)) => previous,
        Ok(None) => {
            debug!("이전 캡처 없음: {}", dir.display());
            return Ok(false);
        }
        Err(CoreError::Image(e)) => {
            warn!("이전 캡처 비교 불가, 새 캡처 저장: {e}");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };
    Ok(is_duplicate(image, &previous, threshold))
}

/// 두 이미지 중복 여부
///
/// 임계값이 100을 넘으면 100과 같게, 0이면 해시 비교가 항상 참이 된다.
pub fn is_duplicate(current: &RgbaImage, previous: &RgbaImage, threshold: u32) -> bool {
    if threshold >= EXACT_MATCH_THRESHOLD {
        return images_equal_exact(current, previous);
    }

    let sim = similarity(
        &average_hash_16x16(previous),
        &average_hash_16x16(current),
    );
    let percent = sim * 100.0;
    debug!("평균 해시 유사도 {percent:.1}% (임계값 {threshold}%)");
    percent >= f64::from(threshold)
}

/// 크기와 모든 RGBA 바이트가 같은지
pub fn images_equal_exact(a: &RgbaImage, b: &RgbaImage) -> bool {
    a.dimensions() == b.dimensions() && a.as_raw() == b.as_raw()
}
