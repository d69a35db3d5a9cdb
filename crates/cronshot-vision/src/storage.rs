//! 스크린샷 파일 저장소.
//!
//! PNG 파일을 `root/프로세스/[고정 폴더/]폴더/YYYYMMDD_HHMMSS.mmm.png` 구조로 저장하고,
//! 중복 제거용으로 폴더 내 가장 최근 PNG를 찾는다.

use chrono::{DateTime, TimeZone};
use cronshot_core::error::CoreError;
use cronshot_core::naming::storage_dir;
use image::{ImageFormat, RgbaImage};
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// 파일명 타임스탬프 형식 (밀리초 포함)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%.3f";

/// 스크린샷 확장자
pub const PNG_EXTENSION: &str = "png";

/// 캡처 시각으로 파일명 생성 (예: `20260117_093015.042.png`)
pub fn screenshot_file_name<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}.{PNG_EXTENSION}", timestamp.format(TIMESTAMP_FORMAT))
}

/// 쓰는 중인 PNG 임시 파일 확장자 (최근 PNG 탐색에 잡히지 않음)
const PARTIAL_EXTENSION: &str = "partial";

/// 디렉토리에 PNG 저장
///
/// 디렉토리가 없으면 생성한다 (이미 있으면 무시).
/// 임시 파일에 인코딩한 뒤 이름을 바꾸므로 중간에 끊겨도 잘린 `.png`가 남지 않는다.
pub fn save_png<Tz>(
    image: &RgbaImage,
    dir: &Path,
    timestamp: &DateTime<Tz>,
) -> Result<PathBuf, CoreError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fs::create_dir_all(dir)?;
    let path = dir.join(screenshot_file_name(timestamp));
    let partial = path.with_extension(PARTIAL_EXTENSION);

    let written = image
        .save_with_format(&partial, ImageFormat::Png)
        .map_err(CoreError::from)
        .and_then(|()| fs::rename(&partial, &path).map_err(CoreError::from));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&partial) {
            if cleanup.kind() != ErrorKind::NotFound {
                warn!("임시 파일 삭제 실패: {}: {cleanup}", partial.display());
            }
        }
        return Err(e);
    }

    debug!(
        "PNG 저장: {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(path)
}

/// 저장 규칙에 따라 스크린샷 저장
pub fn save_screenshot<Tz>(
    image: &RgbaImage,
    storage_root: &Path,
    process_name: &str,
    fixed_folder: &str,
    folder: &str,
    timestamp: &DateTime<Tz>,
) -> Result<PathBuf, CoreError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let dir = storage_dir(storage_root, process_name, fixed_folder, folder);
    save_png(image, &dir, timestamp)
}

/// 디렉토리에서 수정 시각이 가장 늦은 PNG 경로
///
/// 디렉토리가 없거나 PNG가 없으면 `None`. 확장자는 대소문자를 구분하지 않는다.
pub fn latest_png(dir: &Path) -> Result<Option<PathBuf>, CoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !is_png(&path) {
            continue;
        }
        // 메타데이터를 읽을 수 없는 항목은 건너뜀
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };
        if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
            latest = Some((modified, path));
        }
    }

    Ok(latest.map(|(_, path)| path))
}

/// 가장 최근 PNG를 디코딩해 RGBA로 반환
pub fn load_latest_png(dir: &Path) -> Result<Option<RgbaImage>, CoreError> {
    let Some(path) = latest_png(dir)? else {
        return Ok(None);
    };
    let bytes = fs::read(&path)?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| CoreError::Image(format!("PNG 디코딩 실패: {}: {e}", path.display())))?;
    Ok(Some(image.to_rgba8()))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PNG_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, Utc};
    use image::Rgba;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2026, 1, 17)
            .unwrap()
            .and_hms_milli_opt(9, 30, 15, 42)
            .unwrap()
            .and_utc()
    }

    fn set_mtime(path: &Path, secs_ago: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
            .unwrap();
    }

    #[test]
    fn file_name_has_millisecond_precision() {
        assert_eq!(screenshot_file_name(&fixed_time()), "20260117_093015.042.png");
    }

    #[test]
    fn save_creates_nested_directories() {
        let temp = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));

        let path = save_screenshot(
            &img,
            temp.path(),
            "Code.exe",
            "Work",
            "main.rs",
            &fixed_time(),
        )
        .unwrap();

        let expected = temp
            .path()
            .join("Code")
            .join("Work")
            .join("main.rs")
            .join("20260117_093015.042.png");
        assert_eq!(path, expected);
        assert!(path.exists());

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn save_with_local_timezone() {
        let temp = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        let path = save_png(&img, temp.path(), &Local::now()).unwrap();
        assert!(path.extension().is_some_and(|e| e == "png"));
    }

    #[test]
    fn latest_png_missing_directory_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(latest_png(&temp.path().join("nope")).unwrap().is_none());
        assert!(load_latest_png(&temp.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn latest_png_ignores_other_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("sub.png")).unwrap();
        assert!(latest_png(temp.path()).unwrap().is_none());
    }

    #[test]
    fn latest_png_picks_newest_mtime_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));

        let old = temp.path().join("b_old.png");
        let new = temp.path().join("a_new.PNG");
        img.save_with_format(&old, ImageFormat::Png).unwrap();
        img.save_with_format(&new, ImageFormat::Png).unwrap();
        set_mtime(&old, 120);
        set_mtime(&new, 5);

        assert_eq!(latest_png(temp.path()).unwrap(), Some(new));
    }

    #[test]
    fn save_leaves_no_partial_file() {
        let temp = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(3, 3, Rgba([5, 6, 7, 255]));
        let path = save_png(&img, temp.path(), &fixed_time()).unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .flatten()
            .map(|e| e.path())
            .collect();
        assert_eq!(names, vec![path]);
    }

    #[test]
    fn partial_file_is_not_a_candidate() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("20260117_093015.042.partial"), b"\x89PNG").unwrap();
        assert!(latest_png(temp.path()).unwrap().is_none());
    }

    #[test]
    fn corrupt_latest_png_is_image_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.png"), b"not a png").unwrap();
        let err = load_latest_png(temp.path()).unwrap_err();
        assert!(matches!(err, CoreError::Image(_)));
    }
}
