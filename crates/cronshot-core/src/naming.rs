//! 파일 시스템 안전 이름 변환.
//!
//! 프로세스 이름, 창 제목, 폴더 이름을 경로 세그먼트로 쓸 수 있게 정리하고
//! `root/프로세스/[고정 폴더/]폴더` 저장 경로 규칙을 한곳에서 정의한다.

use std::path::{Path, PathBuf};

/// 정리 결과가 비었을 때 사용하는 대체 이름
pub const UNKNOWN_NAME: &str = "unknown name";

/// 경로에 쓸 수 없는 문자
const INVALID_CHARS: &[char] = &['<', '>', ':', '\\', '/', '|', '?', '*', '"'];

/// 실행 파일 확장자 (대소문자 무시)
const EXECUTABLE_SUFFIX: &str = ".exe";

/// 폴더 이름 정리
///
/// 앞뒤 공백 제거 → 금지 문자/제어 문자 제거 → 다시 앞뒤 공백 제거.
/// 내부 공백은 유지한다. 결과가 비거나 점(`.`)으로만 이루어지면 [`UNKNOWN_NAME`].
pub fn sanitize_folder_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c) && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();

    // "." / ".." 는 상위 디렉토리 탈출이 되므로 허용하지 않음
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return UNKNOWN_NAME.to_string();
    }
    cleaned.to_string()
}

/// 프로세스 이름 정리
///
/// 끝에 붙은 `.exe`를 대소문자 구분 없이 제거한 뒤 [`sanitize_folder_name`] 적용.
pub fn sanitize_process_name(raw: &str) -> String {
    sanitize_folder_name(strip_executable_suffix(raw.trim()))
}

fn strip_executable_suffix(name: &str) -> &str {
    let Some(split) = name.len().checked_sub(EXECUTABLE_SUFFIX.len()) else {
        return name;
    };
    if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(EXECUTABLE_SUFFIX) {
        &name[..split]
    } else {
        name
    }
}

/// 두 프로세스 이름이 같은 실행 파일을 가리키는지
///
/// 앞뒤 공백과 `.exe` 확장자를 무시하고 대소문자 구분 없이 비교한다.
pub fn same_process(a: &str, b: &str) -> bool {
    let a = strip_executable_suffix(a.trim());
    let b = strip_executable_suffix(b.trim());
    !a.is_empty() && a.to_lowercase() == b.to_lowercase()
}

/// 스크린샷 저장 디렉토리 계산
///
/// `root/sanitize(process)/[sanitize(fixed)/]sanitize(folder)`.
/// 고정 폴더는 공백만 있으면 생략한다. 같은 입력이면 항상 같은 경로.
pub fn storage_dir(root: &Path, process: &str, fixed_folder: &str, folder: &str) -> PathBuf {
    let mut dir = root.join(sanitize_process_name(process));
    if !fixed_folder.trim().is_empty() {
        dir.push(sanitize_folder_name(fixed_folder));
    }
    dir.push(sanitize_folder_name(folder));
    dir
}
