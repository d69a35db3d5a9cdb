//! 저장 폴더 해석.
//!
//! 매칭된 규칙의 저장 폴더 규칙(정규식)을 창 제목에 적용해
//! 하위 폴더 이름을 만든다. 첫 번째 캡처 그룹 → 전체 매칭 → 대체 이름 순.

use cronshot_core::models::rule::Rule;
use cronshot_core::naming::{sanitize_folder_name, UNKNOWN_NAME};
use regex::Regex;
use tracing::debug;

/// 폴더 해석 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFolder {
    /// 정리된 하위 폴더 이름
    pub folder: String,
    /// 규칙의 고정 폴더 (원문 그대로, 경로 결합 시 정리)
    pub fixed_folder: String,
}

/// 창 제목과 규칙으로 저장 폴더 해석
///
/// 규칙이 없으면 정리된 창 제목을 폴더로 사용하고 고정 폴더는 비운다.
pub fn resolve_folder(title: &str, rule: Option<&Rule>) -> ResolvedFolder {
    match rule {
        None => ResolvedFolder {
            folder: sanitize_folder_name(title),
            fixed_folder: String::new(),
        },
        Some(rule) => ResolvedFolder {
            folder: resolve_storage_folder(title, &rule.storage_rule),
            fixed_folder: rule.fixed_folder.clone(),
        },
    }
}

/// 저장 폴더 규칙을 창 제목에 적용
///
/// - 규칙이 공백 → 정리된 창 제목
/// - 매칭 + 첫 번째 캡처 그룹이 공백이 아님 → 정리된 그룹 1
/// - 매칭 → 정리된 전체 매칭
/// - 컴파일 실패 또는 매칭 없음 → [`UNKNOWN_NAME`]
pub fn resolve_storage_folder(title: &str, storage_rule: &str) -> String {
    let storage_rule = storage_rule.trim();
    if storage_rule.is_empty() {
        return sanitize_folder_name(title);
    }

    let re = match Regex::new(storage_rule) {
        Ok(re) => re,
        Err(e) => {
            debug!("저장 폴더 규칙 컴파일 실패: {storage_rule:?} ({e})");
            return UNKNOWN_NAME.to_string();
        }
    };

    let Some(caps) = re.captures(title) else {
        return UNKNOWN_NAME.to_string();
    };

    if let Some(group) = caps.get(1) {
        let group = group.as_str().trim();
        if !group.is_empty() {
            return sanitize_folder_name(group);
        }
    }

    caps.get(0)
        .map(|whole| sanitize_folder_name(whole.as_str()))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}
