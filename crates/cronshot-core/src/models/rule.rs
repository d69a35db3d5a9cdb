//! 창 규칙 모델.
//!
//! 창 제목 매칭 패턴과 저장 폴더 규칙을 함께 담는다.
//! 규칙 목록은 순서가 곧 우선순위다.

use serde::{Deserialize, Serialize};

/// 창 규칙
///
/// JSON 필드명은 설정 파일 호환을 위해 snake_case를 유지한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// 창 제목 매칭 패턴 (정확히 일치하는 텍스트 우선, 아니면 정규식)
    #[serde(default)]
    pub pattern: String,
    /// 활성화 여부 (비활성 규칙은 매칭에서 완전히 제외)
    #[serde(default)]
    pub enabled: bool,
    /// 저장 폴더 규칙 (정규식, 첫 번째 캡처 그룹 우선). 비어 있으면 창 제목 사용
    #[serde(default)]
    pub storage_rule: String,
    /// 고정 폴더 (비어 있지 않으면 프로세스 폴더와 규칙 폴더 사이에 삽입)
    #[serde(default)]
    pub fixed_folder: String,
}

impl Rule {
    /// 패턴만 지정된 활성 규칙 생성
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// 저장 폴더 규칙 지정
    pub fn with_storage_rule(mut self, storage_rule: impl Into<String>) -> Self {
        self.storage_rule = storage_rule.into();
        self
    }

    /// 고정 폴더 지정
    pub fn with_fixed_folder(mut self, fixed_folder: impl Into<String>) -> Self {
        self.fixed_folder = fixed_folder.into();
        self
    }

    /// 활성화 여부 지정
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_legacy_field_names() {
        let json = r#"{"pattern":"Foo","enabled":true,"storage_rule":"(\\w+)","fixed_folder":"Daily"}"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.pattern, "Foo");
        assert!(rule.enabled);
        assert_eq!(rule.storage_rule, "(\\w+)");
        assert_eq!(rule.fixed_folder, "Daily");
    }

    #[test]
    fn missing_fields_default_to_disabled() {
        let rule: Rule = serde_json::from_str(r#"{"pattern":"Foo"}"#).unwrap();
        assert!(!rule.enabled);
        assert!(rule.storage_rule.is_empty());
    }
}
