//! # cronshot-rules
//!
//! 창 규칙 평가 크레이트.
//! 창 제목을 규칙 목록과 매칭하고(정확 일치 → 정규식 순),
//! 매칭된 규칙의 저장 폴더 규칙으로 하위 폴더 이름을 해석한다.

pub mod matcher;
pub mod resolver;

pub use matcher::{match_rule, RuleMatcher};
pub use resolver::{resolve_folder, resolve_storage_folder, ResolvedFolder};
