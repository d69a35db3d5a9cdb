//! CronShot 핵심 에러 타입.
//!
//! 모든 라이브러리 crate는 이 에러 타입을 그대로 반환한다.
//! 스킵 조건(빈 제목, 중복 등)은 에러가 아니라 `SkipReason` 값으로 표현된다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// I/O 에러 (디렉토리 생성, 파일 쓰기 등)
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 창 캡처 실패
    #[error("캡처 에러: {0}")]
    Capture(String),

    /// 이미지 디코딩/인코딩 실패
    #[error("이미지 에러: {0}")]
    Image(String),

    /// 창을 찾을 수 없음 (이미 닫힘 등)
    #[error("창 미발견: {0}")]
    WindowNotFound(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl From<image::ImageError> for CoreError {
    fn from(e: image::ImageError) -> Self {
        CoreError::Image(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn validation_message_includes_field() {
        let err = CoreError::Validation {
            field: "dedupe_threshold".to_string(),
            message: "1~100 범위여야 함".to_string(),
        };
        assert!(err.to_string().contains("dedupe_threshold"));
    }
}
