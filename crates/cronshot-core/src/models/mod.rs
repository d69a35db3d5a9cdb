//! 도메인 모델.
//!
//! 창 규칙, 창 정보, 캡처 결과/이벤트 구조체.

pub mod capture;
pub mod rule;
pub mod window;
