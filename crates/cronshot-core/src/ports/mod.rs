//! 포트 인터페이스 (trait).
//!
//! 캡처 코어가 외부 협력자(설정 UI, OS 창 시스템)에 의존하는 지점.
//! 어댑터는 `cronshot-core`(설정), `cronshot-vision`(창 시스템, 프로세스 목록)에 있으며
//! `cronshot-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 캡처 틱 본문은 동기 실행되므로 포트도 동기 trait이다.

pub mod context;
pub mod process;
pub mod window;
