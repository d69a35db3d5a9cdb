//! # cronshot-vision
//!
//! 캡처 이미지 처리 크레이트.
//! 창 캡처 어댑터, 16x16 평균 해시, 중복 판정, PNG 저장, 프로세스 목록을 담당한다.

pub mod capture;
pub mod dedupe;
pub mod hash;
pub mod process;
pub mod storage;
