//! # cronshot-core
//!
//! CronShot 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (규칙, 창 정보, 캡처 이벤트)
//! - [`ports`]: 외부 협력자 포트 인터페이스 (설정 제공자, 창 시스템)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장) + 포트 구현
//! - [`naming`]: 파일 시스템 안전 이름 변환 및 저장 경로 규칙

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod naming;
pub mod ports;
