//! # cronshot-app
//!
//! CronShot 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 캡처 컨트롤러와 창 목록 감시기 라이프사이클 관리.

mod controller;
mod event_bus;
mod lifecycle;
mod window_watcher;

use anyhow::{anyhow, Result};
use clap::Parser;
use cronshot_core::config::AppConfig;
use cronshot_core::config_manager::ConfigManager;
use cronshot_core::models::capture::CaptureEvent;
use cronshot_core::ports::context::ProcessContextProvider;
use cronshot_core::ports::process::ProcessLister;
use cronshot_core::ports::window::WindowSystem;
use cronshot_vision::process::SysinfoProcessLister;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::controller::CaptureController;
use crate::event_bus::EventBus;
use crate::lifecycle::Shutdown;
use crate::window_watcher::WindowWatcher;

/// CronShot: 주기적 창 스크린샷 수집기
///
/// 선택한 프로세스의 창을 주기적으로 캡처해 규칙별 폴더에 PNG로 저장한다.
#[derive(Parser, Debug)]
#[command(name = "cronshot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 캡처 대상 프로세스 이름 (예: chrome.exe). 지정하면 바로 캡처 시작
    #[arg(long, short = 'p')]
    process: Option<String>,

    /// 스크린샷 루트 디렉토리
    #[arg(long)]
    storage_root: Option<PathBuf>,

    /// 캡처 주기 (초)
    #[arg(long, short = 'i')]
    interval: Option<u64>,

    /// 중복 제거 활성화
    #[arg(long, conflicts_with = "no_dedupe")]
    dedupe: bool,

    /// 중복 제거 비활성화
    #[arg(long)]
    no_dedupe: bool,

    /// 중복 판정 임계값 (1~100, 100이면 픽셀 완전 비교)
    #[arg(long, short = 't')]
    threshold: Option<u32>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리/config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 틱 한 번만 실행하고 종료
    #[arg(long)]
    once: bool,

    /// 대상 프로세스의 창 제목 목록 출력 후 종료
    #[arg(long)]
    list_windows: bool,

    /// 실행 중인 프로세스 이름 목록 출력 후 종료
    #[arg(long)]
    list_processes: bool,
}

impl Args {
    fn has_overrides(&self) -> bool {
        self.process.is_some()
            || self.storage_root.is_some()
            || self.interval.is_some()
            || self.dedupe
            || self.no_dedupe
            || self.threshold.is_some()
    }

    /// CLI 인자로 설정 오버라이드
    fn apply(&self, config: &mut AppConfig) {
        if let Some(ref process) = self.process {
            config.current_process = process.trim().to_string();
        }
        if let Some(ref root) = self.storage_root {
            config.storage_root = root.clone();
        }
        if let Some(interval) = self.interval {
            config.screenshot_interval_sec = interval;
        }
        if self.dedupe {
            config.dedupe_enabled = true;
        }
        if self.no_dedupe {
            config.dedupe_enabled = false;
        }
        if let Some(threshold) = self.threshold {
            config.dedupe_threshold = threshold;
        }
    }
}

/// 창 시스템 어댑터 선택
fn create_window_system() -> Arc<dyn WindowSystem> {
    #[cfg(feature = "native-capture")]
    {
        Arc::new(cronshot_vision::capture::XcapWindowSystem::new())
    }
    #[cfg(not(feature = "native-capture"))]
    {
        warn!("native-capture 기능 없이 빌드됨: 창을 찾지 못합니다");
        Arc::new(cronshot_vision::capture::NoOpWindowSystem)
    }
}

/// 상태 이벤트를 콘솔에 출력
async fn print_status(mut rx: tokio::sync::broadcast::Receiver<CaptureEvent>) {
    loop {
        match rx.recv().await {
            Ok(CaptureEvent::Saved { path, .. }) => println!("저장: {}", path.display()),
            Ok(CaptureEvent::ProcessNotFound { process }) => {
                println!("프로세스 창 없음: {process}")
            }
            Ok(CaptureEvent::ProcessNotRunning { process }) => {
                println!("{process}: 실행 중인 프로세스 없음")
            }
            Ok(CaptureEvent::WindowsUpdated { process, titles }) if !process.is_empty() => {
                if titles.is_empty() {
                    println!("{process}: 보이는 창 없음");
                }
                for title in titles {
                    println!("  - {title}");
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(n)) => warn!("상태 이벤트 {n}개 누락"),
            Err(RecvError::Closed) => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "cronshot={},cronshot_app={},cronshot_core={},cronshot_rules={},cronshot_vision={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("CronShot 시작");

    let processes: Arc<dyn ProcessLister> = Arc::new(SysinfoProcessLister::new());
    if args.list_processes {
        let names = processes
            .process_names()
            .map_err(|e| anyhow!("프로세스 목록 조회 실패: {e}"))?;
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    // 설정 로드
    let config_manager = match args.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .map_err(|e| anyhow!("설정 로드 실패: {e}"))?;
    info!("설정 파일: {}", config_manager.config_path().display());

    if args.has_overrides() {
        config_manager
            .update_with(|config| args.apply(config))
            .map_err(|e| anyhow!("설정 저장 실패: {e}"))?;
    }

    let config = config_manager.get();
    info!(
        "저장 경로: {}, 주기: {}초, 중복 제거: {} (임계값 {})",
        config.storage_root.display(),
        config.screenshot_interval_sec,
        config.dedupe_enabled,
        config.dedupe_threshold
    );

    // ── 어댑터 생성 (DI 와이어링) ──
    let config_manager = Arc::new(config_manager);
    let windows = create_window_system();

    if args.list_windows {
        let process = config_manager.current_process();
        if process.is_empty() {
            return Err(anyhow!("--process 또는 설정 파일에 대상 프로세스가 필요합니다"));
        }
        let list = windows
            .enumerate_windows(&process)
            .map_err(|e| anyhow!("창 목록 조회 실패: {e}"))?;
        println!("{process} 창 {}개", list.len());
        for window in list {
            println!("  [{}] {}", window.handle, window.title);
        }
        return Ok(());
    }

    let event_bus = EventBus::default();
    let controller = Arc::new(CaptureController::new(
        config_manager.clone(),
        config_manager.clone(),
        windows.clone(),
        event_bus.clone(),
    ));

    if args.once {
        let tick = controller.clone();
        let report = tokio::task::spawn_blocking(move || tick.run_tick()).await?;
        for path in &report.saved {
            println!("저장: {}", path.display());
        }
        println!(
            "저장 {}개, 스킵 {}개, 실패 {}개",
            report.saved.len(),
            report.skipped,
            report.failed
        );
        return Ok(());
    }

    let shutdown = Shutdown::new();
    let mut shutdown_rx = shutdown.subscribe();
    let status_rx = event_bus.subscribe();
    let status_task = tokio::spawn(async move {
        tokio::select! {
            _ = print_status(status_rx) => {}
            _ = shutdown_rx.changed() => {}
        }
    });

    let watcher = WindowWatcher::new(windows, processes, event_bus);
    watcher.set_process(&config.current_process)?;

    let should_start = args.process.is_some()
        || (config.auto_capture_enabled && !config.current_process.trim().is_empty());
    if should_start {
        controller.start()?;
    } else {
        info!("캡처 대기 중: --process 지정 또는 설정의 auto_capture_enabled 필요");
    }

    shutdown.wait_for_signal().await;

    if controller.is_running() {
        info!("캡처 루프 정리 중");
    }
    controller.stop();
    watcher.stop();
    let _ = status_task.await;

    info!("CronShot 종료");
    Ok(())
}
