//! 캡처 컨트롤러.
//!
//! 상태: 대기(Idle) → 실행 중(Running) → 대기.
//! 실행 중에는 주기 타이머마다 틱을 한 번 실행한다. 틱은 겹치지 않으며
//! 느린 틱은 다음 틱을 늦출 뿐 밀린 틱을 쌓지 않는다. `stop()` 직후 `start()`로
//! 새 루프가 떠도 이전 루프의 틱이 끝날 때까지 새 틱은 틱 잠금에서 기다린다.
//!
//! 틱 본문(창 열거 → 규칙 매칭 → 캡처 → 제목 변경 확인 → 폴더 해석 → 중복 판정 → 저장)은
//! 동기 코드이므로 `spawn_blocking`에서 실행한다. 틱 도중 패닉이 나도
//! 루프는 로그만 남기고 계속 돈다. 종료는 `stop()`으로만 한다.

use chrono::{DateTime, Local, TimeDelta};
use cronshot_core::config::CaptureSettings;
use cronshot_core::error::CoreError;
use cronshot_core::models::capture::{CaptureEvent, SkipReason, TickReport, WindowOutcome};
use cronshot_core::models::window::WindowInfo;
use cronshot_core::ports::context::{CaptureContext, ProcessContextProvider, SettingsProvider};
use cronshot_core::ports::window::WindowSystem;
use cronshot_rules::{resolve_folder, RuleMatcher};
use cronshot_vision::dedupe::{should_skip, DedupePolicy};
use cronshot_vision::storage::save_screenshot;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::event_bus::EventBus;

/// 주기 캡처 컨트롤러
///
/// `start()` / `stop()`은 멱등이며 어느 스레드에서 호출해도 안전하다.
pub struct CaptureController {
    pipeline: Arc<CapturePipeline>,
    running: Mutex<Option<RunningLoop>>,
}

/// 실행 중인 루프 핸들
struct RunningLoop {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// 틱 실행에 필요한 협력자 묶음
struct CapturePipeline {
    context: Arc<dyn ProcessContextProvider>,
    settings: Arc<dyn SettingsProvider>,
    windows: Arc<dyn WindowSystem>,
    events: EventBus,
    /// 틱 전체를 감싸는 잠금 (루프 교체, `run_tick` 직접 호출 포함)
    tick_lock: Mutex<()>,
}

impl CaptureController {
    pub fn new(
        context: Arc<dyn ProcessContextProvider>,
        settings: Arc<dyn SettingsProvider>,
        windows: Arc<dyn WindowSystem>,
        events: EventBus,
    ) -> Self {
        Self {
            pipeline: Arc::new(CapturePipeline {
                context,
                settings,
                windows,
                events,
                tick_lock: Mutex::new(()),
            }),
            running: Mutex::new(None),
        }
    }

    /// 주기 캡처 시작
    ///
    /// 이미 실행 중이면 아무것도 하지 않는다. tokio 런타임 밖에서 호출하면 에러.
    pub fn start(&self) -> Result<(), CoreError> {
        let mut running = self.running.lock();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            debug!("캡처 루프 이미 실행 중");
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::Internal(format!("tokio 런타임 없음: {e}")))?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pipeline = Arc::clone(&self.pipeline);
        let handle = runtime.spawn(run_loop(pipeline, shutdown_rx));

        *running = Some(RunningLoop {
            shutdown_tx,
            handle,
        });
        info!("캡처 시작");
        Ok(())
    }

    /// 주기 캡처 중지
    ///
    /// 실행 중인 틱은 끝까지 진행되고, 루프는 다음 대기 지점에서 종료된다.
    /// 실행 중이 아니면 아무것도 하지 않는다.
    pub fn stop(&self) {
        let Some(running) = self.running.lock().take() else {
            debug!("캡처 루프 실행 중 아님");
            return;
        };
        let _ = running.shutdown_tx.send(true);
        info!("캡처 중지");
    }

    /// 루프 실행 여부
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// 틱 한 번을 현재 스레드에서 동기 실행
    pub fn run_tick(&self) -> TickReport {
        self.pipeline.run_tick()
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn new_ticker(period: Duration) -> Interval {
    // 첫 틱은 한 주기 뒤
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn run_loop(pipeline: Arc<CapturePipeline>, mut shutdown_rx: watch::Receiver<bool>) {
    let mut period = pipeline.settings.current_settings().interval();
    let mut ticker = new_ticker(period);
    info!("캡처 루프 시작: 주기 {}초", period.as_secs());

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.changed() => break,
        }
        if *shutdown_rx.borrow() {
            break;
        }

        let tick_pipeline = Arc::clone(&pipeline);
        match tokio::task::spawn_blocking(move || tick_pipeline.run_tick()).await {
            Ok(report) => debug!(
                "틱 완료: 저장 {}, 스킵 {}, 실패 {}",
                report.saved.len(),
                report.skipped,
                report.failed
            ),
            Err(e) => error!("캡처 틱 비정상 종료, 다음 틱에서 계속: {e}"),
        }

        if *shutdown_rx.borrow() {
            break;
        }

        let next = pipeline.settings.current_settings().interval();
        if next != period {
            info!(
                "캡처 주기 변경: {}초 → {}초",
                period.as_secs(),
                next.as_secs()
            );
            period = next;
            ticker = new_ticker(period);
        }
    }

    info!("캡처 루프 종료");
}

impl CapturePipeline {
    fn publish(&self, event: CaptureEvent) {
        self.events.publish(event);
    }

    fn run_tick(&self) -> TickReport {
        let _tick = self.tick_lock.lock();

        // 틱 단위 스냅샷 (틱 도중 다시 읽지 않음)
        let CaptureContext {
            process,
            rules,
            settings,
        } = self.context.capture_context();
        if process.trim().is_empty() {
            debug!("대상 프로세스 미지정, 틱 건너뜀");
            return TickReport::idle();
        }

        self.publish(CaptureEvent::TickStarted {
            process: process.clone(),
        });

        let windows = match self.windows.enumerate_windows(&process) {
            Ok(windows) if !windows.is_empty() => windows,
            Ok(_) => {
                info!("프로세스 창 없음: {process}");
                self.publish(CaptureEvent::ProcessNotFound { process });
                return TickReport::idle();
            }
            Err(e) => {
                warn!("창 열거 실패: {process}: {e}");
                self.publish(CaptureEvent::ProcessNotFound { process });
                return TickReport::idle();
            }
        };

        debug!("프로세스 {process} 창 {}개", windows.len());
        self.publish(CaptureEvent::WindowCount {
            process: process.clone(),
            count: windows.len(),
        });

        let matcher = RuleMatcher::new(&rules);
        let policy = DedupePolicy::from_settings(&settings);
        let tick_start = Local::now();
        let mut report = TickReport::default();

        for (index, window) in windows.iter().enumerate() {
            // 같은 틱의 창마다 1ms씩 밀어 파일명 충돌 방지
            let timestamp = tick_start + TimeDelta::milliseconds(index as i64);

            match self.capture_one(window, &process, &matcher, &settings, &policy, &timestamp) {
                Ok(WindowOutcome::Saved(path)) => {
                    info!("스크린샷 저장: {}", path.display());
                    report.saved.push(path.clone());
                    self.publish(CaptureEvent::Saved {
                        title: window.title.clone(),
                        path,
                    });
                }
                Ok(WindowOutcome::Skipped(reason)) => {
                    debug!("창 스킵: {:?} ({reason})", window.title);
                    report.skipped += 1;
                    self.publish(CaptureEvent::Skipped {
                        title: window.title.clone(),
                        reason,
                    });
                }
                Err(e) => {
                    error!("창 처리 실패: {:?}: {e}", window.title);
                    report.failed += 1;
                    self.publish(CaptureEvent::Failed {
                        title: window.title.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report
    }

    fn capture_one(
        &self,
        window: &WindowInfo,
        process: &str,
        matcher: &RuleMatcher<'_>,
        settings: &CaptureSettings,
        policy: &DedupePolicy,
        timestamp: &DateTime<Local>,
    ) -> Result<WindowOutcome, CoreError> {
        let handle = window.handle;

        // 열거 시점 제목 대신 지금 제목으로 매칭
        let title = self.windows.window_title(handle);
        if title.trim().is_empty() {
            return Ok(WindowOutcome::Skipped(SkipReason::BlankTitle));
        }

        let Some(rule) = matcher.find(&title) else {
            return Ok(WindowOutcome::Skipped(SkipReason::NoMatchingRule));
        };

        if self.windows.is_minimized(handle) {
            return Ok(WindowOutcome::Skipped(SkipReason::Minimized));
        }
        if !self.windows.is_visible(handle) {
            return Ok(WindowOutcome::Skipped(SkipReason::Hidden));
        }

        let image = self.windows.capture_window(handle)?;

        let current = self.windows.window_title(handle);
        if current != title {
            info!("캡처 도중 창 제목 변경, 폐기: {title:?} → {current:?}");
            return Ok(WindowOutcome::Skipped(SkipReason::TitleDrift {
                matched: title,
                current,
            }));
        }

        let resolved = resolve_folder(&title, Some(rule));

        if should_skip(
            &image,
            &settings.storage_root,
            process,
            &resolved.fixed_folder,
            &resolved.folder,
            policy,
        )? {
            return Ok(WindowOutcome::Skipped(SkipReason::Duplicate));
        }

        let path = save_screenshot(
            &image,
            &settings.storage_root,
            process,
            &resolved.fixed_folder,
            &resolved.folder,
            timestamp,
        )?;
        Ok(WindowOutcome::Saved(path))
    }
}
