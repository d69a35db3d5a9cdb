//! 선택된 프로세스의 창 목록 감시.
//!
//! 프로세스가 바뀌면 즉시 한 번, 이후 주기적으로 창 제목 목록을
//! [`CaptureEvent::WindowsUpdated`]로 발행한다. 규칙 편집 UI가 이 목록을 보여준다.
//! 창이 하나도 없을 때 프로세스 자체가 없으면 [`CaptureEvent::ProcessNotRunning`]을 대신 발행한다.

use cronshot_core::error::CoreError;
use cronshot_core::models::capture::CaptureEvent;
use cronshot_core::ports::process::ProcessLister;
use cronshot_core::ports::window::WindowSystem;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::event_bus::EventBus;

/// 기본 폴링 주기
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// 창 목록 감시기
pub struct WindowWatcher {
    windows: Arc<dyn WindowSystem>,
    processes: Arc<dyn ProcessLister>,
    events: EventBus,
    poll_interval: Duration,
    state: Mutex<WatchState>,
}

#[derive(Default)]
struct WatchState {
    process: String,
    poller: Option<Poller>,
}

struct Poller {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl WindowWatcher {
    pub fn new(
        windows: Arc<dyn WindowSystem>,
        processes: Arc<dyn ProcessLister>,
        events: EventBus,
    ) -> Self {
        Self::with_interval(windows, processes, events, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(
        windows: Arc<dyn WindowSystem>,
        processes: Arc<dyn ProcessLister>,
        events: EventBus,
        poll_interval: Duration,
    ) -> Self {
        Self {
            windows,
            processes,
            events,
            poll_interval,
            state: Mutex::new(WatchState::default()),
        }
    }

    /// 감시 대상 프로세스 변경
    ///
    /// 같은 이름이면 아무것도 하지 않는다. 빈 이름이면 빈 목록을 발행하고 폴링을 멈춘다.
    pub fn set_process(&self, process: &str) -> Result<(), CoreError> {
        let process = process.trim();
        let mut state = self.state.lock();
        if state.process == process && (process.is_empty() || state.poller.is_some()) {
            return Ok(());
        }

        if let Some(poller) = state.poller.take() {
            let _ = poller.shutdown_tx.send(true);
        }
        state.process = process.to_string();

        let sources = Sources {
            windows: Arc::clone(&self.windows),
            processes: Arc::clone(&self.processes),
            events: self.events.clone(),
        };
        sources.publish(process);
        if process.is_empty() {
            debug!("창 목록 감시 중지 (프로세스 미지정)");
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::Internal(format!("tokio 런타임 없음: {e}")))?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = runtime.spawn(poll_loop(
            sources,
            process.to_string(),
            self.poll_interval,
            shutdown_rx,
        ));
        state.poller = Some(Poller {
            shutdown_tx,
            handle,
        });
        info!("창 목록 감시 시작: {process}");
        Ok(())
    }

    /// 감시 중지 (멱등)
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if let Some(poller) = state.poller.take() {
            let _ = poller.shutdown_tx.send(true);
            debug!("창 목록 감시 중지");
        }
        state.process.clear();
    }

    #[cfg(test)]
    fn is_polling(&self) -> bool {
        self.state
            .lock()
            .poller
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }
}

impl Drop for WindowWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 창 목록 조회에 쓰는 협력자 묶음
#[derive(Clone)]
struct Sources {
    windows: Arc<dyn WindowSystem>,
    processes: Arc<dyn ProcessLister>,
    events: EventBus,
}

impl Sources {
    fn publish(&self, process: &str) {
        if process.is_empty() {
            self.publish_titles(process, Vec::new());
            return;
        }

        let titles: Vec<String> = match self.windows.enumerate_windows(process) {
            Ok(list) => list
                .into_iter()
                .map(|w| w.title)
                .filter(|t| !t.trim().is_empty())
                .collect(),
            Err(e) => {
                warn!("창 목록 조회 실패: {process}: {e}");
                Vec::new()
            }
        };

        if titles.is_empty() {
            match self.processes.is_running(process) {
                Ok(false) => {
                    debug!("프로세스 실행 중 아님: {process}");
                    self.events.publish(CaptureEvent::ProcessNotRunning {
                        process: process.to_string(),
                    });
                    return;
                }
                Ok(true) => debug!("보이는 창 없음: {process}"),
                Err(e) => warn!("프로세스 목록 조회 실패: {e}"),
            }
        }
        self.publish_titles(process, titles);
    }

    fn publish_titles(&self, process: &str, titles: Vec<String>) {
        self.events.publish(CaptureEvent::WindowsUpdated {
            process: process.to_string(),
            titles,
        });
    }
}

async fn poll_loop(
    sources: Sources,
    process: String,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.changed() => break,
        }
        if *shutdown_rx.borrow() {
            break;
        }

        let (tick_sources, name) = (sources.clone(), process.clone());
        if let Err(e) = tokio::task::spawn_blocking(move || tick_sources.publish(&name)).await {
            warn!("창 목록 조회 비정상 종료: {e}");
        }
    }
    debug!("창 목록 폴링 종료: {process}");
}
