//! 종료 처리.
//!
//! OS 종료 시그널을 기다렸다가 watch 채널로 상태 출력 태스크 등에 종료를 알린다.
//! 캡처 루프와 창 목록 감시기는 `main`이 직접 `stop()`한다.

use tokio::sync::watch;
use tracing::{info, warn};

/// 종료 트리거
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// 종료 알림 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// 종료 알림 (여러 번 불러도 한 번만 알림)
    pub fn trigger(&self, cause: &str) {
        let first = self.tx.send_if_modified(|stopped| !std::mem::replace(stopped, true));
        if first {
            info!("종료 요청: {cause}");
        }
    }

    /// 종료 시그널이 올 때까지 대기 후 종료 알림
    pub async fn wait_for_signal(&self) {
        let cause = os_signal().await;
        self.trigger(cause);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// 첫 종료 시그널 이름
///
/// 핸들러를 등록할 수 없으면 기다리지 않고 바로 반환한다.
#[cfg(unix)]
async fn os_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut interrupt, mut terminate) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(i), Ok(t)) => (i, t),
        (Err(e), _) | (_, Err(e)) => {
            warn!("시그널 핸들러 등록 실패: {e}");
            return "시그널 핸들러 없음";
        }
    };
    tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn os_signal() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "Ctrl+C",
        Err(e) => {
            warn!("Ctrl+C 핸들러 등록 실패: {e}");
            "시그널 핸들러 없음"
        }
    }
}
