//! 캡처 상태 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 컨트롤러와 창 감시기가 발행하고
//! 상태 표시(로그, UI)가 구독한다. 발행은 절대 블로킹하거나 실패하지 않는다.

use cronshot_core::models::capture::CaptureEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// 캡처 이벤트 버스 (복제본은 같은 채널을 공유)
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CaptureEvent>,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행 (구독자가 없으면 버림)
    pub fn publish(&self, event: CaptureEvent) {
        trace!("이벤트 발행: {:?}", std::mem::discriminant(&event));
        let _ = self.tx.send(event);
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(CaptureEvent::Saved {
            title: "Doc".to_string(),
            path: PathBuf::from("/tmp/a.png"),
        });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, CaptureEvent::Saved { .. }));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.clone().subscribe();

        bus.publish(CaptureEvent::ProcessNotFound {
            process: "app".to_string(),
        });

        assert!(matches!(
            rx1.recv().await.unwrap(),
            CaptureEvent::ProcessNotFound { .. }
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            CaptureEvent::ProcessNotFound { .. }
        ));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(CaptureEvent::TickStarted {
            process: "app".to_string(),
        });
    }
}
