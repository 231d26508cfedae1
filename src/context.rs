use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub(crate) struct Context {
    shutdown: Arc<AtomicBool>,
    notifier: broadcast::Sender<()>,
}

impl Context {
    pub(crate) fn new() -> Self {
        let (notifier, _) = broadcast::channel(1);
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            notifier,
        }
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub(crate) fn cancel(&self) {
        if self.shutdown.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.notifier.send(());
    }

    pub(crate) async fn done(&self) {
        // cancelとの競合を避けるため、フラグの確認より先にsubscribeする
        let mut notified = self.notifier.subscribe();
        if self.is_shutdown() {
            return;
        }
        let _ = notified.recv().await;
    }
}
