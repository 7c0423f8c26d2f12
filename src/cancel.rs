// Cancellation signal shared by in-flight queries (fired on shutdown)

use tokio::sync::watch;

/// Fires the paired [`Cancellation`]s.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Cloneable receiver side. A `Cancellation` whose handle was dropped never fires.
#[derive(Debug, Clone)]
pub struct Cancellation(Option<watch::Receiver<bool>>);

impl Cancellation {
    pub fn channel() -> (CancelHandle, Cancellation) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle(tx), Cancellation(Some(rx)))
    }

    /// A signal that never fires.
    pub fn never() -> Self {
        Cancellation(None)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancelled; pends forever otherwise.
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.0 {
            let mut rx = rx.clone();
            let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
            if fired {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}
