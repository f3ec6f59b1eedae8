//! Explicit shutdown for session poll loops.
//!
//! A [`ShutdownHandle`] is kept by whoever started the session; the
//! matching [`ShutdownSignal`] goes into [`GameConnection::run`](crate::GameConnection::run).
//! The loop only checks the signal between cycles, so a cycle that already
//! started always finishes.

use tokio::sync::watch;

/// Creates a connected handle/signal pair.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownSignal { rx })
}

/// Requests shutdown. Dropping the handle counts as a request too.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    /// Another signal observing this handle.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observes a [`ShutdownHandle`].
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Whether shutdown was requested (or the handle dropped).
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once shutdown is requested or the handle is dropped.
    pub async fn cancelled(&mut self) {
        // `wait_for` errors only when the sender is gone, which is also
        // a shutdown.
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}
