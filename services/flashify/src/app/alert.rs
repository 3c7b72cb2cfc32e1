//! services/flashify/src/app/alert.rs
//!
//! The alert bridge. Controllers push single-button alerts into a channel;
//! whatever presents them owns the `AlertQueue` and acknowledges each one,
//! which is the only way its dismissal callback ever runs.

use std::fmt;
use tokio::sync::mpsc;
use tracing::warn;

/// Runs once the user acknowledges an alert.
pub type DismissCallback = Box<dyn FnOnce() + Send + 'static>;

/// A pending alert. Acknowledging consumes it, so its callback cannot run twice.
pub struct Alert {
    pub title: String,
    pub message: String,
    on_dismiss: Option<DismissCallback>,
}

impl Alert {
    /// The user pressed "OK".
    pub fn acknowledge(self) {
        if let Some(callback) = self.on_dismiss {
            callback();
        }
    }
}

impl fmt::Debug for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alert")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("has_callback", &self.on_dismiss.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct AlertBridge {
    sender: mpsc::UnboundedSender<Alert>,
}

pub struct AlertQueue {
    receiver: mpsc::UnboundedReceiver<Alert>,
}

/// Creates a connected bridge/queue pair.
pub fn alert_channel() -> (AlertBridge, AlertQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (AlertBridge { sender }, AlertQueue { receiver })
}

impl AlertBridge {
    /// Schedules an alert. Never blocks and never runs `on_dismiss` itself.
    pub fn notify(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        on_dismiss: Option<DismissCallback>,
    ) {
        let alert = Alert {
            title: title.into(),
            message: message.into(),
            on_dismiss,
        };
        if let Err(mpsc::error::SendError(alert)) = self.sender.send(alert) {
            // Nobody is presenting alerts any more; the callback is dropped unrun.
            warn!(title = %alert.title, "Alert dropped, no presenter attached");
        }
    }
}

impl AlertQueue {
    /// Waits for the next alert. `None` once every bridge is gone.
    pub async fn next(&mut self) -> Option<Alert> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<Alert> {
        self.receiver.try_recv().ok()
    }
}
