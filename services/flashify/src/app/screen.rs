//! services/flashify/src/app/screen.rs
//!
//! Binds in-flight requests to the lifetime of the screen that started them.

use flashify_core::{PortError, PortResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// The lifetime of one screen instance. Dropping it cancels every call still
/// running through `run`.
pub struct ScreenScope {
    id: Uuid,
    cancellation_token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A scope that is torn down together with this one.
    pub fn child(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            cancellation_token: self.cancellation_token.child_token(),
        }
    }

    /// A handle that can tear the screen down from elsewhere.
    pub fn teardown_handle(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Runs `call` unless the screen goes away first, in which case the
    /// result is discarded and `PortError::Cancelled` is returned.
    pub async fn run<T, F>(&self, call: F) -> PortResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => {
                debug!(scope = %self.id, "Discarding result of a torn-down screen");
                Err(PortError::Cancelled)
            }
            result = call => result,
        }
    }
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
