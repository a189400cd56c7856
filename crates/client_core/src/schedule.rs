use std::time::Duration;

use tokio::task::JoinHandle;

/// A delayed callback owned by its scheduler. Dropping it cancels the callback.
pub struct ScheduledAction {
    handle: JoinHandle<()>,
}

impl ScheduledAction {
    /// Must be called from within a tokio runtime.
    pub fn after<F>(delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Self { handle }
    }

    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledAction {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
