//! Single-shot countdown bound to an owning component's lifetime.
//!
//! The timer is armed as soon as it is constructed and disarmed when it is
//! dropped, so owning one from a component ties the countdown to that
//! component's mount/unmount lifecycle. `reset` extends an inactivity
//! window; `cancel` parks the timer until the next `reset`.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A restartable, cancelable delayed callback.
///
/// Must be created on a tokio runtime. At most one countdown is pending at
/// any time; re-arming always aborts the previous one first, so repeated
/// `reset` calls never queue extra callbacks.
pub struct CountdownTimer {
    duration: Duration,
    on_timeout: Arc<dyn Fn() + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Create the timer and start the first countdown immediately.
    ///
    /// `on_timeout` runs once, `duration` after the most recent arming,
    /// unless the countdown is canceled or the timer dropped first.
    pub fn start(duration: Duration, on_timeout: impl Fn() + Send + Sync + 'static) -> Self {
        let mut timer = Self {
            duration,
            on_timeout: Arc::new(on_timeout),
            pending: None,
        };
        timer.arm();
        timer
    }

    /// Cancel any pending countdown and start a new one with the original
    /// duration.
    pub fn reset(&mut self) {
        self.arm();
    }

    /// Cancel the pending countdown without scheduling a new one. The
    /// callback will not fire again until `reset` is called. No-op when
    /// nothing is pending.
    pub fn cancel(&mut self) {
        self.clear();
    }

    /// Whether a countdown is currently scheduled and has not yet fired.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// The duration every countdown is armed with.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn arm(&mut self) {
        self.clear();
        let delay = self.duration;
        let on_timeout = Arc::clone(&self.on_timeout);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_timeout();
        }));
    }

    fn clear(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("duration", &self.duration)
            .field("pending", &self.is_pending())
            .finish()
    }
}
