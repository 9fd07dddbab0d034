//! Transient error banner.
//!
//! Holds at most one message. Showing a message (re)arms a single clear
//! timer; a pending timer is always cancelled first, so the newest message
//! stays visible for a full display duration.
//!
//! The timer runs on the ambient tokio runtime when there is one. The
//! deadline is also checked whenever the message is read, which keeps the
//! banner correct when it is used outside a runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a message stays visible by default.
pub const DEFAULT_DISPLAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Default)]
struct Slot {
    message: Option<String>,
    deadline: Option<Instant>,
    generation: u64,
}

impl Slot {
    fn expire_if_due(&mut self, now: Instant) {
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            self.message = None;
            self.deadline = None;
        }
    }

    fn reset(&mut self) {
        self.message = None;
        self.deadline = None;
    }
}

/// A single self-clearing error message.
#[derive(Debug)]
pub struct ErrorBanner {
    slot: Arc<Mutex<Slot>>,
    display: Duration,
    timer: Option<JoinHandle<()>>,
}

impl ErrorBanner {
    /// Create a banner with the given display duration.
    pub fn new(display: Duration) -> Self {
        Self {
            slot: Arc::default(),
            display,
            timer: None,
        }
    }

    /// Show a message, replacing any visible one.
    pub fn show(&mut self, message: impl Into<String>) {
        self.cancel_timer();

        let message = message.into();
        let deadline = Instant::now() + self.display;

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.message = Some(message);
            slot.deadline = Some(deadline);
            slot.generation
        };

        if let Ok(handle) = Handle::try_current() {
            let slot = Arc::clone(&self.slot);
            self.timer = Some(handle.spawn(async move {
                tokio::time::sleep_until(deadline).await;
                let mut slot = lock(&slot);
                if slot.generation == generation {
                    slot.reset();
                }
            }));
        }
    }

    /// The visible message, if any.
    pub fn current(&self) -> Option<String> {
        let mut slot = lock(&self.slot);
        slot.expire_if_due(Instant::now());
        slot.message.clone()
    }

    /// Whether a message is visible.
    pub fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Hide the message now.
    pub fn clear(&mut self) {
        self.cancel_timer();
        lock(&self.slot).reset();
    }

    /// How long messages stay visible.
    pub fn display_duration(&self) -> Duration {
        self.display
    }

    /// Whether a clear timer is pending.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Default for ErrorBanner {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY)
    }
}

impl Drop for ErrorBanner {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
