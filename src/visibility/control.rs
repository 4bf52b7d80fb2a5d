//! Cancellation and progress reporting for long visibility runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

/// Progress events emitted while computing a visibility matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum VisibilityEvent {
    /// Computation started over `cameras` columns
    Started { cameras: usize },
    /// One camera column finished
    ColumnComplete {
        camera: usize,
        completed: usize,
        total: usize,
    },
    /// All columns finished
    Finished { visible_pairs: usize },
    /// The run stopped at a cancellation request
    Cancelled { completed: usize },
}

/// Handle shared between the caller and a running computation.
///
/// Cancellation is cooperative: workers check the flag between camera
/// columns.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    cancel_flag: Arc<AtomicBool>,
    events: Option<Sender<VisibilityEvent>>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send progress events to `sender`. Events that do not fit a full
    /// bounded channel are dropped; use an unbounded channel to keep all.
    pub fn with_events(mut self, sender: Sender<VisibilityEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Get a clone of the cancel flag for external cancellation.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_flag)
    }

    pub(crate) fn emit(&self, event: VisibilityEvent) {
        if let Some(events) = &self.events {
            if events.try_send(event).is_err() {
                tracing::trace!("Dropped visibility event, channel full or closed");
            }
        }
    }
}
