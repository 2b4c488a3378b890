//! Run-level interruption flag

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set from outside the loop (e.g. a SIGINT handler); checked between comments
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared atomic, for registering with a signal handler
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
