use std::sync::atomic::{AtomicBool, Ordering};

/// One-shot latch for starting the audio session from a user gesture.
///
/// A failed start re-arms the latch so the next gesture can retry.
#[derive(Debug)]
pub struct StartGate {
    started: AtomicBool,
}

impl StartGate {
    pub const fn new() -> Self {
        Self {
            started: AtomicBool::new(false),
        }
    }

    /// True for exactly one caller until `rearm` is called.
    pub fn try_begin(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    pub fn rearm(&self) {
        self.started.store(false, Ordering::SeqCst);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}
