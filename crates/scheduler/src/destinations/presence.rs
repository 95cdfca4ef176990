//! Presence - host-side reachability flag shared by every clone of a handle

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether the host currently has the destination (joined channel, open
/// window). Clones observe the same flag.
#[derive(Debug, Clone)]
pub struct Presence(Arc<AtomicBool>);

impl Presence {
    pub fn new(present: bool) -> Self {
        Self(Arc::new(AtomicBool::new(present)))
    }

    pub fn is_present(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, present: bool) {
        self.0.store(present, Ordering::Release);
    }
}

impl Default for Presence {
    fn default() -> Self {
        Self::new(true)
    }
}
