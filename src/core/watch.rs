//! Explicit observer registry for location watch subscriptions.
//!
//! Replaces the source system's shared-singleton listener list: the host
//! constructs one registry, consumers subscribe and get a handle back,
//! and deregistration/stop are explicit and idempotent. Each delivered
//! sample is forwarded to every live subscriber independently; no
//! batching or windowing.

use crate::models::location::LocationSample;

type Subscriber<'a> = Box<dyn FnMut(&LocationSample) + 'a>;

/// Handle returned by `subscribe`; pass it back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchHandle(usize);

#[derive(Default)]
pub struct WatchRegistry<'a> {
    subscribers: Vec<Option<Subscriber<'a>>>,
    stopped: bool,
}

impl<'a> WatchRegistry<'a> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            stopped: false,
        }
    }

    pub fn subscribe<F>(&mut self, f: F) -> WatchHandle
    where
        F: FnMut(&LocationSample) + 'a,
    {
        self.subscribers.push(Some(Box::new(f)));
        WatchHandle(self.subscribers.len() - 1)
    }

    /// Safe to call twice with the same handle.
    pub fn unsubscribe(&mut self, handle: WatchHandle) {
        if let Some(slot) = self.subscribers.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Forward one sample to every live subscriber. No-op after stop().
    pub fn deliver(&mut self, sample: &LocationSample) {
        if self.stopped {
            return;
        }
        for slot in self.subscribers.iter_mut().flatten() {
            slot(sample);
        }
    }

    /// Stop watching. Idempotent.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
