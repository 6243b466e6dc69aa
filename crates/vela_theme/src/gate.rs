//! Deferred-readiness gate
//!
//! Lets code wait for the provider's first `Ready` transition:
//!
//! - [`ReadinessGate::defer`] queues a task to run once, when the gate opens,
//!   or runs it right away if the gate is already open.
//! - [`ReadinessGate::ready`] returns a future that completes when the gate opens.
//!
//! A gate opens at most once and never closes again.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::lock;

/// A task waiting for readiness
pub type DeferredTask = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct GateInner {
    open: bool,
    queue: VecDeque<DeferredTask>,
}

/// Shared handle to a one-shot readiness flag with a task queue.
///
/// Cloning yields another handle to the same gate.
#[derive(Clone)]
pub struct ReadinessGate {
    inner: Arc<Mutex<GateInner>>,
    signal: Arc<watch::Sender<bool>>,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            inner: Arc::default(),
            signal: Arc::new(signal),
        }
    }
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        lock(&self.inner).open
    }

    /// Number of tasks still waiting
    pub fn pending(&self) -> usize {
        lock(&self.inner).queue.len()
    }

    /// Run `task` once the gate is open.
    ///
    /// Runs immediately on the calling thread when already open. Queued tasks
    /// run in FIFO order.
    pub fn defer<F: FnOnce() + Send + 'static>(&self, task: F) {
        let mut inner = lock(&self.inner);
        if inner.open {
            drop(inner);
            task();
            return;
        }
        inner.queue.push_back(Box::new(task));
    }

    /// Open the gate and drain queued tasks.
    ///
    /// Returns `true` only for the call that performed the transition; later
    /// calls are no-ops. Tasks run without the gate locked, so they may defer
    /// more work or query readiness.
    pub fn open(&self) -> bool {
        {
            let mut inner = lock(&self.inner);
            if inner.open {
                return false;
            }
            inner.open = true;
        }
        // Works with no live receivers, unlike `send`
        self.signal.send_replace(true);

        let mut ran = 0usize;
        loop {
            let task = lock(&self.inner).queue.pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        tracing::debug!(tasks = ran, "readiness gate opened");
        true
    }

    /// Future that completes once the gate is open.
    ///
    /// Needs no runtime; any executor (or `pollster::block_on`) can drive it.
    pub fn ready(&self) -> impl Future<Output = ()> + Send + 'static {
        // Holding the gate keeps the sender alive, so `wait_for` can't fail
        let gate = self.clone();
        let mut receiver = self.signal.subscribe();
        async move {
            let _ = receiver.wait_for(|open| *open).await;
            drop(gate);
        }
    }
}

impl fmt::Debug for ReadinessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("ReadinessGate")
            .field("open", &inner.open)
            .field("pending", &inner.queue.len())
            .finish()
    }
}
