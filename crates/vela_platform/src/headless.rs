//! In-memory platform
//!
//! `HeadlessPlatform` implements both signal traits over plain state that the
//! owner sets directly. Useful for tests, previews, and hosts that forward
//! native events into Vela by hand.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

use crate::error::{PlatformError, Result};
use crate::signal::{
    AppState, AppStateListener, Dimensions, SignalSource, Subscription, TextDirectionSource,
};

type ListenerId = u64;

struct HeadlessInner {
    dimensions: Option<Dimensions>,
    rtl: bool,
    app_state: AppState,
    listeners: Vec<(ListenerId, Arc<dyn Fn() + Send + Sync>)>,
    next_listener: ListenerId,
}

/// Platform whose signals are driven by the caller.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct HeadlessPlatform {
    inner: Arc<Mutex<HeadlessInner>>,
}

fn lock(inner: &Mutex<HeadlessInner>) -> MutexGuard<'_, HeadlessInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HeadlessPlatform {
    /// A platform with no window yet, left-to-right text, in the foreground
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HeadlessInner {
                dimensions: None,
                rtl: false,
                app_state: AppState::Active,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    /// A platform that already reports a window of the given size
    pub fn with_dimensions(width: f32, height: f32) -> Self {
        let platform = Self::new();
        platform.set_dimensions(width, height);
        platform
    }

    /// Set the window size returned by the next metrics query
    pub fn set_dimensions(&self, width: f32, height: f32) {
        lock(&self.inner).dimensions = Some(Dimensions::new(width, height));
    }

    /// Make metrics queries fail as if no window had been laid out
    pub fn clear_dimensions(&self) {
        lock(&self.inner).dimensions = None;
    }

    /// Set the system right-to-left flag
    pub fn set_rtl(&self, rtl: bool) {
        lock(&self.inner).rtl = rtl;
    }

    pub fn app_state(&self) -> AppState {
        lock(&self.inner).app_state
    }

    /// Move the app to `state`, notifying listeners if it changed.
    ///
    /// Returns whether listeners were notified. Listeners run after the
    /// internal lock is released, so they may query this platform.
    pub fn set_app_state(&self, state: AppState) -> bool {
        let listeners: Vec<_> = {
            let mut inner = lock(&self.inner);
            if inner.app_state == state {
                return false;
            }
            trace!(from = ?inner.app_state, to = ?state, "headless app state change");
            inner.app_state = state;
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        for listener in listeners {
            listener();
        }
        true
    }

    /// Number of registered app-state listeners
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for HeadlessPlatform {
    fn window_dimensions(&self) -> Result<Dimensions> {
        let dimensions = lock(&self.inner).dimensions.ok_or_else(|| {
            PlatformError::MetricsUnavailable("headless window has no dimensions".to_string())
        })?;
        if !dimensions.is_valid() {
            return Err(PlatformError::InvalidDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        Ok(dimensions)
    }

    fn subscribe_app_state(&self, listener: AppStateListener) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push((id, Arc::from(listener)));
            id
        };

        let weak: Weak<Mutex<HeadlessInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).listeners.retain(|(other, _)| *other != id);
            }
        })
    }
}

impl TextDirectionSource for HeadlessPlatform {
    fn is_rtl(&self) -> bool {
        lock(&self.inner).rtl
    }
}
