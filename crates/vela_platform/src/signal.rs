//! Environment signal contracts
//!
//! The theming runtime never talks to a native API directly. It reads window
//! metrics and the text-direction setting through these traits and learns about
//! foreground transitions through a listener registered on the signal source.

use std::fmt;

use crate::error::Result;

/// Window dimensions in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both sides are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Application lifecycle state reported by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AppState {
    /// In the foreground and receiving input
    #[default]
    Active,
    /// Visible but not receiving input (incoming call, app switcher)
    Inactive,
    /// Not visible
    Background,
}

/// Listener invoked on every app-state transition.
///
/// Carries no payload: receivers re-read whatever state they need.
pub type AppStateListener = Box<dyn Fn() + Send + Sync>;

/// Source of window metrics and lifecycle notifications
pub trait SignalSource: Send + Sync {
    /// Current window size.
    ///
    /// Fails with [`PlatformError::MetricsUnavailable`](crate::PlatformError::MetricsUnavailable)
    /// until the host has laid out a window.
    fn window_dimensions(&self) -> Result<Dimensions>;

    /// Register a listener for app lifecycle changes.
    ///
    /// The listener stays registered until the returned [`Subscription`] is dropped.
    fn subscribe_app_state(&self, listener: AppStateListener) -> Subscription;
}

/// Source of the system layout-direction setting
pub trait TextDirectionSource: Send + Sync {
    /// Whether the system is configured for right-to-left layout
    fn is_rtl(&self) -> bool;
}

/// Guard that removes a registered listener when dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` exactly once on drop
    pub fn new<F: FnOnce() + Send + Sync + 'static>(cancel: F) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Whether dropping this guard will still unsubscribe something
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Unsubscribe now instead of waiting for drop
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
