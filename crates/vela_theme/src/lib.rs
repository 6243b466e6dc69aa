//! Vela Theme System
//!
//! Responsive theming for mobile UI: a declarative theme spec of
//! condition-qualified entries is resolved against the device environment and
//! the flattened result is handed to descendant views.
//!
//! # Overview
//!
//! - **Qualifier tags**: entry keys such as `sw600-land` or `ldrtl` gate entries
//!   on smallest-width breakpoint, orientation, layout direction, and any
//!   caller-defined axis (`dark`, `compact`, ...)
//! - **Resolver**: a pure function merging every matching entry, later entries
//!   winning field conflicts
//! - **Environment observer**: reads window metrics and text direction from
//!   [`vela_platform`] signal sources
//! - **Provider**: readiness state machine plus publishing of stamped,
//!   immutable themes
//! - **Readiness gate**: defer work until the provider first becomes ready
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use vela_platform::HeadlessPlatform;
//! use vela_theme::{fragment, ThemeProvider, ThemeSpec};
//!
//! let spec = ThemeSpec::new()
//!     .with_entry("base", fragment([("background", "white")]))
//!     .with_entry("dark", fragment([("background", "black")]))
//!     .with_entry("sw600", fragment([("columns", 2)]));
//!
//! let platform = Arc::new(HeadlessPlatform::with_dimensions(720.0, 1280.0));
//! let provider = ThemeProvider::builder(spec)
//!     .override_value("scheme", "dark")
//!     .mount_on(platform);
//!
//! provider.defer(|| println!("theme ready"));
//! provider.on_layout();
//!
//! let theme = provider.theme();
//! assert_eq!(theme.get_str("background"), Some("black"));
//! assert_eq!(theme.get_f64("columns"), Some(2.0));
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod conditions;
pub mod error;
pub mod gate;
pub mod observer;
pub mod provider;
pub mod qualifier;
pub mod resolver;
pub mod spec;

pub use conditions::{ConditionSet, LayoutDirection, Orientation};
pub use error::{Result, ThemeError};
pub use gate::{DeferredTask, ReadinessGate};
pub use observer::{select_breakpoint, EnvironmentEvent, EnvironmentObserver, EnvironmentState};
pub use provider::{
    ConfigChangeCallback, ConfigSnapshot, Readiness, ResolvedTheme, ThemeProvider,
    ThemeProviderBuilder, ThemeScope,
};
pub use qualifier::{normalize_tag, parse_breakpoint, Qualifier};
pub use resolver::{resolve, ActiveQualifiers, FlatTheme, OverrideMap};
pub use spec::{fragment, SpecEntry, StyleFragment, StyleValue, ThemeSpec};

// Shared state holds plain data, so a poisoned lock is still consistent.

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(PoisonError::into_inner)
}
