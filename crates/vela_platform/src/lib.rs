//! Vela Platform Signals
//!
//! The narrow interface between the theming runtime and the host:
//!
//! - **Window metrics**: current window dimensions, queried on demand
//! - **App lifecycle**: foreground/background transitions delivered to listeners
//! - **Text direction**: the system right-to-left setting
//!
//! Native backends implement [`SignalSource`] and [`TextDirectionSource`].
//! [`HeadlessPlatform`] implements both over caller-driven state.

pub mod error;
pub mod headless;
pub mod signal;

pub use error::{PlatformError, Result};
pub use headless::HeadlessPlatform;
pub use signal::{
    AppState, AppStateListener, Dimensions, SignalSource, Subscription, TextDirectionSource,
};
