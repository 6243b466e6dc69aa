//! Environment observer
//!
//! Turns platform signals into a [`ConditionSet`]. Every event reads the
//! text-direction setting; layout events also read window dimensions and
//! derive orientation and the smallest-width breakpoint. Each reading is merged
//! into the observed state in one step, so nobody sees half an update.

use std::sync::{Arc, Mutex};

use tracing::warn;
use vela_platform::{AppStateListener, SignalSource, Subscription, TextDirectionSource};

use crate::conditions::{ConditionSet, LayoutDirection, Orientation};
use crate::lock;
use crate::spec::ThemeSpec;

/// What triggered an observation
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnvironmentEvent {
    /// The root view was laid out or resized
    Layout,
    /// The app moved between foreground and background
    AppStateChange,
}

/// Merged view of everything observed so far
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentState {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub conditions: ConditionSet,
}

impl EnvironmentState {
    /// Both layout direction and width are known
    pub fn is_complete(&self) -> bool {
        self.conditions.layout_direction.is_some() && self.width.is_some()
    }

    /// Nothing has been observed
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.conditions == ConditionSet::default()
    }
}

/// Dimension-dependent fields read together on a layout event
#[derive(Clone, Debug, PartialEq)]
struct LayoutReading {
    width: f32,
    height: f32,
    orientation: Orientation,
    smallest_width: Option<String>,
}

/// Pick the breakpoint tag for `width`.
///
/// Returns the last breakpoint in spec order whose threshold is at most
/// `width`. Spec order decides, not numeric order: with `[sw400, sw800, sw600]`
/// and width 900 the result is `sw600`.
pub fn select_breakpoint(spec: &ThemeSpec, width: f32) -> Option<String> {
    spec.breakpoints()
        .filter(|(_, threshold)| width >= *threshold as f32)
        .last()
        .map(|(tag, _)| tag.to_owned())
}

/// Reads platform signals and owns the merged [`EnvironmentState`]
pub struct EnvironmentObserver {
    signals: Arc<dyn SignalSource>,
    direction: Arc<dyn TextDirectionSource>,
    state: Mutex<EnvironmentState>,
}

impl EnvironmentObserver {
    pub fn new(signals: Arc<dyn SignalSource>, direction: Arc<dyn TextDirectionSource>) -> Self {
        Self {
            signals,
            direction,
            state: Mutex::new(EnvironmentState::default()),
        }
    }

    /// Read the sources for `event`, merge, and return the new state
    pub fn handle(&self, event: EnvironmentEvent, spec: &ThemeSpec) -> EnvironmentState {
        let layout_direction = LayoutDirection::from_rtl(self.direction.is_rtl());
        let layout = match event {
            EnvironmentEvent::Layout => self.read_layout(spec),
            EnvironmentEvent::AppStateChange => None,
        };

        let mut state = lock(&self.state);
        state.conditions.layout_direction = Some(layout_direction);
        if let Some(reading) = layout {
            state.width = Some(reading.width);
            state.height = Some(reading.height);
            state.conditions.orientation = Some(reading.orientation);
            state.conditions.smallest_width = reading.smallest_width;
        }
        state.clone()
    }

    pub fn current_state(&self) -> EnvironmentState {
        lock(&self.state).clone()
    }

    pub fn current_conditions(&self) -> ConditionSet {
        lock(&self.state).conditions.clone()
    }

    /// Register `listener` for foreground/background transitions
    pub fn on_app_state_change(&self, listener: AppStateListener) -> Subscription {
        self.signals.subscribe_app_state(listener)
    }

    fn read_layout(&self, spec: &ThemeSpec) -> Option<LayoutReading> {
        let dimensions = match self.signals.window_dimensions() {
            Ok(dimensions) if dimensions.is_valid() => dimensions,
            Ok(dimensions) => {
                warn!(
                    width = dimensions.width,
                    height = dimensions.height,
                    "ignoring invalid window dimensions"
                );
                return None;
            }
            Err(error) => {
                warn!(%error, "window dimensions unavailable");
                return None;
            }
        };

        Some(LayoutReading {
            width: dimensions.width,
            height: dimensions.height,
            orientation: Orientation::from_dimensions(dimensions.width, dimensions.height),
            smallest_width: select_breakpoint(spec, dimensions.width),
        })
    }
}
