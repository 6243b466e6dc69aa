//! Theme provider
//!
//! `ThemeProvider` owns the condition state machine and publishes a freshly
//! resolved theme after every change:
//!
//! ```text
//! Uninitialized ──▶ PartiallyKnown ──▶ Ready
//!       └──────────────────────────────▲
//! ```
//!
//! `Ready` requires both layout direction and window width and is terminal:
//! later observations only change the published payload.
//!
//! Descendants get a [`ThemeScope`] passed to them explicitly. Each publish
//! replaces the scope's [`ResolvedTheme`] as a whole, stamped with a new id,
//! even when the values are unchanged.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tracing::{debug, trace};
use vela_platform::{SignalSource, Subscription, TextDirectionSource};

use crate::conditions::{ConditionSet, LayoutDirection, Orientation};
use crate::gate::ReadinessGate;
use crate::observer::{EnvironmentEvent, EnvironmentObserver, EnvironmentState};
use crate::resolver::{resolve, FlatTheme, OverrideMap};
use crate::spec::{StyleValue, ThemeSpec};
use crate::{lock, read, write};

/// Provider lifecycle state
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Readiness {
    /// Nothing observed yet
    #[default]
    Uninitialized,
    /// Some conditions known, but not both layout direction and width
    PartiallyKnown,
    /// Layout direction and width known; never left
    Ready,
}

impl Readiness {
    /// Readiness implied by an environment state on its own
    pub fn of(state: &EnvironmentState) -> Self {
        if state.is_complete() {
            Self::Ready
        } else if state.is_empty() {
            Self::Uninitialized
        } else {
            Self::PartiallyKnown
        }
    }

    /// Next state after observing `state`. Never moves backwards, so `Ready`
    /// is terminal.
    pub fn advance(self, state: &EnvironmentState) -> Self {
        self.max(Self::of(state))
    }

    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

/// One published theme.
///
/// Immutable; a new publish produces a new value with a larger [`id`](Self::id).
#[derive(Clone, Debug)]
pub struct ResolvedTheme {
    id: u64,
    conditions: ConditionSet,
    values: Arc<FlatTheme>,
}

impl ResolvedTheme {
    /// Identity stamp, strictly increasing across publishes of one provider
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Conditions this theme was resolved against
    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn values(&self) -> &FlatTheme {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(StyleValue::as_str)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(StyleValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(StyleValue::as_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Active overrides plus the built-in conditions, as reported to
/// [`ThemeProviderBuilder::on_config_change`]
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ConfigSnapshot {
    pub overrides: OverrideMap,
    pub layout_direction: Option<LayoutDirection>,
    pub orientation: Option<Orientation>,
    pub smallest_width: Option<String>,
}

impl ConfigSnapshot {
    fn new(overrides: &OverrideMap, conditions: &ConditionSet) -> Self {
        Self {
            overrides: overrides.clone(),
            layout_direction: conditions.layout_direction,
            orientation: conditions.orientation,
            smallest_width: conditions.smallest_width.clone(),
        }
    }
}

/// Callback for config snapshot changes
pub type ConfigChangeCallback = Box<dyn Fn(&ConfigSnapshot) + Send + Sync>;

/// Read access to the published theme, handed to descendants.
///
/// Cheap to clone; every clone sees the latest publish.
#[derive(Clone)]
pub struct ThemeScope {
    published: Arc<RwLock<ResolvedTheme>>,
    gate: ReadinessGate,
}

impl ThemeScope {
    /// Latest published theme
    pub fn theme(&self) -> ResolvedTheme {
        read(&self.published).clone()
    }

    /// Identity stamp of the latest publish
    pub fn id(&self) -> u64 {
        read(&self.published).id
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }
}

impl fmt::Debug for ThemeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeScope")
            .field("id", &self.id())
            .field("ready", &self.is_ready())
            .finish()
    }
}

struct ProviderState {
    spec: ThemeSpec,
    overrides: OverrideMap,
    readiness: Readiness,
    next_id: u64,
    /// Last snapshot handed to the config-change callback
    delivered: Option<ConfigSnapshot>,
}

/// Side effects of one update, run after every lock is released
struct Notify {
    became_ready: bool,
    snapshot: Option<ConfigSnapshot>,
}

struct ProviderCore {
    observer: EnvironmentObserver,
    state: Mutex<ProviderState>,
    published: Arc<RwLock<ResolvedTheme>>,
    gate: ReadinessGate,
    on_config_change: Option<ConfigChangeCallback>,
}

impl ProviderCore {
    fn refresh(&self, event: EnvironmentEvent) {
        let notify = {
            let mut state = lock(&self.state);
            let env = self.observer.handle(event, &state.spec);

            let next = state.readiness.advance(&env);
            let became_ready = next.is_ready() && !state.readiness.is_ready();
            if next != state.readiness {
                debug!(from = ?state.readiness, to = ?next, ?event, "readiness transition");
                state.readiness = next;
            }

            let snapshot = self.publish(&mut state, env.conditions);
            Notify {
                became_ready,
                snapshot,
            }
        };
        self.notify(notify);
    }

    fn republish(&self, change: impl FnOnce(&mut ProviderState)) {
        let notify = {
            let mut state = lock(&self.state);
            change(&mut *state);
            let conditions = self.observer.current_conditions();
            Notify {
                became_ready: false,
                snapshot: self.publish(&mut state, conditions),
            }
        };
        self.notify(notify);
    }

    /// Resolve, swap in the new theme, and return a snapshot to deliver if any
    fn publish(
        &self,
        state: &mut ProviderState,
        conditions: ConditionSet,
    ) -> Option<ConfigSnapshot> {
        let values = resolve(&state.spec, &conditions, &state.overrides);
        let id = state.next_id;
        state.next_id += 1;

        let snapshot = ConfigSnapshot::new(&state.overrides, &conditions);
        *write(&self.published) = ResolvedTheme {
            id,
            conditions,
            values: Arc::new(values),
        };
        trace!(id, readiness = ?state.readiness, "published theme");

        if self.on_config_change.is_none() || !state.readiness.is_ready() {
            return None;
        }
        if state.delivered.as_ref() == Some(&snapshot) {
            return None;
        }
        state.delivered = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Deliver the config change before opening the gate, so changes made by
    /// deferred tasks are reported after it.
    fn notify(&self, notify: Notify) {
        if let (Some(callback), Some(snapshot)) = (&self.on_config_change, notify.snapshot) {
            let latest = lock(&self.state).delivered.as_ref() == Some(&snapshot);
            if latest {
                callback(&snapshot);
            } else {
                // A newer update already took over delivery
                trace!("skipped superseded config snapshot");
            }
        }
        if notify.became_ready {
            self.gate.open();
        }
    }
}

/// Builder for [`ThemeProvider`]
pub struct ThemeProviderBuilder {
    spec: ThemeSpec,
    overrides: OverrideMap,
    on_config_change: Option<ConfigChangeCallback>,
}

impl ThemeProviderBuilder {
    pub fn new(spec: ThemeSpec) -> Self {
        Self {
            spec,
            overrides: OverrideMap::new(),
            on_config_change: None,
        }
    }

    /// Replace all overrides
    pub fn overrides(mut self, overrides: OverrideMap) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set one named override, e.g. `("scheme", "dark")`
    pub fn override_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Called while ready whenever the overrides or conditions change
    pub fn on_config_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ConfigSnapshot) + Send + Sync + 'static,
    {
        self.on_config_change = Some(Box::new(callback));
        self
    }

    /// Mount on a platform implementing both signal traits
    pub fn mount_on<P>(self, platform: Arc<P>) -> ThemeProvider
    where
        P: SignalSource + TextDirectionSource + 'static,
    {
        let signals: Arc<dyn SignalSource> = platform.clone();
        let direction: Arc<dyn TextDirectionSource> = platform;
        self.mount(signals, direction)
    }

    /// Publish the initial theme and start listening for app-state changes
    pub fn mount(
        self,
        signals: Arc<dyn SignalSource>,
        direction: Arc<dyn TextDirectionSource>,
    ) -> ThemeProvider {
        let conditions = ConditionSet::default();
        let values = resolve(&self.spec, &conditions, &self.overrides);
        let published = Arc::new(RwLock::new(ResolvedTheme {
            id: 1,
            conditions,
            values: Arc::new(values),
        }));

        let core = Arc::new(ProviderCore {
            observer: EnvironmentObserver::new(signals, direction),
            state: Mutex::new(ProviderState {
                spec: self.spec,
                overrides: self.overrides,
                readiness: Readiness::Uninitialized,
                next_id: 2,
                delivered: None,
            }),
            published,
            gate: ReadinessGate::new(),
            on_config_change: self.on_config_change,
        });

        let weak = Arc::downgrade(&core);
        let subscription = core.observer.on_app_state_change(Box::new(move || {
            if let Some(core) = weak.upgrade() {
                core.refresh(EnvironmentEvent::AppStateChange);
            }
        }));
        debug!("theme provider mounted");

        ThemeProvider {
            core,
            subscription: Some(subscription),
        }
    }
}

/// Resolves and publishes the theme for the current device environment
pub struct ThemeProvider {
    core: Arc<ProviderCore>,
    subscription: Option<Subscription>,
}

impl ThemeProvider {
    pub fn builder(spec: ThemeSpec) -> ThemeProviderBuilder {
        ThemeProviderBuilder::new(spec)
    }

    /// The root view was laid out; re-read dimensions and direction
    pub fn on_layout(&self) {
        self.core.refresh(EnvironmentEvent::Layout);
    }

    /// Re-read the text direction as on a foreground transition
    pub fn on_app_state_change(&self) {
        self.core.refresh(EnvironmentEvent::AppStateChange);
    }

    /// Replace the overrides and republish
    pub fn set_overrides(&self, overrides: OverrideMap) {
        self.core.republish(|state| state.overrides = overrides);
    }

    /// Set one override and republish
    pub fn set_override(&self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        self.core.republish(|state| {
            state.overrides.insert(name, value);
        });
    }

    /// Swap the spec and republish against the current conditions.
    ///
    /// The breakpoint is re-selected on the next layout event.
    pub fn set_spec(&self, spec: ThemeSpec) {
        self.core.republish(|state| state.spec = spec);
    }

    pub fn overrides(&self) -> OverrideMap {
        lock(&self.core.state).overrides.clone()
    }

    /// Latest published theme
    pub fn theme(&self) -> ResolvedTheme {
        read(&self.core.published).clone()
    }

    /// Conditions of the latest publish
    pub fn conditions(&self) -> ConditionSet {
        read(&self.core.published).conditions.clone()
    }

    pub fn config_snapshot(&self) -> ConfigSnapshot {
        let state = lock(&self.core.state);
        ConfigSnapshot::new(&state.overrides, &self.conditions())
    }

    /// Accessor to thread through descendants
    pub fn scope(&self) -> ThemeScope {
        ThemeScope {
            published: self.core.published.clone(),
            gate: self.core.gate.clone(),
        }
    }

    pub fn readiness(&self) -> Readiness {
        lock(&self.core.state).readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness().is_ready()
    }

    /// Run `content` only once ready; descendant content is withheld before that
    pub fn render_content<R>(&self, content: impl FnOnce(&ThemeScope) -> R) -> Option<R> {
        if !self.is_ready() {
            return None;
        }
        Some(content(&self.scope()))
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.core.gate
    }

    /// See [`ReadinessGate::defer`]
    pub fn defer<F: FnOnce() + Send + 'static>(&self, task: F) {
        self.core.gate.defer(task);
    }

    /// See [`ReadinessGate::ready`]
    pub fn ready(&self) -> impl Future<Output = ()> + Send + 'static {
        self.core.gate.ready()
    }

    /// Stop listening for app-state changes
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            debug!("theme provider unmounted");
        }
    }
}

impl fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeProvider")
            .field("readiness", &self.readiness())
            .field("theme_id", &self.theme().id())
            .finish()
    }
}
