#![forbid(unsafe_code)]

//! Process-wide light/dark theme.
//!
//! [`ThemeStore`] holds the current [`ThemeMode`], notifies subscribers when it
//! changes, and (once bound to a [`StateRegistry`]) persists it under
//! [`THEME_KEY`]. Most front-ends use the single [`ThemeStore::global`] instance.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use crate::state_persistence::StateRegistry;

/// Registry key the theme is stored under.
pub const THEME_KEY: &str = "theme";

/// Schema version of the stored theme entry.
pub const THEME_VERSION: u32 = 1;

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Lenient parse: `"light"` in any case (optionally quoted) is light,
    /// anything else is dark.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim().trim_matches('"').trim();
        if value.eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Dark => 0,
            Self::Light => 1,
        }
    }

    const fn from_u8(value: u8) -> Self {
        if value == 1 { Self::Light } else { Self::Dark }
    }

    /// Stored form: a JSON string.
    fn encode(self) -> Vec<u8> {
        format!("\"{}\"", self.as_str()).into_bytes()
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by [`ThemeStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(ThemeMode) + Send + Sync>;

/// Current theme plus change subscribers. `Send + Sync`.
pub struct ThemeStore {
    mode: AtomicU8,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    registry: RwLock<Option<Arc<StateRegistry>>>,
}

impl ThemeStore {
    #[must_use]
    pub fn new(initial: ThemeMode) -> Self {
        Self {
            mode: AtomicU8::new(initial.to_u8()),
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
            registry: RwLock::new(None),
        }
    }

    /// Store bound to `registry`, starting from the stored theme (or dark).
    #[must_use]
    pub fn with_registry(registry: Arc<StateRegistry>) -> Self {
        let store = Self::new(ThemeMode::Dark);
        store.bind_registry(registry);
        store
    }

    /// The process-wide store. Starts dark and unbound.
    pub fn global() -> &'static ThemeStore {
        static GLOBAL: OnceLock<ThemeStore> = OnceLock::new();
        GLOBAL.get_or_init(|| ThemeStore::new(ThemeMode::Dark))
    }

    /// Persist future changes to `registry`, adopting the theme stored there
    /// if there is one. Subscribers hear about the adoption.
    pub fn bind_registry(&self, registry: Arc<StateRegistry>) {
        let stored = registry
            .get(THEME_KEY)
            .and_then(|entry| entry.text().map(ThemeMode::parse));
        if let Ok(mut slot) = self.registry.write() {
            *slot = Some(registry);
        }
        if let Some(mode) = stored {
            tracing::debug!(mode = mode.as_str(), "restored theme");
            self.apply(mode, false);
        }
    }

    #[must_use]
    pub fn get(&self) -> ThemeMode {
        ThemeMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// Switch to `mode`. Returns `false` (and notifies no one) if it was
    /// already current.
    pub fn set(&self, mode: ThemeMode) -> bool {
        self.apply(mode, true)
    }

    /// Flip between dark and light. Returns the new mode.
    pub fn toggle(&self) -> ThemeMode {
        let next = self.get().toggled();
        self.set(next);
        next
    }

    /// Call `listener` with the new mode after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(ThemeMode) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Arc::new(listener)));
        }
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut listeners) = self.listeners.lock() else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn apply(&self, mode: ThemeMode, persist: bool) -> bool {
        let previous = ThemeMode::from_u8(self.mode.swap(mode.to_u8(), Ordering::AcqRel));
        if previous == mode {
            return false;
        }
        if persist {
            self.persist(mode);
        }

        // Listeners run outside the lock so they may subscribe or unsubscribe.
        let snapshot: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => Vec::new(),
        };
        for listener in snapshot {
            listener(mode);
        }
        true
    }

    fn persist(&self, mode: ThemeMode) {
        let Ok(slot) = self.registry.read() else {
            return;
        };
        let Some(registry) = slot.as_ref() else {
            return;
        };
        registry.set(THEME_KEY, THEME_VERSION, mode.encode());
        if let Err(e) = registry.flush() {
            tracing::warn!(
                backend = registry.backend_name(),
                error = %e,
                "failed to persist theme"
            );
        }
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new(ThemeMode::Dark)
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = self.registry.read().map(|r| r.is_some()).unwrap_or(false);
        f.debug_struct("ThemeStore")
            .field("mode", &self.get())
            .field("subscribers", &self.subscriber_count())
            .field("persisted", &bound)
            .finish()
    }
}
