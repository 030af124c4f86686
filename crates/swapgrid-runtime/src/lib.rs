#![forbid(unsafe_code)]

//! Runtime services shared by SwapGrid front-ends: persisted preferences and
//! the process-wide theme.

pub mod state_persistence;
pub mod theme;

#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{
    MemoryStorage, StateRegistry, StorageBackend, StorageError, StorageResult, StoredEntry,
};
pub use theme::{SubscriptionId, THEME_KEY, ThemeMode, ThemeStore};
