//! Observable UI preferences and their persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Key of the sidebar open/closed flag.
pub const SIDEBAR_OPEN: &str = "sidebar-open";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A single value that notifies its subscribers when it changes.
pub struct ObservablePreference<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>,
}

impl<T: PartialEq> ObservablePreference<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Replace the value. Subscribers hear about it only if it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for (_, callback) in &mut self.subscribers {
            callback(&self.value);
        }
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl ObservablePreference<bool> {
    pub fn toggle(&mut self) -> bool {
        let flipped = !self.value;
        self.set(flipped);
        flipped
    }
}

impl<T: Default + PartialEq> Default for ObservablePreference<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservablePreference<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservablePreference")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Where preferences live between sessions.
pub trait PreferenceStorage {
    fn load_value(&self, key: &str) -> AppResult<Option<Value>>;
    fn store_value(&self, key: &str, value: Value) -> AppResult<()>;
}

/// Preferences kept in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::Preference(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl PreferenceStorage for JsonFilePreferences {
    fn load_value(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn store_value(&self, key: &str, value: Value) -> AppResult<()> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&all)
            .map_err(|e| AppError::Preference(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        debug!(key, path = %self.path.display(), "stored preference");
        Ok(())
    }
}

/// Session-only storage.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, Value>>,
}

impl PreferenceStorage for MemoryPreferences {
    fn load_value(&self, key: &str) -> AppResult<Option<Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| AppError::Preference("preference lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn store_value(&self, key: &str, value: Value) -> AppResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| AppError::Preference("preference lock poisoned".to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Read `key`, falling back to `default` when it was never stored or no
/// longer parses.
pub fn load_preference<T, P>(storage: &P, key: &str, default: T) -> AppResult<T>
where
    T: DeserializeOwned,
    P: PreferenceStorage + ?Sized,
{
    Ok(storage
        .load_value(key)?
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or(default))
}

pub fn save_preference<T, P>(storage: &P, key: &str, value: &T) -> AppResult<()>
where
    T: Serialize,
    P: PreferenceStorage + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|e| AppError::Preference(e.to_string()))?;
    storage.store_value(key, value)
}

/// The sidebar flag, open unless stored otherwise.
pub fn sidebar_preference<P: PreferenceStorage + ?Sized>(
    storage: &P,
) -> AppResult<ObservablePreference<bool>> {
    Ok(ObservablePreference::new(load_preference(
        storage,
        SIDEBAR_OPEN,
        true,
    )?))
}
