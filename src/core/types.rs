//! Domain types for configuration keys and their resolved values.

use std::fmt;

use zeroize::Zeroizing;

use crate::core::constants::{CONFIG_KEYS, MASK};

/// A required configuration key.
///
/// Sensitive keys are read with terminal echo disabled and are never shown
/// in cleartext by `Debug` or status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    name: &'static str,
    sensitive: bool,
}

impl ConfigKey {
    pub const fn new(name: &'static str, sensitive: bool) -> Self {
        Self { name, sensitive }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Position in the declared key set. Undeclared keys sort last.
    fn rank(&self) -> usize {
        CONFIG_KEYS
            .iter()
            .position(|k| k.name == self.name)
            .unwrap_or(usize::MAX)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Raw values for a set of keys, always iterated in declared key order.
///
/// Values are wiped from memory when dropped.
#[derive(Default)]
pub struct ResolvedValues {
    entries: Vec<(ConfigKey, Zeroizing<String>)>,
}

impl ResolvedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`.
    pub fn insert(&mut self, key: ConfigKey, value: impl Into<String>) {
        let value = Zeroizing::new(value.into());

        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k.name == key.name) {
            slot.1 = value;
            return;
        }

        let rank = key.rank();
        let at = self
            .entries
            .iter()
            .position(|(k, _)| k.rank() > rank)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, (key, value));
    }

    /// Value for a key name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.name == name)
            .map(|(_, v)| v.as_str())
    }

    /// Keys and values in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Keys in declared order.
    pub fn keys(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ResolvedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            if key.is_sensitive() {
                map.entry(&key.name(), &MASK);
            } else {
                map.entry(&key.name(), &value);
            }
        }
        map.finish()
    }
}
