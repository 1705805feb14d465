//! Key-value configuration store
//!
//! The client keeps its persistent settings as `(section, key) -> value`
//! entries. Storage and file format belong to whoever implements
//! [`ConfigStore`]; [`MemoryConfigStore`] is the in-process implementation and
//! can itself be saved through [`Config`](super::Config).

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

use super::Config;

/// A single stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Free-form text
    Text(String),
}

impl ConfigValue {
    /// Numeric view; text that parses as a number is accepted
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Boolean view; accepts `"true"`/`"false"` text
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Self::Number(_) => None,
        }
    }

    /// Text view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Opaque key-value configuration store
pub trait ConfigStore {
    /// Look up a value
    fn get(&self, section: &str, key: &str) -> Option<ConfigValue>;

    /// Store a value, replacing any previous one
    fn set(&mut self, section: &str, key: &str, value: ConfigValue);
}

/// In-memory [`ConfigStore`] backed by ordered maps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfigStore {
    sections: BTreeMap<String, BTreeMap<String, ConfigValue>>,
}

impl MemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across all sections
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, section: &str, key: &str) -> Option<ConfigValue> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: ConfigValue) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

impl Config for MemoryConfigStore {}
