//! Named value lookup for credentials and CI variables.
//!
//! Credential keys and CI variable names are configuration; their values
//! come from a [`PropertySource`]. The binary layers `-P KEY=VALUE`
//! overrides on top of the process environment.

use std::collections::HashMap;

use crate::error::{PublishError, Result};

/// Read-only lookup of a named value
pub trait PropertySource {
    /// Returns the value for `key`, or `None` when it is unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads values from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl PropertySource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory properties, used for CLI overrides and tests.
#[derive(Debug, Default, Clone)]
pub struct MapProperties {
    values: HashMap<String, String>,
}

impl MapProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Parses `KEY=VALUE` pairs. The value may itself contain `=`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut properties = MapProperties::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                PublishError::property(format!("expected KEY=VALUE, got '{}'", pair))
            })?;
            if key.trim().is_empty() {
                return Err(PublishError::property(format!(
                    "empty key in '{}'",
                    pair
                )));
            }
            properties.insert(key.trim(), value);
        }
        Ok(properties)
    }
}

impl PropertySource for MapProperties {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Looks up `overrides` first, then `fallback`.
pub struct LayeredProperties<A, B> {
    overrides: A,
    fallback: B,
}

impl<A: PropertySource, B: PropertySource> LayeredProperties<A, B> {
    pub fn new(overrides: A, fallback: B) -> Self {
        LayeredProperties {
            overrides,
            fallback,
        }
    }
}

impl<A: PropertySource, B: PropertySource> PropertySource for LayeredProperties<A, B> {
    fn get(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .or_else(|| self.fallback.get(key))
    }
}
