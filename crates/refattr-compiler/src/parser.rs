//! Referrer database parser
//!
//! Reads the nested `category -> provider -> {domains, parameters}` JSON
//! layout (the Snowplow referer-parser format) into a flat, ordered list of
//! provider entries. Malformed providers are skipped with a warning; only a
//! malformed top level or category is an error.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::CompileError;

/// Database snapshot shipped with the crate.
const BUNDLED_DATABASE: &str = include_str!("../data/referers.json");

/// One provider of the referrer database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    pub category: String,
    pub provider: String,
    pub domains: Vec<String>,
    pub search_params: Vec<String>,
}

/// Parsed referrer database, ordered by category then provider name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferrerDatabase {
    entries: Vec<ProviderEntry>,
}

impl ReferrerDatabase {
    pub fn from_entries(mut entries: Vec<ProviderEntry>) -> Self {
        entries.sort_by(|a, b| (&a.category, &a.provider).cmp(&(&b.category, &b.provider)));
        Self { entries }
    }

    pub fn from_json_str(text: &str) -> Result<Self, CompileError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_path(path: &Path) -> Result<Self, CompileError> {
        let text = refattr_core::error::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The snapshot compiled into this crate.
    pub fn bundled() -> Self {
        match Self::from_json_str(BUNDLED_DATABASE) {
            Ok(database) => database,
            Err(err) => {
                log::warn!("Bundled referrer database is invalid: {err}");
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, CompileError> {
        let categories = value.as_object().ok_or(CompileError::NotAnObject)?;

        let mut entries = Vec::new();
        for (category, providers) in categories {
            let providers = providers
                .as_object()
                .ok_or_else(|| CompileError::InvalidCategory(category.clone()))?;

            for (provider, config) in providers {
                match parse_provider(category, provider, config) {
                    Ok(entry) => entries.push(entry),
                    Err(err) => log::warn!("Skipping referrer provider: {err}"),
                }
            }
        }

        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_provider(category: &str, provider: &str, config: &Value) -> Result<ProviderEntry, CompileError> {
    let name = provider.trim();
    if name.is_empty() {
        return Err(CompileError::EmptyProviderName(category.to_string()));
    }

    let config = config
        .as_object()
        .ok_or_else(|| CompileError::InvalidProvider(name.to_string()))?;

    Ok(ProviderEntry {
        category: category.to_string(),
        provider: name.to_string(),
        domains: string_list(config, name, "domains")?,
        search_params: string_list(config, name, "parameters")?,
    })
}

/// Optional list of strings; blank items are dropped.
fn string_list(config: &Map<String, Value>, provider: &str, field: &'static str) -> Result<Vec<String>, CompileError> {
    let invalid = || CompileError::InvalidList {
        provider: provider.to_string(),
        field,
    };

    let items = match config.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid()),
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let text = item.as_str().ok_or_else(invalid)?.trim();
        if !text.is_empty() {
            out.push(text.to_string());
        }
    }
    Ok(out)
}
