//! Attributor configuration, loaded from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{read_to_string, Result};
use crate::params::ParameterExtractor;
use crate::psl::SuffixList;

/// Attributor configuration. Every field is optional in the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributorConfig {
    /// Extra tracking parameter names
    pub custom_parameters: Vec<String>,
    /// Referrer database JSON file; the bundled database when unset
    pub referrer_database: Option<PathBuf>,
    /// `public_suffix_list.dat` file; the compiled-in list when unset
    pub public_suffix_list: Option<PathBuf>,
    /// Use the last-two-labels heuristic instead of suffix data
    pub heuristic_suffixes: bool,
}

impl AttributorConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json_str(&read_to_string(path)?)
    }

    /// Build the configured parameter extractor.
    pub fn extractor(&self) -> ParameterExtractor {
        if self.custom_parameters.is_empty() {
            ParameterExtractor::new()
        } else {
            ParameterExtractor::with_custom_parameters(&self.custom_parameters)
        }
    }

    /// Load the configured suffix data.
    pub fn suffix_list(&self) -> Result<SuffixList> {
        if self.heuristic_suffixes {
            return Ok(SuffixList::Heuristic);
        }
        match &self.public_suffix_list {
            Some(path) => SuffixList::from_path(path),
            None => Ok(SuffixList::Bundled),
        }
    }
}
