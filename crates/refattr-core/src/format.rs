//! Public result shaping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::canonical_name;
use crate::types::RawAttribution;

/// Click identifiers unified into `click_id` / `click_id_type`, by priority.
pub const CLICK_ID_PARAMETERS: &[&str] = &[
    "gclid",
    "gbraid",
    "wbraid",
    "fbclid",
    "msclkid",
    "ttclid",
    "twclid",
    "li_fat_id",
    "dclid",
    "yclid",
    "rdt_cid",
    "obclick_id",
    "tblci",
    "irclid",
];

/// Parameters renamed into fixed result keys and not copied through.
const RENAMED_PARAMETERS: &[&str] = &["gad_campaignid"];

/// Flat public attribution result. Keys without a value are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributionResult(BTreeMap<String, String>);

impl AttributionResult {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn source(&self) -> Option<&str> {
        self.get("source")
    }

    pub fn medium(&self) -> Option<&str> {
        self.get("medium")
    }

    pub fn campaign(&self) -> Option<&str> {
        self.get("campaign")
    }

    pub fn term(&self) -> Option<&str> {
        self.get("term")
    }

    pub fn click_id(&self) -> Option<&str> {
        self.get("click_id")
    }

    pub fn click_id_type(&self) -> Option<&str> {
        self.get("click_id_type")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }

    fn set(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.insert(key.to_string(), value.to_string());
        }
    }
}

/// Shape a raw attribution into the public result.
pub fn format(raw: &RawAttribution) -> AttributionResult {
    let params = &raw.parameters;
    let param = |name: &str| params.get(name).map(String::as_str);

    let mut result = AttributionResult::default();
    result.set("source", raw.attribution.source.as_deref());
    result.set("medium", raw.attribution.medium.as_deref());
    result.set("campaign", param("utm_campaign"));
    result.set("campaign_id", param("gad_campaignid"));
    result.set("term", raw.term());
    result.set("content", param("utm_content"));
    result.set("id", param("utm_id"));

    let click = CLICK_ID_PARAMETERS
        .iter()
        .find_map(|name| param(*name).filter(|v| !v.is_empty()).map(|v| (*name, v)));
    if let Some((click_type, click_id)) = click {
        result.set("click_id", Some(click_id));
        result.set("click_id_type", Some(click_type));
    }

    // Passed-through parameters keep their taxonomy spelling
    for (name, value) in params {
        let key = canonical_name(name);
        if CLICK_ID_PARAMETERS.contains(&name.as_str())
            || RENAMED_PARAMETERS.contains(&name.as_str())
            || result.0.contains_key(key)
        {
            continue;
        }
        result.set(key, Some(value.as_str()));
    }

    result
}
