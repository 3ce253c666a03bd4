//! Attributor
//!
//! The context object every classification goes through. It owns the
//! parameter extractor, the suffix data and a shared handle to the compiled
//! domain index, and is immutable once built.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use refattr_core::{Attributor, DomainIndex};
//!
//! let attributor = Attributor::new(Arc::new(DomainIndex::new()));
//! let result = attributor.attribute("https://shop.example/?gclid=G1", None);
//! assert_eq!(result.source(), Some("google"));
//! assert_eq!(result.click_id_type(), Some("gclid"));
//! ```

use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use crate::format::{format, AttributionResult};
use crate::index::DomainIndex;
use crate::params::{ParameterExtractor, ParameterMap};
use crate::psl::SuffixList;
use crate::referrer::ReferrerAnalyzer;
use crate::resolver::resolve;
use crate::types::{fields, RawAttribution, ReferrerRecord};
use crate::url::{base_url, extract_hostname};

// =============================================================================
// Attributor
// =============================================================================

/// Attribution engine for one referrer database.
#[derive(Debug, Clone)]
pub struct Attributor {
    extractor: ParameterExtractor,
    suffixes: SuffixList,
    index: Arc<DomainIndex>,
}

impl Attributor {
    /// Create an attributor with the default taxonomy and compiled-in suffixes.
    pub fn new(index: Arc<DomainIndex>) -> Self {
        Self {
            extractor: ParameterExtractor::new(),
            suffixes: SuffixList::default(),
            index,
        }
    }

    pub fn with_extractor(mut self, extractor: ParameterExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_suffixes(mut self, suffixes: SuffixList) -> Self {
        self.suffixes = suffixes;
        self
    }

    pub fn index(&self) -> &DomainIndex {
        &self.index
    }

    pub fn suffixes(&self) -> &SuffixList {
        &self.suffixes
    }

    fn analyzer(&self) -> ReferrerAnalyzer<'_> {
        ReferrerAnalyzer::new(&self.index, &self.suffixes)
    }

    /// Run extraction, referrer analysis and resolution.
    ///
    /// `base` is the current page used for internal-navigation detection.
    pub fn raw(&self, destination: &str, referrer: &str, base: Option<&str>) -> RawAttribution {
        let mut parameters = self.extractor.extract_from_url(destination);
        for (key, value) in self.extractor.extract_from_url(referrer) {
            parameters.entry(key).or_insert(value);
        }
        self.resolve_raw(parameters, referrer, base)
    }

    fn resolve_raw(&self, parameters: ParameterMap, referrer: &str, base: Option<&str>) -> RawAttribution {
        let referrer = self.analyzer().analyze(referrer, base.filter(|b| !b.is_empty()));
        let attribution = resolve(&parameters, &referrer);
        log::trace!(
            "attribution: source={:?} medium={:?} referrer_medium={}",
            attribution.source,
            attribution.medium,
            referrer.medium
        );
        RawAttribution {
            parameters,
            referrer,
            attribution,
        }
    }

    /// Attribute a visit to `url`, optionally coming from `referrer`.
    ///
    /// Never fails; empty or malformed input is attributed as direct.
    pub fn attribute(&self, url: &str, referrer: Option<&str>) -> AttributionResult {
        let base = base_url(url);
        format(&self.raw(url, referrer.unwrap_or(""), base.as_deref()))
    }

    /// Attribute untyped input. Non-string values are treated as empty.
    pub fn attribute_json(&self, url: &Value, referrer: &Value) -> AttributionResult {
        let url = url.as_str().unwrap_or("");
        let referrer = referrer.as_str().filter(|r| !r.is_empty());
        self.attribute(url, referrer)
    }

    /// Enrich a tracking record (`dl`, `dr`, `bu` keys) with parameters,
    /// referrer analysis and attribution. Input fields are preserved.
    pub fn attribute_tracking_record(&self, record: &Map<String, Value>) -> Map<String, Value> {
        let text = |key: &str| record.get(key).and_then(Value::as_str).unwrap_or("");

        let parameters = self.extractor.extract_from_tracking_record(record);
        let raw = self.resolve_raw(parameters, text(fields::REFERRER_URL), Some(text(fields::BASE_URL)));

        let mut out = record.clone();
        for (key, value) in &raw.parameters {
            out.insert(key.clone(), Value::String(value.clone()));
        }

        let optional = |value: &Option<String>| value.clone().map_or(Value::Null, Value::String);
        out.insert(fields::REFERRER_SOURCE.into(), optional(&raw.referrer.source));
        out.insert(fields::REFERRER_MEDIUM.into(), Value::String(raw.referrer.medium.clone()));
        out.insert(fields::REFERRER_TERM.into(), optional(&raw.referrer.term));
        out.insert(fields::ATTRIBUTION_SOURCE.into(), optional(&raw.attribution.source));
        out.insert(fields::ATTRIBUTION_MEDIUM.into(), optional(&raw.attribution.medium));
        if let Some(term) = raw.term() {
            out.insert(fields::ATTRIBUTION_TERM.into(), Value::String(term.to_string()));
        }
        out
    }

    /// Analyze a referrer on its own.
    pub fn analyze_referrer(&self, referrer: &str, current_url: Option<&str>) -> ReferrerRecord {
        self.analyzer().analyze(referrer, current_url)
    }

    /// Extract tracking parameters from a URL.
    pub fn extract_parameters(&self, url: &str) -> ParameterMap {
        self.extractor.extract_from_url(url)
    }

    /// Registrable domain of a hostname.
    pub fn root_domain(&self, hostname: &str) -> Option<String> {
        self.suffixes.root_domain(hostname)
    }

    /// Whether two URLs belong to the same site.
    pub fn is_internal(&self, url: &str, other: &str) -> bool {
        match (extract_hostname(url), extract_hostname(other)) {
            (Some(a), Some(b)) => self.suffixes.is_same_site(&a, &b),
            _ => false,
        }
    }
}

// =============================================================================
// Shared Attributor
// =============================================================================

/// Attributor handle that can be swapped while readers keep classifying.
///
/// Readers take an `Arc` snapshot and never hold the lock while classifying.
#[derive(Debug)]
pub struct SharedAttributor {
    current: RwLock<Arc<Attributor>>,
}

impl SharedAttributor {
    pub fn new(attributor: Attributor) -> Self {
        Self {
            current: RwLock::new(Arc::new(attributor)),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Attributor> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Install a new attributor, returning the previous one.
    pub fn replace(&self, attributor: Attributor) -> Arc<Attributor> {
        let next = Arc::new(attributor);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }
}
