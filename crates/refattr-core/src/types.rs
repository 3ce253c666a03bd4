//! Core record types shared by the analyzer, resolver and formatter.

use serde::Serialize;

use crate::params::ParameterMap;

// =============================================================================
// Well-known values
// =============================================================================

/// Source used for direct traffic.
pub const DIRECT_SOURCE: &str = "(direct)";
/// Medium used when there is no medium (direct traffic, bare utm_source).
pub const NONE_MEDIUM: &str = "(none)";
/// Source for navigation within the same site.
pub const INTERNAL_SOURCE: &str = "(internal)";
pub const INTERNAL_MEDIUM: &str = "internal";
/// Medium for referrers not found in the database.
pub const REFERRAL_MEDIUM: &str = "referral";
/// Medium for referrers that could not be parsed.
pub const UNKNOWN_MEDIUM: &str = "unknown";
/// Reported medium for database entries in the "search" category.
pub const ORGANIC_MEDIUM: &str = "organic";
/// Database category for search engines.
pub const SEARCH_CATEGORY: &str = "search";

/// Keys of a tracking record (measurement-protocol style).
pub mod fields {
    /// Destination (document location) URL
    pub const DESTINATION_URL: &str = "dl";
    /// Referrer (document referrer) URL
    pub const REFERRER_URL: &str = "dr";
    /// Base URL of the current site, used for internal-navigation detection
    pub const BASE_URL: &str = "bu";

    pub const REFERRER_SOURCE: &str = "referrer_source";
    pub const REFERRER_MEDIUM: &str = "referrer_medium";
    pub const REFERRER_TERM: &str = "referrer_term";
    pub const ATTRIBUTION_SOURCE: &str = "attribution_source";
    pub const ATTRIBUTION_MEDIUM: &str = "attribution_medium";
    pub const ATTRIBUTION_TERM: &str = "attribution_term";
}

// =============================================================================
// Records
// =============================================================================

/// Result of analyzing a referrer URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferrerRecord {
    pub source: Option<String>,
    pub medium: String,
    pub term: Option<String>,
}

impl ReferrerRecord {
    pub fn direct() -> Self {
        Self {
            source: Some(DIRECT_SOURCE.to_string()),
            medium: NONE_MEDIUM.to_string(),
            term: None,
        }
    }

    pub fn unknown() -> Self {
        Self {
            source: None,
            medium: UNKNOWN_MEDIUM.to_string(),
            term: None,
        }
    }

    pub fn internal() -> Self {
        Self {
            source: Some(INTERNAL_SOURCE.to_string()),
            medium: INTERNAL_MEDIUM.to_string(),
            term: None,
        }
    }

    pub fn referral(host: &str) -> Self {
        Self {
            source: Some(host.to_string()),
            medium: REFERRAL_MEDIUM.to_string(),
            term: None,
        }
    }

    /// A source the resolver may fall back to: known and not "(direct)".
    pub fn usable_source(&self) -> Option<&str> {
        self.source
            .as_deref()
            .filter(|source| !source.is_empty() && *source != DIRECT_SOURCE)
    }
}

/// Final attribution decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attribution {
    pub source: Option<String>,
    pub medium: Option<String>,
    pub term: Option<String>,
}

impl Attribution {
    pub fn new(source: impl Into<String>, medium: impl Into<String>, term: Option<String>) -> Self {
        Self {
            source: Some(source.into()),
            medium: Some(medium.into()),
            term,
        }
    }

    pub fn direct() -> Self {
        Self::new(DIRECT_SOURCE, NONE_MEDIUM, None)
    }
}

/// Everything computed for one visit, before public formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribution {
    pub parameters: ParameterMap,
    pub referrer: ReferrerRecord,
    pub attribution: Attribution,
}

impl RawAttribution {
    /// First non-empty of the attribution term, utm_term and referrer term.
    pub fn term(&self) -> Option<&str> {
        [
            self.attribution.term.as_deref(),
            self.parameters.get("utm_term").map(String::as_str),
            self.referrer.term.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|term| !term.is_empty())
    }
}
