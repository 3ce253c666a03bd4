//! Tracking parameter taxonomy and extraction
//!
//! The taxonomy is a process-wide constant. An extractor may be extended with
//! caller-supplied names at construction time, never afterwards.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::decode::{decode_value, normalize_name};
use crate::types::fields;
use crate::url::{query_pairs, split_query_fragment};

/// Normalized parameter name -> decoded value.
pub type ParameterMap = BTreeMap<String, String>;

// =============================================================================
// Taxonomy
// =============================================================================

/// Standard UTM parameters
pub const UTM_PARAMETERS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "utm_id",
];

/// Google Ads parameters
pub const GOOGLE_ADS_PARAMETERS: &[&str] = &[
    "gclid",          // Google Click ID
    "gclsrc",         // Google Click Source
    "gbraid",         // iOS app-to-web measurement
    "wbraid",         // web-to-app measurement
    "gad_source",     // Google Ads source
    "gad_campaignid", // Google Ads campaign ID
    "srsltid",        // Google Shopping / Merchant Center
];

/// Social media parameters
pub const SOCIAL_MEDIA_PARAMETERS: &[&str] = &[
    "fbclid",    // Facebook
    "ttclid",    // TikTok
    "twclid",    // Twitter / X
    "li_fat_id", // LinkedIn first-party ad tracking
    "igshid",    // Instagram share ID
    "ScCid",     // Snapchat
];

/// Microsoft Advertising parameters
pub const MICROSOFT_PARAMETERS: &[&str] = &["msclkid"];

/// Email marketing parameters
pub const EMAIL_MARKETING_PARAMETERS: &[&str] = &["mc_cid", "mc_eid", "ml_subscriber_hash"];

/// Matomo (Piwik) campaign parameters
pub const ANALYTICS_PARAMETERS: &[&str] = &["pk_campaign", "pk_source", "pk_medium"];

/// Other ad platforms
pub const OTHER_PLATFORM_PARAMETERS: &[&str] = &[
    "dclid",              // DoubleClick
    "yclid",              // Yahoo / Yandex
    "epik",               // Pinterest enhanced match
    "ttd_uuid",           // The Trade Desk
    "rdt_cid",            // Reddit
    "obOrigUrl",          // Outbrain original URL
    "obclick_id",         // Outbrain
    "tblci",              // Taboola
    "irclid",             // Impact
    "tgWebAppStartParam", // Telegram mini-app launch parameter
];

/// Parameter category, used for introspection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Utm,
    GoogleAds,
    SocialMedia,
    Microsoft,
    EmailMarketing,
    Analytics,
    Other,
}

/// Categorized taxonomy. `Other` also absorbs custom parameters.
pub const TAXONOMY: &[(Category, &[&str])] = &[
    (Category::Utm, UTM_PARAMETERS),
    (Category::GoogleAds, GOOGLE_ADS_PARAMETERS),
    (Category::SocialMedia, SOCIAL_MEDIA_PARAMETERS),
    (Category::Microsoft, MICROSOFT_PARAMETERS),
    (Category::EmailMarketing, EMAIL_MARKETING_PARAMETERS),
    (Category::Analytics, ANALYTICS_PARAMETERS),
    (Category::Other, OTHER_PLATFORM_PARAMETERS),
];

impl Category {
    /// Category of a parameter name (case-insensitive).
    pub fn of(name: &str) -> Self {
        TAXONOMY
            .iter()
            .find(|(_, names)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
            .map_or(Self::Other, |(category, _)| *category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utm => "utm",
            Self::GoogleAds => "google_ads",
            Self::SocialMedia => "social_media",
            Self::Microsoft => "microsoft",
            Self::EmailMarketing => "email_marketing",
            Self::Analytics => "analytics",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taxonomy spelling of a normalized parameter name ("oborigurl" ->
/// "obOrigUrl"). Names outside the taxonomy are returned unchanged.
pub fn canonical_name(name: &str) -> &str {
    TAXONOMY
        .iter()
        .flat_map(|(_, names)| names.iter())
        .find(|n| n.eq_ignore_ascii_case(name))
        .copied()
        .unwrap_or(name)
}

// =============================================================================
// Extractor
// =============================================================================

/// Extracts tracking parameters from URLs.
#[derive(Debug, Clone)]
pub struct ParameterExtractor {
    tracked: HashSet<String>,
}

impl Default for ParameterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterExtractor {
    /// Create an extractor for the built-in taxonomy.
    pub fn new() -> Self {
        let tracked = TAXONOMY
            .iter()
            .flat_map(|(_, names)| names.iter())
            .map(|name| name.to_ascii_lowercase())
            .collect();
        Self { tracked }
    }

    /// Create an extractor that also recognizes the given names.
    pub fn with_custom_parameters<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extractor = Self::new();
        extractor.tracked.extend(
            custom
                .into_iter()
                .map(|name| normalize_name(name.as_ref()))
                .filter(|name| !name.is_empty()),
        );
        extractor
    }

    /// Check if a normalized (lowercase) name is tracked.
    #[inline]
    pub fn is_tracked(&self, name: &str) -> bool {
        self.tracked.contains(name)
    }

    /// Extract all tracking parameters from a URL.
    ///
    /// Never fails: empty or malformed input yields an empty map.
    pub fn extract_from_url(&self, url: &str) -> ParameterMap {
        let mut parameters = ParameterMap::new();
        if url.trim().is_empty() {
            return parameters;
        }

        let (query, fragment) = split_query_fragment(url);
        if let Some(query) = query {
            self.parse_query_string(query, &mut parameters);
        }

        // "#utm_source=drift" carries parameters, "#/route?x=1" is an SPA path
        if let Some(fragment) = fragment {
            if fragment.contains('=') && !fragment.starts_with('/') {
                let mut fragment_params = ParameterMap::new();
                self.parse_query_string(fragment, &mut fragment_params);
                for (key, value) in fragment_params {
                    parameters.entry(key).or_insert(value);
                }
            }
        }

        parameters
    }

    /// Extract from a tracking record: destination URL first, then referrer
    /// URL keys only where the destination did not supply them.
    pub fn extract_from_tracking_record(&self, record: &Map<String, Value>) -> ParameterMap {
        let url_of = |key: &str| record.get(key).and_then(Value::as_str).unwrap_or("");

        let mut parameters = self.extract_from_url(url_of(fields::DESTINATION_URL));
        for (key, value) in self.extract_from_url(url_of(fields::REFERRER_URL)) {
            parameters.entry(key).or_insert(value);
        }
        parameters
    }

    /// Parse a raw query (or fragment) string into `out`.
    fn parse_query_string(&self, raw: &str, out: &mut ParameterMap) {
        // Malformed URLs repeat '?'; each segment is parsed on its own
        for segment in raw.split('?') {
            if !segment.contains('=') {
                continue;
            }

            let separator = if segment.contains(';') && !segment.contains('&') {
                ';'
            } else {
                '&'
            };

            for (raw_name, raw_value) in query_pairs(segment, separator) {
                let name = normalize_name(raw_name);
                if self.is_tracked(&name) {
                    out.insert(name, decode_value(raw_value));
                }
            }
        }
    }
}

/// Group extracted parameter names by category. Empty categories are omitted.
pub fn categorize(parameters: &ParameterMap) -> BTreeMap<Category, Vec<String>> {
    let mut categories: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for name in parameters.keys() {
        categories.entry(Category::of(name)).or_default().push(name.clone());
    }
    categories
}
