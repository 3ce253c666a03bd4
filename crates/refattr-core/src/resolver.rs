//! Attribution Resolver
//!
//! Combines extracted parameters with the referrer record into a single
//! (source, medium, term) decision. Rules are evaluated in a fixed order and
//! the first one that applies wins:
//!
//! 1. `utm_source` and `utm_medium`
//! 2. `utm_source` alone (medium from click identifiers, else "(none)")
//! 3. `utm_medium` alone, source taken from the referrer
//! 4. mini-app start parameter carrying encoded UTM values
//! 5. click identifiers, with per-field UTM overrides
//! 6. the referrer
//! 7. direct

use crate::params::ParameterMap;
use crate::types::{Attribution, ReferrerRecord, NONE_MEDIUM};

/// Parameter carrying a Telegram mini-app launch payload (normalized name).
pub const START_PARAM: &str = "tgwebappstartparam";

// =============================================================================
// Click Identifier Rules
// =============================================================================

/// A click-identifier rule: any of `parameters` present implies the source
/// and medium.
#[derive(Debug, Clone, Copy)]
pub struct ClickRule {
    pub parameters: &'static [&'static str],
    pub source: &'static str,
    pub medium: &'static str,
}

const fn rule(parameters: &'static [&'static str], source: &'static str, medium: &'static str) -> ClickRule {
    ClickRule {
        parameters,
        source,
        medium,
    }
}

/// Inference table, evaluated top to bottom.
pub const CLICK_RULES: &[ClickRule] = &[
    rule(&["gclid", "gbraid", "wbraid", "gad_source", "srsltid"], "google", "cpc"),
    rule(&["fbclid"], "facebook", "cpc"),
    rule(&["msclkid"], "bing", "cpc"),
    rule(&["twclid"], "twitter", "cpc"),
    rule(&["li_fat_id"], "linkedin", "cpc"),
    rule(&["ttclid"], "tiktok", "cpc"),
    rule(&["igshid"], "instagram", "social"),
    rule(&["sccid"], "snapchat", "cpc"),
    rule(&["mc_cid", "mc_eid"], "mailchimp", "email"),
    rule(&["ml_subscriber_hash"], "mailerlite", "email"),
    rule(&["dclid"], "doubleclick", "display"),
    rule(&["yclid"], "yahoo", "cpc"),
    rule(&["epik"], "pinterest", "social"),
    rule(&["rdt_cid"], "reddit", "cpc"),
];

/// Infer (source, medium) from click identifiers. Presence of the key is
/// enough, even with an empty value.
pub fn infer_from_click_ids(parameters: &ParameterMap) -> Option<(&'static str, &'static str)> {
    CLICK_RULES
        .iter()
        .find(|rule| rule.parameters.iter().any(|name| parameters.contains_key(*name)))
        .map(|rule| (rule.source, rule.medium))
}

// =============================================================================
// Mini-app start parameter
// =============================================================================

/// Parse `utm_source-<v>` and `utm_medium-<v>` out of a start parameter such
/// as `ref_utm_source-tg_utm_medium-bot`. Each value runs up to the next `_`.
/// Both must be present and non-empty.
pub fn parse_start_param(value: &str) -> Option<(String, String)> {
    let source = start_param_field(value, "utm_source-")?;
    let medium = start_param_field(value, "utm_medium-")?;
    Some((source.to_string(), medium.to_string()))
}

fn start_param_field<'v>(value: &'v str, marker: &str) -> Option<&'v str> {
    let start = value.find(marker)? + marker.len();
    let rest = &value[start..];
    let field = match rest.find('_') {
        Some(end) => &rest[..end],
        None => rest,
    };
    (!field.is_empty()).then_some(field)
}

// =============================================================================
// Resolution
// =============================================================================

/// Trimmed value of a parameter, None when missing or blank.
fn non_blank<'p>(parameters: &'p ParameterMap, name: &str) -> Option<&'p str> {
    parameters
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Resolve the final attribution.
pub fn resolve(parameters: &ParameterMap, referrer: &ReferrerRecord) -> Attribution {
    let utm_source = non_blank(parameters, "utm_source");
    let utm_medium = non_blank(parameters, "utm_medium");
    let utm_term = || parameters.get("utm_term").cloned();

    match (utm_source, utm_medium) {
        (Some(source), Some(medium)) => {
            return Attribution::new(source.to_lowercase(), medium, utm_term());
        }
        (Some(source), None) => {
            let medium = infer_from_click_ids(parameters).map_or(NONE_MEDIUM, |(_, medium)| medium);
            return Attribution::new(source.to_lowercase(), medium, utm_term());
        }
        (None, Some(medium)) => {
            if let Some(source) = referrer.usable_source() {
                let term = utm_term()
                    .filter(|term| !term.is_empty())
                    .or_else(|| referrer.term.clone());
                return Attribution::new(source, medium, term);
            }
        }
        (None, None) => {}
    }

    if let Some((source, medium)) = parameters.get(START_PARAM).and_then(|value| parse_start_param(value)) {
        return Attribution::new(source, medium, utm_term());
    }

    if let Some((source, medium)) = infer_from_click_ids(parameters) {
        let source = utm_source.map_or_else(|| source.to_string(), str::to_lowercase);
        let medium = utm_medium.unwrap_or(medium);
        return Attribution::new(source, medium, utm_term());
    }

    if let Some(source) = referrer.usable_source() {
        return Attribution::new(source, referrer.medium.clone(), referrer.term.clone());
    }

    Attribution::direct()
}
