//! Referrer Analysis
//!
//! Classifies a referrer URL as direct, unknown, internal, a known provider
//! from the [`DomainIndex`], or a plain referral.

use url::form_urlencoded;

use crate::index::{DomainIndex, ProviderRecord};
use crate::psl::SuffixList;
use crate::types::{ReferrerRecord, ORGANIC_MEDIUM, SEARCH_CATEGORY};
use crate::url::{extract_hostname, extract_path, is_web_scheme, split_query_fragment};

/// Referrer analyzer borrowing the index and suffix data of its owner.
#[derive(Debug, Clone, Copy)]
pub struct ReferrerAnalyzer<'a> {
    index: &'a DomainIndex,
    suffixes: &'a SuffixList,
}

impl<'a> ReferrerAnalyzer<'a> {
    pub fn new(index: &'a DomainIndex, suffixes: &'a SuffixList) -> Self {
        Self { index, suffixes }
    }

    /// Analyze a referrer relative to the page being visited.
    pub fn analyze(&self, referrer: &str, current_url: Option<&str>) -> ReferrerRecord {
        let referrer = referrer.trim();
        if referrer.is_empty() {
            return ReferrerRecord::direct();
        }

        if !is_web_scheme(referrer) {
            return ReferrerRecord::unknown();
        }
        let hostname = match extract_hostname(referrer) {
            Some(hostname) => hostname,
            None => return ReferrerRecord::unknown(),
        };

        if let Some(current_host) = current_url.and_then(extract_hostname) {
            if self.suffixes.is_same_site(&hostname, &current_host) {
                return ReferrerRecord::internal();
            }
        }

        let path = extract_path(referrer);
        match self.index.lookup(&hostname, path, self.suffixes) {
            Some(provider) => provider_record(provider, referrer),
            None => ReferrerRecord::referral(&hostname),
        }
    }
}

fn provider_record(provider: &ProviderRecord, referrer: &str) -> ReferrerRecord {
    let is_search = provider.medium == SEARCH_CATEGORY;
    let medium = if is_search {
        ORGANIC_MEDIUM.to_string()
    } else {
        provider.medium.clone()
    };

    let term = if is_search {
        split_query_fragment(referrer)
            .0
            .and_then(|query| search_term(query, &provider.search_params))
    } else {
        None
    };

    ReferrerRecord {
        source: Some(provider.name.to_lowercase()),
        medium,
        term,
    }
}

/// First non-blank value whose key is one of the provider's search parameters.
fn search_term(query: &str, search_params: &[String]) -> Option<String> {
    if search_params.is_empty() {
        return None;
    }

    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| search_params.iter().any(|p| p.eq_ignore_ascii_case(key)))
        .map(|(_, value)| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn index() -> DomainIndex {
        let mut index = DomainIndex::new();
        let google = Arc::new(ProviderRecord::new("Google", "search", vec!["q".into(), "query".into()]));
        index.insert("google.com", google.clone());
        index.insert("www.google.com", google);
        index.insert(
            "facebook.com",
            Arc::new(ProviderRecord::new("Facebook", "social", Vec::new())),
        );
        index.insert(
            "mail.google.com",
            Arc::new(ProviderRecord::new("Gmail", "email", Vec::new())),
        );
        index
    }

    fn analyze(referrer: &str, current: Option<&str>) -> ReferrerRecord {
        let index = index();
        let suffixes = SuffixList::default();
        ReferrerAnalyzer::new(&index, &suffixes).analyze(referrer, current)
    }

    #[test]
    fn test_blank_referrer_is_direct() {
        assert_eq!(analyze("", None), ReferrerRecord::direct());
        assert_eq!(analyze("   ", Some("https://example.com")), ReferrerRecord::direct());
    }

    #[test]
    fn test_unparseable_referrer_is_unknown() {
        assert_eq!(analyze("not a url", None), ReferrerRecord::unknown());
        assert_eq!(analyze("android-app://com.google.android.gm", None), ReferrerRecord::unknown());
        assert_eq!(analyze("https:///path", None), ReferrerRecord::unknown());
    }

    #[test]
    fn test_internal_navigation() {
        let record = analyze("https://www.example.co.uk/", Some("https://shop.example.co.uk"));
        assert_eq!(record, ReferrerRecord::internal());
    }

    #[test]
    fn test_different_sites_under_same_suffix() {
        let record = analyze("https://b.co.uk", Some("https://a.co.uk"));
        assert_eq!(record, ReferrerRecord::referral("b.co.uk"));
    }

    #[test]
    fn test_search_provider_with_term() {
        let record = analyze("https://www.google.com/search?q=test+query", None);
        assert_eq!(record.source.as_deref(), Some("google"));
        assert_eq!(record.medium, "organic");
        assert_eq!(record.term.as_deref(), Some("test query"));
    }

    #[test]
    fn test_search_term_skips_blank_values() {
        let record = analyze("https://google.com/search?q=+&QUERY=rust%20lang", None);
        assert_eq!(record.term.as_deref(), Some("rust lang"));

        let record = analyze("https://google.com/", None);
        assert_eq!(record.term, None);
    }

    #[test]
    fn test_non_search_provider() {
        let record = analyze("https://m.facebook.com/story.php?q=ignored", None);
        assert_eq!(record.source.as_deref(), Some("facebook"));
        assert_eq!(record.medium, "social");
        assert_eq!(record.term, None);

        let record = analyze("https://mail.google.com/mail/u/0", None);
        assert_eq!(record.source.as_deref(), Some("gmail"));
        assert_eq!(record.medium, "email");
    }

    #[test]
    fn test_unknown_host_is_referral() {
        let record = analyze("https://Blog.Example.org/post", Some("https://shop.test"));
        assert_eq!(record, ReferrerRecord::referral("blog.example.org"));
    }
}
