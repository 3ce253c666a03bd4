//! Domain Index
//!
//! Flat map from a literal domain string (optionally with a path, e.g.
//! "google.com/imgres") to the provider registered for it. Built once from a
//! referrer database and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::psl::SuffixList;
use crate::url::first_path_segment;

/// Provider registered for one or more domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRecord {
    /// Human-readable provider name (e.g., "Google")
    pub name: String,
    /// Database category (e.g., "search", "social", "email")
    pub medium: String,
    /// Query parameters carrying the search term (search providers only)
    pub search_params: Vec<String>,
}

impl ProviderRecord {
    pub fn new(name: impl Into<String>, medium: impl Into<String>, search_params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            medium: medium.into(),
            search_params,
        }
    }
}

/// Domain -> provider index.
#[derive(Debug, Default)]
pub struct DomainIndex {
    entries: HashMap<String, Arc<ProviderRecord>>,
}

impl DomainIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain. Keys are lowercased; a later registration of the
    /// same domain replaces the earlier one, which is returned.
    pub fn insert(&mut self, domain: &str, record: Arc<ProviderRecord>) -> Option<Arc<ProviderRecord>> {
        self.entries.insert(domain.trim().to_lowercase(), record)
    }

    /// Exact lookup of a literal domain key.
    #[inline]
    pub fn get(&self, domain: &str) -> Option<&ProviderRecord> {
        self.entries.get(domain).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a hostname (already lowercased) with its URL path.
    ///
    /// Candidates run from the full hostname down to its registrable domain;
    /// at each candidate the bare host, `host+path` and
    /// `host/first-segment` keys are tried in that order.
    pub fn lookup(&self, hostname: &str, path: &str, suffixes: &SuffixList) -> Option<&ProviderRecord> {
        if hostname.is_empty() {
            return None;
        }

        suffixes
            .walk_host_suffixes(hostname)
            .find_map(|candidate| self.lookup_exact(candidate, path))
    }

    fn lookup_exact(&self, host: &str, path: &str) -> Option<&ProviderRecord> {
        if let Some(record) = self.get(host) {
            return Some(record);
        }

        if path.is_empty() {
            return None;
        }

        if let Some(record) = self.get(&format!("{host}{path}")) {
            return Some(record);
        }

        let segment = first_path_segment(path);
        if segment.is_empty() {
            return None;
        }
        self.get(&format!("{host}/{segment}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, medium: &str) -> Arc<ProviderRecord> {
        Arc::new(ProviderRecord::new(name, medium, Vec::new()))
    }

    fn sample_index() -> DomainIndex {
        let mut index = DomainIndex::new();
        index.insert("google.co.uk", record("Google", "search"));
        index.insert("mail.google.com", record("Gmail", "email"));
        index.insert("google.com", record("Google", "search"));
        index.insert("google.com/products", record("Google Product Search", "search"));
        index.insert("yahoo.com/news/world", record("Yahoo! News", "unknown"));
        index.insert("search.yahoo.com", record("Yahoo!", "search"));
        index
    }

    #[test]
    fn test_exact_match_wins_over_root() {
        let index = sample_index();
        let list = SuffixList::default();
        let found = index.lookup("mail.google.com", "/mail/u/0", &list).unwrap();
        assert_eq!(found.name, "Gmail");
    }

    #[test]
    fn test_root_domain_fallback() {
        let index = sample_index();
        let list = SuffixList::default();
        let found = index.lookup("www.google.co.uk", "/search", &list).unwrap();
        assert_eq!(found.name, "Google");
        assert_eq!(found.medium, "search");
    }

    #[test]
    fn test_intermediate_suffix_match() {
        let index = sample_index();
        let list = SuffixList::default();
        let found = index.lookup("uk.search.yahoo.com", "/search", &list).unwrap();
        assert_eq!(found.name, "Yahoo!");
    }

    #[test]
    fn test_path_variants() {
        let mut index = DomainIndex::new();
        index.insert("example.com/products", record("Products", "search"));
        index.insert("example.com/news/world", record("World News", "unknown"));
        let list = SuffixList::default();

        assert_eq!(index.lookup("example.com", "/products/shoes", &list).unwrap().name, "Products");
        assert_eq!(index.lookup("example.com", "/news/world", &list).unwrap().name, "World News");
        assert!(index.lookup("example.com", "/news/local", &list).is_none());
        assert!(index.lookup("example.com", "", &list).is_none());
    }

    #[test]
    fn test_never_walks_above_root() {
        let mut index = DomainIndex::new();
        index.insert("co.uk", record("Wrong", "unknown"));
        let list = SuffixList::default();
        assert!(index.lookup("www.example.co.uk", "/", &list).is_none());
    }

    #[test]
    fn test_last_insert_wins() {
        let mut index = DomainIndex::new();
        assert!(index.insert("Example.com", record("First", "social")).is_none());
        let previous = index.insert("example.com", record("Second", "search"));
        assert_eq!(previous.unwrap().name, "First");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("example.com").unwrap().name, "Second");
    }

    #[test]
    fn test_unknown_host() {
        let index = sample_index();
        let list = SuffixList::default();
        assert!(index.lookup("example.org", "/", &list).is_none());
        assert!(index.lookup("", "/", &list).is_none());
    }
}
