//! Public Suffix List (PSL) utilities for registrable-domain extraction
//!
//! Three sources of suffix data are supported:
//!
//! - [`SuffixList::Bundled`]: the list compiled into the `psl` crate (default)
//! - [`SuffixList::Custom`]: a `public_suffix_list.dat` parsed at runtime with
//!   the `publicsuffix` crate, for callers that refresh the list themselves
//! - [`SuffixList::Heuristic`]: no suffix data; last two labels, with a small
//!   table of common two-part TLDs
//!
//! # Examples
//!
//! ```
//! use refattr_core::psl::SuffixList;
//!
//! let list = SuffixList::default();
//! assert_eq!(list.root_domain("sub.example.com").as_deref(), Some("example.com"));
//! assert_eq!(list.root_domain("sub.example.co.uk").as_deref(), Some("example.co.uk"));
//! ```

use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use publicsuffix::Psl as _;

use crate::error::{read_to_string, Error, Result};

// =============================================================================
// Suffix List
// =============================================================================

/// Source of public suffix data.
#[derive(Clone, Default)]
pub enum SuffixList {
    /// Snapshot compiled into the `psl` crate.
    #[default]
    Bundled,
    /// List parsed from PSL text at runtime.
    Custom(Arc<publicsuffix::List>),
    /// Suffix data unavailable.
    Heuristic,
}

impl fmt::Debug for SuffixList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("SuffixList::Bundled"),
            Self::Custom(_) => f.write_str("SuffixList::Custom"),
            Self::Heuristic => f.write_str("SuffixList::Heuristic"),
        }
    }
}

impl SuffixList {
    /// Parse PSL text (the `public_suffix_list.dat` format).
    pub fn from_psl_str(text: &str) -> Result<Self> {
        let list: publicsuffix::List = text
            .parse()
            .map_err(|e: publicsuffix::Error| Error::SuffixList(e.to_string()))?;
        Ok(Self::Custom(Arc::new(list)))
    }

    /// Load a PSL file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = read_to_string(path)?;
        Self::from_psl_str(&text)
    }

    /// Get the registrable (root) domain for a hostname.
    ///
    /// Case-insensitive; the result is lowercase. Single-label hosts and IP
    /// addresses return themselves, a bare public suffix returns None.
    /// Private-section suffixes (`myshopify.com`, `github.io`) count as public
    /// suffixes, so tenants of a hosting platform are separate sites.
    pub fn root_domain(&self, hostname: &str) -> Option<String> {
        let host = normalize_host(hostname)?;

        if host.parse::<IpAddr>().is_ok() || !host.contains('.') {
            return Some(host);
        }

        match self {
            Self::Bundled => ::psl::domain_str(&host).map(str::to_string),
            Self::Custom(list) => list
                .domain(host.as_bytes())
                .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
                .map(str::to_string),
            Self::Heuristic => {
                let labels: Vec<&str> = host.split('.').collect();
                Some(fallback_root_domain(&labels))
            }
        }
    }

    /// Check if two hosts share the same registrable domain.
    pub fn is_same_site(&self, host1: &str, host2: &str) -> bool {
        match (self.root_domain(host1), self.root_domain(host2)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Walk a normalized host from most to least specific, stopping at its
    /// registrable domain. Without a registrable domain the walk continues
    /// down to the last label.
    pub fn walk_host_suffixes<'a>(&self, host: &'a str) -> HostSuffixIter<'a> {
        let floor = self.root_domain(host).map_or(1, |root| root.len());
        HostSuffixIter::new(host, floor)
    }
}

/// Lowercase, trim, drop a trailing dot and IPv6 brackets.
fn normalize_host(hostname: &str) -> Option<String> {
    let host = hostname
        .trim()
        .trim_end_matches('.')
        .trim_start_matches('[')
        .trim_end_matches(']');
    (!host.is_empty()).then(|| host.to_lowercase())
}

// =============================================================================
// Heuristic Fallback
// =============================================================================

/// Common two-part TLDs for fallback.
const COMMON_TWO_PART_TLDS: &[&str] = &[
    "co.uk", "co.jp", "co.nz", "co.za", "co.in", "co.kr",
    "com.au", "com.br", "com.cn", "com.mx", "com.tw", "com.hk",
    "net.au", "net.nz",
    "org.uk", "org.au", "org.br",
    "gov.uk", "gov.au",
    "ac.uk", "ac.jp",
    "ne.jp", "or.jp",
];

/// Fallback root-domain heuristic.
fn fallback_root_domain(labels: &[&str]) -> String {
    let n = labels.len();
    if n <= 2 {
        return labels.join(".");
    }

    // Check for common two-part TLDs
    let last_two = format!("{}.{}", labels[n - 2], labels[n - 1]);
    if COMMON_TWO_PART_TLDS.contains(&last_two.as_str()) {
        return labels[n - 3..].join(".");
    }

    // Default: last 2 labels
    labels[n - 2..].join(".")
}

// =============================================================================
// Suffix Walking
// =============================================================================

/// Get the parent domain (strip leftmost label).
pub fn get_parent_domain(host: &str) -> Option<&str> {
    match host.find('.') {
        Some(idx) if idx < host.len() - 1 => Some(&host[idx + 1..]),
        _ => None,
    }
}

/// Iterator for suffix-walking a host down to a minimum length.
pub struct HostSuffixIter<'a> {
    current: &'a str,
    floor_len: usize,
}

impl<'a> HostSuffixIter<'a> {
    pub fn new(host: &'a str, floor_len: usize) -> Self {
        Self {
            current: host,
            floor_len: floor_len.max(1),
        }
    }
}

impl<'a> Iterator for HostSuffixIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.len() < self.floor_len {
            return None;
        }

        let result = self.current;

        // Move to parent
        self.current = match get_parent_domain(self.current) {
            Some(parent) if parent.len() >= self.floor_len => parent,
            _ => "",
        };

        Some(result)
    }
}
