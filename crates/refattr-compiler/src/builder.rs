//! Domain index builder
//!
//! Flattens a [`ReferrerDatabase`] into a [`DomainIndex`]. Entries are visited
//! in database order, so when two providers claim the same domain the later
//! one wins; every such collision is logged and counted.

use std::sync::Arc;

use refattr_core::{DomainIndex, ProviderRecord};

use crate::parser::ReferrerDatabase;

/// Statistics from an index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub providers: usize,
    pub domains: usize,
    pub duplicates: usize,
}

/// Build the domain index for a database.
pub fn build_index(database: &ReferrerDatabase) -> (DomainIndex, IndexStats) {
    let mut index = DomainIndex::new();
    let mut stats = IndexStats::default();

    for entry in database.entries() {
        stats.providers += 1;
        let record = Arc::new(ProviderRecord::new(
            entry.provider.clone(),
            entry.category.clone(),
            entry.search_params.clone(),
        ));

        for domain in &entry.domains {
            if let Some(previous) = index.insert(domain, Arc::clone(&record)) {
                stats.duplicates += 1;
                log::warn!(
                    "Domain '{}' registered by both '{}' ({}) and '{}' ({}); keeping '{}'",
                    domain,
                    previous.name,
                    previous.medium,
                    entry.provider,
                    entry.category,
                    entry.provider
                );
            }
        }
    }

    stats.domains = index.len();
    log::debug!(
        "Built domain index: {} providers, {} domains, {} duplicates",
        stats.providers,
        stats.domains,
        stats.duplicates
    );

    (index, stats)
}
