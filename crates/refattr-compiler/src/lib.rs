//! refattr Referrer Database Compiler
//!
//! This crate parses referrer databases, compiles them into the
//! [`DomainIndex`](refattr_core::DomainIndex) used by the attribution engine,
//! and ships a bundled database snapshot.

pub mod builder;
pub mod error;
pub mod parser;
pub mod supplier;

use std::sync::Arc;

use refattr_core::{Attributor, AttributorConfig};

pub use builder::{build_index, IndexStats};
pub use error::CompileError;
pub use parser::{ProviderEntry, ReferrerDatabase};
pub use supplier::{BundledDatabase, DatabaseSupplier, FileDatabase};

/// Build an attributor from a supplied database.
pub fn attributor_from_supplier(supplier: &dyn DatabaseSupplier) -> Attributor {
    let (index, _) = build_index(&supplier.referrer_database(false));
    Attributor::new(Arc::new(index))
}

/// Assemble an attributor from configuration.
///
/// A missing or invalid database file falls back to the bundled database; a
/// missing or invalid suffix list file is an error.
pub fn build_attributor(config: &AttributorConfig) -> refattr_core::Result<Attributor> {
    let suffixes = config.suffix_list()?;

    let database = match &config.referrer_database {
        Some(path) => FileDatabase::new(path).referrer_database(false),
        None => BundledDatabase.referrer_database(false),
    };
    let (index, _) = build_index(&database);

    Ok(Attributor::new(Arc::new(index))
        .with_extractor(config.extractor())
        .with_suffixes(suffixes))
}
