//! refattr Core Library
//!
//! This crate provides the attribution engine: given a destination URL and an
//! optional referrer URL it decides where a visit came from.
//!
//! # Architecture
//!
//! Classification is a pure function over the two input strings plus a
//! read-only [`DomainIndex`] compiled from a referrer database. Every call
//! allocates only call-local data, so a single [`Attributor`] can be shared
//! across threads without coordination.
//!
//! # Modules
//!
//! - `url`: URL slicing without full parsing (scheme, host, path, query, fragment)
//! - `decode`: percent/plus decoding heuristics for parameter values
//! - `params`: tracking parameter taxonomy and extraction
//! - `psl`: Public Suffix List handling for registrable-domain extraction
//! - `index`: domain index and provider lookup
//! - `referrer`: referrer URL analysis
//! - `resolver`: precedence rules and click-identifier inference
//! - `format`: public result shaping
//! - `attributor`: the context object tying everything together
//! - `config`: configuration loading
//! - `types`: shared record types

pub mod attributor;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod index;
pub mod params;
pub mod psl;
pub mod referrer;
pub mod resolver;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use attributor::{Attributor, SharedAttributor};
pub use config::AttributorConfig;
pub use error::{Error, Result};
pub use format::AttributionResult;
pub use index::{DomainIndex, ProviderRecord};
pub use params::{Category, ParameterExtractor, ParameterMap};
pub use psl::SuffixList;
pub use referrer::ReferrerAnalyzer;
pub use types::{Attribution, RawAttribution, ReferrerRecord};
