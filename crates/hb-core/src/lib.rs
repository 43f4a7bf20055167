//! hosts-bl Core Library
//!
//! Converts hosts-style blocklists into other blocklist formats while
//! removing redundant entries.
//!
//! # Architecture
//!
//! Input is read in up to three passes over a re-scannable [`Source`]:
//! domains are fingerprinted and deduplicated, subdomains of surviving
//! domains are dropped for formats that block whole subtrees, and the
//! survivors are written out in their original order.
//!
//! # Modules
//!
//! - `normalize`: Extracts domains and comments from raw lines
//! - `hash`: xxHash64 fingerprints of configurable width
//! - `index`: Suffix-array containment index over framed fingerprints
//! - `reduce`: Duplicate and subdomain elimination
//! - `compress`: Groups consecutive domains onto one line
//! - `format`: Destination format table and line emitter
//! - `source`: Re-scannable line input
//! - `pipeline`: Pass driver
//! - `config`, `error`: Settings and error types

pub mod compress;
pub mod config;
pub mod error;
pub mod format;
pub mod hash;
pub mod index;
pub mod normalize;
pub mod pipeline;
pub mod reduce;
pub mod source;

// Re-export commonly used types
pub use config::{Config, HashWidth, LineEnding};
pub use error::{ConfigError, Error};
pub use format::{Format, FormatSpec, FormatTraits};
pub use hash::{Fingerprint, Fingerprinter};
pub use index::ContainmentIndex;
pub use pipeline::{convert, Summary};
pub use source::Source;
