//! Corpus module - verse records, mapping, and context expansion
//!
//! The corpus is immutable once ingested: an ordered verse list aligned
//! position-for-position with the vector index, plus a reverse index for
//! locating a verse by reference.

mod context;
mod mapping;
mod verse;

pub use context::{expand_context, DEFAULT_CONTEXT_RADIUS};
pub use mapping::VerseMapping;
pub use verse::{ContextEntry, SearchResult, VerseRecord};
