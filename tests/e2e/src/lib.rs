//! End-to-end test support for the Concordia search engine
//!
//! Provides deterministic stand-ins for the two model capabilities plus
//! small corpus builders, so full pipeline flows run without model
//! downloads. Tests that exercise the real models live in
//! `tests/live_corpus.rs` and are ignored by default.

pub mod fixtures;
