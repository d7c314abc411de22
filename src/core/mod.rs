//! Core logic – scroll progress, section curves, the carousel positioner,
//! search ranking and the static data feed.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Positions
//! and distances are in px; the UI layer converts them to terminal rows.

pub mod animate;
pub mod carousel;
pub mod catalog;
pub mod progress;
pub mod rerank;
pub mod search;
