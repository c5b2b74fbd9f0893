//! Domain model for the structured guide produced by the summarizer.

mod summary;

pub use summary::*;
