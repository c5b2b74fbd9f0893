// src/output/mod.rs
//! Delivery of rendered results.
//!
//! Callers build an [`OutputPlan`] describing where a result goes, then hand it
//! to [`deliver`], the only place that touches files, stdout or the clipboard.

mod clipboard;
mod markdown;
mod types;
mod writer;

pub use clipboard::copy_to_clipboard;
pub use markdown::render_guide;
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::deliver;
