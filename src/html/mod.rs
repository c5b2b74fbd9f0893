// src/html/mod.rs
//! Turning fetched HTML into text a language model can read.

mod reducer;

pub use reducer::{reduce, reduce_with_limit};
