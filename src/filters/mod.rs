//! Transform functions: each post-processes a retrieved value
//!
//! Same degrade-gracefully contract as the scrapers: an input of the wrong
//! shape or an unusable argument yields an absent value, never an error.

pub mod index;
pub mod regex;
