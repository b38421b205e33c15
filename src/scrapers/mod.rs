//! Retrieval functions: each pulls one raw value out of a fetched page
//!
//! All of them share the `(resource, argument) -> Option<Value>` contract and
//! swallow their own failures; a page without the wanted data is an absent
//! value, never an error.

pub mod amazon;
pub mod css;
pub mod microdata;
pub mod opengraph;
