//! Trie-based HTTP request routing.
//!
//! This crate provides a high-performance radix trie that maps
//! `(method, path)` pairs to handler references.
//!
//! # Features
//!
//! - Compressed radix trie with priority-ordered children for fast lookups
//! - Named parameters (`:name`) and terminal catch-alls (`*name`)
//! - Trailing-slash recommendation and case-insensitive path repair
//! - Lexical path cleaning with no allocation on already-clean input
//! - A dispatch decision tree covering redirects, OPTIONS, 405 and 404

#![warn(unsafe_code)]

mod clean;
mod r#match;
mod router;
mod tree;

pub use clean::clean_path;
pub use r#match::{AllowedMethods, Dispatch, Lookup, Params, RouteMatch};
pub use router::Router;
pub use tree::RouteError;
