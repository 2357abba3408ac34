//! Core types for the switchyard router.
//!
//! This crate provides the fundamental building blocks shared by the
//! routing crates:
//! - [`Request`] and [`Response`] types
//! - [`Method`] and [`StatusCode`]
//! - The [`Handler`] trait with [`BoxHandler`] / [`SharedHandler`] aliases
//! - [`PathParams`], the captured-parameter container delivered to handlers
//!
//! # Design Principles
//!
//! - Zero-copy where possible
//! - No runtime reflection beyond the typed request extension map
//! - All types support `Send + Sync`
//! - Routing itself is synchronous, bounded, CPU-only work

#![forbid(unsafe_code)]

mod handler;
mod method;
mod params;
mod request;
mod response;

pub use handler::{BoxHandler, Handler, SharedHandler};
pub use method::{InvalidMethod, Method};
pub use params::PathParams;
pub use request::{Body, Headers, Request};
pub use response::{mime_type_for_extension, Response, StatusCode};
