//! Trie-based HTTP request router.
//!
//! switchyard routes `(method, path)` pairs to handlers through a
//! compressed radix trie:
//!
//! - **Only explicit matches** — a request matches exactly one route or
//!   none; there are no priority rules between overlapping patterns
//! - **Path parameters** — `:name` captures one segment, `*name` captures
//!   the rest of the path
//! - **Path auto-correction** — trailing-slash redirects plus a
//!   case-insensitive repair of cleaned paths (`/..//Foo` to `/foo`)
//! - **Method awareness** — automatic OPTIONS answers and 405 responses
//!   with an `Allow` header
//!
//! # Quick Start
//!
//! ```
//! use switchyard::prelude::*;
//!
//! let mut router: Router = Router::new();
//! router
//!     .get("/hello/:name", Box::new(|req: &mut Request| {
//!         let name = req.path_params().and_then(|p| p.get("name")).unwrap_or("world");
//!         Response::ok().body_text(format!("hello, {name}!"))
//!     }))
//!     .expect("valid route");
//!
//! let mut req = Request::new(Method::Get, "/hello/ferris");
//! let resp = router.serve(&mut req);
//! assert_eq!(resp.status(), StatusCode::OK);
//! ```
//!
//! # Crate Structure
//!
//! - [`switchyard_core`] — request, response and handler types
//! - [`switchyard_router`] — the radix trie, path cleaning, and dispatch

#![forbid(unsafe_code)]

mod files;

pub use files::serve_files;

// Re-export crates
pub use switchyard_core as core;
pub use switchyard_router as router;

// Re-export commonly used types
pub use switchyard_core::{
    Body, BoxHandler, Handler, Headers, InvalidMethod, Method, PathParams, Request, Response,
    SharedHandler, StatusCode, mime_type_for_extension,
};
pub use switchyard_router::{
    AllowedMethods, Dispatch, Lookup, Params, RouteError, RouteMatch, Router, clean_path,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        AllowedMethods, Body, BoxHandler, Dispatch, Handler, Headers, Method, Params, PathParams,
        Request, Response, RouteError, Router, SharedHandler, StatusCode, clean_path, serve_files,
    };
}
