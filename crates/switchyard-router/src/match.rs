//! Route matching results and dispatch decisions.

use switchyard_core::{Method, StatusCode};

/// Parameters captured during a single lookup, borrowed from the tree and
/// the request path.
///
/// Names are the identifiers following `:` or `*` in the registered
/// pattern; a catch-all value keeps its leading `/`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> Params<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'a str, value: &'a str) {
        self.entries.push((name, value));
    }

    /// Get a parameter value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// Iterate over all parameters as (name, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.entries.iter().copied()
    }

    /// Returns the number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The raw result of walking one method tree for a request path.
///
/// `tsr` reports that toggling a terminal `/` on the path would have
/// produced a match; the caller decides whether to act on it.
#[derive(Debug)]
pub struct Lookup<'a, T> {
    /// The matched handler, if the walk ended on a registered pattern.
    pub handler: Option<&'a T>,
    /// Captured parameters; meaningful only when `handler` is set.
    pub params: Params<'a>,
    /// Trailing-slash recommendation.
    pub tsr: bool,
}

impl<'a, T> Lookup<'a, T> {
    pub(crate) fn miss(tsr: bool) -> Self {
        Self {
            handler: None,
            params: Params::new(),
            tsr,
        }
    }
}

/// A matched route with its extracted parameters.
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    /// The registered handler.
    pub handler: &'a T,
    /// Extracted path parameters.
    pub params: Params<'a>,
}

/// The dispatch decision for one incoming `(method, path)` pair.
///
/// Produced by [`Router::resolve`](crate::Router::resolve); encodes the full
/// priority order of request handling without emitting a response.
#[derive(Debug)]
pub enum Dispatch<'a, T> {
    /// A route matched; invoke its handler with the captured parameters.
    Handler(RouteMatch<'a, T>),
    /// Redirect to `location` (trailing-slash toggle or repaired spelling).
    Redirect {
        /// The corrected path.
        location: String,
        /// 301 for GET, 307 otherwise.
        status: StatusCode,
    },
    /// Automatic OPTIONS answer listing the allowed methods.
    Preflight(AllowedMethods),
    /// Another method matches this path; answer 405 with `Allow`.
    NotAllowed(AllowedMethods),
    /// Nothing matched.
    NotFound,
}

/// The set of methods that have a route for some path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods {
    methods: Vec<Method>,
}

impl AllowedMethods {
    /// Create a normalized allow list: sorted canonically, de-duplicated.
    /// `OPTIONS` is never part of the set; it is appended when rendering.
    #[must_use]
    pub fn new(mut methods: Vec<Method>) -> Self {
        methods.sort_by_key(|m| method_order(*m));
        methods.dedup();
        Self { methods }
    }

    /// Access the normalized methods.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Check whether a method is in the set.
    #[must_use]
    pub fn contains(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// Returns true when no method is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Format as an HTTP `Allow` header value, with `OPTIONS` last.
    #[must_use]
    pub fn header_value(&self) -> String {
        let mut out = String::new();
        for method in &self.methods {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str(method.as_str());
        }
        if !out.is_empty() {
            out.push_str(", OPTIONS");
        }
        out
    }
}

fn method_order(method: Method) -> u8 {
    match method {
        Method::Get => 0,
        Method::Head => 1,
        Method::Post => 2,
        Method::Put => 3,
        Method::Delete => 4,
        Method::Patch => 5,
        Method::Trace => 6,
        Method::Connect => 7,
        Method::Options => 8,
    }
}
