//! The router registry: one tree per HTTP method plus the dispatch
//! decision tree.

use std::collections::HashMap;

use switchyard_core::{Handler, Method, PathParams, Request, Response, StatusCode};
use tracing::{debug, trace};

use crate::clean::clean_path;
use crate::r#match::{AllowedMethods, Dispatch, Lookup, RouteMatch};
use crate::tree::{Node, RouteError};

/// A trie-based request router.
///
/// Routes are registered per method against absolute patterns. Patterns may
/// contain named parameters (`:name`, one segment) and a terminal catch-all
/// (`*name`, the rest of the path including its leading `/`).
///
/// Registration happens-before serving: grow the router single-threaded,
/// then share it immutably; lookups are read-only and need no
/// synchronization.
///
/// # Example
///
/// ```
/// use switchyard_core::{Method, Request, Response};
/// use switchyard_router::Router;
///
/// let mut router: Router = Router::new();
/// router
///     .get("/users/:id", Box::new(|req: &mut Request| {
///         let id = req.path_params().and_then(|p| p.get("id")).unwrap_or("");
///         Response::ok().body_text(format!("user {id}"))
///     }))
///     .expect("valid pattern");
///
/// let mut req = Request::new(Method::Get, "/users/42");
/// let resp = router.serve(&mut req);
/// assert_eq!(resp.status().as_u16(), 200);
/// ```
pub struct Router<T = switchyard_core::BoxHandler> {
    trees: HashMap<Method, Node<T>>,

    /// Redirect to the path with the terminal `/` toggled when that form is
    /// registered and the requested one is not. 301 for GET, 307 otherwise.
    pub redirect_trailing_slash: bool,
    /// Clean the path and retry case-insensitively when no route matches,
    /// redirecting to the registered spelling on success.
    pub redirect_fixed_path: bool,
    /// Answer 405 with an `Allow` header when another method has a route
    /// for the requested path.
    pub handle_method_not_allowed: bool,
    /// Answer OPTIONS requests automatically. Explicitly registered OPTIONS
    /// routes take priority.
    pub handle_options: bool,
    /// Replacement for the built-in 404 response.
    pub not_found: Option<T>,
    /// Replacement for the built-in 405 response. The decision's `Allow`
    /// header is added to whatever this handler returns.
    pub method_not_allowed: Option<T>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a router with path auto-correction, OPTIONS handling and
    /// 405 handling enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            redirect_trailing_slash: true,
            redirect_fixed_path: true,
            handle_method_not_allowed: true,
            handle_options: true,
            not_found: None,
            method_not_allowed: None,
        }
    }

    /// Registers a handler for the given method and pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the pattern is malformed or conflicts
    /// with an already-registered route. Registration errors are fatal
    /// configuration errors; the router should not serve after one.
    pub fn handle(&mut self, method: Method, pattern: &str, handler: T) -> Result<(), RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(pattern.to_owned()));
        }
        debug!(%method, pattern, "registering route");
        let root = self.trees.entry(method).or_insert_with(Node::new_root);
        root.add_route(pattern, handler)
    }

    /// Registers a GET route. See [`Router::handle`] for errors.
    pub fn get(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        self.handle(Method::Get, pattern, handler)
    }

    /// Registers a HEAD route. See [`Router::handle`] for errors.
    pub fn head(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        self.handle(Method::Head, pattern, handler)
    }

    /// Registers an OPTIONS route. See [`Router::handle`] for errors.
    pub fn options(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        self.handle(Method::Options, pattern, handler)
    }

    /// Registers a POST route. See [`Router::handle`] for errors.
    pub fn post(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        self.handle(Method::Post, pattern, handler)
    }

    /// Registers a PUT route. See [`Router::handle`] for errors.
    pub fn put(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        self.handle(Method::Put, pattern, handler)
    }

    /// Registers a PATCH route. See [`Router::handle`] for errors.
    pub fn patch(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        self.handle(Method::Patch, pattern, handler)
    }

    /// Registers a DELETE route. See [`Router::handle`] for errors.
    pub fn delete(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        self.handle(Method::Delete, pattern, handler)
    }

    /// Runs the raw tree lookup for one method, without any dispatch
    /// policy. The trailing-slash recommendation is returned undecided.
    #[must_use]
    pub fn lookup<'a>(&'a self, method: Method, path: &'a str) -> Lookup<'a, T> {
        match self.trees.get(&method) {
            Some(root) => root.get_value(path),
            None => Lookup::miss(false),
        }
    }

    /// Computes the methods that have a route for `path`, excluding
    /// `req_method` and OPTIONS. The server-wide form `"*"` unions every
    /// registered method instead.
    #[must_use]
    pub fn allowed(&self, path: &str, req_method: Method) -> AllowedMethods {
        let mut methods = Vec::new();
        if path == "*" {
            for &method in self.trees.keys() {
                if method != Method::Options {
                    methods.push(method);
                }
            }
        } else {
            for (&method, root) in &self.trees {
                if method == req_method || method == Method::Options {
                    continue;
                }
                if root.get_value(path).handler.is_some() {
                    methods.push(method);
                }
            }
        }
        AllowedMethods::new(methods)
    }

    /// Resolves one `(method, path)` pair into a dispatch decision,
    /// consulting in order: exact match, trailing-slash redirect,
    /// case-insensitive repair, automatic OPTIONS, 405, 404.
    ///
    /// CONNECT requests and the root path are never redirected.
    #[must_use]
    pub fn resolve<'a>(&'a self, method: Method, path: &'a str) -> Dispatch<'a, T> {
        if let Some(root) = self.trees.get(&method) {
            let lookup = root.get_value(path);
            if let Some(handler) = lookup.handler {
                trace!(%method, path, "route matched");
                return Dispatch::Handler(RouteMatch {
                    handler,
                    params: lookup.params,
                });
            }

            if method != Method::Connect && path != "/" {
                let status = if method == Method::Get {
                    StatusCode::MOVED_PERMANENTLY
                } else {
                    StatusCode::TEMPORARY_REDIRECT
                };

                if lookup.tsr && self.redirect_trailing_slash {
                    let location = if path.len() > 1 && path.ends_with('/') {
                        path[..path.len() - 1].to_owned()
                    } else {
                        format!("{path}/")
                    };
                    debug!(%method, path, %location, "trailing-slash redirect");
                    return Dispatch::Redirect { location, status };
                }

                if self.redirect_fixed_path {
                    let cleaned = clean_path(path);
                    if let Some(fixed) =
                        root.find_case_insensitive_path(&cleaned, self.redirect_trailing_slash)
                    {
                        debug!(%method, path, location = %fixed, "fixed-path redirect");
                        return Dispatch::Redirect {
                            location: fixed,
                            status,
                        };
                    }
                }
            }
        }

        if method == Method::Options {
            if self.handle_options {
                let allow = self.allowed(path, method);
                if !allow.is_empty() {
                    return Dispatch::Preflight(allow);
                }
            }
        } else if self.handle_method_not_allowed {
            let allow = self.allowed(path, method);
            if !allow.is_empty() {
                return Dispatch::NotAllowed(allow);
            }
        }

        Dispatch::NotFound
    }

    /// Reconstructs every registered `(method, pattern)` pair from the
    /// trees, sorted for stable output.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut out = Vec::new();
        for (&method, root) in &self.trees {
            let mut prefix = Vec::new();
            let mut patterns = Vec::new();
            root.collect_patterns(&mut prefix, &mut patterns);
            out.extend(patterns.into_iter().map(|p| (method, p)));
        }
        out.sort_by(|a, b| (a.0.as_str(), &a.1).cmp(&(b.0.as_str(), &b.1)));
        out
    }
}

impl<T: Clone> Router<T> {
    /// Registers one handler for every method in [`Method::ANY`].
    ///
    /// # Errors
    ///
    /// Fails like [`Router::handle`]; registration stops at the first error.
    pub fn handle_all(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        for method in Method::ANY {
            self.handle(method, pattern, handler.clone())?;
        }
        Ok(())
    }
}

impl<T: Handler> Router<T> {
    /// Dispatches a request and produces its response.
    ///
    /// Matched handlers are invoked after the captured parameters are
    /// published on the request as a [`PathParams`] extension. When the
    /// incoming request already carries parameters (an outer router),
    /// entries whose names are not freshly captured are merged in. Routes
    /// without dynamic segments leave the extension untouched.
    ///
    /// This method never fails: misses become redirects, OPTIONS answers,
    /// 405 or 404 responses per the router's configuration.
    pub fn serve(&self, req: &mut Request) -> Response {
        let path = req.path().to_owned();
        match self.resolve(req.method(), &path) {
            Dispatch::Handler(matched) => {
                if !matched.params.is_empty() {
                    let mut captured = PathParams::with_capacity(matched.params.len());
                    for (name, value) in matched.params.iter() {
                        captured.insert(name, value);
                    }
                    if let Some(previous) = req.path_params() {
                        captured.merge_missing(previous);
                    }
                    req.insert_extension(captured);
                }
                matched.handler.call(req)
            }
            Dispatch::Redirect { location, status } => Response::redirect(location, status),
            Dispatch::Preflight(allow) => Response::ok().with_header("Allow", allow.header_value()),
            Dispatch::NotAllowed(allow) => match &self.method_not_allowed {
                Some(handler) => handler
                    .call(req)
                    .with_header("Allow", allow.header_value()),
                None => Response::method_not_allowed(&allow.header_value()),
            },
            Dispatch::NotFound => match &self.not_found {
                Some(handler) => handler.call(req),
                None => Response::not_found(),
            },
        }
    }
}
