//! HTTP response types.

use std::fmt;

use crate::request::{Body, Headers};

/// An HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 301 Moved Permanently
    pub const MOVED_PERMANENTLY: StatusCode = StatusCode(301);
    /// 307 Temporary Redirect
    pub const TEMPORARY_REDIRECT: StatusCode = StatusCode(307);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Creates a status code from its numeric value.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true for 3xx codes.
    #[must_use]
    pub const fn is_redirection(self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Returns the canonical reason phrase for the codes used here.
    #[must_use]
    pub const fn canonical_reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            301 => "Moved Permanently",
            307 => "Temporary Redirect",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An HTTP response.
///
/// # Example
///
/// ```
/// use switchyard_core::{Response, StatusCode};
///
/// let resp = Response::ok()
///     .with_header("Content-Type", "text/plain")
///     .body_text("hello");
/// assert_eq!(resp.status(), StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Body,
}

impl Response {
    /// Creates an empty response with the given status.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Body::Empty,
        }
    }

    /// Creates a 200 response.
    #[must_use]
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Creates the default 404 response.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND).body_text(StatusCode::NOT_FOUND.canonical_reason())
    }

    /// Creates the default 405 response with its `Allow` header.
    #[must_use]
    pub fn method_not_allowed(allow: &str) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED)
            .with_header("Allow", allow)
            .body_text(StatusCode::METHOD_NOT_ALLOWED.canonical_reason())
    }

    /// Creates a redirect response with a `Location` header.
    #[must_use]
    pub fn redirect(location: impl Into<String>, status: StatusCode) -> Self {
        Self::new(status).with_header("Location", location)
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a text body.
    #[must_use]
    pub fn body_text(mut self, text: impl Into<String>) -> Self {
        self.body = Body::Bytes(text.into().into_bytes());
        self
    }

    /// Sets a raw bytes body.
    #[must_use]
    pub fn body_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Bytes(bytes.into());
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns mutable headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Maps a file extension to a content type for static file serving.
#[must_use]
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location() {
        let resp = Response::redirect("/users/42", StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert!(resp.status().is_redirection());
        assert_eq!(resp.header("location"), Some("/users/42"));
        assert!(resp.body().is_empty());
    }

    #[test]
    fn method_not_allowed_carries_allow_header() {
        let resp = Response::method_not_allowed("GET, POST, OPTIONS");
        assert_eq!(resp.status().as_u16(), 405);
        assert_eq!(resp.header("Allow"), Some("GET, POST, OPTIONS"));
    }

    #[test]
    fn known_mime_types_resolve() {
        assert_eq!(mime_type_for_extension("css"), "text/css; charset=utf-8");
        assert_eq!(mime_type_for_extension("bin"), "application/octet-stream");
    }
}
