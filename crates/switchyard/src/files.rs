//! Static file serving on top of the router's catch-all capture.

use std::fs;
use std::path::{Path, PathBuf};

use switchyard_core::{mime_type_for_extension, BoxHandler, Request, Response, StatusCode};
use switchyard_router::{clean_path, RouteError, Router};
use tracing::warn;

/// Serves files from `root` under a catch-all route.
///
/// `pattern` must end with `/*filepath`; the registered GET handler
/// rewrites the request path to the captured file path and serves the
/// matching file from `root`. The capture is lexically cleaned first, so
/// `..` segments cannot escape the root directory.
///
/// ```no_run
/// use switchyard::{serve_files, Router};
///
/// let mut router: Router = Router::new();
/// serve_files(&mut router, "/static/*filepath", "/var/www").expect("valid pattern");
/// ```
///
/// # Errors
///
/// Returns [`RouteError::InvalidFilePattern`] when the pattern does not end
/// with `/*filepath`, or any registration error from the underlying route.
pub fn serve_files(
    router: &mut Router<BoxHandler>,
    pattern: &str,
    root: impl Into<PathBuf>,
) -> Result<(), RouteError> {
    if !pattern.ends_with("/*filepath") {
        return Err(RouteError::InvalidFilePattern(pattern.to_owned()));
    }

    let root = root.into();
    router.get(
        pattern,
        Box::new(move |req: &mut Request| {
            let captured = req
                .path_params()
                .and_then(|params| params.get("filepath"))
                .unwrap_or("/")
                .to_owned();
            req.set_path(captured);
            respond_with_file(&root, req.path())
        }),
    )
}

fn respond_with_file(root: &Path, path: &str) -> Response {
    // Lexical cleaning resolves every ".." before the path touches the
    // filesystem.
    let cleaned = clean_path(path);
    let full = root.join(cleaned.trim_start_matches('/'));

    if !full.is_file() {
        return Response::not_found();
    }

    match fs::read(&full) {
        Ok(bytes) => {
            let mime = full
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or("application/octet-stream", mime_type_for_extension);
            Response::ok()
                .with_header("Content-Type", mime)
                .body_bytes(bytes)
        }
        Err(e) => {
            warn!(path = %full.display(), error = %e, "failed to read static file");
            Response::new(StatusCode::INTERNAL_SERVER_ERROR)
                .body_text(StatusCode::INTERNAL_SERVER_ERROR.canonical_reason())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_patterns_without_filepath_suffix() {
        let mut router: Router = Router::new();
        assert_eq!(
            serve_files(&mut router, "/static/", "/tmp"),
            Err(RouteError::InvalidFilePattern("/static/".to_owned()))
        );
        assert_eq!(
            serve_files(&mut router, "/static/*other", "/tmp"),
            Err(RouteError::InvalidFilePattern("/static/*other".to_owned()))
        );
        assert!(serve_files(&mut router, "/static/*filepath", "/tmp").is_ok());
    }

    #[test]
    fn missing_files_produce_404() {
        let resp = respond_with_file(Path::new("/nonexistent-root"), "/nothing.txt");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
