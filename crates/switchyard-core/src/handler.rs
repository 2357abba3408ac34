//! The handler abstraction invoked once routing has resolved a request.

use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

/// A request handler.
///
/// Handlers are plain synchronous functions from request to response; the
/// router stores one reference per registered pattern and invokes it after
/// publishing captured path parameters on the request.
///
/// Any `Fn(&mut Request) -> Response + Send + Sync` closure is a handler:
///
/// ```
/// use switchyard_core::{Handler, Method, Request, Response};
///
/// let hello = |_req: &mut Request| Response::ok().body_text("hello");
/// let mut req = Request::new(Method::Get, "/");
/// assert_eq!(hello.call(&mut req).status().as_u16(), 200);
/// ```
pub trait Handler: Send + Sync {
    /// Produce the response for a routed request.
    fn call(&self, req: &mut Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&mut Request) -> Response + Send + Sync,
{
    fn call(&self, req: &mut Request) -> Response {
        self(req)
    }
}

/// An owned, dynamically typed handler.
pub type BoxHandler = Box<dyn Handler>;

/// A shared, dynamically typed handler, cloneable across registrations.
pub type SharedHandler = Arc<dyn Handler>;

impl Handler for BoxHandler {
    fn call(&self, req: &mut Request) -> Response {
        (**self).call(req)
    }
}

impl Handler for SharedHandler {
    fn call(&self, req: &mut Request) -> Response {
        (**self).call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn boxed_and_shared_handlers_delegate() {
        let boxed: BoxHandler = Box::new(|_req: &mut Request| Response::ok());
        let shared: SharedHandler = Arc::new(|_req: &mut Request| Response::not_found());

        let mut req = Request::new(Method::Get, "/");
        assert_eq!(boxed.call(&mut req).status().as_u16(), 200);
        assert_eq!(shared.call(&mut req).status().as_u16(), 404);
        assert_eq!(shared.clone().call(&mut req).status().as_u16(), 404);
    }
}
