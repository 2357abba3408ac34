//! Getting Started Example
//!
//! Builds a small router and walks through matching, parameters,
//! redirects, and method handling.
//!
//! Run with: cargo run --example getting_started -p switchyard

use switchyard::prelude::*;

fn main() {
    println!("switchyard routing walkthrough\n");

    let mut router: Router = Router::new();
    router
        .get(
            "/",
            Box::new(|_req: &mut Request| Response::ok().body_text("Welcome!")),
        )
        .expect("register /");
    router
        .get(
            "/hello/:name",
            Box::new(|req: &mut Request| {
                let name = req
                    .path_params()
                    .and_then(|p| p.get("name"))
                    .unwrap_or("world");
                Response::ok().body_text(format!("hello, {name}!"))
            }),
        )
        .expect("register /hello/:name");
    router
        .get(
            "/files/*filepath",
            Box::new(|req: &mut Request| {
                let file = req
                    .path_params()
                    .and_then(|p| p.get("filepath"))
                    .unwrap_or("/");
                Response::ok().body_text(format!("would serve {file}"))
            }),
        )
        .expect("register /files/*filepath");

    // === Registered routes ===
    println!("1. Registered routes:");
    for (method, pattern) in router.routes() {
        println!("   {method} {pattern}");
    }

    // === Exact matches and parameters ===
    println!("\n2. Matching:");
    let mut req = Request::new(Method::Get, "/hello/ferris");
    let resp = router.serve(&mut req);
    println!("   GET /hello/ferris -> {}", resp.status());
    assert_eq!(resp.status(), StatusCode::OK);

    // === Trailing-slash redirect ===
    println!("\n3. Trailing-slash redirect:");
    let mut req = Request::new(Method::Get, "/hello/ferris/");
    let resp = router.serve(&mut req);
    println!(
        "   GET /hello/ferris/ -> {} (Location: {})",
        resp.status(),
        resp.header("Location").unwrap_or("-")
    );
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);

    // === Case-insensitive repair ===
    println!("\n4. Fixed-path redirect:");
    let mut req = Request::new(Method::Get, "/HELLO/ferris");
    let resp = router.serve(&mut req);
    println!(
        "   GET /HELLO/ferris -> {} (Location: {})",
        resp.status(),
        resp.header("Location").unwrap_or("-")
    );
    assert_eq!(resp.header("Location"), Some("/hello/ferris"));

    // === Method not allowed ===
    println!("\n5. Method handling:");
    let mut req = Request::new(Method::Delete, "/hello/ferris");
    let resp = router.serve(&mut req);
    println!(
        "   DELETE /hello/ferris -> {} (Allow: {})",
        resp.status(),
        resp.header("Allow").unwrap_or("-")
    );
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    println!("\nAll routing examples behaved as expected!");
}
