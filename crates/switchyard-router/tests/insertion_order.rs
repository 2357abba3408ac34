//! The observable routing function must not depend on the order in which
//! non-conflicting patterns were registered.

use switchyard_core::Method;
use switchyard_router::Router;

const PATTERNS: [&str; 6] = [
    "/",
    "/users/:id",
    "/users/:id/posts",
    "/files/*rest",
    "/about",
    "/user_:name",
];

const PROBES: [&str; 13] = [
    "/",
    "/users/7",
    "/users/7/posts",
    "/users/7/",
    "/users",
    "/user_bob",
    "/files",
    "/files/",
    "/files/a/b.txt",
    "/about",
    "/about/",
    "/nope",
    "/users/7/posts/extra",
];

fn build(order: &[&'static str]) -> Router<&'static str> {
    let mut router = Router::new();
    for &pattern in order {
        router
            .get(pattern, pattern)
            .unwrap_or_else(|e| panic!("register {pattern}: {e}"));
    }
    router
}

#[derive(Debug, PartialEq)]
struct Observation {
    matched: Option<&'static str>,
    params: Vec<(String, String)>,
    tsr: bool,
}

fn observe(router: &Router<&'static str>, path: &str) -> Observation {
    let lookup = router.lookup(Method::Get, path);
    Observation {
        matched: lookup.handler.copied(),
        params: lookup
            .params
            .iter()
            .map(|(n, v)| (n.to_owned(), v.to_owned()))
            .collect(),
        tsr: lookup.tsr,
    }
}

/// Substitutes captured parameters back into a pattern.
fn reconstruct(pattern: &str, params: &[(String, String)]) -> String {
    let mut out = String::new();
    let mut rest = pattern;
    while let Some(pos) = rest.find([':', '*']) {
        let sigil = rest.as_bytes()[pos];
        // A catch-all's value subsumes its leading '/'.
        let keep = if sigil == b'*' { pos - 1 } else { pos };
        out.push_str(&rest[..keep]);
        let end = rest[pos..]
            .find('/')
            .map_or(rest.len(), |off| pos + off);
        let name = &rest[pos + 1..end];
        let value = params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing param {name} for {pattern}"));
        out.push_str(value);
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        for i in 0..k {
            heap(k - 1, items, out);
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
        }
    }
    let mut work = items.to_vec();
    let mut out = Vec::new();
    heap(work.len(), &mut work, &mut out);
    out
}

#[test]
fn lookups_are_insertion_order_independent() {
    let baseline = build(&PATTERNS);
    let expected: Vec<Observation> = PROBES.iter().map(|p| observe(&baseline, p)).collect();

    for order in permutations(&PATTERNS) {
        let router = build(&order);
        for (probe, want) in PROBES.iter().zip(&expected) {
            let got = observe(&router, probe);
            assert_eq!(&got, want, "probe {probe} with order {order:?}");
        }
    }
}

#[test]
fn registered_routes_are_order_independent() {
    let baseline = build(&PATTERNS).routes();
    for order in permutations(&PATTERNS) {
        assert_eq!(build(&order).routes(), baseline, "order {order:?}");
    }
}

#[test]
fn captured_params_reconstruct_the_request_path() {
    let router = build(&PATTERNS);
    for probe in PROBES {
        let observation = observe(&router, probe);
        if let Some(pattern) = observation.matched {
            assert_eq!(
                reconstruct(pattern, &observation.params),
                probe,
                "pattern {pattern}"
            );
        }
    }
}
