//! The compressed-trie node and its three walks: insertion, lookup, and
//! case-insensitive repair.
//!
//! Edge labels are byte vectors rather than strings: a longest-common-prefix
//! split may land inside a multi-byte UTF-8 sequence, and only the
//! concatenation of labels along a full root-to-handler walk is guaranteed
//! to be a valid registered pattern. Captured values are revalidated with
//! [`std::str::from_utf8`] at segment boundaries.

use crate::r#match::{Lookup, Params};

/// Errors detected while registering a route pattern.
///
/// These are configuration errors: they surface during application startup
/// and never during request dispatch. A failed insertion may leave the tree
/// consistent but partially updated; callers are expected to treat any
/// `RouteError` as fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Patterns are absolute; anything else is a programming error.
    #[error("route pattern must begin with '/': '{0}'")]
    MissingLeadingSlash(String),
    /// The exact pattern was registered twice.
    #[error("a handler is already registered for '{0}'")]
    DuplicateRoute(String),
    /// The new pattern diverges inside an existing wildcard segment.
    #[error("'{segment}' in new pattern '{pattern}' conflicts with existing wildcard prefix '{prefix}'")]
    ConflictingWildcard {
        /// The offending segment of the new pattern.
        segment: String,
        /// The full new pattern.
        pattern: String,
        /// The registered prefix it collides with, wildcard included.
        prefix: String,
    },
    /// A wildcard would shadow already-registered static children.
    #[error("wildcard segment '{segment}' in '{pattern}' conflicts with existing children")]
    WildcardConflict {
        /// The offending wildcard segment.
        segment: String,
        /// The full new pattern.
        pattern: String,
    },
    /// `:` or `*` must be followed by a name.
    #[error("wildcards must be named with a non-empty name in '{0}'")]
    UnnamedWildcard(String),
    /// A segment may contain at most one wildcard.
    #[error("only one wildcard per path segment is allowed in '{0}'")]
    DoubledWildcard(String),
    /// `*name` must be the final segment of its pattern.
    #[error("catch-all segments are only allowed at the end of '{0}'")]
    CatchAllNotLast(String),
    /// The catch-all's parent segment already has a handler.
    #[error("catch-all conflicts with the existing handler for the path segment root in '{0}'")]
    CatchAllRootConflict(String),
    /// A catch-all must sit right after a `/`.
    #[error("a catch-all segment must be preceded by '/' in '{0}'")]
    CatchAllWithoutSlash(String),
    /// Static file patterns must capture the file path.
    #[error("static file pattern must end with '/*filepath': '{0}'")]
    InvalidFilePattern(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Static,
    Root,
    Param,
    CatchAll,
}

/// One node of the radix tree.
#[derive(Debug)]
pub(crate) struct Node<T> {
    path: Vec<u8>,
    indices: Vec<u8>,
    children: Vec<Node<T>>,
    kind: NodeKind,
    wild_child: bool,
    max_params: usize,
    priority: u32,
    handler: Option<T>,
}

impl<T> Node<T> {
    fn new(kind: NodeKind) -> Self {
        Self {
            path: Vec::new(),
            indices: Vec::new(),
            children: Vec::new(),
            kind,
            wild_child: false,
            max_params: 0,
            priority: 0,
            handler: None,
        }
    }

    /// Creates an empty tree root.
    pub(crate) fn new_root() -> Self {
        Self::new(NodeKind::Root)
    }

    /// Inserts `pattern`, growing the tree by the minimal number of nodes.
    pub(crate) fn add_route(&mut self, pattern: &str, handler: T) -> Result<(), RouteError> {
        let full = pattern;
        let mut path: &[u8] = pattern.as_bytes();
        let mut num_params = count_wildcards(path);

        self.priority += 1;

        // Empty tree: install the pattern as a fresh chain.
        if self.path.is_empty() && self.children.is_empty() {
            return self.insert_child(path, full, handler);
        }

        let mut n: &mut Node<T> = self;
        loop {
            if num_params > n.max_params {
                n.max_params = num_params;
            }

            // Longest common prefix; the existing label contains no
            // wildcard bytes, so the prefix is purely static.
            let max = n.path.len().min(path.len());
            let mut i = 0;
            while i < max && path[i] == n.path[i] {
                i += 1;
            }

            // Split the edge: the old tail moves into a new child.
            if i < n.path.len() {
                let mut child = Node::new(NodeKind::Static);
                child.path = n.path[i..].to_vec();
                child.wild_child = n.wild_child;
                child.indices = std::mem::take(&mut n.indices);
                child.children = std::mem::take(&mut n.children);
                child.handler = n.handler.take();
                child.priority = n.priority - 1;
                child.max_params = child
                    .children
                    .iter()
                    .map(|c| c.max_params)
                    .max()
                    .unwrap_or(0);

                n.indices = vec![n.path[i]];
                n.path.truncate(i);
                n.children = vec![child];
                n.wild_child = false;
            }

            // The whole pattern is consumed: this node is the route.
            if i == path.len() {
                if n.handler.is_some() {
                    return Err(RouteError::DuplicateRoute(full.to_owned()));
                }
                n.handler = Some(handler);
                return Ok(());
            }

            path = &path[i..];

            if n.wild_child {
                n = &mut n.children[0];
                n.priority += 1;
                if num_params > n.max_params {
                    n.max_params = num_params;
                }
                num_params = num_params.saturating_sub(1);

                // The remaining pattern must restate the wildcard exactly.
                if path.len() >= n.path.len()
                    && path[..n.path.len()] == n.path[..]
                    && (n.path.len() >= path.len() || path[n.path.len()] == b'/')
                {
                    continue;
                }

                let segment = if n.kind == NodeKind::CatchAll {
                    lossy(path)
                } else {
                    lossy(path.split(|&b| b == b'/').next().unwrap_or(path))
                };
                let existing = lossy(&n.path);
                let prefix = full
                    .find(segment.as_str())
                    .map_or_else(|| existing.clone(), |pos| format!("{}{existing}", &full[..pos]));
                return Err(RouteError::ConflictingWildcard {
                    segment,
                    pattern: full.to_owned(),
                    prefix,
                });
            }

            let c = path[0];

            // Slash after a parameter segment.
            if n.kind == NodeKind::Param && c == b'/' && n.children.len() == 1 {
                n = &mut n.children[0];
                n.priority += 1;
                continue;
            }

            // Descend into an existing static child.
            if let Some(pos) = n.indices.iter().position(|&b| b == c) {
                let pos = n.increment_child_prio(pos);
                n = &mut n.children[pos];
                continue;
            }

            // Append a fresh static child for the remaining suffix.
            if c != b':' && c != b'*' {
                n.indices.push(c);
                let mut child = Node::new(NodeKind::Static);
                child.max_params = num_params;
                n.children.push(child);
                let pos = n.increment_child_prio(n.indices.len() - 1);
                n = &mut n.children[pos];
            }
            return n.insert_child(path, full, handler);
        }
    }

    /// Bumps the priority of the child at `pos` and bubbles it forward,
    /// keeping `children` and `indices` in lockstep. Returns the child's
    /// new position.
    fn increment_child_prio(&mut self, pos: usize) -> usize {
        self.children[pos].priority += 1;
        let prio = self.children[pos].priority;

        let mut new_pos = pos;
        while new_pos > 0 && self.children[new_pos - 1].priority < prio {
            self.children.swap(new_pos - 1, new_pos);
            new_pos -= 1;
        }
        if new_pos != pos {
            let idx = self.indices.remove(pos);
            self.indices.insert(new_pos, idx);
        }
        new_pos
    }

    /// Installs the pattern suffix below `self`, creating the static /
    /// parameter / catch-all chain it demands.
    fn insert_child(&mut self, path: &[u8], full: &str, handler: T) -> Result<(), RouteError> {
        let Some((start, end)) = find_wildcard(path) else {
            // No wildcard left: the suffix is this node's label.
            self.path = path.to_vec();
            self.handler = Some(handler);
            return Ok(());
        };

        if path[start + 1..end]
            .iter()
            .any(|&b| b == b':' || b == b'*')
        {
            return Err(RouteError::DoubledWildcard(full.to_owned()));
        }
        if end - start < 2 {
            return Err(RouteError::UnnamedWildcard(full.to_owned()));
        }
        if !self.children.is_empty() {
            return Err(RouteError::WildcardConflict {
                segment: lossy(&path[start..end]),
                pattern: full.to_owned(),
            });
        }

        let num_params = count_wildcards(&path[start..]);

        if path[start] == b':' {
            if start > 0 {
                self.path = path[..start].to_vec();
            }
            self.wild_child = true;

            let mut child = Node::new(NodeKind::Param);
            child.path = path[start..end].to_vec();
            child.max_params = num_params;
            child.priority = 1;

            if end < path.len() {
                // The pattern continues after the parameter segment.
                let mut grandchild = Node::new(NodeKind::Static);
                grandchild.max_params = num_params - 1;
                grandchild.priority = 1;
                grandchild.insert_child(&path[end..], full, handler)?;
                child.children.push(grandchild);
            } else {
                child.handler = Some(handler);
            }
            self.children.push(child);
            return Ok(());
        }

        // Catch-all.
        if end < path.len() {
            return Err(RouteError::CatchAllNotLast(full.to_owned()));
        }
        if self.path.last() == Some(&b'/') {
            return Err(RouteError::CatchAllRootConflict(full.to_owned()));
        }
        if start == 0 || path[start - 1] != b'/' {
            return Err(RouteError::CatchAllWithoutSlash(full.to_owned()));
        }
        let slash = start - 1;
        self.path = path[..slash].to_vec();

        // Two nodes: an empty-label wrapper indexed under '/', and the
        // `/*name` leaf holding the handler.
        let mut leaf = Node::new(NodeKind::CatchAll);
        leaf.path = path[slash..].to_vec();
        leaf.max_params = 1;
        leaf.priority = 1;
        leaf.handler = Some(handler);

        let mut wrapper = Node::new(NodeKind::CatchAll);
        wrapper.wild_child = true;
        wrapper.max_params = 1;
        wrapper.priority = 1;
        wrapper.children.push(leaf);

        self.children.push(wrapper);
        self.indices = vec![b'/'];
        Ok(())
    }

    /// Looks up `full_path`, returning the handler, captured parameters,
    /// and the trailing-slash recommendation.
    pub(crate) fn get_value<'a>(&'a self, full_path: &'a str) -> Lookup<'a, T> {
        let mut n = self;
        let mut path: &[u8] = full_path.as_bytes();
        let mut params = Params::new();

        loop {
            if path.len() > n.path.len() {
                if path[..n.path.len()] == n.path[..] {
                    path = &path[n.path.len()..];

                    if !n.wild_child {
                        let c = path[0];
                        if let Some(pos) = n.indices.iter().position(|&b| b == c) {
                            n = &n.children[pos];
                            continue;
                        }

                        // Dead end; a leaf without the trailing slash may
                        // still exist.
                        let tsr = path == b"/" && n.handler.is_some();
                        return Lookup::miss(tsr);
                    }

                    n = &n.children[0];
                    match n.kind {
                        NodeKind::Param => {
                            let end = path
                                .iter()
                                .position(|&b| b == b'/')
                                .unwrap_or(path.len());
                            if end == 0 {
                                // A parameter never captures the empty
                                // string.
                                return Lookup::miss(path == b"/");
                            }

                            if params.is_empty() {
                                params = Params::with_capacity(n.max_params);
                            }
                            params.push(
                                wildcard_name(&n.path[1..]),
                                std::str::from_utf8(&path[..end]).unwrap_or(""),
                            );

                            if end < path.len() {
                                if !n.children.is_empty() {
                                    path = &path[end..];
                                    n = &n.children[0];
                                    continue;
                                }
                                let tsr = path.len() == end + 1;
                                return Lookup::miss(tsr);
                            }

                            if let Some(handler) = n.handler.as_ref() {
                                return Lookup {
                                    handler: Some(handler),
                                    params,
                                    tsr: false,
                                };
                            }
                            if n.children.len() == 1 {
                                let child = &n.children[0];
                                let tsr = child.path == b"/" && child.handler.is_some();
                                return Lookup::miss(tsr);
                            }
                            return Lookup::miss(false);
                        }
                        NodeKind::CatchAll => {
                            if params.is_empty() {
                                params = Params::with_capacity(n.max_params);
                            }
                            params.push(
                                wildcard_name(&n.path[2..]),
                                std::str::from_utf8(path).unwrap_or(""),
                            );
                            return match n.handler.as_ref() {
                                Some(handler) => Lookup {
                                    handler: Some(handler),
                                    params,
                                    tsr: false,
                                },
                                None => Lookup::miss(false),
                            };
                        }
                        _ => return Lookup::miss(false),
                    }
                }
            } else if path == &n.path[..] {
                if let Some(handler) = n.handler.as_ref() {
                    return Lookup {
                        handler: Some(handler),
                        params,
                        tsr: false,
                    };
                }

                if path == b"/" && n.wild_child && n.kind != NodeKind::Root {
                    return Lookup::miss(true);
                }

                // A '/' child carrying a handler makes the slashed form of
                // this path a hit.
                if let Some(pos) = n.indices.iter().position(|&b| b == b'/') {
                    let child = &n.children[pos];
                    let tsr = (child.path.len() == 1 && child.handler.is_some())
                        || (child.kind == NodeKind::CatchAll
                            && child.children.first().is_some_and(|c| c.handler.is_some()));
                    return Lookup::miss(tsr);
                }
                return Lookup::miss(false);
            }

            // No match; recommend the slashed form when a leaf exists there.
            let tsr = path == b"/"
                || (n.path.len() == path.len() + 1
                    && n.path[path.len()] == b'/'
                    && path[..] == n.path[..path.len()]
                    && n.handler.is_some());
            return Lookup::miss(tsr);
        }
    }

    /// Finds the registered spelling of `path` under ASCII case folding.
    ///
    /// Non-ASCII bytes must match exactly; parameter and catch-all values
    /// are copied verbatim. With `fix_trailing_slash`, a path off by one
    /// terminal `/` is accepted and the returned spelling reflects the
    /// tree's form. Any returned path is guaranteed to look up to a
    /// handler.
    pub(crate) fn find_case_insensitive_path(
        &self,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<String> {
        let mut out = Vec::with_capacity(path.len() + 1);
        if self.case_insensitive_walk(path.as_bytes(), fix_trailing_slash, &mut out) {
            String::from_utf8(out).ok()
        } else {
            None
        }
    }

    /// Depth-first walk accumulating the canonical spelling in `out`.
    /// Backtracking truncates `out` to the caller's mark.
    fn case_insensitive_walk(
        &self,
        path: &[u8],
        fix_trailing_slash: bool,
        out: &mut Vec<u8>,
    ) -> bool {
        let mut n = self;
        let mut path = path;

        loop {
            if path.len() >= n.path.len()
                && path[..n.path.len()].eq_ignore_ascii_case(&n.path)
            {
                path = &path[n.path.len()..];
                out.extend_from_slice(&n.path);

                if path.is_empty() {
                    if n.handler.is_some() {
                        return true;
                    }
                    // The slashed form may be registered instead.
                    if fix_trailing_slash {
                        if let Some(pos) = n.indices.iter().position(|&b| b == b'/') {
                            let child = &n.children[pos];
                            if (child.path.len() == 1 && child.handler.is_some())
                                || (child.kind == NodeKind::CatchAll
                                    && child
                                        .children
                                        .first()
                                        .is_some_and(|c| c.handler.is_some()))
                            {
                                out.push(b'/');
                                return true;
                            }
                        }
                    }
                    return false;
                }

                if !n.wild_child {
                    // Both the registered byte and its case sibling may be
                    // children; try every candidate and backtrack.
                    let c = path[0].to_ascii_lowercase();
                    for (pos, &idx) in n.indices.iter().enumerate() {
                        if idx.to_ascii_lowercase() == c {
                            let mark = out.len();
                            if n.children[pos].case_insensitive_walk(
                                path,
                                fix_trailing_slash,
                                out,
                            ) {
                                return true;
                            }
                            out.truncate(mark);
                        }
                    }

                    // Nothing matched; the unslashed form may exist.
                    return fix_trailing_slash && path == b"/" && n.handler.is_some();
                }

                n = &n.children[0];
                match n.kind {
                    NodeKind::Param => {
                        let end = path
                            .iter()
                            .position(|&b| b == b'/')
                            .unwrap_or(path.len());
                        if end == 0 {
                            // A parameter never captures the empty string,
                            // so no repair exists down this edge.
                            return false;
                        }
                        out.extend_from_slice(&path[..end]);

                        if end < path.len() {
                            if !n.children.is_empty() {
                                let rest = &path[end..];
                                let mark = out.len();
                                if n.children[0].case_insensitive_walk(
                                    rest,
                                    fix_trailing_slash,
                                    out,
                                ) {
                                    return true;
                                }
                                out.truncate(mark);
                                // Only an extra trailing slash can still be
                                // repaired, and only against a real route.
                                return fix_trailing_slash
                                    && rest == b"/"
                                    && n.handler.is_some();
                            }
                            return fix_trailing_slash && path.len() == end + 1;
                        }

                        if n.handler.is_some() {
                            return true;
                        }
                        if fix_trailing_slash && n.children.len() == 1 {
                            let child = &n.children[0];
                            if child.path == b"/" && child.handler.is_some() {
                                out.push(b'/');
                                return true;
                            }
                        }
                        return false;
                    }
                    NodeKind::CatchAll => {
                        out.extend_from_slice(path);
                        return true;
                    }
                    _ => return false,
                }
            }

            // Prefix mismatch: only a missing trailing slash is repairable.
            if fix_trailing_slash
                && n.path.len() == path.len() + 1
                && n.path[path.len()] == b'/'
                && path.eq_ignore_ascii_case(&n.path[..path.len()])
                && n.handler.is_some()
            {
                out.extend_from_slice(&n.path);
                return true;
            }
            return false;
        }
    }

    /// Reconstructs every registered pattern below this node.
    pub(crate) fn collect_patterns(&self, prefix: &mut Vec<u8>, out: &mut Vec<String>) {
        let mark = prefix.len();
        prefix.extend_from_slice(&self.path);
        if self.handler.is_some() {
            out.push(lossy(prefix));
        }
        for child in &self.children {
            child.collect_patterns(prefix, out);
        }
        prefix.truncate(mark);
    }
}

/// First wildcard of the pattern suffix: `(start, end)` where `start`
/// points at the sigil and `end` at the next `/` or the end.
fn find_wildcard(path: &[u8]) -> Option<(usize, usize)> {
    let start = path.iter().position(|&b| b == b':' || b == b'*')?;
    let mut end = start + 1;
    while end < path.len() && path[end] != b'/' {
        end += 1;
    }
    Some((start, end))
}

fn count_wildcards(path: &[u8]) -> usize {
    path.iter().filter(|&&b| b == b':' || b == b'*').count()
}

fn wildcard_name(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap_or("")
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestTree = Node<String>;

    fn tree(patterns: &[&str]) -> TestTree {
        let mut root = TestTree::new_root();
        for pattern in patterns {
            root.add_route(pattern, (*pattern).to_owned())
                .unwrap_or_else(|e| panic!("insert {pattern}: {e}"));
        }
        check_invariants(&root);
        check_priorities(&root);
        root
    }

    /// priority must equal the number of routes reachable through the node.
    fn check_priorities(n: &TestTree) -> u32 {
        let expected: u32 = n.children.iter().map(check_priorities).sum::<u32>()
            + u32::from(n.handler.is_some());
        assert_eq!(
            n.priority,
            expected,
            "priority mismatch at {:?}",
            lossy(&n.path)
        );
        expected
    }

    fn check_invariants(n: &TestTree) {
        if n.wild_child {
            assert_eq!(n.children.len(), 1, "wild child must be sole child");
            assert!(n.indices.is_empty(), "wild nodes carry no indices");
            assert!(matches!(
                n.children[0].kind,
                NodeKind::Param | NodeKind::CatchAll
            ));
        } else if n.kind == NodeKind::Param {
            // A parameter's continuation child is reached through the
            // dedicated slash shortcut, not the indices table, so the
            // indices/children alignment rule does not apply here.
            assert!(
                n.children.len() <= 1,
                "parameter nodes have at most one continuation child"
            );
        } else {
            assert_eq!(
                n.indices.len(),
                n.children.len(),
                "indices and children misaligned at {:?}",
                lossy(&n.path)
            );
            for (pos, child) in n.children.iter().enumerate() {
                // The catch-all wrapper is indexed under '/' with an empty
                // label; every other child leads with its index byte.
                if !child.path.is_empty() {
                    assert_eq!(n.indices[pos], child.path[0]);
                } else {
                    assert_eq!(child.kind, NodeKind::CatchAll);
                }
                if pos > 0 {
                    assert!(
                        n.children[pos - 1].priority >= child.priority,
                        "children not priority-ordered at {:?}",
                        lossy(&n.path)
                    );
                }
            }
            let mut seen = n.indices.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), n.indices.len(), "duplicate index byte");
        }
        match n.kind {
            NodeKind::Param => {
                assert_eq!(n.path.first(), Some(&b':'));
                assert!(!n.path.contains(&b'/'));
            }
            NodeKind::CatchAll => {
                assert!(n.path.is_empty() || n.path.starts_with(b"/*"));
            }
            _ => {}
        }
        for child in &n.children {
            check_invariants(child);
        }
    }

    struct Want<'a> {
        path: &'a str,
        matched: Option<&'a str>,
        params: &'a [(&'a str, &'a str)],
        tsr: bool,
    }

    fn check_requests(root: &TestTree, wants: &[Want<'_>]) {
        for want in wants {
            let lookup = root.get_value(want.path);
            match want.matched {
                Some(pattern) => {
                    assert_eq!(
                        lookup.handler.map(String::as_str),
                        Some(pattern),
                        "path {}",
                        want.path
                    );
                    let got: Vec<_> = lookup.params.iter().collect();
                    assert_eq!(got, want.params, "params for {}", want.path);
                }
                None => {
                    assert!(lookup.handler.is_none(), "path {}", want.path);
                    assert_eq!(lookup.tsr, want.tsr, "tsr for {}", want.path);
                }
            }
        }
    }

    // ========================================================================
    // Insertion and lookup
    // ========================================================================

    #[test]
    fn static_routes() {
        let root = tree(&[
            "/hi",
            "/contact",
            "/co",
            "/c",
            "/a",
            "/ab",
            "/doc/",
            "/doc/code_faq.html",
            "/doc/code1.html",
            "/\u{3b1}",
            "/\u{3b2}",
        ]);

        check_requests(
            &root,
            &[
                Want { path: "/a", matched: Some("/a"), params: &[], tsr: false },
                Want { path: "/", matched: None, params: &[], tsr: false },
                Want { path: "/hi", matched: Some("/hi"), params: &[], tsr: false },
                Want { path: "/contact", matched: Some("/contact"), params: &[], tsr: false },
                Want { path: "/co", matched: Some("/co"), params: &[], tsr: false },
                Want { path: "/con", matched: None, params: &[], tsr: false },
                Want { path: "/cona", matched: None, params: &[], tsr: false },
                Want { path: "/no", matched: None, params: &[], tsr: false },
                Want { path: "/ab", matched: Some("/ab"), params: &[], tsr: false },
                Want { path: "/\u{3b1}", matched: Some("/\u{3b1}"), params: &[], tsr: false },
                Want { path: "/\u{3b2}", matched: Some("/\u{3b2}"), params: &[], tsr: false },
            ],
        );
    }

    #[test]
    fn wildcard_routes() {
        let root = tree(&[
            "/",
            "/cmd/:tool/:sub",
            "/cmd/:tool/",
            "/src/*filepath",
            "/search/",
            "/search/:query",
            "/user_:name",
            "/user_:name/about",
            "/files/:dir/*filepath",
            "/info/:user/public",
            "/info/:user/project/:project",
        ]);

        check_requests(
            &root,
            &[
                Want { path: "/", matched: Some("/"), params: &[], tsr: false },
                Want {
                    path: "/cmd/test/",
                    matched: Some("/cmd/:tool/"),
                    params: &[("tool", "test")],
                    tsr: false,
                },
                Want { path: "/cmd/test", matched: None, params: &[], tsr: true },
                Want {
                    path: "/cmd/test/3",
                    matched: Some("/cmd/:tool/:sub"),
                    params: &[("tool", "test"), ("sub", "3")],
                    tsr: false,
                },
                Want {
                    path: "/src/",
                    matched: Some("/src/*filepath"),
                    params: &[("filepath", "/")],
                    tsr: false,
                },
                Want {
                    path: "/src/some/file.png",
                    matched: Some("/src/*filepath"),
                    params: &[("filepath", "/some/file.png")],
                    tsr: false,
                },
                Want { path: "/search/", matched: Some("/search/"), params: &[], tsr: false },
                Want {
                    path: "/search/someth!ng+in+\u{fc}n\u{ec}c\u{f6}d\u{e9}",
                    matched: Some("/search/:query"),
                    params: &[("query", "someth!ng+in+\u{fc}n\u{ec}c\u{f6}d\u{e9}")],
                    tsr: false,
                },
                Want {
                    path: "/user_rustacean",
                    matched: Some("/user_:name"),
                    params: &[("name", "rustacean")],
                    tsr: false,
                },
                Want {
                    path: "/user_rustacean/about",
                    matched: Some("/user_:name/about"),
                    params: &[("name", "rustacean")],
                    tsr: false,
                },
                Want {
                    path: "/files/js/inc/framework.js",
                    matched: Some("/files/:dir/*filepath"),
                    params: &[("dir", "js"), ("filepath", "/inc/framework.js")],
                    tsr: false,
                },
                Want {
                    path: "/info/gordon/public",
                    matched: Some("/info/:user/public"),
                    params: &[("user", "gordon")],
                    tsr: false,
                },
                Want {
                    path: "/info/gordon/project/rust",
                    matched: Some("/info/:user/project/:project"),
                    params: &[("user", "gordon"), ("project", "rust")],
                    tsr: false,
                },
            ],
        );
    }

    #[test]
    fn empty_parameter_values_never_match() {
        let root = tree(&["/users/:id", "/a/:b/c"]);

        let lookup = root.get_value("/users//");
        assert!(lookup.handler.is_none());
        assert!(lookup.tsr, "removing the extra slash would match /users/:id");

        let lookup = root.get_value("/a//c");
        assert!(lookup.handler.is_none());
        assert!(!lookup.tsr);
    }

    // ========================================================================
    // Conflicts
    // ========================================================================

    fn conflicts(routes: &[(&str, bool)]) {
        let mut root = TestTree::new_root();
        for &(pattern, should_fail) in routes {
            let result = root.add_route(pattern, pattern.to_owned());
            assert_eq!(
                result.is_err(),
                should_fail,
                "insert {pattern}: {result:?}"
            );
        }
    }

    #[test]
    fn wildcard_conflicts_with_static() {
        conflicts(&[
            ("/cmd/:tool/:sub", false),
            ("/cmd/vet", true),
            ("/src/*filepath", false),
            ("/src/*filepathx", true),
            ("/src/", true),
            ("/src1/", false),
            ("/src1/*filepath", true),
            ("/src2*filepath", true),
            ("/search/:query", false),
            ("/search/invalid", true),
            ("/user_:name", false),
            ("/user_x", true),
            ("/id:id", false),
            ("/id/:id", true),
        ]);
    }

    #[test]
    fn static_conflicts_with_wildcard() {
        conflicts(&[
            ("/cmd/vet", false),
            ("/cmd/:tool/:sub", true),
            ("/src/AUTHORS", false),
            ("/src/*filepath", true),
            ("/user_x", false),
            ("/user_:name", true),
            ("/id/:id", false),
            ("/id:id", true),
            ("/:id", true),
            ("/*filepath", true),
        ]);
    }

    #[test]
    fn duplicate_patterns_are_rejected() {
        let mut root = TestTree::new_root();
        for pattern in ["/", "/doc/", "/src/*filepath", "/search/:query", "/user_:name"] {
            root.add_route(pattern, pattern.to_owned())
                .unwrap_or_else(|e| panic!("first insert {pattern}: {e}"));
            assert_eq!(
                root.add_route(pattern, pattern.to_owned()),
                Err(RouteError::DuplicateRoute(pattern.to_owned())),
            );
        }
    }

    #[test]
    fn wildcard_names_must_be_valid() {
        let mut root = TestTree::new_root();
        assert_eq!(
            root.add_route("/user:", "h".into()),
            Err(RouteError::UnnamedWildcard("/user:".to_owned()))
        );
        assert_eq!(
            root.add_route("/src/*", "h".into()),
            Err(RouteError::UnnamedWildcard("/src/*".to_owned()))
        );
        assert_eq!(
            root.add_route("/:foo:bar", "h".into()),
            Err(RouteError::DoubledWildcard("/:foo:bar".to_owned()))
        );
        assert_eq!(
            root.add_route("/:foo*bar", "h".into()),
            Err(RouteError::DoubledWildcard("/:foo*bar".to_owned()))
        );
    }

    #[test]
    fn catch_all_must_be_terminal() {
        let mut root = TestTree::new_root();
        assert_eq!(
            root.add_route("/src/*filepath/x", "h".into()),
            Err(RouteError::CatchAllNotLast("/src/*filepath/x".to_owned()))
        );
    }

    #[test]
    fn catch_all_conflicts_with_root_slash() {
        let mut root = TestTree::new_root();
        root.add_route("/", "root".into()).expect("insert /");
        assert_eq!(
            root.add_route("/*filepath", "h".into()),
            Err(RouteError::CatchAllRootConflict("/*filepath".to_owned()))
        );
    }

    // ========================================================================
    // Trailing-slash recommendation
    // ========================================================================

    #[test]
    fn trailing_slash_recommendations() {
        let root = tree(&[
            "/hi",
            "/b/",
            "/search/:query",
            "/cmd/:tool/",
            "/src/*filepath",
            "/x",
            "/x/y",
            "/y/",
            "/y/z",
            "/0/:id",
            "/0/:id/1",
            "/1/:id/",
            "/1/:id/2",
            "/aa",
            "/a/",
            "/admin",
            "/admin/:category",
            "/admin/:category/:page",
            "/doc",
            "/doc/code_faq.html",
            "/doc/code1.html",
            "/no/a",
            "/no/b",
            "/api/hello/:name",
        ]);

        let expect_tsr = [
            "/hi/", "/b", "/search/rustacean/", "/cmd/vet", "/src", "/x/", "/y",
            "/0/1/", "/1/1", "/a", "/admin/", "/admin/config/",
            "/admin/config/permissions/", "/doc/",
        ];
        for path in expect_tsr {
            let lookup = root.get_value(path);
            assert!(lookup.handler.is_none(), "path {path}");
            assert!(lookup.tsr, "expected tsr for {path}");
        }

        let expect_no_tsr = ["/", "/no", "/no/", "/_", "/_/", "/api/world/abc"];
        for path in expect_no_tsr {
            let lookup = root.get_value(path);
            assert!(lookup.handler.is_none(), "path {path}");
            assert!(!lookup.tsr, "unexpected tsr for {path}");
        }
    }

    #[test]
    fn root_never_recommends_trailing_slash() {
        let root = tree(&["/:test"]);
        let lookup = root.get_value("/");
        assert!(lookup.handler.is_none());
        assert!(!lookup.tsr);
    }

    #[test]
    fn catch_all_parent_redirects_to_slash() {
        let root = tree(&["/a/*rest"]);

        let lookup = root.get_value("/a");
        assert!(lookup.handler.is_none());
        assert!(lookup.tsr);

        let lookup = root.get_value("/a/");
        assert_eq!(lookup.handler.map(String::as_str), Some("/a/*rest"));
        assert_eq!(lookup.params.get("rest"), Some("/"));
    }

    #[test]
    fn root_only_matches_exactly() {
        let root = tree(&["/"]);
        assert!(root.get_value("/").handler.is_some());

        let lookup = root.get_value("/x");
        assert!(lookup.handler.is_none());
        assert!(!lookup.tsr);
    }

    // ========================================================================
    // Case-insensitive repair
    // ========================================================================

    #[test]
    fn case_insensitive_exact_length() {
        let patterns = [
            "/hi",
            "/b/",
            "/ABC/",
            "/search/:query",
            "/cmd/:tool/",
            "/src/*filepath",
            "/x",
            "/x/y",
            "/y/",
            "/y/z",
            "/doc",
            "/doc/code_faq.html",
            "/doc/code1.html",
        ];
        let root = tree(&patterns);

        // Registered spellings come back unchanged, with either flag.
        for fix in [true, false] {
            for pattern in patterns {
                let found = root.find_case_insensitive_path(pattern, fix);
                assert_eq!(found.as_deref(), Some(pattern), "fix={fix}");
            }
        }

        let cases = [
            ("/HI", Some("/hi")),
            ("/uSearch/QUery", None),
            ("/B/", Some("/b/")),
            ("/abc/", Some("/ABC/")),
            ("/aBc/", Some("/ABC/")),
            ("/SEARCH/QUERY", Some("/search/QUERY")),
            ("/CMD/TOOL/", Some("/cmd/TOOL/")),
            ("/SRC/FILE/PATH", Some("/src/FILE/PATH")),
            ("/X/Y", Some("/x/y")),
            ("/Y/Z", Some("/y/z")),
            ("/DOC", Some("/doc")),
            ("/DOC/CODE_FAQ.HTML", Some("/doc/code_faq.html")),
        ];
        for (input, expected) in cases {
            let found = root.find_case_insensitive_path(input, false);
            assert_eq!(found.as_deref(), expected, "input {input}");
        }
    }

    #[test]
    fn case_insensitive_with_trailing_slash_fix() {
        let root = tree(&["/hi", "/b/", "/users/:id", "/src/*filepath"]);

        let cases = [
            ("/HI/", Some("/hi")),
            ("/B", Some("/b/")),
            ("/USERS/42/", Some("/users/42")),
            ("/SRC", Some("/src/")),
        ];
        for (input, expected) in cases {
            let found = root.find_case_insensitive_path(input, true);
            assert_eq!(found.as_deref(), expected, "input {input}");
            // Without the fix these are misses.
            assert_eq!(root.find_case_insensitive_path(input, false), None);
        }
    }

    #[test]
    fn repaired_paths_always_resolve() {
        let root = tree(&[
            "/",
            "/hi",
            "/b/",
            "/users/:id",
            "/users/:id/posts",
            "/src/*filepath",
            "/doc/code1.html",
        ]);

        let probes = [
            "/HI", "/Hi/", "/B", "/b", "/USERS/7", "/USERS/7/", "/users/7/POSTS",
            "/users/7/posts/", "/SRC/a/B.TXT", "/DOC/CODE1.HTML", "/doc/CODE2.html",
            "/users/7/", "/users//posts",
        ];
        for probe in probes {
            for fix in [true, false] {
                if let Some(fixed) = root.find_case_insensitive_path(probe, fix) {
                    assert!(
                        root.get_value(&fixed).handler.is_some(),
                        "repair of {probe} (fix={fix}) gave unresolvable {fixed}"
                    );
                }
            }
        }
    }

    #[test]
    fn non_ascii_requires_exact_bytes() {
        let root = tree(&["/caf\u{e9}/menu"]);
        assert_eq!(
            root.find_case_insensitive_path("/CAF\u{c9}/menu", false),
            None,
            "no unicode folding"
        );
        assert_eq!(
            root.find_case_insensitive_path("/caf\u{e9}/MENU", false)
                .as_deref(),
            Some("/caf\u{e9}/menu")
        );
    }

    // ========================================================================
    // Structure
    // ========================================================================

    #[test]
    fn priorities_reorder_children_by_traffic() {
        let mut root = TestTree::new_root();
        for pattern in ["/a", "/b/x", "/b/y", "/b/z", "/c"] {
            root.add_route(pattern, pattern.to_owned()).expect("insert");
        }
        check_invariants(&root);
        check_priorities(&root);

        // The "/b/"-subtree carries three routes; its edge must be scanned
        // first.
        assert_eq!(root.indices.first(), Some(&b'b'));
    }

    #[test]
    fn patterns_reconstruct_from_the_tree() {
        let patterns = [
            "/",
            "/cmd/:tool/:sub",
            "/src/*filepath",
            "/user_:name",
            "/doc/code1.html",
        ];
        let root = tree(&patterns);

        let mut prefix = Vec::new();
        let mut collected = Vec::new();
        root.collect_patterns(&mut prefix, &mut collected);
        collected.sort();

        let mut expected: Vec<String> = patterns.iter().map(|p| (*p).to_owned()).collect();
        expected.sort();
        assert_eq!(collected, expected);
    }

    #[test]
    fn split_preserves_existing_routes() {
        // Each insertion splits or extends edges; earlier routes must keep
        // resolving after every step.
        let patterns = ["/contact", "/con", "/c", "/co", "/condor"];
        let mut root = TestTree::new_root();
        for (step, pattern) in patterns.iter().enumerate() {
            root.add_route(pattern, (*pattern).to_owned()).expect("insert");
            for earlier in &patterns[..=step] {
                assert_eq!(
                    root.get_value(earlier).handler.map(String::as_str),
                    Some(*earlier),
                    "after inserting {pattern}"
                );
            }
        }
        check_invariants(&root);
        check_priorities(&root);
    }
}
