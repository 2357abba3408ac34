//! Lexical path normalization.

use std::borrow::Cow;

/// Returns the lexically shortest path equivalent to `path`.
///
/// The result always begins with `/`. Repeated slashes collapse, `.`
/// elements vanish, and `..` pops the preceding real segment (`..` at the
/// root is dropped, the result can never escape `/`). A trailing slash
/// survives normalization when the output is longer than `/`.
///
/// Already-clean input is returned borrowed, without allocating:
///
/// ```
/// use std::borrow::Cow;
/// use switchyard_router::clean_path;
///
/// assert_eq!(clean_path("/a//b/../c"), "/a/c");
/// assert!(matches!(clean_path("/a/b"), Cow::Borrowed(_)));
/// ```
#[must_use]
pub fn clean_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }

    let p = path.as_bytes();
    let n = p.len();

    // Output is input[..w] until the first divergence, at which point the
    // prefix is copied into `out` and writing continues there. `r` is the
    // next input byte to consider, `w` the output length so far.
    let mut out: Option<String> = None;
    let mut r = 1;
    let mut w = 1;

    if p[0] != b'/' {
        r = 0;
        let mut buf = String::with_capacity(n + 1);
        buf.push('/');
        out = Some(buf);
    }

    let mut trailing = n > 1 && p[n - 1] == b'/';

    while r < n {
        match p[r] {
            b'/' => {
                // empty segment
                r += 1;
            }
            b'.' if r + 1 == n => {
                trailing = true;
                r += 1;
            }
            b'.' if p[r + 1] == b'/' => {
                r += 2;
            }
            b'.' if p[r + 1] == b'.' && (r + 2 == n || p[r + 2] == b'/') => {
                r += 3;
                if w > 1 {
                    // pop the previous segment
                    w -= 1;
                    let written = out.as_ref().map_or(p, |s| s.as_bytes());
                    while w > 1 && written[w] != b'/' {
                        w -= 1;
                    }
                }
            }
            _ => {
                if w > 1 {
                    append(&mut out, path, w, "/");
                    w += 1;
                }
                let seg_start = r;
                while r < n && p[r] != b'/' {
                    r += 1;
                }
                append(&mut out, path, w, &path[seg_start..r]);
                w += r - seg_start;
            }
        }
    }

    if trailing && w > 1 {
        append(&mut out, path, w, "/");
        w += 1;
    }

    match out {
        None => Cow::Borrowed(&path[..w]),
        Some(mut buf) => {
            buf.truncate(w);
            Cow::Owned(buf)
        }
    }
}

/// Writes `part` at output position `w`, materializing the buffer only when
/// the output stops being a prefix of the input.
fn append(out: &mut Option<String>, src: &str, w: usize, part: &str) {
    if out.is_none() {
        if src.as_bytes()[w..].starts_with(part.as_bytes()) {
            return;
        }
        let mut buf = String::with_capacity(src.len() + 1);
        buf.push_str(&src[..w]);
        *out = Some(buf);
    }
    if let Some(buf) = out {
        buf.truncate(w);
        buf.push_str(part);
    }
}
