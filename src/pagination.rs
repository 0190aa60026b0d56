//! Cursor-based pagination, as advertised in the `Link` response header.

use reqwest::header::{HeaderMap, LINK};
use url::Url;

use crate::PaginationError;

/// Opaque cursors for the pages around the one just fetched.
///
/// An empty string means there is no page in that direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursors {
    pub first: String,
    pub prev: String,
    pub next: String,
}

impl Cursors {
    pub fn has_next(&self) -> bool {
        !self.next.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        !self.prev.is_empty()
    }
}

/// One page of a listing, along with the cursors for navigating from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursors: Cursors,
}

/// Extracts the `first`, `prev` and `next` cursors from the `Link` headers.
///
/// Link targets may be relative, in which case they are resolved against
/// `base`, the URL of the request.
///
/// # Errors
/// - `Header` if a `Link` header isn't valid UTF-8
/// - `Malformed` if an entry has no `<uri>` target
/// - `Url` if any of the linked URIs fails to parse
pub(crate) fn parse_cursors(headers: &HeaderMap, base: &Url) -> Result<Cursors, PaginationError> {
    let mut cursors = Cursors::default();

    for value in headers.get_all(LINK) {
        for (uri, rels) in parse_links(value.to_str()?)? {
            let uri = base.join(uri)?;
            let cursor = uri
                .query_pairs()
                .find(|(k, _)| k == "cursor")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();

            for rel in rels.split_whitespace() {
                match rel {
                    "first" => cursors.first = cursor.clone(),
                    "prev" => cursors.prev = cursor.clone(),
                    "next" => cursors.next = cursor.clone(),
                    _ => {}
                }
            }
        }
    }

    Ok(cursors)
}

/// Splits a `Link` header value into `(uri, rel)` pairs.
///
/// Entries without a `rel` parameter are yielded with an empty `rel`.
fn parse_links(value: &str) -> Result<Vec<(&str, &str)>, PaginationError> {
    let mut links = Vec::new();

    for entry in split_outside(value, ',') {
        if entry.trim().is_empty() {
            continue;
        }

        let mut params = split_outside(entry, ';').into_iter();
        let uri = params
            .next()
            .map(str::trim)
            .and_then(|target| target.strip_prefix('<'))
            .and_then(|target| target.strip_suffix('>'))
            .ok_or_else(|| PaginationError::Malformed(entry.trim().to_string()))?;

        let rel = params
            .filter_map(|p| p.split_once('='))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("rel"))
            .map_or("", |(_, v)| v.trim().trim_matches('"'));

        links.push((uri, rel));
    }

    Ok(links)
}

/// Splits `s` at every `sep` outside of quoted strings and `<...>` targets.
fn split_outside(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    let mut in_target = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' if !in_target => quoted = !quoted,
            '<' if !quoted => in_target = true,
            '>' if !quoted => in_target = false,
            c if c == sep && !quoted && !in_target => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);

    parts
}
