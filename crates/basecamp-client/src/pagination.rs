//! Exhaustive page collection under the API's two pagination contracts.
//!
//! Basecamp paginates inconsistently: most listing endpoints advertise
//! the next page through a `Link` header, but a handful of
//! bucket-scoped endpoints send no header at all and must be walked by
//! incrementing a `page` query parameter until a short page arrives.
//! Which contract applies is fixed per endpoint ([`PaginationContract`])
//! and is never detected at runtime — the two termination rules are not
//! interchangeable.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::BasecampClient;
use crate::error::BasecampResult;

/// Fixed page size of the API's counter-paginated listing endpoints.
pub const PAGE_SIZE: usize = 50;

/// How a listing endpoint paginates. Recorded per endpoint in the
/// dispatch table; never inferred from responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationContract {
    /// `Link: <url>; rel="next"` header carries the next page URL.
    LinkHeader,
    /// Implicit 50-item pages signalled only by a short final page.
    PageCounter,
    /// Single response, no pagination.
    None,
}

/// `<url>; rel="next"` — the only Link relation the walk follows.
static NEXT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>;\s*rel="next""#).expect("next-link pattern is valid")
});

/// Extract the `rel="next"` target from a response's `Link` header.
///
/// `HeaderMap` lookup is case-insensitive, so `Link` and `link` both
/// resolve here.
#[must_use]
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(reqwest::header::LINK)?.to_str().ok()?;
    NEXT_LINK_RE
        .captures(raw)
        .map(|caps| caps[1].to_string())
}

/// Collect every page of a `Link`-header-paginated listing.
///
/// The first request composes `path` under `account`; every
/// continuation goes to the header's absolute URL verbatim (it already
/// carries its own query parameters). A non-array body contributes zero
/// items but does not stop the walk — termination is driven purely by
/// the absence of a `rel="next"` entry, which keeps one malformed page
/// from either aborting or infinite-looping the walk.
pub async fn collect_by_link(
    client: &BasecampClient,
    path: &str,
    account: &str,
) -> BasecampResult<Vec<Value>> {
    let (value, headers) = client
        .request_with_headers(Method::GET, path, &Map::new(), &[], account)
        .await?;
    collect_link_pages(client, value, headers).await
}

/// [`collect_by_link`] starting from an already-absolute URL (launchpad
/// endpoints, pre-composed nested listings).
pub async fn collect_by_link_url(
    client: &BasecampClient,
    url: &str,
) -> BasecampResult<Vec<Value>> {
    let (value, headers) = client.request_url(Method::GET, url).await?;
    collect_link_pages(client, value, headers).await
}

async fn collect_link_pages(
    client: &BasecampClient,
    mut value: Value,
    mut headers: HeaderMap,
) -> BasecampResult<Vec<Value>> {
    let mut items = Vec::new();
    loop {
        if let Value::Array(page) = value {
            items.extend(page);
        }
        match next_link(&headers) {
            Some(next) => {
                debug!("Following Link header to {}", next);
                (value, headers) = client.request_url(Method::GET, &next).await?;
            }
            None => return Ok(items),
        }
    }
}

/// Collect every page of a counter-paginated listing.
///
/// Starts at `page=1` and keeps incrementing while full pages
/// ([`PAGE_SIZE`] items) come back. A short page is the final page; a
/// non-array or empty response ends the walk immediately. An empty
/// first page is an empty result, not an error.
///
/// The walk owns the `page` query parameter: any `page` entry in the
/// caller's `query` is dropped before the walk's own counter is
/// appended, so the request never carries a duplicated key.
pub async fn collect_by_page(
    client: &BasecampClient,
    method: Method,
    path: &str,
    body: &Map<String, Value>,
    query: &[(String, String)],
    account: &str,
) -> BasecampResult<Vec<Value>> {
    let mut items = Vec::new();
    let mut page: u64 = 1;

    loop {
        let mut paged_query: Vec<(String, String)> = query
            .iter()
            .filter(|pair| pair.0 != "page")
            .cloned()
            .collect();
        paged_query.push(("page".to_string(), page.to_string()));

        let value = client
            .request(method.clone(), path, body, &paged_query, account)
            .await?;

        let Value::Array(page_items) = value else {
            return Ok(items);
        };
        if page_items.is_empty() {
            return Ok(items);
        }

        let count = page_items.len();
        items.extend(page_items);

        if count < PAGE_SIZE {
            return Ok(items);
        }
        debug!("Page {} was full, fetching page {}", page, page + 1);
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_link(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::LINK,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn next_link_extracts_rel_next() {
        let headers = headers_with_link(
            "<https://3.basecampapi.com/9999/projects.json?page=2>; rel=\"next\"",
        );
        assert_eq!(
            next_link(&headers).as_deref(),
            Some("https://3.basecampapi.com/9999/projects.json?page=2")
        );
    }

    #[test]
    fn next_link_ignores_other_relations() {
        let headers = headers_with_link(
            "<https://3.basecampapi.com/9999/projects.json?page=1>; rel=\"prev\"",
        );
        assert_eq!(next_link(&headers), None);
    }

    #[test]
    fn next_link_finds_next_among_multiple_relations() {
        let headers = headers_with_link(
            "<https://x.test/a?page=1>; rel=\"prev\", <https://x.test/a?page=3>; rel=\"next\"",
        );
        assert_eq!(next_link(&headers).as_deref(), Some("https://x.test/a?page=3"));
    }

    #[test]
    fn next_link_absent_header() {
        assert_eq!(next_link(&HeaderMap::new()), None);
    }
}
