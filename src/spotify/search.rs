use reqwest::{Client, StatusCode};
use tracing::{debug, trace};

use crate::{
    Error,
    types::{AlbumPage, ReleaseItem, SearchResponse},
};

/// Page size requested from the search endpoint.
pub const PAGE_LIMIT: u32 = 50;

/// Highest offset the search endpoint accepts. Requests never reach it.
pub const MAX_OFFSET: u32 = 1000;

/// Items gathered for one prefix.
///
/// `error` is set when pagination stopped because a request failed. The items
/// collected before the failure are still in `items`.
#[derive(Debug, Default)]
pub struct PrefixResult {
    pub items: Vec<ReleaseItem>,
    pub error: Option<Error>,
}

impl PrefixResult {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Builds the search query for a prefix and year, e.g. `A* year:2025`.
pub fn prefix_query(prefix: char, year: i32) -> String {
    format!("{prefix}* year:{year}")
}

/// Collects all albums and singles whose name starts with `prefix` in `year`.
///
/// Pages through `GET /search?q=<prefix>* year:<year>&type=album` with a page
/// size of [`PAGE_LIMIT`], starting at offset 0. Paging continues while a page
/// has items, announces a `next` page, and the next offset stays below
/// [`MAX_OFFSET`].
///
/// # Error Handling
///
/// Any failed request (network error, non-success status, undecodable body)
/// ends paging for this prefix. The result then carries the items of the pages
/// fetched so far plus an [`Error::Fetch`] describing the failure.
pub async fn search_prefix(
    client: &Client,
    api_url: &str,
    prefix: char,
    year: i32,
    token: &str,
) -> PrefixResult {
    let query = prefix_query(prefix, year);
    let mut result = PrefixResult::default();
    let mut offset = 0;

    while offset < MAX_OFFSET {
        let page = match fetch_page(client, api_url, &query, offset, token).await {
            Ok(page) => page,
            Err(message) => {
                debug!(%prefix, offset, %message, "prefix search stopped");
                result.error = Some(Error::Fetch {
                    prefix,
                    offset,
                    message,
                });
                break;
            }
        };

        if page.items.is_empty() {
            break;
        }

        trace!(%prefix, offset, count = page.items.len(), "received search page");
        let has_next = page.next.is_some();
        result.items.extend(page.items);

        if !has_next {
            break;
        }
        offset += PAGE_LIMIT;
    }

    debug!(%prefix, year, count = result.items.len(), "prefix search finished");
    result
}

async fn fetch_page(
    client: &Client,
    api_url: &str,
    query: &str,
    offset: u32,
    token: &str,
) -> Result<AlbumPage, String> {
    let response = client
        .get(format!("{api_url}/search"))
        .bearer_auth(token)
        .query(&[
            ("q", query.to_string()),
            ("type", "album".to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("offset", offset.to_string()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        return Err(format!("rate limited, retry after {retry_after} seconds"));
    }

    let response = response.error_for_status().map_err(|e| e.to_string())?;
    let json = response
        .json::<SearchResponse>()
        .await
        .map_err(|e| e.to_string())?;

    Ok(json.albums.unwrap_or_default())
}
