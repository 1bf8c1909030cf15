//! URL construction for the endpoints the sync engine talks to.
//!
//! Endpoints come from markup (`data-base-action`, `data-action`) and are used
//! as given; these helpers only attach the id segment or query parameters.

use serde::Serialize;

#[derive(Serialize)]
struct ParentQuery<'a> {
    parent_id: &'a str,
}

/// Appends `query` to `url`, respecting a query string already present.
pub fn with_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

/// Create endpoint of a list: `{base_action}?parent_id={parent_id}`.
///
/// # Example
/// ```rust
/// use listsync::shared::api_utils::add_item_url;
/// assert_eq!(add_item_url("/timings", "17"), "/timings?parent_id=17");
/// ```
pub fn add_item_url(base_action: &str, parent_id: &str) -> String {
    let query = serde_qs::to_string(&ParentQuery { parent_id }).unwrap_or_default();
    with_query(base_action, &query)
}

/// Endpoint of one item: `{base_action}/{id}`.
pub fn item_url(base_action: &str, id: &str) -> String {
    format!(
        "{}/{}",
        base_action.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

/// `{url}?{param}={value}` with both sides percent-encoded.
pub fn keyed_url(url: &str, param: &str, value: &str) -> String {
    let query = format!(
        "{}={}",
        urlencoding::encode(param),
        urlencoding::encode(value)
    );
    with_query(url, &query)
}
