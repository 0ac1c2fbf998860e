//! Built-in pagination strategies.

use crate::strategy::{PageParams, PaginationStrategy};
use serde_json::Value;
use tracing::debug;

/// Read a JSON value as an integer, tolerating numeric-string encodings.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strategy for page-number based pagination.
///
/// Handles APIs that return a nested `page` object with `number` and
/// `totalPages`, advancing an integer page parameter between requests.
///
/// The page value from the request parameters is authoritative over the
/// value echoed in the response body, protecting against servers that echo
/// a different page than requested.
#[derive(Debug, Clone)]
pub struct PageNumberStrategy {
    /// Whether page numbering starts at 0 (`true`) or 1 (`false`).
    ///
    /// Zero-indexed: more pages exist while `page < totalPages - 1`.
    /// One-indexed: more pages exist while `page < totalPages`. A single
    /// instance uses exactly one convention.
    pub zero_indexed: bool,
    /// Name of the request parameter holding the page counter.
    pub page_param: String,
}

impl Default for PageNumberStrategy {
    fn default() -> Self {
        Self {
            zero_indexed: true,
            page_param: "page".to_string(),
        }
    }
}

impl PageNumberStrategy {
    /// Create a zero-indexed strategy using the `"page"` parameter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a one-indexed strategy.
    #[must_use]
    pub fn one_indexed() -> Self {
        Self {
            zero_indexed: false,
            ..Self::default()
        }
    }

    /// Use a different request parameter name for the page counter.
    #[must_use]
    pub fn with_page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }
}

impl PaginationStrategy for PageNumberStrategy {
    fn extract_items(&self, body: &Value) -> Vec<Value> {
        body.get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn get_next_page_info(
        &self,
        body: &Value,
        current_params: &PageParams,
    ) -> (bool, PageParams) {
        let mut next_params = current_params.clone();

        let page_info = match body.get("page").and_then(Value::as_object) {
            Some(info) => info,
            None => {
                debug!("page metadata missing or not an object, no more pages");
                return (false, next_params);
            }
        };

        let number = page_info.get("number").and_then(as_integer);
        let total_pages = page_info.get("totalPages").and_then(as_integer);
        let (number, total_pages) = match (number, total_pages) {
            (Some(number), Some(total)) => (number, total),
            _ => {
                debug!("page number or totalPages not numeric, no more pages");
                return (false, next_params);
            }
        };

        // The caller's request parameter wins over the server-echoed number.
        let effective_page = current_params
            .get(&self.page_param)
            .and_then(as_integer)
            .unwrap_or(number);

        let has_more = if self.zero_indexed {
            effective_page < total_pages - 1
        } else {
            effective_page < total_pages
        };

        debug!(effective_page, total_pages, has_more, "page number decision");

        if has_more {
            next_params.insert(self.page_param.clone(), Value::from(effective_page + 1));
        }

        (has_more, next_params)
    }
}

/// Strategy for HATEOAS-based pagination.
///
/// Handles APIs that embed the next-page URL in a `_links.next.href` entry.
/// Advancing overlays the parsed query string of that link onto the current
/// parameters, so unrelated parameters (e.g. a `keyword` filter) survive
/// across pages. Overlaid values stay strings; no type conversion is done.
#[derive(Debug, Clone, Copy, Default)]
pub struct HateoasStrategy;

impl HateoasStrategy {
    /// Create a HATEOAS strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PaginationStrategy for HateoasStrategy {
    fn extract_items(&self, body: &Value) -> Vec<Value> {
        // First array-valued entry under _embedded wins.
        body.get("_embedded")
            .and_then(Value::as_object)
            .and_then(|embedded| {
                embedded
                    .values()
                    .find_map(|value| value.as_array().cloned())
            })
            .unwrap_or_default()
    }

    fn get_next_page_info(
        &self,
        body: &Value,
        current_params: &PageParams,
    ) -> (bool, PageParams) {
        let mut next_params = current_params.clone();

        let href = body
            .get("_links")
            .and_then(|links| links.get("next"))
            .and_then(|next| next.get("href"))
            .and_then(Value::as_str)
            .unwrap_or("");

        if href.is_empty() {
            debug!("no next link, no more pages");
            return (false, next_params);
        }

        if let Some((_, query)) = href.split_once('?') {
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                debug!(key = %key, value = %value, "overlaying parameter from next link");
                next_params.insert(key.into_owned(), Value::String(value.into_owned()));
            }
        }

        (true, next_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn params(entries: &[(&str, Value)]) -> PageParams {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_page_number_termination_on_last_page() {
        let strategy = PageNumberStrategy::new();
        let body = json!({"page": {"number": 2, "totalPages": 3}});
        let current = params(&[("page", json!(2))]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(!has_more);
        assert_eq!(next, current);
    }

    #[test]
    fn test_page_number_advance_preserves_other_params() {
        let strategy = PageNumberStrategy::new();
        let body = json!({"page": {"number": 0, "totalPages": 3}});
        let current = params(&[("page", json!(0)), ("size", json!(2))]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(has_more);
        assert_eq!(next, params(&[("page", json!(1)), ("size", json!(2))]));
    }

    #[test]
    fn test_page_param_wins_over_echoed_number() {
        // Server echoes page 7; the request asked for page 0.
        let strategy = PageNumberStrategy::new();
        let body = json!({"page": {"number": 7, "totalPages": 3}});
        let current = params(&[("page", json!(0))]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(has_more);
        assert_eq!(next["page"], json!(1));
    }

    #[test]
    fn test_numeric_strings_tolerated() {
        let strategy = PageNumberStrategy::new();
        let body = json!({"page": {"number": "0", "totalPages": "3"}});
        let current = params(&[("page", json!("0"))]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(has_more);
        assert_eq!(next["page"], json!(1));
    }

    #[test]
    fn test_one_indexed_convention() {
        let strategy = PageNumberStrategy::one_indexed();
        let current = params(&[("page", json!(2))]);

        let body = json!({"page": {"number": 2, "totalPages": 3}});
        let (has_more, next) = strategy.get_next_page_info(&body, &current);
        assert!(has_more);
        assert_eq!(next["page"], json!(3));

        let body = json!({"page": {"number": 3, "totalPages": 3}});
        let current = params(&[("page", json!(3))]);
        let (has_more, _) = strategy.get_next_page_info(&body, &current);
        assert!(!has_more);
    }

    #[test]
    fn test_custom_page_param_name() {
        let strategy = PageNumberStrategy::new().with_page_param("offsetPage");
        let body = json!({"page": {"number": 0, "totalPages": 2}});
        let current = params(&[("offsetPage", json!(0))]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(has_more);
        assert_eq!(next["offsetPage"], json!(1));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"page": "not-a-dict"}))]
    #[case(json!({"page": null}))]
    #[case(json!({"page": 12}))]
    #[case(json!({"page": {"number": "zero", "totalPages": 3}}))]
    #[case(json!({"page": {"number": 0, "totalPages": null}}))]
    #[case(json!({"page": {"number": 0}}))]
    fn test_malformed_metadata_reports_no_more_pages(#[case] body: Value) {
        let strategy = PageNumberStrategy::new();
        let current = params(&[("page", json!(0))]);

        // Stateless and deterministic: same answer on repeat.
        for _ in 0..2 {
            let (has_more, next) = strategy.get_next_page_info(&body, &current);
            assert!(!has_more);
            assert_eq!(next, current);
        }
    }

    #[test]
    fn test_page_number_extract_items() {
        let strategy = PageNumberStrategy::new();
        let body = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(strategy.extract_items(&body).len(), 2);
        assert!(strategy.extract_items(&json!({})).is_empty());
        assert!(strategy.extract_items(&json!({"items": "nope"})).is_empty());
    }

    #[test]
    fn test_hateoas_advance_preserves_extra_params() {
        let strategy = HateoasStrategy::new();
        let body = json!({
            "_links": {"next": {"href": "/events?keyword=music&page=1&size=2"}}
        });
        let current = params(&[
            ("page", json!(0)),
            ("size", json!(2)),
            ("keyword", json!("music")),
        ]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(has_more);
        assert_eq!(
            next,
            params(&[
                ("page", json!("1")),
                ("size", json!("2")),
                ("keyword", json!("music")),
            ])
        );
    }

    #[test]
    fn test_hateoas_percent_decoding() {
        let strategy = HateoasStrategy::new();
        let body = json!({
            "_links": {"next": {"href": "/events?keyword=rock%20music&page=1"}}
        });

        let (_, next) = strategy.get_next_page_info(&body, &PageParams::new());

        assert_eq!(next["keyword"], json!("rock music"));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"_links": {}}))]
    #[case(json!({"_links": {"self": {"href": "/events?page=0"}}}))]
    #[case(json!({"_links": {"next": {"href": ""}}}))]
    #[case(json!({"_links": {"next": {}}}))]
    fn test_hateoas_no_next_link(#[case] body: Value) {
        let strategy = HateoasStrategy::new();
        let current = params(&[("page", json!(0))]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(!has_more);
        assert_eq!(next, current);
    }

    #[test]
    fn test_hateoas_next_link_without_query_keeps_params() {
        let strategy = HateoasStrategy::new();
        let body = json!({"_links": {"next": {"href": "/events/page2"}}});
        let current = params(&[("size", json!(2))]);

        let (has_more, next) = strategy.get_next_page_info(&body, &current);

        assert!(has_more);
        assert_eq!(next, current);
    }

    #[test]
    fn test_hateoas_extract_items_first_array_entry() {
        let strategy = HateoasStrategy::new();
        let body = json!({
            "_embedded": {
                "events": [{"id": 1}, {"id": 2}, {"id": 3}],
                "meta": {"count": 3}
            }
        });
        assert_eq!(strategy.extract_items(&body).len(), 3);
    }

    #[test]
    fn test_hateoas_extract_items_empty_when_no_arrays() {
        let strategy = HateoasStrategy::new();
        assert!(strategy.extract_items(&json!({})).is_empty());
        assert!(strategy
            .extract_items(&json!({"_embedded": {"meta": {"count": 0}}}))
            .is_empty());
    }
}
