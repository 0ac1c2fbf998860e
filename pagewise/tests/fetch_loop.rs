//! End-to-end fetch loop scenarios against closure-backed fake servers.

use futures::{pin_mut, StreamExt, TryStreamExt};
use pagewise::{
    FetchError, HateoasStrategy, PageNumberStrategy, PagedFetcher, PageParams, RawResponse,
};
use pagewise_retries::{RetryError, RetryOptions};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn fast_policy(max_retries: u32) -> pagewise_retries::ExponentialBackoffPolicy {
    RetryOptions::new()
        .max_retries(max_retries)
        .initial_delay(Duration::from_millis(1))
        .max_delay(Duration::from_millis(2))
        .jitter(false)
        .build_exponential()
}

fn params(entries: &[(&str, Value)]) -> PageParams {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn page_of(params: &PageParams) -> i64 {
    match params.get("page") {
        Some(Value::Number(n)) => n.as_i64().unwrap(),
        Some(Value::String(s)) => s.parse().unwrap(),
        other => panic!("unexpected page param: {other:?}"),
    }
}

/// Page-number server with three pages of two items each.
fn page_number_body(page: i64, total: i64) -> String {
    json!({
        "items": [
            {"id": page * 2},
            {"id": page * 2 + 1}
        ],
        "page": {"number": page, "totalPages": total}
    })
    .to_string()
}

#[tokio::test]
async fn page_number_drain_yields_every_page() {
    let fetcher = PagedFetcher::new(fast_policy(2), PageNumberStrategy::new());
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();

    let items = fetcher
        .fetch_all_pages(
            move |params| {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(RawResponse::new(Some(200), page_number_body(page_of(&params), 3)))
                }
            },
            params(&[("page", json!(0)), ("size", json!(2))]),
        )
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(items.len(), 6);
    assert_eq!(items[5]["id"], json!(5));
}

#[tokio::test]
async fn page_cap_stops_regardless_of_server_pages() {
    let fetcher =
        PagedFetcher::new(fast_policy(2), PageNumberStrategy::new()).with_max_pages(2);
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();

    let stream = fetcher.fetch_pages(
        move |params| {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(RawResponse::new(Some(200), page_number_body(page_of(&params), 50)))
            }
        },
        params(&[("page", json!(0))]),
    );
    pin_mut!(stream);

    let batches: Vec<_> = stream.try_collect().await.unwrap();

    assert_eq!(batches.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn hateoas_threads_params_and_preserves_filters() {
    let fetcher = PagedFetcher::new(fast_policy(2), HateoasStrategy::new());
    let seen_params = Arc::new(Mutex::new(Vec::<PageParams>::new()));
    let seen_clone = seen_params.clone();

    let items = fetcher
        .fetch_all_pages(
            move |params| {
                let seen = seen_clone.clone();
                async move {
                    seen.lock().unwrap().push(params.clone());
                    let page = page_of(&params);
                    let mut body = json!({
                        "_embedded": {"events": [{"name": format!("event-{page}")}]},
                        "_links": {"self": {"href": format!("/events?page={page}")}}
                    });
                    if page < 2 {
                        body["_links"]["next"] = json!({
                            "href": format!("/events?keyword=music&page={}&size=2", page + 1)
                        });
                    }
                    Ok(RawResponse::new(Some(200), body.to_string()))
                }
            },
            params(&[
                ("page", json!(0)),
                ("size", json!(2)),
                ("keyword", json!("music")),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["name"], json!("event-0"));

    let seen = seen_params.lock().unwrap();
    assert_eq!(seen.len(), 3);
    // The keyword filter survived across every page, and link-derived
    // parameters arrive as strings.
    assert_eq!(seen[2]["keyword"], json!("music"));
    assert_eq!(seen[2]["page"], json!("2"));
    assert_eq!(seen[2]["size"], json!("2"));
}

#[tokio::test]
async fn transient_failures_are_retried_within_a_page() {
    let fetcher = PagedFetcher::new(fast_policy(2), PageNumberStrategy::new());
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();

    let items = fetcher
        .fetch_all_pages(
            move |params| {
                let calls = calls_clone.clone();
                async move {
                    // The very first call times out; the retry succeeds.
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        return Err(RetryError::Timeout);
                    }
                    Ok(RawResponse::new(Some(200), page_number_body(page_of(&params), 2)))
                }
            },
            params(&[("page", json!(0))]),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 4);
    // Two pages plus one retried attempt.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retry_aborts_the_fetch() {
    let fetcher = PagedFetcher::new(fast_policy(1), PageNumberStrategy::new());
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();

    let result = fetcher
        .fetch_all_pages(
            move |_params| {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(RawResponse::new(Some(503), "busy"))
                }
            },
            params(&[("page", json!(0))]),
        )
        .await;

    match result {
        Err(FetchError::Transport(RetryError::Http { status, .. })) => assert_eq!(status, 503),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn streaming_keeps_partial_results_before_a_failure() {
    let fetcher = PagedFetcher::new(fast_policy(0), PageNumberStrategy::new());

    let stream = fetcher.fetch_pages(
        move |params| async move {
            let page = page_of(&params);
            if page == 0 {
                Ok(RawResponse::new(Some(200), page_number_body(0, 3)))
            } else {
                // Non-retryable client error on the second page.
                Err(RetryError::http(404, "gone"))
            }
        },
        params(&[("page", json!(0))]),
    );
    pin_mut!(stream);

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.len(), 2);

    let second = stream.next().await.unwrap();
    assert!(matches!(
        second,
        Err(FetchError::Transport(RetryError::Http { status: 404, .. }))
    ));
}

#[tokio::test]
async fn builder_assembles_a_working_fetcher() {
    let fetcher = PagedFetcher::builder()
        .retry_options(
            RetryOptions::new()
                .max_retries(1)
                .initial_delay(Duration::from_millis(1))
                .jitter(false),
        )
        .strategy_name(pagewise::PAGE_NUMBER)
        .max_pages(10)
        .build()
        .unwrap();

    let items = fetcher
        .fetch_all_pages(
            |params| async move {
                Ok(RawResponse::new(Some(200), page_number_body(page_of(&params), 2)))
            },
            params(&[("page", json!(0))]),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 4);
}
