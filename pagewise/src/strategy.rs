//! Pagination strategy trait.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Request parameters threaded across page fetches.
///
/// Always replaced wholesale between pages, never mutated in place, so a
/// strategy can hand back the current map unchanged on termination.
pub type PageParams = BTreeMap<String, Value>;

/// Trait for pagination strategies.
///
/// A strategy decides, given one page's parsed body and the parameters that
/// produced it, whether another page exists and what parameters fetch it.
/// Strategies are stateless beyond construction-time configuration and safe
/// to share across concurrent fetch loops.
pub trait PaginationStrategy: Send + Sync {
    /// Extract the item batch from one page's body.
    fn extract_items(&self, body: &Value) -> Vec<Value>;

    /// Decide whether another page exists and compute its parameters.
    ///
    /// Missing or malformed pagination metadata is not an error: the
    /// strategy reports no more pages and returns the current parameters
    /// unchanged.
    fn get_next_page_info(&self, body: &Value, current_params: &PageParams)
        -> (bool, PageParams);

    /// Extract data from a body by dot-separated key path
    /// (e.g. `"_embedded.events"`).
    ///
    /// Walks nested objects segment by segment. If any segment is missing or
    /// the current value is not an object, the *original full body* is
    /// returned rather than a partial result. No path returns the body
    /// unchanged.
    fn extract_data(&self, body: &Value, key_path: Option<&str>) -> Value {
        let path = match key_path {
            Some(path) if !path.is_empty() => path,
            _ => {
                debug!("no data key specified, returning full body");
                return body.clone();
            }
        };

        let mut data = body;
        for key in path.split('.') {
            match data.as_object().and_then(|object| object.get(key)) {
                Some(next) => data = next,
                None => {
                    warn!(key, path, "key not found in body, returning full body");
                    return body.clone();
                }
            }
        }

        debug!(path, "extracted data by key path");
        data.clone()
    }
}
