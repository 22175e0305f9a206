//! Metric key derivation.
//!
//! Turns `(method, effective path, route pattern, status)` into a flat,
//! dot-delimited key such as `timer.GET.200.hello.name`. The function is pure:
//! identical inputs always produce the identical key.
//!
//! Path suffix selection:
//! - a matched route pattern wins, so `/users/42` and `/users/7` share one key;
//! - otherwise 3xx and 4xx responses collapse into `/unmapped`, which keeps
//!   scanners and typos from creating one key per requested path;
//! - everything else (2xx, 5xx, unclassifiable status) uses the raw path.

pub mod rewrite;
pub mod series;

use rewrite::{apply_all, METRIC_KEY_STEPS, ROUTE_PATTERN_STEPS};
pub use series::StatusSeries;

/// Sentinel used when the response status cannot be read.
pub const UNDEFINED_HTTP_STATUS: u16 = 999;

/// Suffix shared by unmatched redirects and client errors.
pub const UNMAPPED_PATH_SUFFIX: &str = "/unmapped";

/// First segment of every key.
pub const KEY_PREFIX: &str = "timer";

/// Where the last part of a key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSuffix {
    /// Sanitized route pattern.
    Pattern(String),
    /// Unmatched redirect or client error.
    Unmapped,
    /// Effective request path, verbatim.
    RawPath(String),
}

impl PathSuffix {
    pub fn resolve(path: &str, route_pattern: Option<&str>, status: u16) -> Self {
        if let Some(pattern) = route_pattern {
            return PathSuffix::Pattern(sanitize_route_pattern(pattern));
        }
        match StatusSeries::of(status) {
            Some(series) if series.is_unmapped_candidate() => PathSuffix::Unmapped,
            _ => PathSuffix::RawPath(path.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PathSuffix::Pattern(s) | PathSuffix::RawPath(s) => s,
            PathSuffix::Unmapped => UNMAPPED_PATH_SUFFIX,
        }
    }
}

/// Replace wildcard and template characters of a route pattern.
///
/// `/orders/{id}/items/*` becomes `/orders/id/items/star`.
pub fn sanitize_route_pattern(pattern: &str) -> String {
    let mut out = apply_all(ROUTE_PATTERN_STEPS, pattern);
    if out.ends_with('-') {
        out.pop();
    }
    if out.starts_with('-') {
        out.remove(0);
    }
    out
}

/// Make an assembled `timer.<M>.<S>/<path>` string dot-hierarchical.
pub fn normalize_key(raw: &str) -> String {
    let mut key = apply_all(METRIC_KEY_STEPS, raw);
    if key.ends_with('.') {
        key.push_str("root");
    }
    if key.starts_with('_') {
        key.remove(0);
    }
    key
}

/// Derive the metric key for one finished request.
pub fn metric_key(method: &str, path: &str, route_pattern: Option<&str>, status: u16) -> String {
    let suffix = PathSuffix::resolve(path, route_pattern, status);
    let raw = format!("{KEY_PREFIX}.{method}.{status}{}", suffix.as_str());
    normalize_key(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_not_found_is_unmapped_regardless_of_path() {
        assert_eq!(
            metric_key("GET", "/totally/random/xyz", None, 404),
            "timer.GET.404.unmapped"
        );
        assert_eq!(
            metric_key("GET", "/wp-admin.php", None, 404),
            "timer.GET.404.unmapped"
        );
    }

    #[test]
    fn unmatched_redirect_is_unmapped() {
        assert_eq!(metric_key("GET", "/old", None, 301), "timer.GET.301.unmapped");
    }

    #[test]
    fn unmatched_success_and_server_error_use_raw_path() {
        assert_eq!(metric_key("GET", "/static/app.js", None, 200), "timer.GET.200.static.app.js");
        assert_eq!(metric_key("POST", "/jobs", None, 500), "timer.POST.500.jobs");
    }

    #[test]
    fn unclassifiable_status_uses_raw_path() {
        assert_eq!(metric_key("GET", "/x", None, UNDEFINED_HTTP_STATUS), "timer.GET.999.x");
        assert_eq!(metric_key("GET", "/x", None, 42), "timer.GET.42.x");
    }

    #[test]
    fn pattern_wins_over_raw_path_and_status() {
        assert_eq!(
            metric_key("GET", "/users/42", Some("/users/{id}"), 200),
            "timer.GET.200.users.id"
        );
        assert_eq!(
            metric_key("GET", "/users/7", Some("/users/{id}"), 404),
            "timer.GET.404.users.id"
        );
    }

    #[test]
    fn double_star_resolves_as_one_token() {
        assert_eq!(sanitize_route_pattern("/api/**"), "/api/star-star");
        assert_eq!(metric_key("GET", "/api/a/b", Some("/api/**"), 200), "timer.GET.200.api.star-star");
    }

    #[test]
    fn nested_variables_and_wildcards() {
        assert_eq!(sanitize_route_pattern("/orders/{id}/items/*"), "/orders/id/items/star");
        assert_eq!(
            metric_key("DELETE", "/orders/1/items/2", Some("/orders/{id}/items/*"), 204),
            "timer.DELETE.204.orders.id.items.star"
        );
    }

    #[test]
    fn brackets_are_rewritten() {
        assert_eq!(sanitize_route_pattern("/tags/[name]"), "/tags/name");
    }

    #[test]
    fn only_one_edge_dash_is_stripped() {
        assert_eq!(sanitize_route_pattern("{id}"), "id");
        assert_eq!(sanitize_route_pattern("{{id}}"), "-id-");
    }

    #[test]
    fn root_pattern_gets_terminal_segment() {
        assert_eq!(metric_key("GET", "/", Some("/"), 200), "timer.GET.200.root");
        assert_eq!(metric_key("GET", "/docs/", None, 200), "timer.GET.200.docs.root");
    }

    #[test]
    fn empty_segments_collapse_once() {
        assert_eq!(metric_key("GET", "/a//b", None, 200), "timer.GET.200.a.b");
        assert_eq!(metric_key("GET", "/a///b", None, 200), "timer.GET.200.a..b");
    }

    #[test]
    fn leading_underscore_is_dropped() {
        assert_eq!(normalize_key("_timer.GET.200"), "timer.GET.200");
    }

    #[test]
    fn keys_are_deterministic_and_free_of_template_characters() {
        let patterns = [
            "/", "/*", "/**", "/{a}", "/{a}/{b}", "/[x]/*", "/**/{id}.json",
            "/files/**/raw", "/a-{b}-c/", "{x}", "/-/", "*",
        ];
        for pattern in patterns {
            for status in [100, 200, 302, 404, 500, 999] {
                let first = metric_key("GET", "/p", Some(pattern), status);
                let second = metric_key("GET", "/p", Some(pattern), status);
                assert_eq!(first, second);
                assert!(
                    !first.contains(['{', '}', '[', ']', '*']),
                    "{pattern} -> {first}"
                );
                assert!(!first.ends_with('.'), "{pattern} -> {first}");
            }
        }
    }
}
