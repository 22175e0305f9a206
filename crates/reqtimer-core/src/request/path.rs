//! Effective path resolution (path within the application).

use percent_encoding::percent_decode_str;

/// Resolve the path the application sees for a raw request URI path.
///
/// Steps, in order: drop `;` path parameters from every segment, percent
/// decode (invalid UTF-8 is replaced), collapse `//` runs, strip
/// `context_path` when it matches on a segment boundary. An empty result is
/// reported as `/`.
pub fn path_within_application(raw_path: &str, context_path: &str) -> String {
    let without_params = remove_semicolon_content(raw_path);
    let decoded = percent_decode_str(&without_params)
        .decode_utf8_lossy()
        .into_owned();
    let sanitized = collapse_slashes(&decoded);

    let within = strip_context_path(&sanitized, context_path);
    if within.is_empty() {
        "/".to_string()
    } else {
        within.to_string()
    }
}

fn remove_semicolon_content(path: &str) -> String {
    path.split('/')
        .map(|segment| segment.split_once(';').map_or(segment, |(head, _)| head))
        .collect::<Vec<_>>()
        .join("/")
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' && prev_slash {
            continue;
        }
        prev_slash = c == '/';
        out.push(c);
    }
    out
}

fn strip_context_path<'a>(path: &'a str, context_path: &str) -> &'a str {
    if context_path.is_empty() {
        return path;
    }
    match path.strip_prefix(context_path) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}
