//! Forward-slash path helpers for remote paths
//!
//! Remote paths use `/` regardless of the local platform, so these helpers
//! work on plain strings instead of `std::path`.

/// Lexically clean a `/`-separated path
///
/// Collapses repeated separators, drops `.` segments and resolves `..`
/// against preceding segments. An empty result becomes `.`; `..` at the
/// root of an absolute path is dropped.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join a base path and a relative path, then clean the result
pub fn join(base: &str, relative: &str) -> String {
    match (base.is_empty(), relative.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => clean(relative),
        (false, true) => clean(base),
        (false, false) => clean(&format!("{}/{}", base, relative)),
    }
}
