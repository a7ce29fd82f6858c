//! Path normalisation for filesystem URLs.
//!
//! Callers hand in URLs in several shapes (`cdvfile://localhost/persistent/a.json`,
//! `file:///data/data/app/a.json`, `/a.json`, `a.json`). They all collapse to
//! one absolute path: a single leading `/`, no scheme, no `data/data/`.

/// URL of the application data directory.
pub const DATA_DIRECTORY: &str = "cdvfile://localhost/persistent/";

const KNOWN_PREFIXES: [&str; 3] = [
    "cdvfile://localhost/persistent/",
    "cdvfile://localhost/temporary/",
    "file:///",
];

const DATA_DATA: &str = "data/data/";

/// Name used for a file whose path has no segments.
pub const DEFAULT_FILE_NAME: &str = "file";

/// Name of the root directory.
pub const ROOT_NAME: &str = "root";

/// Strip scheme, authority, `data/data/` and leading slashes.
///
/// The result is relative: it never starts with `/`.
pub fn strip_url(url: &str) -> &str {
    let rest = KNOWN_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .or_else(|| strip_scheme(url))
        .unwrap_or(url);

    let rest = rest.trim_start_matches('/');
    rest.strip_prefix(DATA_DATA)
        .unwrap_or(rest)
        .trim_start_matches('/')
}

/// `scheme://authority/rest` -> `rest`.
fn strip_scheme(url: &str) -> Option<&str> {
    let (scheme, after) = url.split_once("://")?;
    let valid_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return None;
    }
    Some(after.split_once('/').map_or("", |(_, rest)| rest))
}

/// Directory-or-file heuristic for a URL.
///
/// A URL is a directory when it ends with `/`, when nothing is left after
/// stripping, or when its last segment has no `.`. Extensionless files are
/// therefore seen as directories; use the explicit resolvers for those.
pub fn is_directory_url(url: &str) -> bool {
    if url.ends_with('/') {
        return true;
    }
    let stripped = strip_url(url);
    stripped.is_empty() || !last_segment(stripped).is_some_and(|s| s.contains('.'))
}

/// Absolute path of a file.
pub fn file_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Absolute path of a directory. Root is `/`.
pub fn directory_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

/// Name of a file: its last segment, or `"file"`.
pub fn file_name(path: &str) -> String {
    last_segment(path).unwrap_or(DEFAULT_FILE_NAME).to_string()
}

/// Name of a directory: its last segment, or `"root"`.
pub fn directory_name(path: &str) -> String {
    last_segment(path).unwrap_or(ROOT_NAME).to_string()
}

/// Child path of a directory.
///
/// Slashes around and repeated inside `name` collapse, so `"/x.json"` and
/// `"x.json"` name the same child. An empty name is the directory itself.
pub fn join(directory: &str, name: &str) -> String {
    let name = name
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    let directory = directory.trim_end_matches('/');
    match (directory.is_empty(), name.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => directory.to_string(),
        _ => format!("{directory}/{name}"),
    }
}

fn last_segment(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).last()
}
