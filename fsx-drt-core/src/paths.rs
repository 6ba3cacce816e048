//! Base-path normalization and report-path joining.
//!
//! Object-store prefixes (`s3://bucket/prefix/`) and file-system paths
//! (`/fsx/data/`) both use `/`. Paths handed to the service never end in a
//! separator, except the file-system root which stays `/`.

/// Path separator shared by S3 prefixes and Lustre paths.
pub const SEPARATOR: char = '/';

/// Trim trailing separators from a base path.
///
/// Returns `None` for an empty input. A path made only of separators
/// collapses to a single `/`.
pub fn normalize_base(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Some(SEPARATOR.to_string());
    }
    Some(trimmed.to_owned())
}

/// Join a base path and a sub-path with exactly one separator between them,
/// whatever separators either side already carries.
pub fn join(base: &str, sub: &str) -> String {
    let base = base.trim_end_matches(SEPARATOR);
    let sub = sub.trim_matches(SEPARATOR);
    if sub.is_empty() {
        return if base.is_empty() {
            SEPARATOR.to_string()
        } else {
            base.to_owned()
        };
    }
    format!("{base}{SEPARATOR}{sub}")
}
