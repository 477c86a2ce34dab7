//! URL segment rules for plugin names and asset categories.
//!
//! Both end up verbatim in mount prefixes (`/{plugin}/{category}`) and in the
//! `src`/`href` attributes the composer writes, so they are restricted to the
//! RFC 3986 unreserved set.

/// Check that `segment` can be used as one URL path segment without escaping.
pub fn validate_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("must not be empty");
    }
    if segment == "." || segment == ".." {
        return Err("must not be a relative path segment");
    }
    if !segment.chars().all(is_unreserved) {
        return Err("may only contain ASCII letters, digits, '-', '.', '_' and '~'");
    }
    Ok(())
}

/// Check a linked asset file: one or more valid segments joined by `/`.
/// A leading `/` is ignored, as the composer strips it.
pub fn validate_asset_path(path: &str) -> Result<(), &'static str> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Err("must not be empty");
    }
    path.split('/').try_for_each(validate_segment)
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}
