//! Textual URL composition.
//!
//! Combining a base URL with a possibly-relative path is a string operation
//! here: no percent-encoding, normalization, or validation is performed. The
//! executor receives the joined string as-is.

/// Returns true when `url` must not be combined with a base URL.
///
/// A URL counts as absolute when it starts with an explicit scheme followed
/// by `//`, or when it starts with two or more slashes. Protocol-relative
/// (`//host/path`) and multi-slash (`///path`) forms are deliberately treated
/// as absolute for compatibility with the client conventions this crate
/// bridges, even though they are not true absolute URLs.
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    // The leading-slash rule wins before any scheme split: a later `:`
    // (a port, say) must not demote a protocol-relative URL.
    if url.starts_with("//") {
        return true;
    }
    match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest.starts_with("//"),
        _ => false,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Combines `base_url` and `url` into the string handed to the executor.
///
/// Absolute URLs (per [`is_absolute_url`]) short-circuit and are returned
/// unchanged regardless of `base_url`. Otherwise trailing slashes are
/// stripped from the base, leading slashes from the relative part, and the
/// two are joined with exactly one `/`. An empty relative part yields the
/// stripped base alone.
#[must_use]
pub fn resolve_url(base_url: Option<&str>, url: Option<&str>) -> String {
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return base_url.unwrap_or_default().to_owned();
    };

    if is_absolute_url(url) {
        return url.to_owned();
    }

    let Some(base) = base_url.filter(|b| !b.is_empty()) else {
        return url.to_owned();
    };

    let base = base.trim_end_matches('/');
    let relative = url.trim_start_matches('/');
    if relative.is_empty() {
        base.to_owned()
    } else {
        format!("{base}/{relative}")
    }
}
