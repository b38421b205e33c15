use std::sync::OnceLock;

use regex::Regex;

// Scheme grammar from RFC 3986: a letter followed by letters, digits, "+",
// "-" or ".".
fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap())
}

// Heuristic for strings that are a bare host with a missing scheme,
// e.g. `flipkart.com`, `//example.com`, `://httpbin.org` -- but not
// `/amazon.com`, `junglee` or `.hgignore`.
fn bare_host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(:?//)?[^/.]+\.\w+").unwrap())
}

/// A URL split into its scheme, network location and everything from the
/// path onward.
///
/// The split is purely lexical so that reassembling the pieces reproduces
/// the input byte-for-byte. (The `url` crate normalizes on re-serialization,
/// e.g. it appends a `/` to an empty path, which would break platform
/// matching on URLs the caller typed without one.)
#[derive(Debug, PartialEq)]
pub(crate) struct SplitUrl<'a> {
    pub scheme: Option<&'a str>,
    pub netloc: &'a str,
    /// Path, query and fragment, exactly as written
    pub rest: &'a str,
}

pub(crate) fn split_url(url: &str) -> SplitUrl<'_> {
    let (scheme, after) = match scheme_re().find(url) {
        Some(m) => (Some(&url[..m.end() - 1]), &url[m.end()..]),
        None => (None, url),
    };

    if let Some(body) = after.strip_prefix("//") {
        let end = body.find(['/', '?', '#']).unwrap_or(body.len());
        SplitUrl {
            scheme,
            netloc: &body[..end],
            rest: &body[end..],
        }
    } else {
        SplitUrl {
            scheme,
            netloc: "",
            rest: after,
        }
    }
}

/// Returns a sanitized and normalized version of the URL passed
///
/// Adds a missing `http://` scheme when the string looks like a bare host,
/// lower-cases the scheme and host, and strips surrounding whitespace. Path,
/// query and fragment are preserved exactly; fragments are not stripped and
/// query parameters are not canonicalized.
pub fn sanitize_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();

    if split_url(&url).scheme.is_none() && bare_host_re().is_match(&url) {
        url = format!("http://{}", url.trim_start_matches([':', '/']));
    }

    let parts = split_url(&url);
    match parts.scheme {
        Some(scheme) if !parts.netloc.is_empty() || url[scheme.len() + 1..].starts_with("//") => {
            format!(
                "{}://{}{}",
                scheme.to_lowercase(),
                parts.netloc.to_lowercase(),
                parts.rest
            )
        }
        Some(scheme) => format!("{}:{}", scheme.to_lowercase(), parts.rest),
        None => url,
    }
}
