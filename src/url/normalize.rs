use crate::UrlError;
use url::Url;

/// Normalizes a candidate URL for deduplication
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` when one is given (handles relative links);
///    parse directly otherwise
/// 2. Reject any scheme other than `http` or `https`
/// 3. Reject URLs without a host
/// 4. Case-fold scheme and host and strip default ports (the `url` crate's
///    canonical form already does both)
/// 5. Remove the fragment
/// 6. Trim a trailing slash from the path, except for the root path
///
/// The result is the key a URL is deduplicated under for the rest of the run.
///
/// # Arguments
///
/// * `raw` - The candidate URL string, possibly relative
/// * `base` - The page the candidate was discovered on, if any
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The candidate is not a crawlable URL
///
/// # Examples
///
/// ```
/// use linkloom::url::normalize_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/a/").unwrap();
/// let url = normalize_url("../b/#section", Some(&base)).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/b");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let raw = raw.trim();

    let mut url = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            url.set_path("/");
        } else {
            url.set_path(&trimmed);
        }
    }

    Ok(url)
}
