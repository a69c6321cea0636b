use crate::UrlError;
use url::Url;

/// Normalizes a URL according to Sitemap-Trail's canonicalization rules
///
/// Two strings that normalize to the same URL are the same key everywhere in
/// the discovery map, so every URL entering the crawl goes through here.
///
/// # Normalization Steps
///
/// 1. Resolve against `base` when given, otherwise parse as absolute
/// 2. Reject anything that is not `http`/`https` or has no host
/// 3. Remove the fragment (everything after #)
/// 4. Remove trailing slashes (except for root /)
///
/// Host lowercasing and dot-segment removal come from the URL parser itself.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize (may be relative when `base` is set)
/// * `base` - Optional base URL for resolving relative references
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The input cannot be turned into a crawlable URL
///
/// # Examples
///
/// ```
/// use sitemap_trail::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/page/#top", None).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let mut url = resolve_url(raw, base)?;

    // Step 4: Trailing slashes
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        let trimmed = trimmed.to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}

/// Resolves a URL to the absolute address it should be fetched from
///
/// Runs steps 1-3 of `normalize_url` and keeps the path as written, so a
/// document published at `/posts/` is requested at `/posts/`.
pub fn resolve_url(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let raw = raw.trim();

    // Step 1: Parse or resolve
    let parsed = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };
    let mut url = parsed.map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    // Step 2: Validate scheme and host
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    // Step 3: Remove fragment
    url.set_fragment(None);

    Ok(url)
}
