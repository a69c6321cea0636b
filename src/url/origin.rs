use url::{Origin, Url};

/// Returns true if `url` shares scheme, host and port with `origin`
///
/// Opaque origins (e.g. `data:` URLs) never match anything, including
/// themselves, which keeps them out of the link crawl.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_trail::url::same_origin;
///
/// let origin = Url::parse("https://example.com/sitemap.xml").unwrap().origin();
///
/// assert!(same_origin(&Url::parse("https://example.com/a").unwrap(), &origin));
/// assert!(!same_origin(&Url::parse("http://example.com/a").unwrap(), &origin));
/// assert!(!same_origin(&Url::parse("https://blog.example.com/").unwrap(), &origin));
/// ```
pub fn same_origin(url: &Url, origin: &Origin) -> bool {
    origin.is_tuple() && url.origin() == *origin
}
