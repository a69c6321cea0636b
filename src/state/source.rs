/// Provenance definitions for discovered URLs
///
/// A source is stored as a plain string on each `UrlEntry`; this module owns
/// the exact string forms and converts between them and the typed view.
use std::fmt;

/// Delimiter between sitemap filenames in a source trail
pub const SOURCE_DELIMITER: &str = "=>";

/// Prefix for every source produced by the HTML link crawl
pub const HTML_CRAWL_PREFIX: &str = "HTML_CRAWL:";

/// How a URL was first discovered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Found in a leaf sitemap; holds the root-to-leaf trail of sitemap
    /// filenames, e.g. `root.xml=>child.xml`
    Sitemap(String),

    /// Found while crawling HTML pages, `depth` hops from a sitemap seed
    HtmlCrawl { depth: u32 },
}

impl Source {
    /// Parses a stored source string back into its typed form
    ///
    /// Anything not carrying the HTML crawl prefix is a sitemap trail.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(HTML_CRAWL_PREFIX) {
            Some("sitemap") => Self::HtmlCrawl { depth: 0 },
            Some(rest) => match rest
                .strip_prefix("depth_")
                .and_then(|d| d.parse::<u32>().ok())
            {
                Some(depth) => Self::HtmlCrawl { depth },
                None => Self::Sitemap(raw.to_string()),
            },
            None => Self::Sitemap(raw.to_string()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sitemap(trail) => f.write_str(trail),
            Self::HtmlCrawl { depth: 0 } => write!(f, "{}sitemap", HTML_CRAWL_PREFIX),
            Self::HtmlCrawl { depth } => write!(f, "{}depth_{}", HTML_CRAWL_PREFIX, depth),
        }
    }
}

/// Extends a sitemap trail with a child sitemap's filename
///
/// An empty parent yields the child alone, never a leading delimiter.
pub fn append_source_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}{}{}", parent, SOURCE_DELIMITER, child)
    }
}
