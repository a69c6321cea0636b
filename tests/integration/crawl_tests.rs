//! HTML link crawl tests
//!
//! Each test serves a one-entry sitemap whose URL seeds the HTML crawl.

use crate::common::{crawl, html_page, mount_html, mount_xml, source_of, test_config, urlset};
use sitemap_trail::crawler::{build_http_client, crawl_links, LinkCrawlOptions};
use sitemap_trail::state::CrawlState;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_same_origin_links_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/seed", base)])).await;
    mount_html(
        &server,
        "/seed",
        html_page(&[
            "/p".to_string(),
            "https://other.example.com/q".to_string(),
        ]),
        1,
    )
    .await;
    mount_html(&server, "/p", html_page(&[]), 1).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), true).await;

    assert_eq!(result.urls.len(), 2);
    assert_eq!(
        source_of(&result, &format!("{}/seed", base)),
        Some("sitemap.xml")
    );
    assert_eq!(
        source_of(&result, &format!("{}/p", base)),
        Some("HTML_CRAWL:depth_1")
    );
    assert!(result.urls.iter().all(|e| !e.url.contains("other.example.com")));
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_self_link_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/seed", base);

    mount_xml(&server, "/sitemap.xml", urlset(&[seed.clone()])).await;
    mount_html(
        &server,
        "/seed",
        html_page(&[seed.clone(), "/seed/".to_string(), "#top".to_string()]),
        1,
    )
    .await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), true).await;

    assert_eq!(result.urls.len(), 1);
    assert_eq!(source_of(&result, &seed), Some("sitemap.xml"));
}

#[tokio::test]
async fn test_depth_bound_on_link_chain() {
    let server = MockServer::start().await;
    let base = server.uri();
    let max_depth = 3u32;
    let chain_len = max_depth + 5;

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/c0", base)])).await;
    for i in 0..chain_len {
        // Pages at depth >= max_depth are never requested
        let hits = if i < max_depth { 1 } else { 0 };
        mount_html(
            &server,
            &format!("/c{}", i),
            html_page(&[format!("/c{}", i + 1)]),
            hits,
        )
        .await;
    }

    let mut config = test_config();
    config.crawler.max_depth = max_depth;

    let result = crawl(&config, format!("{}/sitemap.xml", base), true).await;

    let html_sources: Vec<&str> = result
        .urls
        .iter()
        .map(|e| e.source.as_str())
        .filter(|s| s.starts_with("HTML_CRAWL:"))
        .collect();
    assert_eq!(html_sources, vec!["HTML_CRAWL:depth_1", "HTML_CRAWL:depth_2"]);

    // The seed plus one page per remaining depth level
    assert_eq!(result.urls.len() as u32, max_depth);
    assert!(source_of(&result, &format!("{}/c{}", base, max_depth)).is_none());
}

#[tokio::test]
async fn test_shared_link_visited_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/a", base), format!("{}/b", base)]),
    )
    .await;
    mount_html(&server, "/a", html_page(&["/shared".to_string()]), 1).await;
    mount_html(&server, "/b", html_page(&["/shared".to_string()]), 1).await;
    mount_html(&server, "/shared", html_page(&["/a".to_string()]), 1).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), true).await;

    assert_eq!(result.urls.len(), 3);
    assert_eq!(
        source_of(&result, &format!("{}/shared", base)),
        Some("HTML_CRAWL:depth_1")
    );
}

#[tokio::test]
async fn test_sitemap_urls_keep_sitemap_source() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/a", base), format!("{}/b", base)]),
    )
    .await;
    // /a reaches /b first through a link, but /b is already known from the sitemap
    mount_html(&server, "/a", html_page(&["/b".to_string()]), 1).await;
    mount_html(&server, "/b", html_page(&[]), 1).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), true).await;

    assert_eq!(source_of(&result, &format!("{}/a", base)), Some("sitemap.xml"));
    assert_eq!(source_of(&result, &format!("{}/b", base)), Some("sitemap.xml"));
    assert!(result.urls.iter().all(|e| !e.source.starts_with("HTML_CRAWL:")));
}

#[tokio::test]
async fn test_non_html_content_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/seed", base)])).await;
    mount_html(&server, "/seed", html_page(&["/report.pdf".to_string()]), 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">x</a>"#, "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/hidden", html_page(&[]), 0).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), true).await;

    assert_eq!(result.urls.len(), 1);
    assert!(result.errors.is_empty());
    assert!(result
        .status
        .iter()
        .any(|line| line.contains("non-HTML") && line.contains("report.pdf")));
}

#[tokio::test]
async fn test_broken_link_is_node_local() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/seed", base)])).await;
    mount_html(
        &server,
        "/seed",
        html_page(&["/missing".to_string(), "/ok".to_string()]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_html(&server, "/ok", html_page(&[]), 1).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), true).await;

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("/missing"));
    assert!(source_of(&result, &format!("{}/missing", base)).is_none());
    assert_eq!(
        source_of(&result, &format!("{}/ok", base)),
        Some("HTML_CRAWL:depth_1")
    );
}

#[tokio::test]
async fn test_links_resolved_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/seed", base)])).await;
    mount_html(&server, "/seed", html_page(&["/old".to_string()]), 1).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/new"))
        .mount(&server)
        .await;
    mount_html(&server, "/docs/new", html_page(&["child".to_string()]), 1).await;
    mount_html(&server, "/docs/child", html_page(&[]), 1).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), true).await;

    assert_eq!(
        source_of(&result, &format!("{}/old", base)),
        Some("HTML_CRAWL:depth_1")
    );
    assert_eq!(
        source_of(&result, &format!("{}/docs/child", base)),
        Some("HTML_CRAWL:depth_2")
    );
}

#[tokio::test]
async fn test_html_crawl_disabled_by_default() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/seed", base)])).await;
    mount_html(&server, "/seed", html_page(&["/p".to_string()]), 0).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), false).await;

    assert_eq!(result.urls.len(), 1);
}

#[tokio::test]
async fn test_page_fetched_at_trailing_slash_path() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/guide/", html_page(&["intro".to_string()]), 1).await;
    mount_html(&server, "/guide/intro", html_page(&[]), 1).await;

    let client = build_http_client(&test_config()).unwrap();
    let options = LinkCrawlOptions {
        origin: Url::parse(&base).unwrap().origin(),
        delay: Duration::ZERO,
        max_depth: 3,
    };
    let mut state = CrawlState::new();

    crawl_links(&client, &format!("{}/guide/", base), &options, &mut state, 0).await;
    let result = state.into_result(None);

    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
    assert_eq!(
        source_of(&result, &format!("{}/guide", base)),
        Some("HTML_CRAWL:sitemap")
    );
    assert_eq!(
        source_of(&result, &format!("{}/guide/intro", base)),
        Some("HTML_CRAWL:depth_1")
    );
}
