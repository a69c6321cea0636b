//! Sitemap resolution tests

use crate::common::{crawl, mount_xml, sitemap_index, source_of, test_config, urlset};
use flate2::write::GzEncoder;
use flate2::Compression;
use sitemap_trail::crawler::{build_http_client, CrawlRequest};
use sitemap_trail::robots::discover_sitemaps;
use sitemap_trail::{Coordinator, TrailError};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_index_records_trail() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/root.xml",
        sitemap_index(&[format!("{}/a.xml", base), format!("{}/b.xml", base)]),
    )
    .await;
    mount_xml(&server, "/a.xml", urlset(&[format!("{}/1", base)])).await;
    mount_xml(&server, "/b.xml", urlset(&[format!("{}/2", base)])).await;

    let result = crawl(&test_config(), format!("{}/root.xml", base), false).await;

    assert_eq!(result.urls.len(), 2);
    assert_eq!(
        source_of(&result, &format!("{}/1", base)),
        Some("root.xml=>a.xml")
    );
    assert_eq!(
        source_of(&result, &format!("{}/2", base)),
        Some("root.xml=>b.xml")
    );
    assert!(result.errors.is_empty());
    assert_eq!(result.sitemap_url, Some(format!("{}/root.xml", base)));
    assert!(result
        .status
        .last()
        .map(|s| s.starts_with("Crawl complete"))
        .unwrap_or(false));
}

#[tokio::test]
async fn test_nested_index_trail() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/root.xml",
        sitemap_index(&[format!("{}/mid.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/mid.xml",
        sitemap_index(&[format!("{}/maps/leaf.xml", base)]),
    )
    .await;
    mount_xml(&server, "/maps/leaf.xml", urlset(&[format!("{}/deep", base)])).await;

    let result = crawl(&test_config(), format!("{}/root.xml", base), false).await;

    assert_eq!(
        source_of(&result, &format!("{}/deep", base)),
        Some("root.xml=>mid.xml=>leaf.xml")
    );
}

#[tokio::test]
async fn test_single_leaf_uses_own_filename() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/a", base),
            format!("{}/b/", base),
            format!("{}/c#section", base),
        ]),
    )
    .await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), false).await;

    assert_eq!(result.urls.len(), 3);
    assert!(result.urls.iter().all(|e| e.source == "sitemap.xml"));
    // Stored in normalized form
    assert!(source_of(&result, &format!("{}/b", base)).is_some());
    assert!(source_of(&result, &format!("{}/c", base)).is_some());
}

#[tokio::test]
async fn test_first_wins_across_sitemaps() {
    let server = MockServer::start().await;
    let base = server.uri();
    let shared = format!("{}/shared", base);

    mount_xml(
        &server,
        "/root.xml",
        sitemap_index(&[format!("{}/a.xml", base), format!("{}/b.xml", base)]),
    )
    .await;
    mount_xml(&server, "/a.xml", urlset(&[shared.clone()])).await;
    mount_xml(
        &server,
        "/b.xml",
        urlset(&[format!("{}/", shared), format!("{}/only-b", base)]),
    )
    .await;

    let result = crawl(&test_config(), format!("{}/root.xml", base), false).await;

    assert_eq!(result.urls.len(), 2);
    assert_eq!(source_of(&result, &shared), Some("root.xml=>a.xml"));
    assert_eq!(result.urls[0].url, shared);
}

#[tokio::test]
async fn test_timeout_is_node_local() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/root.xml",
        sitemap_index(&[format!("{}/a.xml", base), format!("{}/b.xml", base)]),
    )
    .await;
    mount_xml(&server, "/a.xml", urlset(&[format!("{}/1", base)])).await;
    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(urlset(&[format!("{}/2", base)]), "application/xml")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = test_config();
    config.crawler.request_timeout_ms = 300;

    let result = crawl(&config, format!("{}/root.xml", base), false).await;

    assert!(source_of(&result, &format!("{}/1", base)).is_some());
    assert!(source_of(&result, &format!("{}/2", base)).is_none());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("b.xml"));
    assert!(result.status.contains(&result.errors[0]));
}

#[tokio::test]
async fn test_http_error_is_logged() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/root.xml",
        sitemap_index(&[format!("{}/broken.xml", base), format!("{}/ok.xml", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_xml(&server, "/ok.xml", urlset(&[format!("{}/ok", base)])).await;

    let result = crawl(&test_config(), format!("{}/root.xml", base), false).await;

    assert_eq!(result.urls.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("500"));
    assert!(result.errors[0].contains("broken.xml"));
}

#[tokio::test]
async fn test_malformed_xml_is_logged() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/sitemap.xml", "<urlset><url><loc>".to_string()).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), false).await;

    assert!(result.urls.is_empty());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn test_unrecognized_document_is_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        "<html><body><p>Not a sitemap</p></body></html>".to_string(),
    )
    .await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), false).await;

    assert!(result.urls.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Unrecognized sitemap format"));
}

#[tokio::test]
async fn test_missing_loc_is_warning_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    let body = format!(
        "<urlset>\
           <url><lastmod>2024-01-01</lastmod></url>\
           <url><loc>{}/good</loc></url>\
           <url><loc>mailto:someone@x.com</loc></url>\
         </urlset>",
        base
    );
    mount_xml(&server, "/sitemap.xml", body).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), false).await;

    assert_eq!(result.urls.len(), 1);
    assert!(result.errors.is_empty());
    let warnings = result
        .status
        .iter()
        .filter(|line| line.starts_with("Warning: "))
        .count();
    assert_eq!(warnings, 2);
}

#[tokio::test]
async fn test_loc_shapes_and_relative_locs() {
    let server = MockServer::start().await;
    let base = server.uri();

    let body = format!(
        r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
             <sm:url><sm:loc><![CDATA[{}/cdata]]></sm:loc></sm:url>
             <sm:url><sm:loc href="{}/attr"/></sm:url>
             <sm:url><sm:loc><sm:loc>{}/nested</sm:loc></sm:loc></sm:url>
             <sm:url><sm:loc>/relative</sm:loc></sm:url>
           </sm:urlset>"#,
        base, base, base
    );
    mount_xml(&server, "/sitemap.xml", body).await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml", base), false).await;

    let urls: Vec<&str> = result.urls.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/cdata", base),
            format!("{}/attr", base),
            format!("{}/nested", base),
            format!("{}/relative", base),
        ]
    );
}

#[tokio::test]
async fn test_empty_sitemaps_are_valid() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/root.xml",
        sitemap_index(&[format!("{}/empty.xml", base)]),
    )
    .await;
    mount_xml(&server, "/empty.xml", urlset(&[])).await;

    let result = crawl(&test_config(), format!("{}/root.xml", base), false).await;

    assert!(result.urls.is_empty());
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_cyclic_index_is_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/root.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sitemap_index(&[format!("{}/a.xml", base), format!("{}/root.xml", base)]),
            "application/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sitemap_index(&[format!("{}/root.xml", base), format!("{}/leaf.xml", base)]),
            "application/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_xml(&server, "/leaf.xml", urlset(&[format!("{}/page", base)])).await;

    let result = crawl(&test_config(), format!("{}/root.xml", base), false).await;

    assert_eq!(
        source_of(&result, &format!("{}/page", base)),
        Some("root.xml=>a.xml=>leaf.xml")
    );
    assert!(result.errors.is_empty());
    let repeats = result
        .status
        .iter()
        .filter(|line| line.contains("already processed"))
        .count();
    assert_eq!(repeats, 2);
}

#[tokio::test]
async fn test_gzipped_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(urlset(&[format!("{}/zipped", base)]).as_bytes())
        .unwrap();
    let body = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-gzip"))
        .mount(&server)
        .await;

    let result = crawl(&test_config(), format!("{}/sitemap.xml.gz", base), false).await;

    assert_eq!(
        source_of(&result, &format!("{}/zipped", base)),
        Some("sitemap.xml.gz")
    );
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_invalid_entry_url_rejected() {
    let coordinator = Coordinator::new(&test_config()).unwrap();

    for bad in ["", "sitemap.xml", "notaurl://", "mailto:a@b.com"] {
        let result = coordinator.run(&CrawlRequest::new(bad)).await;
        assert!(
            matches!(result, Err(TrailError::InvalidInput(_))),
            "{:?} should be rejected",
            bad
        );
    }
}

#[tokio::test]
async fn test_discover_sitemaps_from_robots() {
    let server = MockServer::start().await;
    let base = server.uri();

    let robots = format!(
        "User-agent: *\nDisallow: /private\n\nSitemap: {}/sitemap_index.xml\nSitemap: /news.xml\nSitemap: {}/sitemap_index.xml\n",
        base, base
    );
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(robots, "text/plain"))
        .mount(&server)
        .await;

    let client = build_http_client(&test_config()).unwrap();
    let sitemaps = discover_sitemaps(&client, &format!("{}/some/page", base))
        .await
        .unwrap();

    assert_eq!(
        sitemaps,
        vec![
            format!("{}/sitemap_index.xml", base),
            format!("{}/news.xml", base),
        ]
    );
}

#[tokio::test]
async fn test_discover_without_robots() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = build_http_client(&test_config()).unwrap();
    let sitemaps = discover_sitemaps(&client, &server.uri()).await.unwrap();

    assert!(sitemaps.is_empty());
}

#[tokio::test]
async fn test_child_sitemap_fetched_at_trailing_slash_path() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/root.xml",
        sitemap_index(&[format!("{}/sitemaps/posts/", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemaps/posts/",
        urlset(&[format!("{}/post/1", base), "latest".to_string()]),
    )
    .await;

    let result = crawl(&test_config(), format!("{}/root.xml", base), false).await;

    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
    assert_eq!(
        source_of(&result, &format!("{}/post/1", base)),
        Some("root.xml=>posts")
    );
    // Relative locs resolve against the published address
    assert_eq!(
        source_of(&result, &format!("{}/sitemaps/posts/latest", base)),
        Some("root.xml=>posts")
    );
}

#[tokio::test]
async fn test_entry_sitemap_fetched_at_trailing_slash_path() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(&server, "/maps/", urlset(&[format!("{}/page", base)])).await;

    let result = crawl(&test_config(), format!("{}/maps/", base), false).await;

    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
    assert_eq!(source_of(&result, &format!("{}/page", base)), Some("maps"));
}
