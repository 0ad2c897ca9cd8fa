use std::sync::Arc;
use std::time::Duration;

use coverfind_client::{BatchProcessor, CoverPipeline};
use coverfind_core::{AppConfig, CoverRequest, CoverResult};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0orwell-cover";

fn config(server: &MockServer, covers_dir: &std::path::Path) -> AppConfig {
    let uri = server.uri();
    AppConfig {
        covers_dir: covers_dir.to_path_buf(),
        catalog_search_url: format!("{uri}/search.json"),
        cover_id_url: format!("{uri}/b/id"),
        cover_isbn_url: format!("{uri}/b/isbn"),
        volumes_api_url: format!("{uri}/books/v1/volumes"),
        image_search_url: format!("{uri}/images/search"),
        search_timeout_ms: 2000,
        scrape_timeout_ms: 2000,
        download_timeout_ms: 2000,
        validate_timeout_ms: 2000,
        batch_delay_ms: 0,
        ..AppConfig::default()
    }
}

fn orwell() -> CoverRequest {
    CoverRequest::new("1984", vec!["George Orwell".to_string()])
}

#[tokio::test]
async fn test_resolve_then_reuse_stored_cover() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", r#"title:"1984" author:"George Orwell""#))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"numFound": 1, "start": 0, "numFoundExact": true, "num_found": 1, "docs": [{"title": "1984", "cover_i": 12345}]}"#),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b/id/12345-M.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG).insert_header("content-type", "image/jpeg"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let covers = tmp.path().join("public").join("covers");
    let pipeline = CoverPipeline::from_config(&config(&mock_server, &covers)).unwrap();

    let found = pipeline.search_cover(&orwell()).await;
    assert_eq!(found.cover_url, Some(format!("{}/b/id/12345-M.jpg", mock_server.uri())));
    assert!(found.local_path.is_none());

    let stored = pipeline.materialize(found).await;
    assert_eq!(stored.local_path.as_deref(), Some("/covers/1984_by_george_orwell.jpg"));
    assert_eq!(std::fs::read(covers.join("1984_by_george_orwell.jpg")).unwrap(), JPEG);

    let again = pipeline.resolve_and_store(&orwell()).await;
    assert_eq!(again, stored);
}

#[tokio::test]
async fn test_failing_catalog_falls_through_to_volumes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", r#"intitle:"1984" inauthor:"George Orwell""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"items": [{"volumeInfo": {"imageLinks": {"thumbnail": "http://books.example.com/1984.jpg"}}}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let pipeline = CoverPipeline::from_config(&config(&mock_server, tmp.path())).unwrap();

    let result = pipeline.search_cover(&orwell()).await;
    assert_eq!(result.cover_url.as_deref(), Some("https://books.example.com/1984.jpg"));
}

#[tokio::test]
async fn test_batch_keeps_unfound_items() {
    let mock_server = MockServer::start().await;

    let tmp = tempfile::tempdir().unwrap();
    let config = config(&mock_server, tmp.path());
    let pipeline = Arc::new(CoverPipeline::from_config(&config).unwrap());
    let processor = BatchProcessor::new(pipeline, Duration::ZERO);

    let requests = vec![
        CoverRequest::new("A Book Nobody Has Heard Of", vec!["Anonymous".to_string()]),
        CoverRequest::new("Another Lost Title", vec![]),
    ];
    let report = processor.process_all(requests.clone()).await;

    assert_eq!(report.results, requests.iter().map(CoverResult::empty).collect::<Vec<_>>());
    assert_eq!(report.stored, 0);
    assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
}
