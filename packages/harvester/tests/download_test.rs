//! HTTP download tests against a local mock server.
//!
//! The harvester uses the blocking reqwest client, so every call into the
//! library runs inside `spawn_blocking`.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::{SimpleFileOptions, ZipWriter};

use placsp_harvester::download::HttpDocumentFetcher;
use placsp_harvester::http::create_client;
use placsp_harvester::{
    DocumentFetcher, EntryFilter, EntryProcessor, Harvester, HarvestConfig, HarvesterError, Source,
};

fn feed_with_documents(uris: &[(&str, &str)]) -> String {
    let entries: String = uris
        .iter()
        .map(|(id, uri)| {
            format!(
                r#"<entry>
  <id>{id}</id>
  <cac-place-ext:ContractFolderStatus><cac:TechnicalDocumentReference><cac:Attachment>
    <cac:ExternalReference><cbc:URI>{uri}</cbc:URI></cac:ExternalReference>
  </cac:Attachment></cac:TechnicalDocumentReference></cac-place-ext:ContractFolderStatus>
</entry>"#
            )
        })
        .collect();

    format!(
        r#"<feed xmlns="http://www.w3.org/2005/Atom"
  xmlns:cac="urn:dgpe:names:draft:codice:schema:xsd:CommonAggregateComponents-2"
  xmlns:cbc="urn:dgpe:names:draft:codice:schema:xsd:CommonBasicComponents-2"
  xmlns:cac-place-ext="urn:dgpe:names:draft:codice-place-ext:schema:xsd:CommonAggregateComponents-2">
{entries}
</feed>"#
    )
}

fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_named_from_url_and_never_overwritten() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/pliego.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let uri = format!("{}/docs/pliego.pdf", server.uri());
    let dir = tempfile::tempdir().unwrap();
    let download_dir = dir.path().join("docs");

    let (first, second) = tokio::task::spawn_blocking(move || {
        let fetcher = HttpDocumentFetcher::new(create_client().unwrap(), &download_dir);
        let first = fetcher.fetch(&uri, "urn:1").unwrap();
        let second = fetcher.fetch(&uri, "urn:1").unwrap();
        (first, second)
    })
    .await
    .unwrap();

    assert_eq!(first, dir.path().join("docs/pliego.pdf"));
    assert_eq!(second, dir.path().join("docs/pliego_1.pdf"));
    assert_eq!(fs::read(&first).unwrap(), b"%PDF-1.4");
    assert_eq!(fs::read(&second).unwrap(), b"%PDF-1.4");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_named_from_content_disposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GetDocumentByIdServlet"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"memoria.docx\"")
                .set_body_bytes(b"docx".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/anonymous"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pdf".to_vec()))
        .mount(&server)
        .await;

    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();
    let download_dir = dir.path().to_path_buf();

    let (named, fallback) = tokio::task::spawn_blocking(move || {
        let fetcher = HttpDocumentFetcher::new(create_client().unwrap(), &download_dir);
        let named = fetcher
            .fetch(&format!("{base}/GetDocumentByIdServlet"), "urn:1")
            .unwrap();
        let fallback = fetcher
            .fetch(&format!("{base}/anonymous"), "https://x/licitacion:42")
            .unwrap();
        (named, fallback)
    })
    .await
    .unwrap();

    assert_eq!(named, dir.path().join("memoria.docx"));
    assert_eq!(fallback, dir.path().join("https___x_licitacion_42.pdf"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let uri = format!("{}/missing.pdf", server.uri());
    let dir = tempfile::tempdir().unwrap();
    let download_dir = dir.path().to_path_buf();

    let result = tokio::task::spawn_blocking(move || {
        HttpDocumentFetcher::new(create_client().unwrap(), &download_dir).fetch(&uri, "x")
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(HarvesterError::Download { .. })));
}

/// Serve one response that announces more bytes than it sends, then hang up.
fn serve_truncated_body() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.4 x")
            .unwrap();
        // Dropping the stream closes the connection mid-body
    });

    format!("http://{addr}/docs/doc.pdf")
}

#[test]
fn test_interrupted_download_leaves_no_file() {
    let uri = serve_truncated_body();
    let dir = tempfile::tempdir().unwrap();

    let fetcher = HttpDocumentFetcher::new(create_client().unwrap(), dir.path());
    let result = fetcher.fetch(&uri, "urn:1");

    assert!(result.is_err());
    let left: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert!(left.is_empty(), "unexpected files: {left:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_download_does_not_stop_processing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;

    let xml = feed_with_documents(&[
        ("urn:1", format!("{}/gone.pdf", server.uri()).as_str()),
        ("urn:2", format!("{}/ok.pdf", server.uri()).as_str()),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let download_dir = dir.path().to_path_buf();

    let processed = tokio::task::spawn_blocking(move || {
        let fetcher = HttpDocumentFetcher::new(create_client().unwrap(), &download_dir);
        let processor = EntryProcessor::new(&fetcher, Duration::ZERO);
        placsp_harvester::harvest_document(&xml, &EntryFilter::default(), &processor)
            .unwrap()
            .0
    })
    .await
    .unwrap();

    assert_eq!(processed.len(), 2);
    assert_eq!(processed[0].downloaded_file, None);
    assert_eq!(processed[1].downloaded_file, Some(dir.path().join("ok.pdf")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_from_archive_url() {
    let server = MockServer::start().await;
    let document = format!("{}/docs/doc.pdf", server.uri());
    let feed = feed_with_documents(&[("urn:1", document.as_str())]);
    let archive = zip_bytes(&[("2024/licitaciones_1.atom", feed.as_str()), ("LEEME.txt", "info")]);

    Mock::given(method("GET"))
        .and(path("/sindicacion/bundle.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .mount(&server)
        .await;

    let url = format!("{}/sindicacion/bundle.zip", server.uri());
    let dir = tempfile::tempdir().unwrap();
    let config = HarvestConfig::default()
        .with_download_dir(dir.path().join("downloaded_docs"))
        .with_extract_dir(dir.path().join("temp_extract"))
        .with_archive_file(dir.path().join("temp.zip"))
        .with_output_file(dir.path().join("extracted_data.txt"))
        .with_pacing_delay(Duration::ZERO);

    let summary = tokio::task::spawn_blocking(move || {
        let source = Source::parse(&url, false, false).unwrap();
        Harvester::new(config)
            .unwrap()
            .run(&source, &EntryFilter::default())
            .unwrap()
    })
    .await
    .unwrap();

    let stored: PathBuf = dir.path().join("downloaded_docs/doc.pdf");
    assert_eq!(summary.feed_files, 1);
    assert_eq!(summary.total_entries, 1);
    assert_eq!(summary.entries[0].downloaded_file, Some(stored.clone()));
    assert_eq!(fs::read(&stored).unwrap(), b"%PDF");

    // The downloaded archive is temporary
    assert!(!dir.path().join("temp.zip").exists());

    let report = fs::read_to_string(dir.path().join("extracted_data.txt")).unwrap();
    assert!(report.contains(&format!("Downloaded File: {}", stored.display())));
}
