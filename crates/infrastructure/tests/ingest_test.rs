//! End-to-end ingestion of HAR and Burp captures from disk.

use capview_application::{ApplicationError, LoadSession, SearchFilter};
use capview_domain::encoding::{decode_if_base64, encode_base64};
use capview_domain::{ContentLanguage, EntryOrigin, IngestError, PlaceholderKind, SourceFormat};
use capview_infrastructure::{
    CaptureIngestor, IngestConfig, ReconstructedExchange, RenderOptions, TokioFileSource,
    split_payloads, strip_origin,
};
use pretty_assertions::assert_eq;

const SAMPLE_HAR: &str = include_str!("fixtures/sample.har");
const SAMPLE_BURP: &str = include_str!("fixtures/sample.xml");

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_base64_round_trip_and_passthrough() {
    for sample in ["GET / HTTP/1.1\r\nHost: a\r\n\r\n", "x", "héllo"] {
        assert_eq!(decode_if_base64(&encode_base64(sample.as_bytes())), sample);
    }
    assert_eq!(decode_if_base64("not base64!"), "not base64!");
}

#[test]
fn test_strip_origin_idempotent() {
    let once = strip_origin("GET https://example.com/api?x=1 HTTP/1.1");
    assert_eq!(once, "GET /api?x=1 HTTP/1.1");
    assert_eq!(strip_origin(&once), once);
}

#[test]
fn test_split_payloads() {
    assert_eq!(split_payloads("{\"a\":1}{\"b\":2}\n"), vec!["{\"a\":1}{\"b\":2}"]);
    assert_eq!(split_payloads("{\"a\":1}\n{\"b\":2}"), vec!["{\"a\":1}", "{\"b\":2}"]);
    assert_eq!(split_payloads("{\"s\":\"}\\n{\"}"), vec!["{\"s\":\"}\\n{\"}"]);
    assert!(split_payloads("  \n ").is_empty());
}

#[test]
fn test_har_fixture() {
    let session = CaptureIngestor::new()
        .load_session(SAMPLE_HAR.as_bytes(), "sample.har")
        .expect("Should decode");

    assert_eq!(session.format, SourceFormat::Har);
    assert_eq!(session.name, "Firefox 120.0");
    assert_eq!(session.len(), 2);

    let login = &session.entries()[1];
    assert_eq!(login.request.body.raw, "user=alice&pass=secret");
    let response = login.response.as_ref().expect("response");
    assert_eq!(response.status_code, 302);
    assert_eq!(response.status_text, "Found");
    assert_eq!(response.mime_type, "application/octet-stream");
}

#[test]
fn test_har_entry_missing_url_rejects_file() {
    let good = r#"{"request":{"method":"GET","url":"https://a.test/"},"response":{"status":200}}"#;
    let bad = r#"{"request":{"method":"GET"},"response":{"status":200}}"#;
    let json = format!(r#"{{"log":{{"entries":[{good},{good},{good},{bad}]}}}}"#);

    let result = CaptureIngestor::new().load_session(json.as_bytes(), "broken.har");
    assert!(matches!(result, Err(IngestError::InvalidHarEntry { index: 3, .. })));
}

#[test]
fn test_burp_fixture_keeps_every_item() {
    let session = CaptureIngestor::new()
        .load_session(SAMPLE_BURP.as_bytes(), "sample.xml")
        .expect("Should decode");

    assert_eq!(session.format, SourceFormat::BurpXml);
    assert_eq!(session.name, "sample.xml");
    assert_eq!(session.len(), 3);
    assert_eq!(session.exported_at.as_deref(), Some("2020-03-05 16:23:39"));

    let search = &session.entries()[0];
    assert_eq!(search.request.method, "GET");
    assert_eq!(search.request.header("host"), Some("example.org"));
    assert_eq!(search.timestamp, "2020-03-05 16:20:00");
    let response = search.response.as_ref().expect("response");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.mime_type, "text/html");
    assert_eq!(search.cookies(), "session=xyz");
    match &search.origin {
        EntryOrigin::Burp(details) => {
            assert_eq!(details.host, "https://example.org");
            assert_eq!(details.path, "/search?q=rust");
            assert_eq!(details.ip, "93.184.216.34");
        }
        other => panic!("unexpected origin {other:?}"),
    }

    let post = &session.entries()[1];
    assert_eq!(post.request.body.raw, "{\"name\":\"widget\"}");
    assert!(post.response.is_none());

    let empty = &session.entries()[2];
    assert!(matches!(
        empty.origin,
        EntryOrigin::Placeholder {
            kind: PlaceholderKind::Unknown
        }
    ));
}

#[test]
fn test_short_queries_match_everything() {
    let session = CaptureIngestor::new()
        .load_session(SAMPLE_HAR.as_bytes(), "sample.har")
        .expect("Should decode");
    let filter = SearchFilter::new(2);

    assert_eq!(filter.apply(&session, "a").len(), 2);
    assert_eq!(filter.apply(&session, "").len(), 2);

    let hits = filter.apply(&session, "login");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].request.url, "https://example.com/login");
}

#[test]
fn test_cookies_joined_without_attributes() {
    let session = CaptureIngestor::new()
        .load_session(SAMPLE_HAR.as_bytes(), "sample.har")
        .expect("Should decode");
    assert_eq!(session.entries()[0].cookies(), "sid=abc; theme=dark");
    assert_eq!(session.entries()[1].cookies(), "");
}

#[tokio::test]
async fn test_load_and_reconstruct_from_disk() {
    let use_case = LoadSession::new(TokioFileSource::new(), CaptureIngestor::new());
    let output = use_case
        .execute(&fixture_path("sample.har"))
        .await
        .expect("Should load");

    assert_eq!(output.bytes_read, SAMPLE_HAR.len());
    let entry = &output.session.entries()[0];
    let exchange = ReconstructedExchange::from_entry(entry, RenderOptions::default());

    assert_eq!(exchange.request.start_line, "GET /api?x=1 HTTP/1.1");
    let response = exchange.response.expect("response");
    assert_eq!(response.start_line, "HTTP/1.1 200 OK");
    assert_eq!(response.language, ContentLanguage::Json);
    assert_eq!(response.body, "{\n  \"items\": [\n    1,\n    2\n  ],\n  \"ok\": true\n}");
}

#[tokio::test]
async fn test_oversized_capture_rejected() {
    let ingestor = CaptureIngestor::with_config(IngestConfig { max_file_size: 16 });
    let use_case = LoadSession::new(TokioFileSource::new(), ingestor);

    let result = use_case.execute(&fixture_path("sample.xml")).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Ingest(IngestError::FileTooLarge { max: 16, .. }))
    ));
}

#[test]
fn test_burp_cut_off_mid_item_is_rejected() {
    let xml = "<items><item><url>https://a.test/</url><method>GET</method></item>\
               <item><url>https://b.test/</url><method>GET</method>";
    let result = CaptureIngestor::new().load_session(xml.as_bytes(), "a.xml");
    assert!(matches!(result, Err(IngestError::InvalidBurpStructure(_))));
}

#[test]
fn test_har_null_optional_fields_keep_every_entry() {
    let json = r#"{"log":{"entries":[
        {"request":{"method":"GET","url":"https://a.test/","headers":[{"name":":authority","value":"a.test"}]},
         "response":{"status":200,"statusText":null,"content":{"size":12.0}}},
        {"request":{"method":"POST","url":"https://a.test/p","postData":{"mimeType":null,"text":"x"}},
         "response":{"status":204,"httpVersion":null}}
    ]}}"#;
    let session = CaptureIngestor::new()
        .load_session(json.as_bytes(), "nulls.har")
        .expect("Should decode");
    assert_eq!(session.len(), 2);

    let first = &session.entries()[0];
    let exchange = ReconstructedExchange::from_entry(first, RenderOptions::default());
    assert_eq!(exchange.request.headers[0].name, ":authority");
    assert_eq!(exchange.request.headers[0].value, "a.test");
    assert_eq!(first.response.as_ref().map(|r| r.content_length), Some(12));
}
