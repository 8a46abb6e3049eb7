//! Integration tests for the response parser.

use kestrel_http::{ChunkedError, HttpError, ResponseParser, ResponseRecord, ResponseState};

const CHUNKED: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: text/html\r\n\
Transfer-Encoding: chunked\r\n\
\r\n\
4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";

/// Helper to parse a complete response given in one fragment
fn parse(bytes: &[u8]) -> ResponseRecord {
    let mut parser = ResponseParser::new();
    parser.feed(bytes).unwrap();
    parser.finish();
    parser.result().unwrap()
}

#[test]
fn test_chunked_response() {
    let mut parser = ResponseParser::new();
    parser.feed(CHUNKED).unwrap();
    assert!(parser.is_complete());

    let record = parser.result().unwrap();
    assert_eq!(record.status_code, 200);
    assert_eq!(record.status_text, "OK");
    assert_eq!(record.headers.get("Content-Type"), Some("text/html"));
    assert_eq!(record.headers.get("Transfer-Encoding"), Some("chunked"));
    assert_eq!(record.body, b"Wikipedia");
    assert_eq!(record.body_text(), "Wikipedia");
}

#[test]
fn test_chunked_response_byte_by_byte() {
    let mut parser = ResponseParser::new();
    for byte in CHUNKED {
        parser.feed(std::slice::from_ref(byte)).unwrap();
    }
    assert!(parser.is_complete());
    assert_eq!(parser.result().unwrap(), parse(CHUNKED));
}

#[test]
fn test_transfer_encoding_name_is_case_insensitive() {
    let record = parse(b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n2\r\nhi\r\n0\r\n\r\n");
    assert_eq!(record.body, b"hi");
    assert_eq!(record.headers.get("transfer-encoding"), Some("chunked"));
    assert_eq!(record.headers.get("Transfer-Encoding"), None);
}

#[test]
fn test_transfer_encoding_value_must_be_chunked() {
    let mut parser = ResponseParser::new();
    parser
        .feed(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: gzip, chunked\r\n\r\n2\r\nhi\r\n0\r\n\r\n")
        .unwrap();
    assert!(!parser.is_complete());
    parser.finish();
    assert_eq!(parser.result().unwrap().body, b"2\r\nhi\r\n0\r\n\r\n");
}

#[test]
fn test_multi_word_status_text() {
    let record = parse(b"HTTP/1.1 404 Not Found\r\n\r\nmissing");
    assert_eq!(record.status_code, 404);
    assert_eq!(record.status_text, "Not Found");
    assert_eq!(record.body_text(), "missing");
}

#[test]
fn test_unchunked_body_completes_on_finish() {
    let mut parser = ResponseParser::new();
    parser.feed(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhel").unwrap();
    assert!(!parser.is_complete());
    assert_eq!(parser.state(), ResponseState::AwaitingBody);
    parser.feed(b"lo").unwrap();
    parser.finish();
    assert!(parser.is_complete());
    assert_eq!(parser.result().unwrap().body, b"hello");
}

#[test]
fn test_result_before_completion_is_incomplete() {
    let mut parser = ResponseParser::new();
    assert!(matches!(parser.result(), Err(HttpError::Incomplete)));
    parser.feed(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWi").unwrap();
    assert!(matches!(parser.result(), Err(HttpError::Incomplete)));
}

#[test]
fn test_finish_does_not_complete_headers_or_chunked_body() {
    let mut parser = ResponseParser::new();
    parser.feed(b"HTTP/1.1 200 OK\r\nA: b").unwrap();
    parser.finish();
    assert!(!parser.is_complete());

    let mut parser = ResponseParser::new();
    parser.feed(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWi").unwrap();
    parser.finish();
    assert!(!parser.is_complete());
}

#[test]
fn test_malformed_status_line_reported_by_result() {
    let mut parser = ResponseParser::new();
    parser.feed(b"HTTP/2 200 OK\r\n\r\nbody").unwrap();
    parser.finish();
    match parser.result() {
        Err(HttpError::MalformedStatusLine(line)) => assert_eq!(line, "HTTP/2 200 OK"),
        other => panic!("Expected MalformedStatusLine, got {other:?}"),
    }
}

#[test]
fn test_invalid_chunk_size_fails_feed() {
    let mut parser = ResponseParser::new();
    let err = parser
        .feed(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n")
        .unwrap_err();
    assert!(matches!(err, HttpError::Chunked(ChunkedError::InvalidSize(b'z'))));
}

#[test]
fn test_bytes_after_completion_are_ignored() {
    let mut parser = ResponseParser::new();
    parser.feed(CHUNKED).unwrap();
    parser.feed(b"garbage that is not a chunk").unwrap();
    assert_eq!(parser.result().unwrap().body, b"Wikipedia");
}

#[test]
fn test_record_serializes_to_json() {
    let record = parse(CHUNKED);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["statusText"], "OK");
    assert_eq!(json["headers"]["Content-Type"], "text/html");
    assert_eq!(json["body"], "Wikipedia");
}
