//! Tests for response sessions and the stream driver.

use std::io::{self, Cursor, Read, Write};

use kestrel_http::{
    HttpError, Request, ResponseSession, TransportConfig, TransportEvent, send,
};

/// In-memory connection: serves canned response bytes, records writes.
struct MockStream {
    response: Cursor<Vec<u8>>,
    written: Vec<u8>,
}

impl MockStream {
    fn new(response: &[u8]) -> Self {
        Self {
            response: Cursor::new(response.to_vec()),
            written: Vec::new(),
        }
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.response.read(buf)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Stream whose reads always fail.
struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
    }
}

impl Write for BrokenStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

const CHUNKED: &[u8] =
    b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";

fn small_buffers() -> TransportConfig {
    TransportConfig {
        buffer_size: 3,
        ..TransportConfig::default()
    }
}

// ========== session ==========

#[test]
fn test_session_returns_record_when_complete() {
    let mut session = ResponseSession::new();
    let (head, tail) = CHUNKED.split_at(30);
    assert!(session.on_event(TransportEvent::Data(head)).unwrap().is_none());
    let record = session.on_event(TransportEvent::Data(tail)).unwrap().unwrap();
    assert_eq!(record.body, b"Wikipedia");
}

#[test]
fn test_session_close_completes_unchunked_body() {
    let mut session = ResponseSession::new();
    assert!(
        session
            .on_event(TransportEvent::Data(b"HTTP/1.1 200 OK\r\n\r\nhello"))
            .unwrap()
            .is_none()
    );
    let record = session.on_event(TransportEvent::Closed).unwrap().unwrap();
    assert_eq!(record.body_text(), "hello");
}

#[test]
fn test_session_close_before_completion() {
    let mut session = ResponseSession::new();
    let _ = session
        .on_event(TransportEvent::Data(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\n"))
        .unwrap();
    assert!(matches!(
        session.on_event(TransportEvent::Closed),
        Err(HttpError::ConnectionClosed)
    ));
}

#[test]
fn test_session_surfaces_transport_errors() {
    let mut session = ResponseSession::new();
    let err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
    assert!(matches!(
        session.on_event(TransportEvent::Error(err)),
        Err(HttpError::Io(e)) if e.kind() == io::ErrorKind::TimedOut
    ));
}

// ========== send ==========

#[test]
fn test_send_writes_request_and_reads_chunked_response() {
    let request = Request::new("example.com").path("/index.html");
    let mut stream = MockStream::new(CHUNKED);
    let record = send(&request, &mut stream, &small_buffers()).unwrap();

    assert_eq!(record.status_code, 200);
    assert_eq!(record.body_text(), "Wikipedia");
    assert_eq!(stream.written, request.to_bytes().unwrap());
}

#[test]
fn test_send_reads_unchunked_body_until_close() {
    let mut stream = MockStream::new(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<p>hi</p>");
    let record = send(&Request::new("h"), &mut stream, &small_buffers()).unwrap();
    assert_eq!(record.body_text(), "<p>hi</p>");
}

#[test]
fn test_send_reports_early_close() {
    let mut stream = MockStream::new(b"HTTP/1.1 200 OK\r\n");
    assert!(matches!(
        send(&Request::new("h"), &mut stream, &TransportConfig::default()),
        Err(HttpError::ConnectionClosed)
    ));
}

#[test]
fn test_send_reports_read_errors() {
    assert!(matches!(
        send(&Request::new("h"), &mut BrokenStream, &TransportConfig::default()),
        Err(HttpError::Io(_))
    ));
}

#[test]
fn test_default_config() {
    let config = TransportConfig::default();
    assert_eq!(config.timeout.as_secs(), 30);
    assert_eq!(config.buffer_size, 4096);
}
