//! Incremental HTTP/1.1 response parser.
//!
//! The parser is fed raw bytes in fragments of any size and split at any
//! point. Headers are committed when their terminating CR arrives; the body
//! is either chunked (complete when the zero-size chunk is seen) or read
//! until the caller signals end of stream with [`ResponseParser::finish`].

use std::collections::BTreeMap;

use kestrel_common::warning::warn_once;
use serde::Serialize;
use strum_macros::Display;

use crate::chunked::ChunkedBodyDecoder;
use crate::error::HttpError;

/// Header name to value, names kept exactly as received.
///
/// A later header with the same name replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderMap(BTreeMap<String, String>);

impl HeaderMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a header, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Value for an exact header name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value for a header name compared ASCII-case-insensitively.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A fully received response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    /// Numeric status code.
    pub status_code: u16,
    /// Reason phrase after the code.
    pub status_text: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body bytes, dechunked if the response was chunked.
    #[serde(serialize_with = "serialize_body")]
    pub body: Vec<u8>,
}

impl ResponseRecord {
    /// The body decoded as UTF-8, invalid sequences replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn serialize_body<S: serde::Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}

/// Position of the parser in the response grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResponseState {
    /// Reading the status line.
    AwaitingStatusLine,
    /// Saw CR after the status line, waiting for LF.
    AwaitingStatusLineEnd,
    /// Reading a header name, or the blank line ending the headers.
    AwaitingHeaderName,
    /// After `:`, expecting a space.
    AwaitingHeaderSpace,
    /// Reading a header value.
    AwaitingHeaderValue,
    /// Saw CR after a header, waiting for LF.
    AwaitingHeaderLineEnd,
    /// Saw CR of the blank line, waiting for LF.
    AwaitingHeaderBlockEnd,
    /// Reading the body.
    AwaitingBody,
    /// The response is complete; further input is ignored.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyDecoder {
    Chunked(ChunkedBodyDecoder),
    /// Read verbatim until the stream ends.
    UntilClose(Vec<u8>),
}

/// Incremental response parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseParser {
    state: ResponseState,
    status_line: Vec<u8>,
    headers: HeaderMap,
    header_name: Vec<u8>,
    header_value: Vec<u8>,
    body: Option<BodyDecoder>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    /// Create a parser waiting for the status line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ResponseState::AwaitingStatusLine,
            status_line: Vec::new(),
            headers: HeaderMap::new(),
            header_name: Vec::new(),
            header_value: Vec::new(),
            body: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ResponseState {
        self.state
    }

    /// Headers committed so far.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether the whole response has been received.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == ResponseState::Complete
    }

    /// Feed a fragment of the response stream.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Chunked`] when a chunk size line is malformed.
    /// The parser should be discarded after an error.
    pub fn feed(&mut self, fragment: &[u8]) -> Result<(), HttpError> {
        for &byte in fragment {
            if self.is_complete() {
                break;
            }
            self.receive(byte)?;
        }
        Ok(())
    }

    /// Signal end of stream.
    ///
    /// Completes a response whose body is read until close. A chunked body
    /// that has not seen its zero-size chunk stays incomplete.
    pub fn finish(&mut self) {
        if self.state == ResponseState::AwaitingBody
            && matches!(self.body, Some(BodyDecoder::UntilClose(_)))
        {
            self.state = ResponseState::Complete;
        }
    }

    /// Build the response record.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Incomplete`] before the response is complete and
    /// [`HttpError::MalformedStatusLine`] if the status line does not match
    /// `HTTP/1.1 <digits> <text>`.
    pub fn result(&self) -> Result<ResponseRecord, HttpError> {
        if !self.is_complete() {
            return Err(HttpError::Incomplete);
        }

        let status_line = String::from_utf8_lossy(&self.status_line).into_owned();
        let Some((status_code, status_text)) = parse_status_line(&status_line) else {
            return Err(HttpError::MalformedStatusLine(status_line));
        };

        let body = match &self.body {
            Some(BodyDecoder::Chunked(decoder)) => decoder.content().to_vec(),
            Some(BodyDecoder::UntilClose(body)) => body.clone(),
            None => Vec::new(),
        };

        Ok(ResponseRecord {
            status_code,
            status_text: status_text.to_string(),
            headers: self.headers.clone(),
            body,
        })
    }

    fn receive(&mut self, byte: u8) -> Result<(), HttpError> {
        match self.state {
            ResponseState::AwaitingStatusLine => match byte {
                b'\r' => self.state = ResponseState::AwaitingStatusLineEnd,
                b'\n' => self.state = ResponseState::AwaitingHeaderName,
                _ => self.status_line.push(byte),
            },
            ResponseState::AwaitingStatusLineEnd => {
                if byte == b'\n' {
                    self.state = ResponseState::AwaitingHeaderName;
                }
            }
            ResponseState::AwaitingHeaderName => match byte {
                b':' => self.state = ResponseState::AwaitingHeaderSpace,
                b'\r' => {
                    if !self.header_name.is_empty() {
                        warn_once("HTTP Parser", "header line without ':' dropped");
                        self.header_name.clear();
                    }
                    self.state = ResponseState::AwaitingHeaderBlockEnd;
                }
                _ => self.header_name.push(byte),
            },
            ResponseState::AwaitingHeaderSpace => match byte {
                b' ' => self.state = ResponseState::AwaitingHeaderValue,
                b'\r' => {
                    self.commit_header();
                    self.state = ResponseState::AwaitingHeaderLineEnd;
                }
                _ => {
                    // No space after the colon; the byte starts the value.
                    self.header_value.push(byte);
                    self.state = ResponseState::AwaitingHeaderValue;
                }
            },
            ResponseState::AwaitingHeaderValue => match byte {
                b'\r' => {
                    self.commit_header();
                    self.state = ResponseState::AwaitingHeaderLineEnd;
                }
                _ => self.header_value.push(byte),
            },
            ResponseState::AwaitingHeaderLineEnd => {
                if byte == b'\n' {
                    self.state = ResponseState::AwaitingHeaderName;
                }
            }
            ResponseState::AwaitingHeaderBlockEnd => {
                if byte == b'\n' {
                    self.start_body();
                }
            }
            ResponseState::AwaitingBody => self.receive_body(byte)?,
            ResponseState::Complete => {}
        }
        Ok(())
    }

    fn commit_header(&mut self) {
        let name = String::from_utf8_lossy(&self.header_name).into_owned();
        let value = String::from_utf8_lossy(&self.header_value).into_owned();
        if self.headers.insert(name, value).is_some() {
            warn_once("HTTP Parser", "repeated header replaced the earlier value");
        }
        self.header_name.clear();
        self.header_value.clear();
    }

    fn start_body(&mut self) {
        // Header keys are stored as received, but the Transfer-Encoding
        // lookup ignores case so `transfer-encoding: chunked` is dechunked too.
        let chunked = self
            .headers
            .get_ignore_case("Transfer-Encoding")
            .is_some_and(|value| value == "chunked");
        self.body = Some(if chunked {
            BodyDecoder::Chunked(ChunkedBodyDecoder::new())
        } else {
            BodyDecoder::UntilClose(Vec::new())
        });
        self.state = ResponseState::AwaitingBody;
    }

    fn receive_body(&mut self, byte: u8) -> Result<(), HttpError> {
        match &mut self.body {
            Some(BodyDecoder::Chunked(decoder)) => {
                decoder.receive(byte)?;
                if decoder.is_finished() {
                    self.state = ResponseState::Complete;
                }
            }
            Some(BodyDecoder::UntilClose(body)) => body.push(byte),
            None => {}
        }
        Ok(())
    }
}

/// Split `HTTP/1.1 <digits> <text>` into code and text.
fn parse_status_line(line: &str) -> Option<(u16, &str)> {
    let rest = line.strip_prefix("HTTP/1.1 ")?;
    let (code, text) = rest.split_once(' ')?;
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) || text.is_empty() {
        return None;
    }
    Some((code.parse().ok()?, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_forms() {
        assert_eq!(parse_status_line("HTTP/1.1 200 OK"), Some((200, "OK")));
        assert_eq!(
            parse_status_line("HTTP/1.1 404 Not Found"),
            Some((404, "Not Found"))
        );
        assert_eq!(parse_status_line("HTTP/1.0 200 OK"), None);
        assert_eq!(parse_status_line("HTTP/1.1 200"), None);
        assert_eq!(parse_status_line("HTTP/1.1 200 "), None);
        assert_eq!(parse_status_line("HTTP/1.1 2x0 OK"), None);
        assert_eq!(parse_status_line("HTTP/1.1 99999 Big"), None);
    }

    #[test]
    fn test_header_without_space() {
        let mut parser = ResponseParser::new();
        parser.feed(b"HTTP/1.1 200 OK\r\nX:y\r\nEmpty:\r\n\r\n").unwrap();
        assert_eq!(parser.headers().get("X"), Some("y"));
        assert_eq!(parser.headers().get("Empty"), Some(""));
        assert_eq!(parser.state(), ResponseState::AwaitingBody);
    }

    #[test]
    fn test_bare_lf_after_status_line() {
        let mut parser = ResponseParser::new();
        parser.feed(b"HTTP/1.1 204 No Content\nA: b\r\n\r\n").unwrap();
        parser.finish();
        let record = parser.result().unwrap();
        assert_eq!(record.status_code, 204);
        assert_eq!(record.headers.get("A"), Some("b"));
    }

    #[test]
    fn test_repeated_header_replaces_value() {
        let mut parser = ResponseParser::new();
        parser.feed(b"HTTP/1.1 200 OK\r\nA: 1\r\nA: 2\r\n\r\n").unwrap();
        assert_eq!(parser.headers().get("A"), Some("2"));
        assert_eq!(parser.headers().len(), 1);
    }
}
