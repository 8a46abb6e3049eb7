//! HTTP/1.1 client pieces for Kestrel.
//!
//! - [`ResponseParser`]: incremental response parser, fed raw bytes in
//!   fragments of any size
//! - [`ChunkedBodyDecoder`]: chunked transfer-encoding decoder
//! - [`Request`]: request formatting with JSON or form-encoded bodies
//! - [`transport`]: blocking drivers over any `Read + Write` stream or TCP
//!
//! # Not Implemented
//!
//! - `Content-Length` bounded bodies (unchunked bodies end at close)
//! - Header folding and trailers
//! - Keep-alive and redirects

/// Chunked transfer-encoding decoder.
pub mod chunked;
/// Error types.
pub mod error;
/// Response parser and response record.
pub mod parser;
/// Request formatting.
pub mod request;
/// Connection handling.
pub mod transport;

pub use chunked::ChunkedBodyDecoder;
pub use error::{ChunkedError, HttpError};
pub use parser::{HeaderMap, ResponseParser, ResponseRecord, ResponseState};
pub use request::{DEFAULT_CONTENT_TYPE, Request};
pub use transport::{ResponseSession, TransportConfig, TransportEvent, send, send_tcp};
