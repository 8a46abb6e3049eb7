use std::io;

use thiserror::Error;

/// Errors from the chunked body decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkedError {
    /// A byte that is neither a hex digit, `;` nor CR in a size line.
    #[error("invalid byte {0:#04x} in chunk size line")]
    InvalidSize(u8),
    /// The announced chunk size does not fit in 64 bits.
    #[error("chunk size overflows 64 bits")]
    SizeOverflow,
}

/// Errors from parsing, sending or receiving an HTTP response.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The response has not been completely received yet.
    #[error("response is incomplete")]
    Incomplete,
    /// The status line is not `HTTP/1.1 <code> <text>`.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
    /// The chunked body could not be decoded.
    #[error("invalid chunked body: {0}")]
    Chunked(#[from] ChunkedError),
    /// The request body could not be encoded for its content type.
    #[error("cannot encode request body: {0}")]
    Encode(String),
    /// The transport closed before the response was complete.
    #[error("connection closed before the response was complete")]
    ConnectionClosed,
    /// The transport reported an I/O error.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}
