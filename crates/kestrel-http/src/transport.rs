//! Blocking transport: write a request, pump reads into a response parser.
//!
//! The parser itself does no I/O. [`ResponseSession`] adapts transport
//! events (data, close, error) to parser calls, so any byte source can
//! drive it; [`send`] and [`send_tcp`] are the stock drivers.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::HttpError;
use crate::parser::{ResponseParser, ResponseRecord};
use crate::request::Request;

/// Connection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Connect, read and write timeout.
    pub timeout: Duration,
    /// Size of the read buffer, i.e. the largest fragment handed to the parser.
    pub buffer_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            buffer_size: 4096,
        }
    }
}

/// Something that happened on the connection.
#[derive(Debug)]
pub enum TransportEvent<'a> {
    /// Bytes arrived.
    Data(&'a [u8]),
    /// The peer closed the connection.
    Closed,
    /// The connection failed.
    Error(io::Error),
}

/// One response being received.
#[derive(Debug, Default)]
pub struct ResponseSession {
    parser: ResponseParser,
}

impl ResponseSession {
    /// A session waiting for the first byte.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parser: ResponseParser::new(),
        }
    }

    /// The underlying parser.
    #[must_use]
    pub const fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    /// Handle a transport event.
    ///
    /// Returns the record once the response is complete, `None` while more
    /// data is needed.
    ///
    /// # Errors
    ///
    /// - [`HttpError::ConnectionClosed`] if the connection closes first
    /// - [`HttpError::Io`] for a transport error
    /// - parser errors from [`ResponseParser::feed`] and
    ///   [`ResponseParser::result`]
    pub fn on_event(&mut self, event: TransportEvent<'_>) -> Result<Option<ResponseRecord>, HttpError> {
        match event {
            TransportEvent::Data(bytes) => {
                self.parser.feed(bytes)?;
                if self.parser.is_complete() {
                    return self.parser.result().map(Some);
                }
                Ok(None)
            }
            TransportEvent::Closed => {
                self.parser.finish();
                if self.parser.is_complete() {
                    self.parser.result().map(Some)
                } else {
                    Err(HttpError::ConnectionClosed)
                }
            }
            TransportEvent::Error(err) => Err(HttpError::Io(err)),
        }
    }
}

/// Write `request` to `stream` and read until the response is complete.
///
/// # Errors
///
/// Returns encoding, I/O and parse errors, and
/// [`HttpError::ConnectionClosed`] if the stream ends early.
pub fn send<S: Read + Write>(
    request: &Request,
    stream: &mut S,
    config: &TransportConfig,
) -> Result<ResponseRecord, HttpError> {
    stream.write_all(&request.to_bytes()?)?;
    stream.flush()?;

    let mut session = ResponseSession::new();
    let mut buffer = vec![0u8; config.buffer_size.max(1)];
    loop {
        let event = match stream.read(&mut buffer) {
            Ok(0) => TransportEvent::Closed,
            Ok(n) => TransportEvent::Data(&buffer[..n]),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => TransportEvent::Error(err),
        };
        if let Some(record) = session.on_event(event)? {
            return Ok(record);
        }
    }
}

/// Connect to `request.host:request.port` over TCP and [`send`] the request.
///
/// # Errors
///
/// Returns [`HttpError::Io`] if the host cannot be resolved or reached, and
/// anything [`send`] returns.
pub fn send_tcp(request: &Request, config: &TransportConfig) -> Result<ResponseRecord, HttpError> {
    let address = (request.host.as_str(), request.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| {
            io::Error::new(
                ErrorKind::NotFound,
                format!("no address for {}:{}", request.host, request.port),
            )
        })?;

    let mut stream = TcpStream::connect_timeout(&address, config.timeout)?;
    stream.set_read_timeout(Some(config.timeout))?;
    stream.set_write_timeout(Some(config.timeout))?;
    send(request, &mut stream, config)
}
