//! Decoder for `Transfer-Encoding: chunked` bodies.
//!
//! Each chunk is a hexadecimal size line, the chunk bytes and a CRLF. A chunk
//! of size zero ends the body; anything after it (trailers, the final CRLF)
//! is ignored.

use strum_macros::Display;

use crate::error::ChunkedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum ChunkedState {
    /// Read the chunk size in hex
    AwaitingLength,
    /// Skip chunk extensions up to CR
    AwaitingLengthExtension,
    /// Read LF after chunk size
    AwaitingLengthLineEnd,
    /// Read chunk data
    ReadingChunk,
    /// Read CR after chunk data
    AwaitingChunkTrailerCr,
    /// Read LF after chunk data
    AwaitingChunkTrailerLf,
}

/// Byte-at-a-time chunked body decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedBodyDecoder {
    state: ChunkedState,
    /// Size announced by the current size line.
    length: u64,
    /// Bytes still to read in the current chunk.
    remaining: u64,
    content: Vec<u8>,
    finished: bool,
}

impl Default for ChunkedBodyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedBodyDecoder {
    /// Creates a decoder waiting for the first size line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ChunkedState::AwaitingLength,
            length: 0,
            remaining: 0,
            content: Vec::new(),
            finished: false,
        }
    }

    /// Process one byte of the encoded body.
    ///
    /// Bytes received after the terminating zero-size chunk are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkedError::InvalidSize`] for a byte that cannot appear in
    /// a size line and [`ChunkedError::SizeOverflow`] when the size does not
    /// fit in 64 bits.
    pub fn receive(&mut self, byte: u8) -> Result<(), ChunkedError> {
        if self.finished {
            return Ok(());
        }

        match self.state {
            ChunkedState::AwaitingLength => match byte {
                b'\r' => self.end_length_line(),
                b';' => self.state = ChunkedState::AwaitingLengthExtension,
                _ => {
                    let digit = hex_value(byte).ok_or(ChunkedError::InvalidSize(byte))?;
                    self.length = self
                        .length
                        .checked_mul(16)
                        .and_then(|length| length.checked_add(digit))
                        .ok_or(ChunkedError::SizeOverflow)?;
                }
            },
            ChunkedState::AwaitingLengthExtension => {
                if byte == b'\r' {
                    self.end_length_line();
                }
            }
            ChunkedState::AwaitingLengthLineEnd => {
                if byte == b'\n' {
                    self.remaining = self.length;
                    self.state = ChunkedState::ReadingChunk;
                }
            }
            ChunkedState::ReadingChunk => {
                self.content.push(byte);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = ChunkedState::AwaitingChunkTrailerCr;
                }
            }
            ChunkedState::AwaitingChunkTrailerCr => {
                if byte == b'\r' {
                    self.state = ChunkedState::AwaitingChunkTrailerLf;
                }
            }
            ChunkedState::AwaitingChunkTrailerLf => {
                if byte == b'\n' {
                    self.length = 0;
                    self.state = ChunkedState::AwaitingLength;
                }
            }
        }
        Ok(())
    }

    /// Feed a slice of bytes, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`ChunkedBodyDecoder::receive`].
    pub fn receive_all(&mut self, bytes: &[u8]) -> Result<(), ChunkedError> {
        bytes.iter().try_for_each(|&byte| self.receive(byte))
    }

    /// Whether the zero-size chunk has been announced.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The body decoded so far.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consume the decoder and return the decoded body.
    #[must_use]
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// CR at the end of a size line: a zero size ends the body.
    const fn end_length_line(&mut self) {
        if self.length == 0 {
            self.finished = true;
        }
        self.state = ChunkedState::AwaitingLengthLineEnd;
    }
}

fn hex_value(byte: u8) -> Option<u64> {
    char::from(byte).to_digit(16).map(u64::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIKIPEDIA: &[u8] = b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";

    #[test]
    fn test_decode_at_once() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive_all(WIKIPEDIA).unwrap();
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"Wikipedia");
    }

    #[test]
    fn test_decode_byte_by_byte() {
        let mut decoder = ChunkedBodyDecoder::new();
        for &byte in WIKIPEDIA {
            decoder.receive(byte).unwrap();
        }
        assert!(decoder.is_finished());
        assert_eq!(decoder.into_content(), b"Wikipedia".to_vec());
    }

    #[test]
    fn test_finishes_without_final_crlf() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive_all(b"3\r\nabc\r\n0\r").unwrap();
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"abc");
    }

    #[test]
    fn test_input_after_finish_is_ignored() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive_all(b"0\r\n\r\n1\r\nx\r\n").unwrap();
        assert!(decoder.is_finished());
        assert!(decoder.content().is_empty());
    }

    #[test]
    fn test_uppercase_hex_and_extension() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive_all(b"A;name=value\r\n0123456789\r\n0\r\n\r\n").unwrap();
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"0123456789");
    }

    #[test]
    fn test_chunk_data_may_contain_crlf() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive_all(b"4\r\n\r\n\r\n\r\n0\r\n\r\n").unwrap();
        assert_eq!(decoder.content(), b"\r\n\r\n");
    }

    #[test]
    fn test_invalid_size_byte() {
        let mut decoder = ChunkedBodyDecoder::new();
        assert_eq!(decoder.receive_all(b"4x"), Err(ChunkedError::InvalidSize(b'x')));
    }

    #[test]
    fn test_size_overflow() {
        let mut decoder = ChunkedBodyDecoder::new();
        assert_eq!(
            decoder.receive_all(b"10000000000000000"),
            Err(ChunkedError::SizeOverflow)
        );
    }
}
