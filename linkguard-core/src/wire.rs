//! Text wire format: `method:polynomial:error:codeword\n`
//!
//! Messages are newline-terminated ASCII lines. The polynomial field is empty
//! for checksum messages. The error field is the sender's ground truth (`1`
//! when it injected corruption) and is only used for scoring, never for
//! verification.

use crate::bits::BitString;
use crate::constants::{FIELD_SEPARATOR, MAX_LINE_BYTES, MESSAGE_TERMINATOR};
use crate::error::LinkError;
use crate::scheme::{DetectionScheme, Method};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Size of each read from a transport stream
const READ_CHUNK: usize = 1024;

/// One decoded wire message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Detection method
    pub method: Method,
    /// Polynomial text as sent (scheme name or literal), empty for checksum
    pub polynomial: String,
    /// Whether the sender corrupted the codeword
    pub error: bool,
    /// Transmitted codeword
    pub codeword: BitString,
}

impl WireMessage {
    /// Create a message
    pub fn new(
        method: Method,
        polynomial: impl Into<String>,
        error: bool,
        codeword: BitString,
    ) -> Self {
        Self {
            method,
            polynomial: polynomial.into(),
            error,
            codeword,
        }
    }

    /// Parse one line, without its terminator.
    ///
    /// The line is split into at most four fields on ':'. Fewer fields, an
    /// error flag other than `0`/`1`, or a codeword with non-bit characters
    /// is a [`LinkError::Format`]; an unrecognised method is
    /// [`LinkError::UnknownMethod`].
    pub fn parse(line: &str) -> Result<Self, LinkError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.splitn(4, FIELD_SEPARATOR).collect();
        let &[method, polynomial, error, codeword] = fields.as_slice() else {
            return Err(LinkError::Format(format!(
                "expected 4 fields, got {}: {:?}",
                fields.len(),
                line
            )));
        };

        let method: Method = method.parse()?;
        let error = match error {
            "0" => false,
            "1" => true,
            other => {
                return Err(LinkError::Format(format!("bad error flag {:?}", other)));
            }
        };
        let codeword: BitString = codeword
            .parse()
            .map_err(|e| LinkError::Format(format!("bad codeword: {}", e)))?;

        Ok(Self::new(method, polynomial, error, codeword))
    }

    /// Encode as a terminated wire line
    pub fn encode(&self) -> Bytes {
        let polynomial = self.polynomial.as_bytes();
        let mut buf = BytesMut::with_capacity(self.codeword.len() + polynomial.len() + 16);
        buf.put_slice(self.method.as_str().as_bytes());
        buf.put_u8(FIELD_SEPARATOR as u8);
        buf.put_slice(polynomial);
        buf.put_u8(FIELD_SEPARATOR as u8);
        buf.put_u8(if self.error { b'1' } else { b'0' });
        buf.put_u8(FIELD_SEPARATOR as u8);
        buf.put_slice(self.codeword.to_string().as_bytes());
        buf.put_u8(MESSAGE_TERMINATOR);
        buf.freeze()
    }

    /// Resolve the detection scheme this message names
    pub fn scheme(&self) -> Result<DetectionScheme, LinkError> {
        DetectionScheme::resolve(self.method, &self.polynomial)
    }

    /// Verify the codeword with the scheme this message names
    pub fn verify(&self) -> Result<bool, LinkError> {
        Ok(self.scheme()?.verify(&self.codeword))
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.method,
            self.polynomial,
            u8::from(self.error),
            self.codeword
        )
    }
}

/// Reassembles newline-terminated messages from arbitrarily split byte chunks
///
/// A line that grows past `max_line` bytes without a terminator is dropped
/// up to its next terminator, and the overflow is reported once by
/// [`LineFramer::push`].
#[derive(Debug)]
pub struct LineFramer {
    buf: BytesMut,
    max_line: usize,
    skipping: bool,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }
}

impl LineFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty framer with a custom line length limit
    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max_line,
            skipping: false,
        }
    }

    /// Append received bytes.
    ///
    /// Returns [`LinkError::Format`] when the pending unterminated line
    /// exceeds the limit. Complete lines already buffered stay available.
    pub fn push(&mut self, mut data: &[u8]) -> Result<(), LinkError> {
        if self.skipping {
            match memchr::memchr(MESSAGE_TERMINATOR, data) {
                Some(pos) => {
                    data = &data[pos + 1..];
                    self.skipping = false;
                }
                None => return Ok(()),
            }
        }

        self.buf.extend_from_slice(data);

        let start = memchr::memrchr(MESSAGE_TERMINATOR, &self.buf).map_or(0, |pos| pos + 1);
        let pending = self.buf.len() - start;
        if pending > self.max_line {
            self.buf.truncate(start);
            self.skipping = true;
            return Err(LinkError::Format(format!(
                "line exceeds {} bytes without a terminator",
                self.max_line
            )));
        }
        Ok(())
    }

    /// Next complete, non-blank line, without its terminator
    pub fn next_line(&mut self) -> Option<String> {
        while let Some(pos) = memchr::memchr(MESSAGE_TERMINATOR, &self.buf) {
            let line = self.buf.split_to(pos);
            self.buf.advance(1);
            let text = String::from_utf8_lossy(&line);
            if !text.trim().is_empty() {
                return Some(text.into_owned());
            }
        }
        None
    }

    /// Bytes received after the last terminator
    pub fn remainder(&self) -> &[u8] {
        &self.buf
    }
}

/// Iterator over the messages of a byte stream (socket, file, buffer)
pub struct MessageReader<R> {
    reader: R,
    framer: LineFramer,
    done: bool,
}

impl<R: Read> MessageReader<R> {
    /// Wrap a byte stream
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            framer: LineFramer::new(),
            done: false,
        }
    }

    /// Unterminated bytes left once the stream ended
    pub fn remainder(&self) -> &[u8] {
        self.framer.remainder()
    }
}

impl<R: Read> Iterator for MessageReader<R> {
    type Item = Result<String, LinkError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(line) = self.framer.next_line() {
                return Some(Ok(line));
            }
            if self.done {
                return None;
            }
            match self.reader.read(&mut chunk) {
                Ok(0) => self.done = true,
                Ok(n) => {
                    if let Err(e) = self.framer.push(&chunk[..n]) {
                        return Some(Err(e));
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
