//! Error types for Linkguard operations

/// Errors that can occur while encoding, injecting or parsing link frames.
///
/// A failed checksum or CRC check is not an error: `verify` reports it as
/// `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// Malformed wire message (wrong field count, bad error flag, bad codeword)
    #[error("Invalid message format: {0}")]
    Format(String),

    /// Detection method is neither `checksum` nor `crc`
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Value does not fit in the requested number of bits
    #[error("Value {value} does not fit in {width} bits")]
    Overflow {
        /// The value being converted.
        value: u64,
        /// The requested width in bits.
        width: usize,
    },

    /// Bit sequence is wider than an integer conversion supports
    #[error("Bit sequence of {0} bits is too wide for integer conversion")]
    TooWide(usize),

    /// Character other than '0' or '1' in a bit string
    #[error("Invalid bit {found:?} at position {position}")]
    InvalidBit {
        /// The offending character.
        found: char,
        /// Its index in the input.
        position: usize,
    },

    /// Generator polynomial is neither a known scheme nor a valid literal
    #[error("Invalid polynomial {0:?}: expected CRC-8/10/16/32 or a bit pattern starting with 1")]
    InvalidPolynomial(String),

    /// Codec parameters are inconsistent
    #[error("Invalid codec parameters: {0}")]
    InvalidParameters(String),

    /// Input is too short for the requested operation
    #[error("Input of {len} bits is too short: need at least {min}")]
    TooShort {
        /// Actual length in bits.
        len: usize,
        /// Minimum length in bits.
        min: usize,
    },

    /// IO error during read/write
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Io(err.to_string())
    }
}
