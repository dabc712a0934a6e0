//! # Linkguard Core
//!
//! Link-layer error detection: a folded ones'-complement checksum, CRC with a
//! selectable generator polynomial, and bit-error injection for measuring how
//! well each code catches corruption.
//!
//! ## Modules
//!
//! - `bits`: Owned bit strings and integer/bit conversion
//! - `constants`: Codec defaults, frame header and transport defaults
//! - `checksum`: Checksum generation and verification
//! - `crc`: CRC polynomials, modulo-2 division, generation and verification
//! - `inject`: Random, burst, odd-count and undetectable error injection
//! - `scheme`: Method selection shared by sender and receiver
//! - `frame`: Sender-side frame construction
//! - `wire`: `method:polynomial:error:codeword` message codec and line framing
//! - `stats`: Receiver-side detection scoring
//! - `report`: Checksum vs CRC comparison under every error family

#![warn(missing_docs)]

pub mod bits;
pub mod checksum;
pub mod constants;
pub mod crc;
pub mod error;
pub mod frame;
pub mod inject;
pub mod report;
pub mod scheme;
pub mod stats;
pub mod wire;

// Re-export commonly used types
pub use bits::BitString;
pub use checksum::ChecksumCodec;
pub use crc::{CrcScheme, Polynomial};
pub use error::LinkError;
pub use inject::ErrorModel;
pub use scheme::{DetectionScheme, Method};
pub use wire::WireMessage;

/// Result type alias for Linkguard operations
pub type Result<T> = core::result::Result<T, LinkError>;
