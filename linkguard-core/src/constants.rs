//! Constants and defaults for Linkguard codecs and frames

/// Checksum chunk size in bits
pub const CHECKSUM_CHUNK_BITS: usize = 16;

/// Checksum word size in bits (also the width of the checksum field)
pub const CHECKSUM_WORD_BITS: usize = 4;

/// Widest checksum word the codec accepts; folded sums are kept in a `u64`
pub const MAX_CHECKSUM_WORD_BITS: usize = 32;

/// Probability that each bit inside a burst window is flipped
pub const BURST_FLIP_PROBABILITY: f64 = 0.4;

/// Source station address carried at the front of every frame
pub const SRC_ADDR: &str = "00000001";

/// Destination station address carried after the source address
pub const DEST_ADDR: &str = "00000010";

/// Nominal codeword size in bits
pub const CODEWORD_SIZE: usize = 64;

/// Header size in bits: 8 source + 8 destination
pub const HEADER_SIZE: usize = 16;

/// Payload room inside a nominal codeword
pub const PAYLOAD_SIZE: usize = CODEWORD_SIZE - HEADER_SIZE;

/// Payload bits read from the input per frame, leaving space for the header
pub const FRAME_PAYLOAD_BITS: usize = PAYLOAD_SIZE - HEADER_SIZE;

/// Default receiver host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default receiver port
pub const DEFAULT_PORT: u16 = 3000;

/// Default probability that the sender corrupts a frame
pub const DEFAULT_ERROR_RATE: f64 = 0.2;

/// Wire field separator
pub const FIELD_SEPARATOR: char = ':';

/// Wire message terminator
pub const MESSAGE_TERMINATOR: u8 = b'\n';

/// Longest unterminated line a receiver buffers before dropping it
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Sample payload used by the scheme comparison report
pub const COMPARISON_SAMPLE: &str = "111100001111000000001111000011110000";

/// Random flip counts exercised by the comparison report
pub const COMPARISON_RANDOM_COUNTS: [usize; 3] = [1, 2, 5];

/// Burst sizes exercised by the comparison report
pub const COMPARISON_BURST_SIZES: [usize; 4] = [1, 2, 17, 20];
