//! Folded ones'-complement checksum over fixed-size chunks
//!
//! Each `chunk_size`-bit chunk is split into `word_size`-bit words which are
//! summed with end-around carry. The complement of the folded sum is appended
//! to its chunk, so a codeword is a run of `chunk_size + word_size`-bit blocks.
//!
//! Padding is not symmetric: [`ChecksumCodec::generate`] left-pads the payload
//! to a multiple of `chunk_size`, while [`ChecksumCodec::verify`] left-pads
//! the codeword to a multiple of `chunk_size + word_size`. Senders and
//! receivers on the wire depend on exactly this behaviour.

use crate::bits::BitString;
use crate::constants::{CHECKSUM_CHUNK_BITS, CHECKSUM_WORD_BITS, MAX_CHECKSUM_WORD_BITS};
use crate::error::LinkError;
use serde::{Deserialize, Serialize};
#[cfg(feature = "logging")]
use tracing::trace;

/// Checksum generator and verifier with fixed chunk and word sizes
///
/// Deserialization goes through [`ChecksumCodec::new`], so a decoded codec
/// always has valid sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CodecSizes")]
pub struct ChecksumCodec {
    chunk_size: usize,
    word_size: usize,
}

/// Unchecked serde shape of [`ChecksumCodec`]
#[derive(Deserialize)]
struct CodecSizes {
    chunk_size: usize,
    word_size: usize,
}

impl TryFrom<CodecSizes> for ChecksumCodec {
    type Error = LinkError;

    fn try_from(sizes: CodecSizes) -> Result<Self, Self::Error> {
        Self::new(sizes.chunk_size, sizes.word_size)
    }
}

impl Default for ChecksumCodec {
    fn default() -> Self {
        Self {
            chunk_size: CHECKSUM_CHUNK_BITS,
            word_size: CHECKSUM_WORD_BITS,
        }
    }
}

impl ChecksumCodec {
    /// Create a codec with custom sizes.
    ///
    /// `chunk_size` must be a non-zero multiple of `word_size`, and
    /// `word_size` must lie in `1..=32`.
    pub fn new(chunk_size: usize, word_size: usize) -> Result<Self, LinkError> {
        if word_size == 0 || word_size > MAX_CHECKSUM_WORD_BITS {
            return Err(LinkError::InvalidParameters(format!(
                "word size {} outside 1..={}",
                word_size, MAX_CHECKSUM_WORD_BITS
            )));
        }
        if chunk_size == 0 || chunk_size % word_size != 0 {
            return Err(LinkError::InvalidParameters(format!(
                "chunk size {} is not a non-zero multiple of word size {}",
                chunk_size, word_size
            )));
        }
        Ok(Self {
            chunk_size,
            word_size,
        })
    }

    /// Chunk size in bits
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Word size in bits, also the width of each checksum field
    pub const fn word_size(&self) -> usize {
        self.word_size
    }

    /// Size of one chunk plus its checksum field
    pub const fn block_size(&self) -> usize {
        self.chunk_size + self.word_size
    }

    /// Length of the codeword produced for a payload of `payload_len` bits
    pub fn codeword_len(&self, payload_len: usize) -> usize {
        let chunks = payload_len.div_ceil(self.chunk_size);
        chunks * self.block_size()
    }

    /// Append a complemented folded-sum field to every chunk of `payload`.
    ///
    /// The empty payload produces the empty codeword.
    pub fn generate(&self, payload: &BitString) -> Result<BitString, LinkError> {
        let padded = payload.pad_left(self.chunk_size);
        let mut out = BitString::new();

        for chunk in padded.chunks(self.chunk_size) {
            let sum = self.folded_sum(chunk);
            let field = BitString::from_u64(sum, self.word_size)?.complement();

            #[cfg(feature = "logging")]
            trace!(sum, field = %field, "checksum chunk");

            out.extend_from_slice(chunk);
            out.extend_from_slice(field.as_slice());
        }

        Ok(out)
    }

    /// Check every `chunk_size + word_size` block of `codeword`.
    ///
    /// A block is valid when the folded sum of all its words is all ones.
    /// The empty codeword has no blocks and is valid.
    pub fn verify(&self, codeword: &BitString) -> bool {
        let padded = codeword.pad_left(self.block_size());
        let all_ones = self.word_mask();

        for block in padded.chunks(self.block_size()) {
            let sum = self.folded_sum(block);
            if sum != all_ones {
                #[cfg(feature = "logging")]
                trace!(sum, "checksum mismatch");
                return false;
            }
        }

        true
    }

    /// Sum the words of `bits` and fold carries until the sum fits in a word
    fn folded_sum(&self, bits: &[bool]) -> u64 {
        let sum = bits
            .chunks(self.word_size)
            .map(|word| word.iter().fold(0u64, |acc, &b| (acc << 1) | u64::from(b)))
            .sum();
        self.fold(sum)
    }

    /// End-around carry, applied until no carry remains
    fn fold(&self, mut sum: u64) -> u64 {
        let mask = self.word_mask();
        while sum > mask {
            sum = (sum >> self.word_size) + (sum & mask);
        }
        sum
    }

    fn word_mask(&self) -> u64 {
        (1u64 << self.word_size) - 1
    }
}
