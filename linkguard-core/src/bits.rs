//! Owned bit sequences and the integer/bit conversions the codecs rely on.
//!
//! A [`BitString`] is an ordered run of bits whose length is significant:
//! leading zeros are kept, never normalised away. The textual form is the
//! wire form, one ASCII '0' or '1' per bit, most significant bit first.

use crate::error::LinkError;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// An owned, length-preserving sequence of bits
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BitString(Vec<bool>);

impl BitString {
    /// Create an empty bit string
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a bit string of `len` zero bits
    pub fn zeros(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Parse '0'/'1' text, skipping ASCII whitespace.
    ///
    /// Used for payload files where bits may be wrapped across lines.
    pub fn from_text(text: &str) -> Result<Self, LinkError> {
        let mut bits = Vec::with_capacity(text.len());
        for (position, c) in text.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                c if c.is_ascii_whitespace() => {}
                found => return Err(LinkError::InvalidBit { found, position }),
            }
        }
        Ok(Self(bits))
    }

    /// Expand raw bytes into bits, most significant bit of each byte first
    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytes
            .iter()
            .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
            .collect()
    }

    /// Render `value` as exactly `width` bits, zero-padded on the left.
    ///
    /// Fails with [`LinkError::Overflow`] when `value` needs more than `width` bits.
    pub fn from_u64(value: u64, width: usize) -> Result<Self, LinkError> {
        let needed = (u64::BITS - value.leading_zeros()) as usize;
        if needed > width {
            return Err(LinkError::Overflow { value, width });
        }
        Ok((0..width)
            .rev()
            .map(|shift| shift < 64 && (value >> shift) & 1 == 1)
            .collect())
    }

    /// Big-endian conversion to an unsigned integer
    pub fn to_u64(&self) -> Result<u64, LinkError> {
        bits_to_u64(&self.0)
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence holds no bits
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the bits as a slice
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Bit at `index`, if in range
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    /// Iterate over the bits, most significant first
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// Whether every bit is zero (true for the empty string)
    pub fn is_all_zeros(&self) -> bool {
        !self.0.iter().any(|&b| b)
    }

    /// Invert the bit at `index` in place.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn flip(&mut self, index: usize) {
        self.0[index] = !self.0[index];
    }

    /// Append bits to the end
    pub fn extend_from_slice(&mut self, bits: &[bool]) {
        self.0.extend_from_slice(bits);
    }

    /// Concatenate `self` and `other` into a new bit string
    pub fn concat(&self, other: &BitString) -> BitString {
        let mut out = Vec::with_capacity(self.len() + other.len());
        out.extend_from_slice(&self.0);
        out.extend_from_slice(&other.0);
        Self(out)
    }

    /// Bitwise complement
    pub fn complement(&self) -> BitString {
        self.iter().map(|b| !b).collect()
    }

    /// Prepend the fewest zero bits that make the length a multiple of `block_size`.
    ///
    /// Already aligned input (including the empty string) is returned unchanged.
    /// A zero `block_size` is treated as already aligned.
    pub fn pad_left(&self, block_size: usize) -> BitString {
        if block_size == 0 || self.len() % block_size == 0 {
            return self.clone();
        }
        let pad = block_size - self.len() % block_size;
        let mut out = Vec::with_capacity(self.len() + pad);
        out.resize(pad, false);
        out.extend_from_slice(&self.0);
        Self(out)
    }

    /// Non-overlapping slices of `size` bits, left to right.
    ///
    /// The final slice is short unless the string was padded to `size` first.
    ///
    /// # Panics
    /// Panics if `size` is zero.
    pub fn chunks(&self, size: usize) -> impl Iterator<Item = &[bool]> + '_ {
        self.0.chunks(size)
    }

    /// Number of positions where `self` and `other` differ.
    ///
    /// Bits past the end of the shorter string count as differences.
    pub fn hamming_distance(&self, other: &BitString) -> usize {
        let common = self.iter().zip(other.iter()).filter(|(a, b)| a != b).count();
        common + self.len().abs_diff(other.len())
    }

    /// Positions where `self` and `other` differ, counted from the rightmost
    /// (least significant) bit as index 0, in ascending order.
    pub fn diff_positions(&self, other: &BitString) -> Vec<usize> {
        self.0
            .iter()
            .rev()
            .zip(other.0.iter().rev())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Big-endian conversion of a bit slice to an unsigned integer.
///
/// The empty slice is zero. More than 64 bits is [`LinkError::TooWide`].
pub fn bits_to_u64(bits: &[bool]) -> Result<u64, LinkError> {
    if bits.len() > u64::BITS as usize {
        return Err(LinkError::TooWide(bits.len()));
    }
    Ok(bits.iter().fold(0u64, |acc, &b| (acc << 1) | u64::from(b)))
}

impl FromStr for BitString {
    type Err = LinkError;

    /// Strict parse: every character must be '0' or '1'
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(LinkError::InvalidBit { found, position }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl From<&[bool]> for BitString {
    fn from(bits: &[bool]) -> Self {
        Self(bits.to_vec())
    }
}

impl From<BitString> for String {
    fn from(bits: BitString) -> Self {
        bits.to_string()
    }
}

impl TryFrom<String> for BitString {
    type Error = LinkError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AsRef<[bool]> for BitString {
    fn as_ref(&self) -> &[bool] {
        &self.0
    }
}
