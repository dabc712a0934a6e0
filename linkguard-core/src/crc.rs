//! Cyclic redundancy check by modulo-2 polynomial division
//!
//! The generator polynomial is always passed explicitly. It can be named
//! (`CRC-8`, `CRC-10`, `CRC-16`, `CRC-32`) or given as a literal bit pattern
//! such as `"1011"`; both resolve to the same [`Polynomial`] type.

use crate::bits::BitString;
use crate::error::LinkError;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
#[cfg(feature = "logging")]
use tracing::trace;

/// Well-known CRC generator polynomials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrcScheme {
    /// x^8 + x^2 + x + 1
    #[serde(rename = "CRC-8")]
    Crc8,
    /// x^10 + x^9 + x + 1
    #[serde(rename = "CRC-10")]
    Crc10,
    /// x^16 + x^15 + x^2 + 1
    #[serde(rename = "CRC-16")]
    Crc16,
    /// IEEE 802.3 generator
    #[serde(rename = "CRC-32")]
    Crc32,
}

impl CrcScheme {
    /// Every named scheme, narrowest first
    pub const ALL: [CrcScheme; 4] = [
        CrcScheme::Crc8,
        CrcScheme::Crc10,
        CrcScheme::Crc16,
        CrcScheme::Crc32,
    ];

    /// Scheme name as used on the wire and on the command line
    pub const fn name(&self) -> &'static str {
        match self {
            CrcScheme::Crc8 => "CRC-8",
            CrcScheme::Crc10 => "CRC-10",
            CrcScheme::Crc16 => "CRC-16",
            CrcScheme::Crc32 => "CRC-32",
        }
    }

    /// Generator bit pattern, leading 1 included
    pub const fn pattern(&self) -> &'static str {
        match self {
            CrcScheme::Crc8 => "100000111",
            CrcScheme::Crc10 => "11000000011",
            CrcScheme::Crc16 => "11000000000000101",
            CrcScheme::Crc32 => "100000100110000010001110110110111",
        }
    }

    /// Look up a scheme by name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(name))
    }

    /// The scheme's generator polynomial
    pub fn polynomial(&self) -> Polynomial {
        let bits = self
            .pattern()
            .chars()
            .map(|c| c == '1')
            .collect::<BitString>();
        Polynomial { bits }
    }
}

impl fmt::Display for CrcScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A generator polynomial: a non-empty bit pattern whose first bit is 1
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Polynomial {
    bits: BitString,
}

impl Polynomial {
    /// Build a polynomial from its bit pattern
    pub fn from_bits(bits: BitString) -> Result<Self, LinkError> {
        if bits.get(0) != Some(true) {
            return Err(LinkError::InvalidPolynomial(bits.to_string()));
        }
        Ok(Self { bits })
    }

    /// Bit pattern, leading 1 included
    pub fn bits(&self) -> &BitString {
        &self.bits
    }

    /// Number of bits in the pattern (degree + 1)
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false: a polynomial has at least its leading bit
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Polynomial degree, which is also the width of the CRC remainder
    pub fn degree(&self) -> usize {
        self.bits.len() - 1
    }

    /// The named scheme this pattern matches, if any
    pub fn scheme(&self) -> Option<CrcScheme> {
        CrcScheme::ALL
            .into_iter()
            .find(|scheme| scheme.pattern() == self.bits.to_string())
    }
}

impl FromStr for Polynomial {
    type Err = LinkError;

    /// Resolve a scheme name, falling back to a literal bit pattern
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(scheme) = CrcScheme::from_name(s) {
            return Ok(scheme.polynomial());
        }
        let bits: BitString = s
            .parse()
            .map_err(|_| LinkError::InvalidPolynomial(s.to_string()))?;
        Self::from_bits(bits).map_err(|_| LinkError::InvalidPolynomial(s.to_string()))
    }
}

impl From<CrcScheme> for Polynomial {
    fn from(scheme: CrcScheme) -> Self {
        scheme.polynomial()
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bits, f)
    }
}

/// Modulo-2 long division of `dividend` by `divisor`, returning the
/// `divisor.len() - 1` bit remainder.
///
/// A register holding the first `n` dividend bits is reduced once per
/// remaining dividend bit plus one final step, `len - n + 1` steps in all.
/// Each step XORs the divisor in when the register's leading bit is set,
/// then drops that bit and shifts in the next dividend bit.
///
/// A dividend shorter than the divisor is left-padded with zeros first,
/// which leaves its polynomial value unchanged.
pub fn xor_divide(dividend: &BitString, divisor: &Polynomial) -> BitString {
    let divisor = divisor.bits().as_slice();
    let n = divisor.len();

    let padded;
    let dividend = if dividend.len() < n {
        padded = BitString::zeros(n - dividend.len()).concat(dividend);
        padded.as_slice()
    } else {
        dividend.as_slice()
    };

    let mut register: VecDeque<bool> = dividend[..n].iter().copied().collect();
    let incoming = dividend[n..].iter().copied().map(Some);

    for next in incoming.chain(core::iter::once(None)) {
        if register[0] {
            for (r, &d) in register.iter_mut().zip(divisor) {
                *r ^= d;
            }
        }
        register.pop_front();
        if let Some(bit) = next {
            register.push_back(bit);
        }
    }

    register.into_iter().collect()
}

/// Append the CRC remainder of `data` under `polynomial`.
///
/// The empty payload produces the empty codeword, with no remainder.
pub fn generate(data: &BitString, polynomial: &Polynomial) -> BitString {
    if data.is_empty() {
        return BitString::new();
    }

    let dividend = data.concat(&BitString::zeros(polynomial.degree()));
    let remainder = xor_divide(&dividend, polynomial);

    #[cfg(feature = "logging")]
    trace!(polynomial = %polynomial, remainder = %remainder, "crc generated");

    data.concat(&remainder)
}

/// Whether `codeword` divides evenly by `polynomial`.
///
/// The empty codeword is valid.
pub fn verify(codeword: &BitString, polynomial: &Polynomial) -> bool {
    if codeword.is_empty() {
        return true;
    }
    xor_divide(codeword, polynomial).is_all_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    fn poly(s: &str) -> Polynomial {
        s.parse().unwrap()
    }

    #[test]
    fn test_textbook_division() {
        // 11010011101100 + 000 / 1011 -> 100
        let rem = xor_divide(&bits("11010011101100000"), &poly("1011"));
        assert_eq!(rem.to_string(), "100");
    }

    #[test]
    fn test_generate_known_remainders() {
        let data = bits("1111000011110000000011101111");
        let cases = [
            ("CRC-8", "00010110"),
            ("CRC-10", "0101011010"),
            ("CRC-16", "0100111010101101"),
            ("CRC-32", "00010011010000001101111000001000"),
        ];
        for (name, remainder) in cases {
            let codeword = generate(&data, &poly(name));
            assert_eq!(codeword.to_string(), format!("{}{}", data, remainder));
        }
    }

    #[test]
    fn test_verify_round_trip() {
        for scheme in CrcScheme::ALL {
            let p = scheme.polynomial();
            let codeword = generate(&bits("11110000111100001111"), &p);
            assert_eq!(codeword.len(), 20 + p.degree());
            assert!(verify(&codeword, &p));
        }
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let p = poly("CRC-8");
        let codeword = generate(&bits("0100100001100101"), &p);
        for i in 0..codeword.len() {
            let mut corrupted = codeword.clone();
            corrupted.flip(i);
            assert!(!verify(&corrupted, &p), "flip at {} not detected", i);
        }
    }

    #[test]
    fn test_empty_input() {
        let p = poly("CRC-16");
        assert!(generate(&BitString::new(), &p).is_empty());
        assert!(verify(&BitString::new(), &p));
    }

    #[test]
    fn test_short_dividend_is_padded() {
        let p = poly("1011");
        assert_eq!(xor_divide(&bits("11"), &p).to_string(), "011");
        assert!(verify(&bits("00"), &p));
        assert!(!verify(&bits("01"), &p));
    }

    #[test]
    fn test_resolve_named_and_literal() {
        assert_eq!(poly("CRC-16"), poly("11000000000000101"));
        assert_eq!(poly("crc-32").scheme(), Some(CrcScheme::Crc32));
        assert_eq!(poly("1011").scheme(), None);
        assert_eq!(poly("CRC-10").degree(), 10);
    }

    #[test]
    fn test_invalid_polynomials() {
        for bad in ["", "0101", "CRC-7", "10a1"] {
            assert_eq!(
                bad.parse::<Polynomial>(),
                Err(LinkError::InvalidPolynomial(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_degree_zero_polynomial_accepts_everything() {
        let p = poly("1");
        let codeword = generate(&bits("1010"), &p);
        assert_eq!(codeword.to_string(), "1010");
        assert!(verify(&bits("1110"), &p));
    }
}
