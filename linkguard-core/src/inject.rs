//! Bit-error injection strategies
//!
//! Every function returns a new [`BitString`] and leaves its input alone.
//! Randomness comes from the caller's [`Rng`], so a seeded generator gives
//! reproducible corruption.
//!
//! - [`inject_random`]: independent single-bit flips, with replacement
//! - [`inject_burst`]: flips confined to one contiguous window
//! - [`inject_odd`]: an odd number of distinct flips
//! - [`inject_undetectable`]: XOR of the generator polynomial itself

use crate::bits::BitString;
use crate::constants::BURST_FLIP_PROBABILITY;
use crate::crc::Polynomial;
use crate::error::LinkError;
use rand::Rng;
use serde::{Deserialize, Serialize};
#[cfg(feature = "logging")]
use tracing::debug;

/// Flip `count` uniformly chosen bits.
///
/// Positions are drawn with replacement: two picks landing on the same bit
/// cancel out, so fewer than `count` bits may differ in the result. Empty
/// input is returned unchanged.
pub fn inject_random<R: Rng + ?Sized>(data: &BitString, count: usize, rng: &mut R) -> BitString {
    let mut out = data.clone();
    if data.is_empty() {
        return out;
    }
    for _ in 0..count {
        let index = rng.gen_range(0..data.len());
        out.flip(index);
    }

    #[cfg(feature = "logging")]
    debug!(count, differing = out.hamming_distance(data), "random errors injected");

    out
}

/// Pick one window of `burst_size` consecutive bits and flip each bit in it
/// independently with probability 0.4.
///
/// A burst longer than the data is clamped to the data length.
pub fn inject_burst<R: Rng + ?Sized>(
    data: &BitString,
    burst_size: usize,
    rng: &mut R,
) -> BitString {
    let mut out = data.clone();
    if data.is_empty() {
        return out;
    }
    let burst_size = burst_size.min(data.len());
    let start = rng.gen_range(0..=data.len() - burst_size);
    for index in start..start + burst_size {
        if rng.gen_bool(BURST_FLIP_PROBABILITY) {
            out.flip(index);
        }
    }

    #[cfg(feature = "logging")]
    debug!(start, burst_size, differing = out.hamming_distance(data), "burst injected");

    out
}

/// Flip an odd number of distinct bits.
///
/// The count is drawn uniformly from the odd values in `[1, len)`, then that
/// many positions are sampled without replacement. Data shorter than two bits
/// has no such count and yields [`LinkError::TooShort`].
pub fn inject_odd<R: Rng + ?Sized>(data: &BitString, rng: &mut R) -> Result<BitString, LinkError> {
    let len = data.len();
    // odd values in [1, len) are 1, 3, ..., one for every two bits
    let choices = len / 2;
    if choices == 0 {
        return Err(LinkError::TooShort { len, min: 2 });
    }
    let flip_count = 2 * rng.gen_range(0..choices) + 1;

    let mut out = data.clone();
    for index in rand::seq::index::sample(rng, len, flip_count) {
        out.flip(index);
    }

    #[cfg(feature = "logging")]
    debug!(flip_count, "odd error injected");

    Ok(out)
}

/// XOR the generator pattern into `data`, right-aligned and then moved
/// `shift` bits towards the front.
///
/// The mask is a multiple of `polynomial`, so the corrupted codeword leaves
/// the same CRC remainder as the original. Mask bits that fall outside the
/// data are dropped.
pub fn inject_undetectable(data: &BitString, polynomial: &Polynomial, shift: usize) -> BitString {
    let mut out = data.clone();
    let start = data.len() as isize - polynomial.len() as isize - shift as isize;

    for (i, bit) in polynomial.bits().iter().enumerate() {
        let pos = start + i as isize;
        if bit && pos >= 0 && (pos as usize) < data.len() {
            out.flip(pos as usize);
        }
    }

    out
}

/// A corruption strategy and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorModel {
    /// Leave the codeword intact
    None,
    /// `count` independent flips, with replacement
    Random {
        /// Number of flips
        count: usize,
    },
    /// One burst window of `size` bits
    Burst {
        /// Window length
        size: usize,
    },
    /// An odd number of distinct flips
    Odd,
    /// The generator polynomial, shifted `shift` bits from the right
    Undetectable {
        /// Shift from the right-aligned position
        shift: usize,
    },
}

impl Default for ErrorModel {
    fn default() -> Self {
        ErrorModel::Random { count: 1 }
    }
}

impl ErrorModel {
    /// Apply this model to `data`.
    ///
    /// `polynomial` is only consulted by [`ErrorModel::Undetectable`], which
    /// fails with [`LinkError::InvalidParameters`] without one.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        data: &BitString,
        polynomial: Option<&Polynomial>,
        rng: &mut R,
    ) -> Result<BitString, LinkError> {
        match *self {
            ErrorModel::None => Ok(data.clone()),
            ErrorModel::Random { count } => Ok(inject_random(data, count, rng)),
            ErrorModel::Burst { size } => Ok(inject_burst(data, size, rng)),
            ErrorModel::Odd => inject_odd(data, rng),
            ErrorModel::Undetectable { shift } => {
                let polynomial = polynomial.ok_or_else(|| {
                    LinkError::InvalidParameters(
                        "undetectable errors need a CRC polynomial".to_string(),
                    )
                })?;
                Ok(inject_undetectable(data, polynomial, shift))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_random_flips_leave_input_untouched() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = bits("0000000000000000");
        let corrupted = inject_random(&data, 1, &mut rng);
        assert_eq!(data.count_ones(), 0);
        assert_eq!(corrupted.hamming_distance(&data), 1);
        assert_eq!(corrupted.len(), data.len());
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let data = bits("1111000011110000000011101111");
        let a = inject_random(&data, 3, &mut StdRng::seed_from_u64(42));
        let b = inject_random(&data, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_with_replacement_can_cancel() {
        // On a one-bit string every pick hits the same position.
        let mut rng = StdRng::seed_from_u64(1);
        let data = bits("0");
        assert_eq!(inject_random(&data, 2, &mut rng), data);
        assert_eq!(inject_random(&data, 3, &mut rng).to_string(), "1");
    }

    #[test]
    fn test_random_parity_matches_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = BitString::zeros(64);
        for count in 0..10 {
            let corrupted = inject_random(&data, count, &mut rng);
            assert!(corrupted.hamming_distance(&data) <= count);
            assert_eq!(corrupted.hamming_distance(&data) % 2, count % 2);
        }
    }

    #[test]
    fn test_random_on_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(inject_random(&BitString::new(), 4, &mut rng).is_empty());
    }

    #[test]
    fn test_burst_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(11);
        let data = BitString::zeros(100);
        for _ in 0..50 {
            let corrupted = inject_burst(&data, 8, &mut rng);
            let positions: Vec<usize> = corrupted
                .iter()
                .enumerate()
                .filter(|(_, b)| *b)
                .map(|(i, _)| i)
                .collect();
            if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
                assert!(last - first < 8);
            }
        }
    }

    #[test]
    fn test_burst_clamped_to_length() {
        let mut rng = StdRng::seed_from_u64(5);
        let data = bits("0101");
        let corrupted = inject_burst(&data, 10, &mut rng);
        assert_eq!(corrupted.len(), 4);
        assert!(inject_burst(&BitString::new(), 3, &mut rng).is_empty());
    }

    #[test]
    fn test_odd_flip_count() {
        let mut rng = StdRng::seed_from_u64(9);
        let data = bits("111100001111000000001111000011110000");
        for _ in 0..100 {
            let corrupted = inject_odd(&data, &mut rng).unwrap();
            let distance = corrupted.hamming_distance(&data);
            assert_eq!(distance % 2, 1);
            assert!(distance < data.len());
        }
    }

    #[test]
    fn test_odd_needs_two_bits() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            inject_odd(&bits("1"), &mut rng),
            Err(LinkError::TooShort { len: 1, min: 2 })
        );
        // length 2 only allows a single flip
        let corrupted = inject_odd(&bits("00"), &mut rng).unwrap();
        assert_eq!(corrupted.count_ones(), 1);
    }

    #[test]
    fn test_undetectable_mask_position() {
        let p: Polynomial = "1011".parse().unwrap();
        let data = BitString::zeros(8);
        assert_eq!(inject_undetectable(&data, &p, 0).to_string(), "00001011");
        assert_eq!(inject_undetectable(&data, &p, 2).to_string(), "00101100");
        // shifted partly past the front: leading bits are dropped
        assert_eq!(inject_undetectable(&data, &p, 6).to_string(), "11000000");
        // entirely outside
        assert_eq!(inject_undetectable(&data, &p, 20), data);
    }

    #[test]
    fn test_undetectable_is_not_detected() {
        let data = bits("111100001111000000001111000011110000");
        for scheme in crc::CrcScheme::ALL {
            let p = scheme.polynomial();
            let codeword = crc::generate(&data, &p);
            for shift in [0, 3, 10] {
                let corrupted = inject_undetectable(&codeword, &p, shift);
                assert_ne!(corrupted, codeword);
                assert!(crc::verify(&corrupted, &p));
            }
        }
    }

    #[test]
    fn test_error_model_apply() {
        let mut rng = StdRng::seed_from_u64(2);
        let data = BitString::zeros(32);
        assert_eq!(ErrorModel::None.apply(&data, None, &mut rng).unwrap(), data);
        let one = ErrorModel::Random { count: 1 }
            .apply(&data, None, &mut rng)
            .unwrap();
        assert_eq!(one.count_ones(), 1);
        assert!(ErrorModel::Undetectable { shift: 0 }
            .apply(&data, None, &mut rng)
            .is_err());
        let p: Polynomial = "CRC-8".parse().unwrap();
        let masked = ErrorModel::Undetectable { shift: 0 }
            .apply(&data, Some(&p), &mut rng)
            .unwrap();
        assert_eq!(masked.count_ones(), p.bits().count_ones());
    }
}
