//! Library entry for linkguard-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

use linkguard_core::ErrorModel;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Corruption family selectable on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ErrorKind {
    /// Independent single-bit flips
    Random,
    /// Flips inside one contiguous window
    Burst,
    /// An odd number of distinct flips
    Odd,
    /// The CRC generator XORed into the codeword
    Undetectable,
}

impl ErrorKind {
    /// Combine with the family's parameter flags
    pub fn to_model(self, count: usize, burst_size: usize, shift: usize) -> ErrorModel {
        match self {
            ErrorKind::Random => ErrorModel::Random { count },
            ErrorKind::Burst => ErrorModel::Burst { size: burst_size },
            ErrorKind::Odd => ErrorModel::Odd,
            ErrorKind::Undetectable => ErrorModel::Undetectable { shift },
        }
    }
}

/// Seeded generator when `seed` is given, entropy-seeded otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
