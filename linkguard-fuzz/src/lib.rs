//! Fuzzing harness for linkguard-core parsers and verifiers
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_wire

use linkguard_core::{crc, BitString, ChecksumCodec, CrcScheme};

pub fn fuzz_wire(data: &[u8]) {
    use linkguard_core::stats::DetectionStats;
    use linkguard_core::wire::MessageReader;

    // Frame, parse and verify - should never panic
    let mut stats = DetectionStats::new();
    for line in MessageReader::new(data).flatten() {
        let _ = stats.observe(&line);
    }
}

pub fn fuzz_verify(data: &[u8]) {
    // Treat raw input as a received codeword
    let codeword = BitString::from_bytes(data);
    let _ = ChecksumCodec::default().verify(&codeword);
    for scheme in CrcScheme::ALL {
        let _ = crc::verify(&codeword, &scheme.polynomial());
    }
}
