//! Receiver-side scoring of verification results against sender ground truth

use crate::error::LinkError;
use crate::scheme::Method;
use crate::wire::WireMessage;
use serde::{Deserialize, Serialize};
#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Outcome of verifying one well-formed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Method the message used
    pub method: Method,
    /// Whether the codeword passed verification
    pub valid: bool,
    /// Whether the sender reported injecting an error
    pub error: bool,
}

impl Verdict {
    /// A clean codeword accepted, or a corrupted one rejected
    pub const fn is_correct(&self) -> bool {
        self.valid != self.error
    }
}

/// Parse and verify one wire line
pub fn check_line(line: &str) -> Result<Verdict, LinkError> {
    let message = WireMessage::parse(line)?;
    check_message(&message)
}

/// Verify an already parsed message
pub fn check_message(message: &WireMessage) -> Result<Verdict, LinkError> {
    let valid = message.verify()?;
    Ok(Verdict {
        method: message.method,
        valid,
        error: message.error,
    })
}

/// Running tally of detection outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Lines with the right field count (format errors excluded)
    pub messages: usize,
    /// Messages whose verdict matched the error flag
    pub correct: usize,
    /// Lines rejected for malformed framing
    pub format_errors: usize,
    /// Lines naming an unknown method
    pub unknown_methods: usize,
    /// Lines rejected for any other reason (e.g. bad polynomial)
    pub other_errors: usize,
    /// Messages flagged as corrupted by the sender
    pub corrupted: usize,
    /// Corrupted messages that failed verification
    pub detected: usize,
    /// Corrupted messages that passed verification
    pub missed: usize,
    /// Clean messages that failed verification
    pub false_alarms: usize,
}

impl DetectionStats {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, verify and record one line
    pub fn observe(&mut self, line: &str) -> Result<Verdict, LinkError> {
        let outcome = check_line(line);
        self.record(&outcome);

        #[cfg(feature = "logging")]
        match &outcome {
            Ok(verdict) => debug!(?verdict, "message verified"),
            Err(e) => warn!("Skipping message: {}", e),
        }

        outcome
    }

    /// Record an outcome produced elsewhere
    pub fn record(&mut self, outcome: &Result<Verdict, LinkError>) {
        match outcome {
            Ok(verdict) => {
                self.messages += 1;
                if verdict.is_correct() {
                    self.correct += 1;
                }
                match (verdict.error, verdict.valid) {
                    (true, false) => self.detected += 1,
                    (true, true) => self.missed += 1,
                    (false, false) => self.false_alarms += 1,
                    (false, true) => {}
                }
                if verdict.error {
                    self.corrupted += 1;
                }
            }
            Err(LinkError::Format(_)) => self.format_errors += 1,
            Err(LinkError::UnknownMethod(_)) => {
                self.messages += 1;
                self.unknown_methods += 1;
            }
            Err(_) => {
                self.messages += 1;
                self.other_errors += 1;
            }
        }
    }

    /// Percentage of messages handled correctly
    pub fn accuracy(&self) -> f64 {
        percent(self.correct, self.messages)
    }

    /// Percentage of corrupted messages that were caught
    pub fn detection_rate(&self) -> f64 {
        percent(self.detected, self.corrupted)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_correctness() {
        let v = |valid, error| Verdict {
            method: Method::Crc,
            valid,
            error,
        };
        assert!(v(true, false).is_correct());
        assert!(v(false, true).is_correct());
        assert!(!v(true, true).is_correct());
        assert!(!v(false, false).is_correct());
    }

    #[test]
    fn test_tally() {
        let mut stats = DetectionStats::new();
        // clean, accepted
        stats.observe("checksum::0:00000000000000001111").unwrap();
        // corrupted, detected
        stats.observe("checksum::1:00000000000000001110").unwrap();
        // corrupted, missed (flag set but codeword intact)
        stats.observe("crc:1011:1:1011").unwrap();
        // clean, rejected
        stats.observe("crc:CRC-8:0:1").unwrap();
        assert!(stats.observe("crc:CRC-8").is_err());
        assert!(stats.observe("hamming::0:0101").is_err());
        assert!(stats.observe("crc:0110:0:0101").is_err());

        assert_eq!(stats.messages, 6);
        assert_eq!(stats.correct, 2);
        assert_eq!(stats.format_errors, 1);
        assert_eq!(stats.unknown_methods, 1);
        assert_eq!(stats.other_errors, 1);
        assert_eq!(stats.corrupted, 2);
        assert_eq!(stats.detected, 1);
        assert_eq!(stats.missed, 1);
        assert_eq!(stats.false_alarms, 1);
        assert_eq!(stats.detection_rate(), 50.0);
    }

    #[test]
    fn test_empty_rates() {
        let stats = DetectionStats::new();
        assert_eq!(stats.accuracy(), 0.0);
        assert_eq!(stats.detection_rate(), 0.0);
    }
}
