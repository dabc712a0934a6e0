//! Sender-side frame construction
//!
//! A frame is `SRC_ADDR + DEST_ADDR + payload`. The whole frame, header
//! included, is protected by the detection scheme, optionally corrupted,
//! and wrapped in a [`WireMessage`].

use crate::bits::BitString;
use crate::constants::{DEFAULT_ERROR_RATE, DEST_ADDR, FRAME_PAYLOAD_BITS, SRC_ADDR};
use crate::error::LinkError;
use crate::inject::ErrorModel;
use crate::scheme::DetectionScheme;
use crate::wire::WireMessage;
use rand::Rng;
#[cfg(feature = "logging")]
use tracing::debug;

/// Split a bit stream into frame payloads of at most `size` bits.
///
/// The last payload is short when the stream does not divide evenly.
pub fn split_payloads(data: &BitString, size: usize) -> Vec<BitString> {
    data.chunks(size.max(1)).map(BitString::from).collect()
}

/// Split using the default per-frame payload size
pub fn default_payloads(data: &BitString) -> Vec<BitString> {
    split_payloads(data, FRAME_PAYLOAD_BITS)
}

/// Builder for wire messages carrying protected frames
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    scheme: DetectionScheme,
    polynomial_text: String,
    src_addr: BitString,
    dest_addr: BitString,
    error_model: ErrorModel,
    error_rate: f64,
}

impl FrameBuilder {
    /// Create a builder for `scheme`.
    ///
    /// `polynomial_text` is echoed in the wire polynomial field exactly as
    /// given, so the receiver resolves the same generator.
    pub fn new(scheme: DetectionScheme, polynomial_text: impl Into<String>) -> Self {
        let polynomial_text = match scheme {
            DetectionScheme::Checksum(_) => String::new(),
            DetectionScheme::Crc(_) => polynomial_text.into(),
        };
        Self {
            scheme,
            polynomial_text,
            src_addr: default_addr(SRC_ADDR),
            dest_addr: default_addr(DEST_ADDR),
            error_model: ErrorModel::default(),
            error_rate: DEFAULT_ERROR_RATE,
        }
    }

    /// Set the source address bits
    pub fn src_addr(mut self, addr: BitString) -> Self {
        self.src_addr = addr;
        self
    }

    /// Set the destination address bits
    pub fn dest_addr(mut self, addr: BitString) -> Self {
        self.dest_addr = addr;
        self
    }

    /// Set the corruption applied to unlucky frames
    pub fn error_model(mut self, model: ErrorModel) -> Self {
        self.error_model = model;
        self
    }

    /// Set the probability that a frame is corrupted, in `[0, 1]`
    pub fn error_rate(mut self, rate: f64) -> Result<Self, LinkError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(LinkError::InvalidParameters(format!(
                "error rate {} outside [0, 1]",
                rate
            )));
        }
        self.error_rate = rate;
        Ok(self)
    }

    /// The scheme protecting each frame
    pub fn scheme(&self) -> &DetectionScheme {
        &self.scheme
    }

    /// Header plus payload, before redundancy is added
    pub fn frame_data(&self, payload: &BitString) -> BitString {
        self.src_addr.concat(&self.dest_addr).concat(payload)
    }

    /// Build the wire message for one payload.
    ///
    /// With probability `error_rate` the codeword is passed through the error
    /// model and the message's error flag is set. The flag records that
    /// corruption was attempted: a model whose flips cancel out still sets it.
    pub fn build<R: Rng + ?Sized>(
        &self,
        payload: &BitString,
        rng: &mut R,
    ) -> Result<WireMessage, LinkError> {
        let codeword = self.scheme.generate(&self.frame_data(payload))?;

        let corrupt = rng.gen_bool(self.error_rate);
        let codeword = if corrupt {
            self.error_model
                .apply(&codeword, self.scheme.polynomial(), rng)?
        } else {
            codeword
        };

        #[cfg(feature = "logging")]
        debug!(len = codeword.len(), corrupt, "frame built");

        Ok(WireMessage::new(
            self.scheme.method(),
            self.polynomial_text.clone(),
            corrupt,
            codeword,
        ))
    }
}

fn default_addr(text: &str) -> BitString {
    text.chars().map(|c| c == '1').collect()
}
