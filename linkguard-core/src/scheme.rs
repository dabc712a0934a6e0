//! Detection method selection shared by the sender, receiver and reports

use crate::bits::BitString;
use crate::checksum::ChecksumCodec;
use crate::crc::{self, Polynomial};
use crate::error::LinkError;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Redundancy method named in the first wire field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Folded ones'-complement checksum
    Checksum,
    /// Cyclic redundancy check
    Crc,
}

impl Method {
    /// Wire name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Checksum => "checksum",
            Method::Crc => "crc",
        }
    }
}

impl FromStr for Method {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checksum" => Ok(Method::Checksum),
            "crc" => Ok(Method::Crc),
            other => Err(LinkError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully configured detection scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionScheme {
    /// Checksum with the codec's chunk and word sizes
    Checksum(ChecksumCodec),
    /// CRC with an explicit generator
    Crc(Polynomial),
}

impl DetectionScheme {
    /// Build a scheme from a method and its polynomial text.
    ///
    /// The polynomial is ignored for checksums and required for CRC.
    pub fn resolve(method: Method, polynomial: &str) -> Result<Self, LinkError> {
        match method {
            Method::Checksum => Ok(DetectionScheme::Checksum(ChecksumCodec::default())),
            Method::Crc => Ok(DetectionScheme::Crc(polynomial.parse()?)),
        }
    }

    /// The scheme's method
    pub fn method(&self) -> Method {
        match self {
            DetectionScheme::Checksum(_) => Method::Checksum,
            DetectionScheme::Crc(_) => Method::Crc,
        }
    }

    /// The CRC generator, if this is a CRC scheme
    pub fn polynomial(&self) -> Option<&Polynomial> {
        match self {
            DetectionScheme::Checksum(_) => None,
            DetectionScheme::Crc(p) => Some(p),
        }
    }

    /// Produce the codeword for `payload`
    pub fn generate(&self, payload: &BitString) -> Result<BitString, LinkError> {
        match self {
            DetectionScheme::Checksum(codec) => codec.generate(payload),
            DetectionScheme::Crc(p) => Ok(crc::generate(payload, p)),
        }
    }

    /// Check a received codeword
    pub fn verify(&self, codeword: &BitString) -> bool {
        match self {
            DetectionScheme::Checksum(codec) => codec.verify(codeword),
            DetectionScheme::Crc(p) => crc::verify(codeword, p),
        }
    }

    /// Short human-readable label: `Checksum`, a scheme name, or the literal
    pub fn label(&self) -> String {
        match self {
            DetectionScheme::Checksum(_) => "Checksum".to_string(),
            DetectionScheme::Crc(p) => match p.scheme() {
                Some(scheme) => scheme.name().to_string(),
                None => format!("CRC/{}", p),
            },
        }
    }
}
