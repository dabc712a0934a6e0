//! Side-by-side detection comparison of checksum and the named CRCs
//!
//! A sample payload is encoded by every scheme, each codeword is corrupted
//! by every error family, and the report records whether verification
//! caught it along with the flipped bit positions.

use crate::bits::BitString;
use crate::checksum::ChecksumCodec;
use crate::constants::{COMPARISON_BURST_SIZES, COMPARISON_RANDOM_COUNTS};
use crate::crc::CrcScheme;
use crate::error::LinkError;
use crate::inject::ErrorModel;
use crate::scheme::DetectionScheme;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One scheme's result under one error model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    /// Scheme label, e.g. `Checksum` or `CRC-16`
    pub scheme: String,
    /// Whether verification rejected the corrupted codeword
    pub detected: bool,
    /// Flipped positions, counted from the rightmost bit
    pub flipped: Vec<usize>,
}

/// All trials for one error model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// The corruption applied
    pub model: ErrorModel,
    /// One trial per scheme
    pub trials: Vec<Trial>,
}

/// Detection outcomes for a sample payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// The payload every scheme encoded
    pub data: BitString,
    /// Results grouped by error model
    pub sections: Vec<Section>,
}

/// Per-scheme totals across a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeSummary {
    /// Scheme label
    pub scheme: String,
    /// Trials where corruption was detected
    pub detected: usize,
    /// Trials where the codeword actually changed
    pub corrupted: usize,
    /// Trials run
    pub trials: usize,
}

/// Checksum followed by every named CRC
pub fn default_schemes() -> Vec<DetectionScheme> {
    let mut schemes = vec![DetectionScheme::Checksum(ChecksumCodec::default())];
    schemes.extend(
        CrcScheme::ALL
            .into_iter()
            .map(|s| DetectionScheme::Crc(s.polynomial())),
    );
    schemes
}

/// Error models exercised by the comparison: random counts, burst sizes,
/// odd-count flips and the polynomial-aligned undetectable mask
pub fn default_models() -> Vec<ErrorModel> {
    let mut models: Vec<ErrorModel> = COMPARISON_RANDOM_COUNTS
        .into_iter()
        .map(|count| ErrorModel::Random { count })
        .collect();
    models.extend(
        COMPARISON_BURST_SIZES
            .into_iter()
            .map(|size| ErrorModel::Burst { size }),
    );
    models.push(ErrorModel::Odd);
    models.push(ErrorModel::Undetectable { shift: 0 });
    models
}

/// Run the default comparison over `data`
pub fn compare<R: Rng + ?Sized>(
    data: &BitString,
    rng: &mut R,
) -> Result<ComparisonReport, LinkError> {
    compare_with(data, &default_schemes(), &default_models(), rng)
}

/// Run every model against every scheme.
///
/// Undetectable masks are built from the CRC generator, so checksum schemes
/// are skipped for that model.
pub fn compare_with<R: Rng + ?Sized>(
    data: &BitString,
    schemes: &[DetectionScheme],
    models: &[ErrorModel],
    rng: &mut R,
) -> Result<ComparisonReport, LinkError> {
    if data.is_empty() {
        return Err(LinkError::TooShort { len: 0, min: 1 });
    }

    let mut sections = Vec::with_capacity(models.len());
    for model in models {
        let mut trials = Vec::with_capacity(schemes.len());
        for scheme in schemes {
            if matches!(model, ErrorModel::Undetectable { .. }) && scheme.polynomial().is_none() {
                continue;
            }
            let codeword = scheme.generate(data)?;
            let corrupted = model.apply(&codeword, scheme.polynomial(), rng)?;
            trials.push(Trial {
                scheme: scheme.label(),
                detected: !scheme.verify(&corrupted),
                flipped: codeword.diff_positions(&corrupted),
            });
        }
        sections.push(Section {
            model: *model,
            trials,
        });
    }

    Ok(ComparisonReport {
        data: data.clone(),
        sections,
    })
}

impl ComparisonReport {
    /// Totals per scheme, in first-seen order
    pub fn summary(&self) -> Vec<SchemeSummary> {
        let mut out: Vec<SchemeSummary> = Vec::new();
        for trial in self.sections.iter().flat_map(|s| &s.trials) {
            let found = out.iter().position(|s| s.scheme == trial.scheme);
            let entry = match found {
                Some(i) => &mut out[i],
                None => {
                    out.push(SchemeSummary {
                        scheme: trial.scheme.clone(),
                        detected: 0,
                        corrupted: 0,
                        trials: 0,
                    });
                    let last = out.len() - 1;
                    &mut out[last]
                }
            };
            entry.trials += 1;
            if trial.detected {
                entry.detected += 1;
            }
            if !trial.flipped.is_empty() {
                entry.corrupted += 1;
            }
        }
        out
    }
}
