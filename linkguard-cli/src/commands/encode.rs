use anyhow::{Context, Result};
use linkguard_core::{BitString, DetectionScheme, Method};
use tracing::info;

/// Codeword for `bits` under the given method
pub fn encode_bits(bits: &str, method: Method, polynomial: Option<&str>) -> Result<BitString> {
    let payload: BitString = bits.parse().context("Payload must be a '0'/'1' string")?;
    let scheme = DetectionScheme::resolve(method, polynomial.unwrap_or_default())
        .context("Failed to resolve detection scheme")?;
    let codeword = scheme
        .generate(&payload)
        .context("Failed to generate codeword")?;

    info!(
        "{} encoded {} bits into {} bits",
        scheme.label(),
        payload.len(),
        codeword.len()
    );
    Ok(codeword)
}

pub fn execute(bits: &str, method: Method, polynomial: Option<&str>) -> Result<()> {
    let codeword = encode_bits(bits, method, polynomial)?;
    println!("{}", codeword);
    Ok(())
}
