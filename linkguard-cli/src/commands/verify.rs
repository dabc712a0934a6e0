use anyhow::{Context, Result};
use colored::*;
use linkguard_core::{BitString, DetectionScheme, Method};
use tracing::info;

/// Whether `bits` is a valid codeword under the given method
pub fn verify_bits(bits: &str, method: Method, polynomial: Option<&str>) -> Result<bool> {
    let codeword: BitString = bits.parse().context("Codeword must be a '0'/'1' string")?;
    let scheme = DetectionScheme::resolve(method, polynomial.unwrap_or_default())
        .context("Failed to resolve detection scheme")?;

    info!("Verifying {} bits with {}", codeword.len(), scheme.label());
    Ok(scheme.verify(&codeword))
}

pub fn execute(bits: &str, method: Method, polynomial: Option<&str>) -> Result<()> {
    if verify_bits(bits, method, polynomial)? {
        println!("{} Codeword is valid", "✓".green());
    } else {
        println!("{} Codeword is invalid", "✗".red());
    }
    Ok(())
}
