use anyhow::{Context, Result};
use colored::*;
use linkguard_core::{stats::DetectionStats, wire::MessageReader, LinkError};
use std::fs;
use std::io::{self, Read};
use std::net::TcpListener;
use tracing::{debug, info, warn};

/// Where frames come from
#[derive(Debug, Clone)]
pub enum Source {
    /// Listen and accept a single sender
    Tcp { host: String, port: u16 },
    /// Read wire lines from a file, or stdin for "-"
    File(String),
}

/// Verify every message on `reader` and tally the results
pub fn receive_from<R: Read>(reader: R) -> Result<DetectionStats> {
    let mut stats = DetectionStats::new();
    let mut messages = MessageReader::new(reader);

    for line in messages.by_ref() {
        let line = match line {
            Ok(line) => line,
            Err(e @ LinkError::Format(_)) => {
                warn!("Skipping message: {}", e);
                stats.record(&Err(e));
                continue;
            }
            Err(e) => return Err(e).context("Failed to read from stream"),
        };
        if let Err(e) = stats.observe(&line) {
            debug!("Message not scored: {}", e);
        }
    }

    if !messages.remainder().is_empty() {
        warn!(
            "Discarding {} bytes after the last newline",
            messages.remainder().len()
        );
    }

    Ok(stats)
}

pub fn execute(source: &Source, json_output: Option<&str>) -> Result<DetectionStats> {
    let stats = match source {
        Source::Tcp { host, port } => {
            let listener = TcpListener::bind((host.as_str(), *port))
                .with_context(|| format!("Failed to bind {}:{}", host, port))?;
            info!("Server listening on {}:{}", host, port);

            let (conn, addr) = listener.accept().context("Failed to accept connection")?;
            info!("Connected by {}", addr);
            receive_from(conn)?
        }
        Source::File(path) if path == "-" => receive_from(io::stdin().lock())?,
        Source::File(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path))?;
            receive_from(file)?
        }
    };

    info!("File transfer complete.");
    print_summary(&stats);

    if let Some(path) = json_output {
        let json = serde_json::to_string_pretty(&stats)
            .with_context(|| "Failed to serialize detection stats")?;
        fs::write(path, json).with_context(|| format!("Failed to write output file: {}", path))?;
        info!("Detection stats written to: {}", path);
    }

    Ok(stats)
}

fn print_summary(stats: &DetectionStats) {
    println!("\n=== Detection Results ===");
    println!("Correct detection: {}/{}", stats.correct, stats.messages);
    println!("Accuracy:          {:.2}%", stats.accuracy());
    println!("Corrupted frames:  {}", stats.corrupted);
    println!(
        "Detected:          {}",
        stats.detected.to_string().green()
    );
    if stats.missed > 0 {
        println!("Missed:            {}", stats.missed.to_string().red());
    } else {
        println!("Missed:            {}", stats.missed);
    }
    if stats.false_alarms > 0 {
        println!("False alarms:      {}", stats.false_alarms.to_string().yellow());
    }
    println!("Detection rate:    {:.2}%", stats.detection_rate());

    let skipped = stats.format_errors + stats.unknown_methods + stats.other_errors;
    if skipped > 0 {
        println!(
            "{} {} messages skipped ({} malformed, {} unknown method, {} other)",
            "!".yellow(),
            skipped,
            stats.format_errors,
            stats.unknown_methods,
            stats.other_errors
        );
    }
}
