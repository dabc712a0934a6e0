use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use linkguard_core::{
    frame::{split_payloads, FrameBuilder},
    BitString, DetectionScheme, ErrorModel, Method,
};
use rand::Rng;
use std::fs;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use tracing::{debug, info};

/// Where frames go
#[derive(Debug, Clone)]
pub enum Destination {
    /// Connect to a receiver
    Tcp { host: String, port: u16 },
    /// Write wire lines to a file, or stdout for "-"
    File(String),
}

/// Options for the send command
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub input: String,
    pub method: Method,
    pub polynomial: Option<String>,
    pub destination: Destination,
    pub error_model: ErrorModel,
    pub error_rate: f64,
    pub payload_bits: usize,
    pub binary: bool,
    pub seed: Option<u64>,
    pub progress: bool,
}

/// What was sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendSummary {
    pub frames: usize,
    pub corrupted: usize,
    pub bits: usize,
}

/// Read the payload stream: '0'/'1' text, or raw bytes with `binary`
pub fn read_payload(input: &str, binary: bool) -> Result<BitString> {
    let raw = if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?
    };

    if binary {
        return Ok(BitString::from_bytes(&raw));
    }
    let text = String::from_utf8(raw).context("Input is not UTF-8 text; try --binary")?;
    BitString::from_text(&text).context("Input must contain only '0'/'1' characters")
}

/// Frame, protect and write every payload of `data`
pub fn write_frames<W: Write, R: Rng>(
    writer: &mut W,
    builder: &FrameBuilder,
    data: &BitString,
    payload_bits: usize,
    rng: &mut R,
    progress: bool,
) -> Result<SendSummary> {
    let payloads = split_payloads(data, payload_bits);

    let bar = if progress {
        let bar = ProgressBar::new(payloads.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} frames")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(bar)
    } else {
        None
    };

    let mut summary = SendSummary::default();
    for payload in &payloads {
        let message = builder
            .build(payload, rng)
            .with_context(|| format!("Failed to build frame {}", summary.frames + 1))?;

        writer
            .write_all(&message.encode())
            .context("Failed to write frame")?;

        debug!(
            "Sent frame: {} (len={})",
            message,
            message.codeword.len()
        );

        summary.frames += 1;
        summary.bits += message.codeword.len();
        if message.error {
            summary.corrupted += 1;
        }
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }
    writer.flush()?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    Ok(summary)
}

pub fn execute(opts: &SendOptions) -> Result<SendSummary> {
    info!("Sending {} with {}", opts.input, opts.method);

    if opts.method == Method::Crc && opts.polynomial.is_none() {
        bail!("The crc method needs a polynomial (e.g. --polynomial CRC-16)");
    }
    let polynomial = opts.polynomial.as_deref().unwrap_or_default();

    let scheme = DetectionScheme::resolve(opts.method, polynomial)
        .context("Failed to resolve detection scheme")?;
    let builder = FrameBuilder::new(scheme, polynomial)
        .error_model(opts.error_model)
        .error_rate(opts.error_rate)?;

    let data = read_payload(&opts.input, opts.binary)?;
    info!("Read {} payload bits", data.len());

    let mut rng = crate::make_rng(opts.seed);

    let summary = match &opts.destination {
        Destination::Tcp { host, port } => {
            let mut stream = TcpStream::connect((host.as_str(), *port))
                .with_context(|| format!("Failed to connect to {}:{}", host, port))?;
            info!("Connected to {}:{}", host, port);
            write_frames(&mut stream, &builder, &data, opts.payload_bits, &mut rng, opts.progress)?
        }
        Destination::File(path) if path == "-" => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_frames(&mut lock, &builder, &data, opts.payload_bits, &mut rng, false)?
        }
        Destination::File(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            write_frames(&mut file, &builder, &data, opts.payload_bits, &mut rng, opts.progress)?
        }
    };

    info!(
        "File transfer complete: {} frames ({} corrupted, {} bits)",
        summary.frames, summary.corrupted, summary.bits
    );

    Ok(summary)
}
