use anyhow::Result;
use clap::{Parser, Subcommand};
use linkguard_cli::{
    commands::{self, receive::Source, send::Destination, send::SendOptions},
    ErrorKind,
};
use linkguard_core::{
    constants::{DEFAULT_ERROR_RATE, DEFAULT_HOST, DEFAULT_PORT, FRAME_PAYLOAD_BITS},
    Method,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "linkguard")]
#[command(about = "Linkguard - checksum and CRC error detection simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the codeword for a bit string
    Encode {
        /// Payload bits, e.g. 1011001
        bits: String,

        /// Detection method: checksum or crc
        #[arg(short, long, default_value = "checksum")]
        method: Method,

        /// CRC polynomial: CRC-8, CRC-10, CRC-16, CRC-32 or a bit pattern
        #[arg(short, long)]
        polynomial: Option<String>,
    },

    /// Check whether a bit string is a valid codeword
    Verify {
        /// Codeword bits
        bits: String,

        /// Detection method: checksum or crc
        #[arg(short, long, default_value = "checksum")]
        method: Method,

        /// CRC polynomial: CRC-8, CRC-10, CRC-16, CRC-32 or a bit pattern
        #[arg(short, long)]
        polynomial: Option<String>,
    },

    /// Frame a payload file and send it to a receiver
    Send {
        /// Input file of '0'/'1' characters ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Detection method: checksum or crc
        #[arg(short, long)]
        method: Method,

        /// CRC polynomial: CRC-8, CRC-10, CRC-16, CRC-32 or a bit pattern
        #[arg(short, long)]
        polynomial: Option<String>,

        /// Write wire lines to this file instead of connecting ("-" for stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Receiver host
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Receiver port
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Probability that a frame is corrupted
        #[arg(long, default_value_t = DEFAULT_ERROR_RATE)]
        error_rate: f64,

        /// Corruption applied to unlucky frames
        #[arg(long, value_enum, default_value = "random")]
        error_model: ErrorKind,

        /// Flips per frame for the random model
        #[arg(long, default_value = "1")]
        error_count: usize,

        /// Window length for the burst model
        #[arg(long, default_value = "1")]
        burst_size: usize,

        /// Shift for the undetectable model
        #[arg(long, default_value = "0")]
        shift: usize,

        /// Payload bits per frame
        #[arg(long, default_value_t = FRAME_PAYLOAD_BITS)]
        payload_bits: usize,

        /// Treat the input as raw bytes rather than '0'/'1' text
        #[arg(long)]
        binary: bool,

        /// Seed for reproducible error injection
        #[arg(long)]
        seed: Option<u64>,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Receive frames, verify them and report detection accuracy
    Receive {
        /// Read wire lines from this file instead of listening ("-" for stdin)
        #[arg(short, long)]
        input: Option<String>,

        /// Listen host
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Listen port
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Write detection stats as JSON
        #[arg(long)]
        json: Option<String>,
    },

    /// Compare checksum and CRC detection under every error family
    Compare {
        /// Sample payload bits
        #[arg(short, long)]
        data: Option<String>,

        /// Seed for reproducible error injection
        #[arg(long)]
        seed: Option<u64>,

        /// Write the report as JSON
        #[arg(long)]
        json: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Encode {
            bits,
            method,
            polynomial,
        } => commands::encode::execute(&bits, method, polynomial.as_deref()),

        Commands::Verify {
            bits,
            method,
            polynomial,
        } => commands::verify::execute(&bits, method, polynomial.as_deref()),

        Commands::Send {
            input,
            method,
            polynomial,
            output,
            host,
            port,
            error_rate,
            error_model,
            error_count,
            burst_size,
            shift,
            payload_bits,
            binary,
            seed,
            progress,
        } => {
            let destination = match output {
                Some(path) => Destination::File(path),
                None => Destination::Tcp { host, port },
            };
            let opts = SendOptions {
                input,
                method,
                polynomial,
                destination,
                error_model: error_model.to_model(error_count, burst_size, shift),
                error_rate,
                payload_bits,
                binary,
                seed,
                progress,
            };
            commands::send::execute(&opts).map(|_| ())
        }

        Commands::Receive {
            input,
            host,
            port,
            json,
        } => {
            let source = match input {
                Some(path) => Source::File(path),
                None => Source::Tcp { host, port },
            };
            commands::receive::execute(&source, json.as_deref()).map(|_| ())
        }

        Commands::Compare { data, seed, json } => {
            commands::compare::execute(data.as_deref(), seed, json.as_deref())
        }
    }
}
