//! arf - protect files with compression, integrity coding and replication.
//!
//! Usage:
//!   arf encode <input> <output> -n <N>   - Write a replicated artifact
//!   arf decode <input> <output> -n <N>   - Recover the original file
//!   arf corrupt <input> <output>         - Randomly damage a file (testing aid)
//!   arf inspect <input>                  - Show the header of a framed artifact

use anyhow::Context;
use arf_codec::config::{DEFAULT_PARITY_SYMBOLS, DEFAULT_REPLICAS};
use arf_codec::corruption::Corruptor;
use arf_codec::frame::read_frame;
use arf_codec::{decode, encode, CodecConfig, Error, Strategy};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "arf")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Redundant artifact codec",
    long_about = "Compresses a file, protects it with CRC32 or Reed-Solomon, and replicates it N times. Decoding recovers the file by majority vote."
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress, protect and replicate a file
    Encode {
        /// File to protect
        input: PathBuf,

        /// Artifact to write
        output: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Recover the original file from an artifact
    Decode {
        /// Artifact to read
        input: PathBuf,

        /// Recovered file to write
        output: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,

        /// Print the decode report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Randomly replace a fraction of a file's bytes
    Corrupt {
        /// File to damage
        input: PathBuf,

        /// Damaged copy to write
        output: PathBuf,

        /// Probability that each byte is replaced
        #[arg(long, default_value = "0.1")]
        fraction: f64,

        /// Seed for reproducible damage
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the header of a framed artifact
    Inspect {
        /// Artifact to read
        input: PathBuf,
    },
}

#[derive(Args)]
struct CodecArgs {
    /// Replication factor (must match between encode and decode)
    #[arg(short = 'n', long, default_value_t = DEFAULT_REPLICAS)]
    replicas: usize,

    /// Integrity strategy
    #[arg(long, value_enum, default_value = "checksum")]
    strategy: StrategyArg,

    /// Reed-Solomon parity symbols per codeword
    #[arg(long, default_value_t = DEFAULT_PARITY_SYMBOLS)]
    parity: u8,

    /// Prefix the artifact with a self-describing header
    #[arg(long)]
    framed: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// CRC32, detection only
    Checksum,
    /// Reed-Solomon, detection and correction
    Rs,
}

impl CodecArgs {
    fn config(&self) -> CodecConfig {
        let strategy = match self.strategy {
            StrategyArg::Checksum => Strategy::Checksum,
            StrategyArg::Rs => Strategy::ErrorCorrecting {
                parity_symbols: self.parity,
            },
        };
        CodecConfig {
            strategy,
            replicas: self.replicas,
            framed: self.framed,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: logging already initialized");
    }

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        if matches!(
            e.downcast_ref::<Error>(),
            Some(Error::Uncorrectable { .. } | Error::MalformedStream(_))
        ) {
            println!("Error detected, could not correct.");
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Encode {
            input,
            output,
            codec,
        } => cmd_encode(&input, &output, &codec.config()),

        Commands::Decode {
            input,
            output,
            codec,
            json,
        } => cmd_decode(&input, &output, &codec.config(), json),

        Commands::Corrupt {
            input,
            output,
            fraction,
            seed,
        } => cmd_corrupt(&input, &output, fraction, seed),

        Commands::Inspect { input } => cmd_inspect(&input),
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn cmd_encode(input: &Path, output: &Path, config: &CodecConfig) -> anyhow::Result<()> {
    let raw = read_input(input)?;
    let artifact = encode(&raw, config)?;
    write_output(output, &artifact)?;

    info!(
        "Wrote {} bytes ({} x {}) to {}",
        artifact.len(),
        config.replicas,
        config.strategy,
        output.display()
    );
    Ok(())
}

fn cmd_decode(input: &Path, output: &Path, config: &CodecConfig, json: bool) -> anyhow::Result<()> {
    let artifact = read_input(input)?;
    let decoded = decode(&artifact, config)?;
    write_output(output, &decoded.data)?;

    if json {
        println!("{}", decoded.report.to_json()?);
    } else {
        println!("{}", decoded.report.status);
    }
    Ok(())
}

fn cmd_corrupt(input: &Path, output: &Path, fraction: f64, seed: Option<u64>) -> anyhow::Result<()> {
    let mut data = read_input(input)?;
    let mut corruptor = match seed {
        Some(seed) => Corruptor::with_seed(seed),
        None => Corruptor::new(),
    };
    let summary = corruptor.corrupt_in_place(&mut data, fraction);
    write_output(output, &data)?;

    println!(
        "Changed {} of {} bytes ({} selected)",
        summary.changed,
        data.len(),
        summary.touched
    );
    Ok(())
}

fn cmd_inspect(input: &Path) -> anyhow::Result<()> {
    let artifact = read_input(input)?;
    let (header, body) = read_frame(&artifact)?;

    println!("ARF Artifact");
    println!("============");
    println!("Version:          {}", header.version);
    println!("Strategy:         {}", header.strategy()?);
    println!("Replicas:         {}", header.replicas);
    println!("Block length:     {} bytes", header.block_len);
    println!("Body length:      {} bytes", body.len());
    println!("Header checksum:  {:08x}", header.checksum);
    Ok(())
}
