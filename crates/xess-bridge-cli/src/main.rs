use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xess_bridge::BridgeConfig;

mod commands;

use commands::hex_utils::parse_hex_address;
use commands::signatures::{ModuleArg, parse_module_arg};

/// Image base used when none is given (default x64 executable base)
const DEFAULT_IMAGE_BASE: &str = "0x140000000";

#[derive(Parser)]
#[command(name = "xbscan")]
#[command(about = "Find hook targets in upscaler and game binaries")]
struct Args {
    #[arg(short, long, default_value = "xess-bridge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search one binary for a pattern
    Scan {
        /// Binary to load as a module image
        file: PathBuf,
        /// IDA-style pattern, e.g. "48 8B 05 ?? ?? ?? ??"
        pattern: String,
        /// Added to the match address
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: isize,
        /// Address the image is mapped at
        #[arg(long, value_parser = parse_hex_address, default_value = DEFAULT_IMAGE_BASE)]
        base: usize,
        /// Start scanning here instead of at the image base
        #[arg(long, value_parser = parse_hex_address, conflicts_with = "relative")]
        start: Option<usize>,
        /// Follow the rel32 displacement at match + offset
        #[arg(long)]
        relative: bool,
        /// List every match instead of only the first
        #[arg(long)]
        all: bool,
    },
    /// Resolve a signature set against binaries
    Signatures {
        /// Signature set (JSON); defaults to the config's `signatures`
        file: Option<PathBuf>,
        /// Module image as NAME=PATH[@BASE]
        #[arg(short, long = "module", value_parser = parse_module_arg)]
        modules: Vec<ModuleArg>,
        /// Write resolved addresses as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate and normalise a pattern
    Parse { pattern: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("xess_bridge=info".parse()?))
        .init();

    let args = Args::parse();

    let config = if args.config.exists() {
        BridgeConfig::load(&args.config)?
    } else {
        info!("No config at {:?}, using defaults", args.config);
        BridgeConfig::default()
    };

    match args.command {
        Command::Scan {
            file,
            pattern,
            offset,
            base,
            start,
            relative,
            all,
        } => commands::scan::run(&commands::scan::ScanOptions {
            file,
            pattern,
            offset,
            base,
            start,
            relative,
            all,
        }),
        Command::Signatures {
            file,
            modules,
            output,
        } => {
            let file = file
                .or(config.signatures)
                .context("No signature file given and none set in config")?;
            commands::signatures::run(&file, &modules, output.as_deref())
        }
        Command::Parse { pattern } => commands::parse::run(&pattern),
    }
}
