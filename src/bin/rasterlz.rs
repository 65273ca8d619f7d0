use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use rasterlz::{compress, decompress, CodecConfig};

#[derive(Parser, Debug)]
#[command(name = "rasterlz")]
#[command(about = "Lossless LZSS compression for raw 2-D byte grids")]
#[command(version)]
struct Args {
    /// Compress mode
    #[arg(short = 'c', conflicts_with = "decompress_mode")]
    compress_mode: bool,

    /// Decompress mode
    #[arg(short = 'd')]
    decompress_mode: bool,

    /// Input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Evaluate all scan orders per block and keep the cheapest
    #[arg(short = 'a')]
    adaptive: bool,

    /// Apply model preprocessing before coding
    #[arg(short = 'm')]
    model: bool,

    /// Image width in bytes (compress mode; height is derived)
    #[arg(short = 'w', long = "width")]
    width: Option<u32>,

    /// Block edge length for adaptive mode
    #[arg(long, default_value = "64")]
    block_size: u16,

    /// Bits per match offset field (1-15)
    #[arg(long, default_value = "10")]
    offset_bits: u16,

    /// Bits per match length field (1-15)
    #[arg(long, default_value = "8")]
    length_bits: u16,

    /// Show debug diagnostics
    #[arg(short, long)]
    verbose: bool,

    /// Suppress everything except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::Error
    } else if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .expect("logger init");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if !args.compress_mode && !args.decompress_mode {
        return Err("missing required argument '-c' or '-d'".into());
    }

    let input = fs::read(&args.input)?;
    let start = Instant::now();

    if args.compress_mode {
        let width = args.width.ok_or("missing required argument '-w' for compress mode")?;
        let config = CodecConfig {
            offset_bits: args.offset_bits,
            length_bits: args.length_bits,
            block_size: args.block_size,
            adaptive: args.adaptive,
            model: args.model,
        };

        let (output, stats) = compress(&input, width, &config)?;
        fs::write(&args.output, &output)?;

        let elapsed = start.elapsed();
        if !args.quiet {
            eprintln!("Original size:   {} bytes", stats.input_bytes);
            eprintln!("Compressed size: {} bytes", stats.output_bytes);
            eprintln!("Space saving:    {:.2}%", stats.space_saving() * 100.0);
            if stats.stored {
                eprintln!("Result stored verbatim (compression did not shrink the input)");
            } else {
                eprintln!(
                    "Blocks: {}  Coded tokens: {}  Literal tokens: {}",
                    stats.blocks, stats.coded_tokens, stats.literal_tokens
                );
            }
            eprintln!("Time: {:.2?}", elapsed);
        }
    } else {
        if args.width.is_some() {
            info!("decompress mode ignores the width argument");
        }

        let output = decompress(&input)?;
        fs::write(&args.output, &output)?;

        if !args.quiet {
            eprintln!("Decoded {} bytes to {}", output.len(), args.output.display());
            eprintln!("Time: {:.2?}", start.elapsed());
        }
    }

    Ok(())
}
