use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::info;
use serde_json::Value;
use tuyalz::{
    broadlink, compress, encode_base64, summarize, CompressionLevel, ConvertConfig,
    DocumentConverter, ParallelConverter, SingleThreadedConverter,
};

#[derive(Parser, Debug)]
#[command(name = "tuyalz")]
#[command(about = "Convert Broadlink IR codes to compressed Tuya IR codes")]
#[command(version)]
struct Args {
    /// Input SmartIR JSON file (use - for stdin)
    #[arg(short, long, required_unless_present = "code", conflicts_with = "code")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert a single Broadlink base64 code instead of a document
    #[arg(long)]
    code: Option<String>,

    /// Compression level (0 = none, 1 = greedy, 2 = best, 3 = optimal)
    #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(0..=3))]
    level: u8,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConvertConfig {
        level: CompressionLevel::try_from(args.level)?,
        num_threads: args.threads,
    };

    let text = match &args.code {
        Some(code) => run_code_mode(code, &config, args.verbose)?,
        None => {
            let input = args.input.as_ref().ok_or("input required when --code is absent")?;
            run_document_mode(input, &config, args.verbose)?
        }
    };

    match &args.output {
        Some(path) if path.to_str() != Some("-") => {
            let mut output = BufWriter::new(File::create(path)?);
            writeln!(output, "{}", text)?;
            output.flush()?;
        }
        _ => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text)?;
        }
    }

    Ok(())
}

fn run_code_mode(
    code: &str,
    config: &ConvertConfig,
    verbose: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let payload = broadlink::decode_code(code)?;
    let stream = compress(&payload, config.level)?;

    if verbose {
        let summary = summarize(&stream)?;
        eprintln!("Conversion complete:");
        eprintln!("  Timing bytes:     {}", payload.len());
        eprintln!("  Stream bytes:     {}", stream.len());
        eprintln!("  Literal blocks:   {}", summary.literal_blocks);
        eprintln!("  Reference blocks: {}", summary.reference_blocks);
        eprintln!("  Ratio:            {:.3}", summary.ratio());
    }

    Ok(encode_base64(&stream))
}

fn run_document_mode(
    input: &Path,
    config: &ConvertConfig,
    verbose: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let reader: Box<dyn Read> = if input.to_str() == Some("-") {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(input)?))
    };
    let document: Value = serde_json::from_reader(reader)?;

    let start = std::time::Instant::now();

    let (converted, stats) = if config.num_threads == 1 {
        let mut converter = SingleThreadedConverter::new(config.clone());
        converter.convert(document)?
    } else {
        let mut converter = ParallelConverter::new(config.clone());
        converter.convert(document)?
    };

    let elapsed = start.elapsed();
    info!("converted {} codes in {:.2?}", stats.codes_converted, elapsed);

    if verbose {
        eprintln!("Conversion complete:");
        eprintln!("  Codes converted:  {}", stats.codes_converted);
        eprintln!("  Input chars:      {}", stats.input_bytes);
        eprintln!("  Output chars:     {}", stats.output_bytes);
        eprintln!("  Time:             {:.2?}", elapsed);
    }

    Ok(serde_json::to_string_pretty(&converted)?)
}
