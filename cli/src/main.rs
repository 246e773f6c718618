// =-=-= main.rs =-=-=
// Command line driver for the aazip compressor

use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;

use aazip::Algorithm;

/// Compress files using a transform based compression system.
#[derive(Parser)]
#[command(name = "aazip", version)]
struct Args {
    /// List update algorithm: simple, mtf, fc, wfc or timestamp
    #[arg(short = 'm', value_name = "ALGORITHM")]
    mode: String,

    /// Input file; the output is written next to it as <input>.aazip
    input: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        /* one line on stderr, the context chain colon-joined */
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let mode: Algorithm = args
        .mode
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let input = fs::read(&args.input)
        .with_context(|| format!("failed to read input file '{}'", args.input.display()))?;
    if input.is_empty() {
        bail!("input file '{}' is empty", args.input.display());
    }

    let outfile = format!("{}.aazip", args.input.display());

    println!("ALGORITHM: {}", mode);

    let started = Instant::now();
    let outf = fs::File::create(&outfile)
        .with_context(|| format!("failed to create output file '{}'", outfile))?;
    let summary = aazip::encode(&input, BufWriter::new(outf), mode)
        .with_context(|| format!("failed to write '{}'", outfile))?;
    let elapsed = started.elapsed();

    println!(
        "INPUT: {} ({} bytes)",
        args.input.display(),
        summary.input_bytes
    );
    println!("COST: {}", summary.cost);
    println!("TIME: {:.3} s", elapsed.as_secs_f64());
    println!("OUTPUT: {}", outfile);
    println!(
        "COMPRESSION: {:.2}",
        summary.output_bytes as f64 / summary.input_bytes as f64 * 100.0
    );

    Ok(())
}
