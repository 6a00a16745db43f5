use std::path::PathBuf;
use std::sync::Arc;

use ab1_trimmer::{parse_n_run_limit, trim_and_merge, BatchOptions, TrimConfig, Trimmer};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "ab1-trimmer")]
#[command(about = "Trim low-quality ends of ab1 traces and merge them into one FASTA file")]
struct Args {
    #[arg(value_parser = existing_path, help = "An ab1 file, or a directory of ab1 files")]
    input: PathBuf,

    #[arg(short = 'o', long, default_value = "trimmed", help = "Output subdirectory (directory mode)")]
    out_dir: String,

    #[arg(short = 'm', long, default_value = "merged.fas", help = "Name of the merged FASTA file")]
    merged_name: String,

    #[arg(short = 't', long, default_value = "4", help = "Number of threads")]
    threads: usize,

    #[arg(short = 'c', long, default_value = "false", help = "Compress the merged file with gzip")]
    compress: bool,

    #[arg(short = 'v', long, default_value = "false", help = "Verbose output")]
    verbose: bool,

    #[arg(long, default_value = "2", value_parser = parse_n_run_limit, help = "Reject reads with this many consecutive Ns")]
    max_n_run: usize,

    #[arg(long, default_value = "0.7", help = "Minimum fraction of bases kept after trimming")]
    min_retention: f64,

    #[arg(long, default_value = "30", help = "Minimum average quality of the trimmed read")]
    min_avg_quality: f64,
}

fn existing_path(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("no such file or directory: {}", s))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .with_target(false)
        .init();

    let config = TrimConfig {
        max_n_run: args.max_n_run,
        min_retention: args.min_retention,
        min_avg_quality: args.min_avg_quality,
    };
    let trimmer = Trimmer::with_config(&config);

    if args.input.is_dir() {
        let options = BatchOptions {
            out_dir_name: args.out_dir,
            merged_name: args.merged_name,
            threads: args.threads,
            compress: args.compress,
        };
        let report = trim_and_merge(Arc::new(trimmer), &args.input, &options)
            .with_context(|| format!("failed to trim {}", args.input.display()))?;

        println!("Processing complete!");
        println!("Accepted traces: {}", report.accepted.len());
        println!("Discarded traces: {}", report.discarded.len());
        println!("Failed traces: {}", report.failed.len());
        if let Some(merged) = &report.merged_path {
            println!("Merged output: {}", merged.display());
        }
    } else {
        let written = trimmer
            .trim_file(&args.input)
            .with_context(|| format!("failed to trim {}", args.input.display()))?;
        match written {
            Some(path) => println!("Trimmed output: {}", path.display()),
            None => println!("Trace discarded, nothing written"),
        }
    }

    Ok(())
}
