//! Discovery Flatten CLI
//!
//! Writes a resolved request and response tree for every method of a
//! Discovery document.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use discovery_flatten::{
    compile_filter, generate, load_document, plan, GenerateOptions, ResolveOptions,
    DEFAULT_BLACKLIST, DEFAULT_FILTER, DEPTH_LIMIT,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "discovery-flatten")]
#[command(about = "Generate JSON files for API request and response schemas")]
#[command(version)]
struct Cli {
    /// Path to the discovery JSON file
    discovery_doc: PathBuf,

    /// Path to the output directory
    output_dir: PathBuf,

    /// Maximum recursion depth for requests
    #[arg(long, default_value_t = 100, value_parser = depth_parser())]
    request_max_depth: usize,

    /// Start depth for applying recursion checks in requests
    #[arg(long, default_value_t = 1, value_parser = depth_parser())]
    request_start_depth: usize,

    /// Maximum branches to resolve for requests
    #[arg(long, default_value_t = 10)]
    request_max_branches: usize,

    /// Maximum recursion depth for responses
    #[arg(long, default_value_t = 100, value_parser = depth_parser())]
    response_max_depth: usize,

    /// Start depth for applying recursion checks in responses
    #[arg(long, default_value_t = 1, value_parser = depth_parser())]
    response_start_depth: usize,

    /// Maximum branches to resolve for responses
    #[arg(long, default_value_t = 10)]
    response_max_branches: usize,

    /// Regex matched against method directories (e.g. files/{fileId}/GET)
    #[arg(long, default_value = DEFAULT_FILTER)]
    regex: String,

    /// Comma-separated list of schemas to hide
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_BLACKLIST.iter().map(|s| s.to_string())
    )]
    blacklisted_schemas: Vec<String>,

    /// Include documentation strings in the output JSON files
    #[arg(long)]
    docs: bool,

    /// Keep writing remaining files after a write failure
    #[arg(long)]
    keep_going: bool,

    /// List the method directories that would be written, without writing
    #[arg(long)]
    dry_run: bool,
}

/// Depth flags are capped at the resolver's recursion limit.
fn depth_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(..=DEPTH_LIMIT as u64)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run(cli: Cli) -> Result<(), u8> {
    let document = load_document(&cli.discovery_doc).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let filter = compile_filter(&cli.regex).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if cli.dry_run {
        for entry in plan(&document, &filter) {
            println!("{}", cli.output_dir.join(&entry.dir).display());
        }
        return Ok(());
    }

    let request = ResolveOptions::new()
        .max_depth(cli.request_max_depth)
        .start_depth(cli.request_start_depth)
        .max_branches(cli.request_max_branches)
        .blacklist(cli.blacklisted_schemas.iter().cloned())
        .include_docs(cli.docs);
    let response = ResolveOptions::new()
        .max_depth(cli.response_max_depth)
        .start_depth(cli.response_start_depth)
        .max_branches(cli.response_max_branches)
        .blacklist(cli.blacklisted_schemas.iter().cloned())
        .include_docs(cli.docs);

    let options = GenerateOptions {
        request,
        response,
        filter,
        keep_going: cli.keep_going,
    };

    let summary = generate(&document, &cli.output_dir, &options, |file| {
        println!(
            "[*] {:.2}s {}B {}",
            file.elapsed.as_secs_f64(),
            file.bytes,
            file.relative_path.display()
        );
    })
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    tracing::debug!(
        methods = summary.methods,
        files = summary.files,
        bytes = summary.bytes,
        "generation finished"
    );
    report_done(&cli.output_dir);
    Ok(())
}

fn report_done(output_dir: &Path) {
    println!("Files generated in directory: {}", output_dir.display());
}
