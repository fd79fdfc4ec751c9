//! Formatted UI CLI
//!
//! Usage:
//!   formatted-ui [OPTIONS] [FILE]
//!
//! Options:
//!   -p, --properties <FILE>  Property store (TOML format)
//!   -c, --config <FILE>      Page setup configuration (TOML format)
//!   -v, --verbose            Log each resolution step
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use formatted_ui::{prepare_page, PageConfig, PageError, PropertyStore};

#[derive(Parser)]
#[command(name = "formatted-ui")]
#[command(about = "Resolve property tokens in templated page markup")]
struct Cli {
    /// Input markup file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Property store with [properties], [binaries] and [sizes] tables (TOML format)
    #[arg(short, long)]
    properties: Option<PathBuf>,

    /// Page setup configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log each resolution step
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let store = match &cli.properties {
        Some(path) => match PropertyStore::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading properties '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => PropertyStore::default(),
    };

    let config = match &cli.config {
        Some(path) => match PageConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading page config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => PageConfig::default(),
    };

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match prepare_page(&source, &store, &config) {
        Ok(page) => {
            for failure in &page.failures {
                log::warn!("{}", failure);
            }
            println!("{}", page.to_markup());
        }
        Err(PageError::Parse(errors)) => {
            for error in &errors {
                eprintln!("{}", error.format(&source, &filename));
            }
            std::process::exit(1);
        }
    }
}
