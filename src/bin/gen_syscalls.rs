//! Syscall header generator binary.
//!
//! Usage: `gen-syscalls <OUTPUT> [-d DIR] [--warn-malformed] [-v]`

use std::path::PathBuf;
use std::process;

use clap::Parser;
use lapi_syscalls::generator::{self, GeneratorConfig};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "gen-syscalls", about = "Generate the portable syscall-number header")]
struct Cli {
    /// Header file to write.
    output: Option<PathBuf>,

    /// Directory containing the <arch>.in tables.
    #[arg(short = 'd', long, default_value = ".")]
    input_dir: PathBuf,

    /// Warn about table lines that have a name but no value.
    #[arg(long)]
    warn_malformed: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Extra arguments are accepted and ignored.
    #[arg(hide = true)]
    #[allow(dead_code)]
    rest: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let config = match GeneratorConfig::new(cli.output, cli.input_dir) {
        Ok(config) => config.with_warn_malformed(cli.warn_malformed),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    match generator::run(&config) {
        Ok(stats) => log::debug!("{}", stats),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
