//! CLI entry point for nodate

use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use nodate::{
    DateTagInspector, ExifBackend, JsonSink, LineSink, ReportSink, ScanConfig, ScanError,
    ScanSummary, Scanner, WalkerConfig, print_summary, validate_root,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output could not be written.
const EXIT_OUTPUT: i32 = 1;
/// Logging could not be initialised.
const EXIT_INIT: i32 = 2;
/// Wrong or missing arguments.
const EXIT_USAGE: i32 = 3;
/// The root path does not exist or is not a directory.
const EXIT_INVALID_PATH: i32 = 4;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            // The summary goes to stderr
            std::io::stderr().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "nodate")]
#[command(about = "List images under a directory that have no embedded date taken")]
#[command(version)]
struct Args {
    /// Root of the tree to be scanned
    path: PathBuf,

    /// Skip files and directories matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Descend only N levels below the root
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Number of parallel workers for metadata inspection
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Print a summary to stderr when the scan completes
    #[arg(short = 's', long = "summary")]
    summary: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(verbose: u8, quiet: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init()
}

fn run_scan<S: ReportSink>(
    scanner: &Scanner<'_, ExifBackend>,
    args: &Args,
    mut sink: S,
) -> Result<ScanSummary, ScanError> {
    scanner.scan(&args.path, &mut sink)
}

fn main() {
    let args = Args::try_parse().unwrap_or_else(|e| {
        if !e.use_stderr() {
            // --help and --version
            e.exit();
        }
        let _ = e.print();
        process::exit(EXIT_USAGE);
    });

    if let Err(e) = init_logging(args.verbose, args.quiet) {
        eprintln!("nodate: cannot initialise logging: {}", e);
        process::exit(EXIT_INIT);
    }

    if let Err(e) = validate_root(&args.path) {
        eprintln!("nodate: {}", e);
        process::exit(EXIT_INVALID_PATH);
    }

    let config = ScanConfig {
        walker: WalkerConfig {
            max_depth: args.level,
            ignore_patterns: args.ignore.clone(),
        },
        parallel_workers: args.jobs,
        ..Default::default()
    };

    // One backend for the whole scan, dropped when main returns
    let inspector = DateTagInspector::new(ExifBackend::new());
    let scanner = Scanner::new(config, &inspector);

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let result = if args.json {
        run_scan(&scanner, &args, JsonSink::new(out, &args.path))
    } else {
        run_scan(&scanner, &args, LineSink::new(out))
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("nodate: {}", e);
            process::exit(EXIT_OUTPUT);
        }
    };

    if args.summary {
        if let Err(e) = print_summary(&summary, should_use_color(args.color)) {
            eprintln!("nodate: error writing summary: {}", e);
            process::exit(EXIT_OUTPUT);
        }
    }
}
