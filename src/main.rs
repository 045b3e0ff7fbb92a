//! CLI entry point for filesweep

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use filesweep::{AuditLog, Mode, TraversalConfig, run};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filesweep")]
#[command(about = "Walk a directory tree and list, delete, or archive matching files")]
#[command(version)]
struct Args {
    /// Root directory to start from
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Append deletion records to this file (default: stdout)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// List files only; overrides --del and --archive
    #[arg(long)]
    list: bool,

    /// Archive matching files into this directory (empty disables archiving)
    #[arg(long, value_name = "DIR")]
    archive: Option<OsString>,

    /// Delete matching files
    #[arg(long)]
    del: bool,

    /// Only act on files with this extension, including the dot (e.g. .log)
    #[arg(long, value_name = "EXT", default_value = "")]
    ext: String,

    /// Minimum file size. Use suffixes: K, M, G (e.g., 5M for 5MB)
    #[arg(long, value_name = "SIZE", default_value = "0", value_parser = parse_file_size)]
    size: u64,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Archive destination, with an empty value meaning "no archiving".
    fn archive_dir(&self) -> Option<PathBuf> {
        self.archive
            .as_ref()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
fn parse_file_size(s: &str) -> Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {}", s))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Audit records go to stdout unless a log file is given
    let audit_sink: Box<dyn Write> = match &args.log {
        Some(path) => {
            let mut options = OpenOptions::new();
            options.append(true).create(true).read(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o644);
            }
            match options.open(path) {
                Ok(file) => Box::new(file),
                Err(e) => {
                    eprintln!("filesweep: cannot open log '{}': {}", path.display(), e);
                    process::exit(1);
                }
            }
        }
        None => Box::new(io::stdout()),
    };
    let mut audit = AuditLog::new(audit_sink);

    let config = TraversalConfig::new(Mode::from_flags(args.list, args.del, args.archive_dir()))
        .with_extension(args.ext)
        .with_min_size(args.size);

    let mut out = io::stdout();
    match run(&args.root, &mut out, &config, &mut audit) {
        Ok(summary) => {
            info!(
                visited = summary.visited,
                listed = summary.listed,
                archived = summary.archived,
                deleted = summary.deleted,
                "sweep complete"
            );
        }
        Err(e) => {
            eprintln!("filesweep: {}", e);
            process::exit(1);
        }
    }
}
