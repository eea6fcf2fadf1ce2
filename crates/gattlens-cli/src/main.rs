use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gattlens_core::{CharacteristicId, ReplayConfig, Report};
use glob::glob;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "Examples:\n  gattlens decode heart-rate-measurement 06:48\n  gattlens decode 0x2A19 5a\n  gattlens replay session.txt -o report.json\n  gattlens replay 'captures/*.txt' --stdout --pretty";

#[derive(Parser, Debug)]
#[command(name = "gattlens")]
#[command(version)]
#[command(
    about = "Offline decoder for BLE GATT health and fitness payloads.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one payload for a characteristic and print it as JSON.
    Decode {
        /// Characteristic name (heart-rate-measurement) or assigned number (0x2A37)
        characteristic: String,

        /// Payload as hex; ':' and '-' separators are ignored
        payload: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Replay a transcript of transport events and write a JSON report.
    #[command(after_help = EXAMPLES)]
    Replay {
        /// Path (or single-match glob) to a transcript file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Replay settings as JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// List known characteristics.
    Characteristics,
}

struct ReplayArgs {
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    config: Option<PathBuf>,
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = matches!(cli.command, Commands::Replay { quiet: true, .. });
    init_logging(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Decode {
            characteristic,
            payload,
            pretty,
        } => cmd_decode(&characteristic, &payload, pretty),
        Commands::Replay {
            input,
            report,
            stdout,
            pretty,
            compact,
            config,
            quiet,
        } => cmd_replay(ReplayArgs {
            input,
            report,
            stdout,
            pretty,
            compact,
            config,
            quiet,
        }),
        Commands::Characteristics => {
            cmd_characteristics();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        // keep the context chain, "outer: inner"
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(characteristic: &str, payload: &str, pretty: bool) -> Result<(), CliError> {
    let id = characteristic.parse::<CharacteristicId>().map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("run `gattlens characteristics` to list known names".to_string()),
        )
    })?;
    let data = gattlens_core::decode_hex(payload).map_err(|msg| {
        CliError::new(msg, Some("pass the payload as hex, e.g. 06:48".to_string()))
    })?;
    debug!(characteristic = %id, len = data.len(), "decoding payload");
    let decoded = gattlens_core::gatt::decode(id, &data)
        .map_err(|err| CliError::new(format!("{id}: {err}"), None))?;
    let json = if pretty {
        serde_json::to_string_pretty(&decoded)
    } else {
        serde_json::to_string(&decoded)
    }
    .context("JSON serialization failed")?;
    println!("{}", json);
    Ok(())
}

fn cmd_characteristics() {
    for id in CharacteristicId::ALL {
        let number = id
            .assigned_number()
            .map(|n| format!("0x{n:04X}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<40} {:<7} {}", id.name(), number, id.service());
    }
}

fn cmd_replay(args: ReplayArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let config = load_config(args.config.as_deref())?;
    let report_path = if args.stdout {
        None
    } else {
        Some(args.report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };
    if let Some(report_path) = report_path.as_ref() {
        ensure_distinct_output(&resolved_input, report_path)?;
    }

    let rep = gattlens_core::replay_transcript_file(&resolved_input, &config)
        .context("transcript replay failed")?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    let Some(report_path) = report_path else {
        print!("{}", json);
        return Ok(());
    };
    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report_path, json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    if !args.quiet {
        print_summary(&rep);
        eprintln!("OK: report written -> {}", report_path.display());
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReplayConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReplayConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid config file {}: {}", path.display(), err),
            Some("known fields: wheel_circumference_mm, metadata_capacity".to_string()),
        )
    })
}

fn ensure_distinct_output(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // a parent that does not exist yet cannot hold the input
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let Some(file_name) = report.file_name() else {
        return Err(CliError::new(
            format!("invalid report path: {}", report.display()),
            None,
        ));
    };
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_summary(rep: &Report) {
    eprintln!("Replayed {} events:", rep.events_total);
    for device in &rep.devices {
        let records: usize = device
            .connections
            .iter()
            .flat_map(|connection| &connection.services)
            .map(|service| service.records.len())
            .sum();
        eprintln!(
            "  {} connections={} records={} rejected={}",
            device.device,
            device.connections.len(),
            records,
            device.rejected_requests.len()
        );
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a transcript text file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a transcript text file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut message = format!("multiple files match pattern '{}' ({} matches)", pattern, count);
            let listed: Vec<String> = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect();
            message.push_str("; matches: ");
            message.push_str(&listed.join(", "));
            if count > 3 {
                message.push_str(", ...");
            }
            Err(CliError::new(
                message,
                Some("pass a single transcript, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
