use std::{
    fmt, fs,
    io::{self, IsTerminal, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use bracket_match::{
    BracketPair, Config, ConfigError, OutputStyle, SourceLocation, locate_matching_close,
    matching_pairs,
};
use clap::{ArgAction, ArgGroup, Parser};
use owo_colors::OwoColorize;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "bracket-match.toml";

/// Report matching square brackets
#[derive(Parser, Debug)]
#[command(name = "bracket-match", version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["index", "all"])))]
struct Args {
    /// Files or glob patterns to scan (reads from stdin if none provided)
    #[arg()]
    patterns: Vec<String>,

    /// Byte offset of the opening bracket to match
    #[arg(long)]
    index: Option<usize>,

    /// Report every matched pair
    #[arg(long)]
    all: bool,

    /// Read from stdin
    #[arg(long)]
    stdin: bool,

    /// How matches are printed (overrides the config file)
    #[arg(long, value_enum)]
    output: Option<OutputStyle>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Single(usize),
    All,
}

#[derive(Debug)]
enum Input {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "stdin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What one input produced.
#[derive(Debug, Default)]
struct Report {
    /// Lines for stdout.
    lines: Vec<String>,
    /// A located failure for stderr.
    problem: Option<String>,
    /// Whether the requested match was found.
    found: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", error_label());
            ExitCode::from(2)
        }
    }
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

fn run(args: &Args) -> Result<ExitCode, Error> {
    let config = resolve_config(args)?;
    let mode = args.index.map_or(Mode::All, Mode::Single);

    let inputs = if args.stdin || args.patterns.is_empty() {
        vec![Input::Stdin]
    } else {
        expand_patterns(&args.patterns)
            .into_iter()
            .map(Input::File)
            .collect()
    };
    let labelled = inputs.len() > 1;

    let reports: Vec<Result<Report, Error>> = inputs
        .par_iter()
        .map(|input| scan_input(input, mode, &config))
        .collect();

    let mut any_missing = false;
    let mut any_error = false;
    let mut stdout = io::stdout().lock();

    for (input, report) in inputs.iter().zip(reports) {
        match report {
            Ok(report) => {
                for line in &report.lines {
                    if labelled {
                        writeln!(stdout, "{input}: {line}")?;
                    } else {
                        writeln!(stdout, "{line}")?;
                    }
                }
                if let Some(problem) = &report.problem {
                    eprintln!("{input}:{problem}");
                }
                if !report.found {
                    any_missing = true;
                }
            }
            Err(e) => {
                eprintln!("{}: {input}: {e}", error_label());
                any_error = true;
            }
        }
    }
    drop(stdout);

    if any_error {
        return Ok(ExitCode::from(2));
    }
    if any_missing {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn resolve_config(args: &Args) -> Result<Config, Error> {
    let path = args.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG);
        default.is_file().then_some(default)
    });

    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let source = fs::read_to_string(&path).map_err(|source| Error::ConfigFile {
                path: path.clone(),
                source,
            })?;
            Config::from_toml_str(&source)?
        }
        None => Config::default(),
    };

    if let Some(output) = args.output {
        config.output = output;
    }
    debug!(?config, "resolved config");

    Ok(config)
}

/// Expand glob patterns. A pattern that is not a valid glob, or matches
/// nothing, is kept as a literal path so bracketed file names still work.
fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let before = paths.len();
        match glob::glob(pattern) {
            Ok(entries) => paths.extend(entries.filter_map(Result::ok)),
            Err(e) => debug!(pattern = pattern.as_str(), error = %e, "not a glob pattern"),
        }
        if paths.len() == before {
            paths.push(PathBuf::from(pattern));
        }
    }

    debug!(count = paths.len(), "expanded input patterns");
    paths
}

fn scan_input(input: &Input, mode: Mode, config: &Config) -> Result<Report, Error> {
    let text = match input {
        Input::Stdin => read_stdin(config.max_input_bytes)?,
        Input::File(path) => read_file(path, config.max_input_bytes)?,
    };
    debug!(%input, bytes = text.len(), "scanning");

    let report = match mode {
        Mode::Single(index) => report_single(&text, index, config.output),
        Mode::All => report_all(&text, config.output),
    };
    info!(%input, found = report.found, "scanned");

    Ok(report)
}

/// Read at most one byte past `limit`, so oversized input is never buffered.
fn read_stdin(limit: usize) -> Result<String, Error> {
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    io::stdin().lock().take(cap).read_to_end(&mut bytes)?;
    check_size(bytes.len(), limit)?;
    String::from_utf8(bytes).map_err(|e| Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn read_file(path: &Path, limit: usize) -> Result<String, Error> {
    let size = fs::metadata(path)?.len();
    check_size(usize::try_from(size).unwrap_or(usize::MAX), limit)?;
    Ok(fs::read_to_string(path)?)
}

const fn check_size(size: usize, limit: usize) -> Result<(), Error> {
    if size > limit {
        return Err(Error::TooLarge { limit });
    }
    Ok(())
}

fn report_single(text: &str, index: usize, style: OutputStyle) -> Report {
    match locate_matching_close(text, index) {
        Ok(close) => Report {
            lines: vec![render_close(text, BracketPair { open: index, close }, style)],
            problem: None,
            found: true,
        },
        Err(e) => {
            info!(error = %e, "no match");
            // The index style keeps the -1 sentinel and stays quiet on stderr.
            if style == OutputStyle::Index {
                return Report {
                    lines: vec!["-1".to_string()],
                    ..Report::default()
                };
            }
            let location = SourceLocation::from_offset(text, e.offset());
            Report {
                problem: Some(format!("{location}: {e}")),
                ..Report::default()
            }
        }
    }
}

fn report_all(text: &str, style: OutputStyle) -> Report {
    let lines = matching_pairs(text)
        .into_iter()
        .map(|pair| render_pair(text, pair, style))
        .collect();

    Report {
        lines,
        problem: None,
        found: true,
    }
}

fn render_close(text: &str, pair: BracketPair, style: OutputStyle) -> String {
    match style {
        OutputStyle::Index => pair.close.to_string(),
        OutputStyle::Excerpt => pair.slice(text).to_string(),
        OutputStyle::Location => SourceLocation::from_offset(text, pair.close).to_string(),
    }
}

fn render_pair(text: &str, pair: BracketPair, style: OutputStyle) -> String {
    match style {
        OutputStyle::Index => format!("{} {}", pair.open, pair.close),
        OutputStyle::Excerpt => pair.slice(text).to_string(),
        OutputStyle::Location => format!(
            "{} {}",
            SourceLocation::from_offset(text, pair.open),
            SourceLocation::from_offset(text, pair.close)
        ),
    }
}

fn error_label() -> String {
    if io::stderr().is_terminal() {
        "error".red().bold().to_string()
    } else {
        "error".to_string()
    }
}

#[derive(Debug, Error)]
enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{}: {source}", .path.display())]
    ConfigFile { path: PathBuf, source: io::Error },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("input is larger than max_input_bytes ({limit})")]
    TooLarge { limit: usize },
}
