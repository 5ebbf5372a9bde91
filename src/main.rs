use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use std::fs::read_to_string;
use std::str::FromStr;
use std::sync::Once;
use stepseer::config::EngineConfig;
use stepseer::debugger::disasm::listing::Listing;
use stepseer::debugger::source::FsSource;
use stepseer::debugger::{NameRegistry, StepIntoCandidate, StepIntoResolver};

static LOGGER_ONCE: Once = Once::new();

/// Source location: `FILE:LINE[:COLUMN]`.
#[derive(Debug, Clone)]
struct Location {
    file: String,
    line: u64,
    column: Option<u64>,
}

impl FromStr for Location {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.rsplitn(3, ':').collect();
        let parse_num = |s: &str| {
            s.parse::<u64>()
                .map_err(|e| anyhow!("invalid number `{s}`: {e}"))
        };
        match parts.as_slice() {
            [line, file] => Ok(Location {
                file: file.to_string(),
                line: parse_num(line)?,
                column: None,
            }),
            [column, line, file] => match parse_num(line) {
                Ok(line) => Ok(Location {
                    file: file.to_string(),
                    line,
                    column: Some(parse_num(column)?),
                }),
                // file name contains ':'
                Err(_) => Ok(Location {
                    file: format!("{file}:{line}"),
                    line: parse_num(column)?,
                    column: None,
                }),
            },
            _ => Err(anyhow!("expect FILE:LINE[:COLUMN], got `{s}`")),
        }
    }
}

fn parse_pc(s: &str) -> anyhow::Result<u64> {
    let pc = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16)?,
        None => s.parse()?,
    };
    Ok(pc)
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, env = "SEER_CONFIG")]
    config: Option<String>,

    /// Recorded session: known names and disassembly listing (TOML)
    #[arg(long)]
    session: String,

    /// Directory with source files
    #[arg(long)]
    root: Option<String>,

    /// Current program counter
    #[arg(long, value_parser = parse_pc, default_value = "0")]
    pc: u64,

    /// Location of a step-into request
    location: Location,
}

/// Debugger session recorded for offline disambiguation.
#[derive(Deserialize)]
struct Session {
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    functions: Vec<String>,
    #[serde(flatten)]
    listing: Listing,
}

fn print_candidate(candidate: &StepIntoCandidate, width: usize, selected: bool) {
    let (start, end) = candidate.column_interval();
    println!(
        "{mark} {name:<16} {file}:{line}:{start}-{end} {pc:#x} {expr}",
        mark = if selected { ">" } else { " " },
        name = candidate.name(),
        file = candidate.filename(),
        line = candidate.line(),
        pc = candidate.instruction().pc,
        expr = candidate.expr_string_truncated(width),
    );
}

fn main() -> anyhow::Result<()> {
    LOGGER_ONCE.call_once(env_logger::init);

    let args = Args::parse();
    let config = EngineConfig::load(args.config.as_deref());

    let data = read_to_string(&args.session)
        .with_context(|| format!("read session file {}", args.session))?;
    let session: Session = toml::from_str(&data).context("parse session file")?;

    let source = match args.root {
        Some(root) => FsSource::with_root(root),
        None => FsSource::new(),
    };
    let width = config.expr_width;
    let mut resolver = StepIntoResolver::new(
        source,
        session.listing,
        session.types.into_iter().collect::<NameRegistry>(),
        session.functions.into_iter().collect::<NameRegistry>(),
    )
    .with_config(config);

    let Location { file, line, column } = args.location;
    match column {
        Some(column) => match resolver.resolve(args.pc, &file, line, column) {
            Some(candidate) => print_candidate(candidate, width, true),
            None => println!("no step-into target at {file}:{line}:{column}"),
        },
        None => {
            resolver.resolve(args.pc, &file, line, 0);
            if resolver.candidates().is_empty() {
                println!("no step-into targets at {file}:{line}");
            }
            resolver
                .candidates()
                .iter()
                .for_each(|c| print_candidate(c, width, false));
        }
    }

    Ok(())
}
