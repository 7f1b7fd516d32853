//! CLI tool for xlfill - inspects templates and fills placeholders
//!
//! Usage:
//!   xlfill_cli analyze <template.xlsx>                      # Analysis JSON to stdout
//!   xlfill_cli analyze <template.xlsx> -o fields.json       # Analysis JSON to file
//!   xlfill_cli fill <template.xlsx> -o out.xlsx --set Name=Jane --values values.json

use clap::{Parser, Subcommand};
use env_logger::Env;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use xlfill::planner::ValueMap;
use xlfill::{parser, scanner, service, XlfillError};

#[derive(Parser)]
#[command(name = "xlfill_cli", version, about = "Fill {{placeholders}} in XLSX templates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every placeholder occurrence as JSON
    Analyze {
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace placeholders and write a new workbook
    Fill {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// NAME=VALUE, may be repeated; wins over --values
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// JSON object mapping placeholder names to values
        #[arg(long)]
        values: Option<PathBuf>,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))
}

fn read_file(path: &Path) -> Result<Vec<u8>, XlfillError> {
    fs::read(path)
        .map_err(|e| XlfillError::Other(format!("Error reading {}: {e}", path.display())))
}

fn analyze(input: &Path, output: Option<&Path>) -> Result<(), XlfillError> {
    let data = read_file(input)?;
    let workbook = parser::open(&data)?;
    let analysis = scanner::analyze(&workbook, None);
    let json = serde_json::to_string_pretty(&analysis)?;

    match output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn fill(
    input: &Path,
    output: &Path,
    set: &[(String, String)],
    values_file: Option<&Path>,
) -> Result<(), XlfillError> {
    let data = read_file(input)?;

    let mut values = ValueMap::new();
    if let Some(path) = values_file {
        let map: BTreeMap<String, String> = serde_json::from_slice(&read_file(path)?)?;
        for (name, value) in &map {
            values.insert(name, value);
        }
    }
    for (name, value) in set {
        values.set(name, value);
    }

    let filled = service::fill_workbook(&data, &values)?;
    fs::write(output, filled)?;
    eprintln!("Written: {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Analyze { input, output } => analyze(input, output.as_deref()),
        Command::Fill {
            input,
            output,
            set,
            values,
        } => fill(input, output, set, values.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
