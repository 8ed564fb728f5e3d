use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::combat::{
    compare, export_trace_csv, simulate, ExportError, Rotation, SimInputs, TraceMode,
};
use crate::config::AppConfig;
use crate::data::{
    load_catalog, load_catalog_or_default, validate_catalog, validate_loadout, Catalog,
    CatalogError, ValidationReport, ValidationSeverity,
};
use crate::loadout::Loadout;
use crate::optimizer::{optimize, OptimizeOptions, TargetStats};
use crate::stats::aggregate;

const USAGE: &str = "usage: resonance <stats|simulate|optimize|compare|validate> [args]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Stats,
    Simulate,
    Optimize,
    Compare,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("stats") => Some(Command::Stats),
        Some("simulate") => Some(Command::Simulate),
        Some("optimize") => Some(Command::Optimize),
        Some("compare") => Some(Command::Compare),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("unable to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("validation failed: {0} error(s)")]
    ValidationFailed(usize),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Positional arguments plus `--flag value` / `--switch` options.
#[derive(Debug, Default)]
struct Args<'a> {
    positional: Vec<&'a str>,
    options: Vec<(&'a str, Option<&'a str>)>,
}

const VALUE_FLAGS: [&str; 6] = ["--rotation", "--inputs", "--options", "--trace-csv", "--seed", "--duration"];

impl<'a> Args<'a> {
    fn parse(raw: &'a [String]) -> Self {
        let mut args = Self::default();
        let mut iter = raw.iter().skip(2).map(String::as_str);
        while let Some(arg) = iter.next() {
            if VALUE_FLAGS.contains(&arg) {
                args.options.push((arg, iter.next()));
            } else if arg.starts_with("--") {
                args.options.push((arg, None));
            } else {
                args.positional.push(arg);
            }
        }
        args
    }

    fn value(&self, flag: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(name, _)| *name == flag)
            .and_then(|(_, value)| *value)
    }

    fn switch(&self, flag: &str) -> bool {
        self.options.iter().any(|(name, _)| *name == flag)
    }

    fn required(&self, index: usize, usage: &str) -> Result<&'a str, CliError> {
        self.positional
            .get(index)
            .copied()
            .ok_or_else(|| CliError::Usage(usage.to_string()))
    }

    fn number<T: std::str::FromStr>(&self, flag: &str) -> Result<Option<T>, CliError> {
        match self.value(flag) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| CliError::Usage(format!("invalid {flag} '{raw}'"))),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse {
        path: path.to_string(),
        source,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_report(report: &ValidationReport) {
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    let result = match parse_command(args) {
        Some(Command::Stats) => handle_stats(args, &config),
        Some(Command::Simulate) => handle_simulate(args, &config),
        Some(Command::Optimize) => handle_optimize(args, &config),
        Some(Command::Compare) => handle_compare(args, &config),
        Some(Command::Validate) => handle_validate(args, &config),
        None => Err(CliError::Usage(USAGE.to_string())),
    };
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            err.exit_code()
        }
    }
}

fn catalog(config: &AppConfig) -> Catalog {
    load_catalog_or_default(config.catalog_path.as_deref())
}

fn handle_stats(args: &[String], config: &AppConfig) -> Result<(), CliError> {
    let args = Args::parse(args);
    let path = args.required(0, "usage: resonance stats <loadout.json>")?;
    let loadout: Loadout = read_json(path)?;
    print_json(&aggregate(&loadout, &catalog(config)))
}

fn handle_simulate(args: &[String], config: &AppConfig) -> Result<(), CliError> {
    let args = Args::parse(args);
    let path = args.required(
        0,
        "usage: resonance simulate <loadout.json> [--rotation file] [--inputs file] [--duration secs] [--trace-csv file] [--table]",
    )?;
    let loadout: Loadout = read_json(path)?;
    let rotation: Rotation = match args.value("--rotation") {
        Some(file) => read_json(file)?,
        None => Rotation::Priority,
    };
    let mut inputs: SimInputs = match args.value("--inputs") {
        Some(file) => read_json(file)?,
        None => SimInputs::default(),
    };
    if let Some(duration) = args.number::<f64>("--duration")? {
        inputs.fight_duration = duration;
    }
    let csv_path = args.value("--trace-csv");
    if csv_path.is_some() && inputs.trace_mode == TraceMode::Off {
        inputs.trace_mode = TraceMode::Samples;
    }

    let stats = aggregate(&loadout, &catalog(config));
    let result = simulate(&stats, &inputs.with_loadout_talents(&loadout), &rotation);
    if let Some(csv_path) = csv_path {
        export_trace_csv(Path::new(csv_path), &result.trace)?;
    }

    if args.switch("--table") {
        println!("skill\tcasts\thits\tdamage\tshare");
        for (skill, row) in &result.breakdown {
            println!(
                "{skill}\t{}\t{}\t{:.1}\t{:.4}",
                row.casts, row.hits, row.damage, row.share
            );
        }
        println!("total\t\t\t{:.1}\t{:.1} dps", result.total_damage, result.dps);
        Ok(())
    } else {
        print_json(&result)
    }
}

fn handle_optimize(args: &[String], config: &AppConfig) -> Result<(), CliError> {
    let args = Args::parse(args);
    let usage = "usage: resonance optimize <loadout.json> <target.json> [--options file] [--seed n]";
    let loadout: Loadout = read_json(args.required(0, usage)?)?;
    let target: TargetStats = read_json(args.required(1, usage)?)?;
    let mut options: OptimizeOptions = match args.value("--options") {
        Some(file) => read_json(file)?,
        None => OptimizeOptions::default(),
    };
    if let Some(seed) = args.number::<u64>("--seed")? {
        options.seed = seed;
    }
    if options.workers == 0 {
        options.workers = config.workers;
    }
    print_json(&optimize(&loadout, &target, &options, &catalog(config)))
}

fn handle_compare(args: &[String], config: &AppConfig) -> Result<(), CliError> {
    let args = Args::parse(args);
    if args.positional.len() < 2 {
        return Err(CliError::Usage(
            "usage: resonance compare <loadout.json> <loadout.json>... [--rotation file] [--inputs file]"
                .to_string(),
        ));
    }
    let loadouts = args
        .positional
        .iter()
        .map(|path| read_json::<Loadout>(path).map(|loadout| (path.to_string(), loadout)))
        .collect::<Result<Vec<_>, _>>()?;
    let rotation: Rotation = match args.value("--rotation") {
        Some(file) => read_json(file)?,
        None => Rotation::Priority,
    };
    let mut inputs: SimInputs = match args.value("--inputs") {
        Some(file) => read_json(file)?,
        None => SimInputs::default(),
    };
    inputs.trace_mode = TraceMode::Off;
    let catalog = catalog(config);
    let entries = crate::parallel::WorkerPool::with_workers(config.workers)
        .install(|| compare(&loadouts, &inputs, &rotation, &catalog));
    print_json(&entries)
}

/// Validate the configured catalog (strictly: a broken file is an error
/// here) and, when given, a loadout against it.
fn handle_validate(args: &[String], config: &AppConfig) -> Result<(), CliError> {
    let args = Args::parse(args);
    let catalog = match config.catalog_path.as_deref() {
        Some(path) => load_catalog(path)?,
        None => crate::data::builtin_catalog(),
    };
    let mut report = validate_catalog(&catalog);
    if let Some(path) = args.positional.first() {
        let loadout: Loadout = read_json(path)?;
        report
            .diagnostics
            .extend(validate_loadout(&loadout, &catalog).diagnostics);
    }
    print_report(&report);

    let errors = report.count(ValidationSeverity::Error);
    if errors > 0 {
        return Err(CliError::ValidationFailed(errors));
    }
    println!(
        "validation passed: {} warning(s), {} info",
        report.count(ValidationSeverity::Warning),
        report.count(ValidationSeverity::Info)
    );
    Ok(())
}
