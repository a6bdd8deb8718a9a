//! Turnover CLI Application
//!
//! Command-line front end for the turnover-core library. It adds:
//! - Directory traversal and parallel EDL reading
//! - TOML configuration with command-line overrides
//! - CSV, ALE, SubCap and JSON output files
//! - A run summary listing skipped records

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use turnover_core::output::ale::write_ale;
use turnover_core::output::csv::write_csv;
use turnover_core::output::subcap::{captions_for_vfx, write_subcap};
use turnover_core::{Cmx3600Reader, EditList, EditListReader, FrameRate, ReelPreference, Reconciler};

mod config;
mod report;

use config::AppConfig;

/// Turnover - Reconcile per-track EDLs into a VFX turnover list
#[derive(Parser, Debug)]
#[command(name = "turnover")]
#[command(about = "Reconcile per-track CMX3600 EDLs into a sorted event list", long_about = None)]
#[command(version)]
struct Args {
    /// EDL files or directories containing them
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// CSV destination (default: derived from the first input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (turnover.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Framerate for EDLs that do not declare one (e.g. 23.98, 24, 25)
    #[arg(long, value_name = "FPS", value_parser = parse_framerate)]
    framerate: Option<FrameRate>,

    /// Use the source file name as reel when it conflicts with the tape name
    #[arg(long)]
    prefer_source_file: bool,

    /// First frame number of VFX plates
    #[arg(long, value_name = "FRAME")]
    frame_count_start: Option<u32>,

    /// Comma-separated output columns
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',')]
    columns: Vec<String>,

    /// Also write `<output stem>_subcap.txt` with VFX captions
    #[arg(long)]
    subcap: bool,

    /// Also write an ALE
    #[arg(long, value_name = "FILE")]
    ale: Option<PathBuf>,

    /// Print the reconciled sequence as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Skip VFX locator extraction
    #[arg(long)]
    no_vfx: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_framerate(value: &str) -> std::result::Result<FrameRate, String> {
    FrameRate::normalize(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Turnover CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using turnover-core library v{}", turnover_core::VERSION);

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let files = collect_inputs(&args.inputs)?;
    log::info!("Reading {} edit lists", files.len());

    let reader = Cmx3600Reader::new(config.reconcile.default_framerate);
    let lists: Vec<EditList> = files
        .par_iter()
        .map(|path| {
            reader
                .read_path(path)
                .with_context(|| format!("Failed to read edit list: {:?}", path))
        })
        .collect::<Result<_>>()?;

    let result = Reconciler::new(config.reconcile.clone())
        .reconcile(&lists)
        .context("Failed to reconcile edit lists")?;

    let columns = config.output.columns();
    let events = result.sequence.events();

    let csv_path = output_path(&args.inputs, args.output.as_deref());
    let mut csv = BufWriter::new(
        File::create(&csv_path).with_context(|| format!("Failed to create CSV file: {:?}", csv_path))?,
    );
    write_csv(&mut csv, events, &columns).with_context(|| format!("Failed to write CSV file: {:?}", csv_path))?;
    csv.flush()?;
    log::info!("Wrote {} events to {:?}", events.len(), csv_path);

    if config.output.subcap {
        let subcap_path = subcap_path(&csv_path);
        let mut out = BufWriter::new(
            File::create(&subcap_path)
                .with_context(|| format!("Failed to create SubCap file: {:?}", subcap_path))?,
        );
        let captions = captions_for_vfx(events);
        write_subcap(&mut out, &captions)
            .with_context(|| format!("Failed to write SubCap file: {:?}", subcap_path))?;
        out.flush()?;
        log::info!("Wrote {} captions to {:?}", captions.len(), subcap_path);
    }

    if let Some(ale_path) = &config.output.ale {
        let mut out = BufWriter::new(
            File::create(ale_path).with_context(|| format!("Failed to create ALE file: {:?}", ale_path))?,
        );
        write_ale(&mut out, events, &columns, &config.output.ale_header)
            .with_context(|| format!("Failed to write ALE file: {:?}", ale_path))?;
        out.flush()?;
        log::info!("Wrote ALE to {:?}", ale_path);
    }

    let summary = report::Summary::new(&lists, &result);
    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize sequence")?;
        println!("{}", json);
        if !args.quiet {
            report::write_summary(&mut io::stderr(), &summary, &result)?;
        }
    } else if !args.quiet {
        report::write_summary(&mut io::stdout(), &summary, &result)?;
    }

    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(rate) = args.framerate {
        config.reconcile.default_framerate = rate;
    }
    if args.prefer_source_file {
        config.reconcile.reel_preference = ReelPreference::SourceFile;
    }
    if let Some(start) = args.frame_count_start {
        config.reconcile.frame_count_start = start;
    }
    if args.no_vfx {
        config.reconcile.extract_vfx = false;
    }
    if !args.columns.is_empty() {
        config.output.columns = Some(args.columns.clone());
    }
    if args.subcap {
        config.output.subcap = true;
    }
    if args.ale.is_some() {
        config.output.ale = args.ale.clone();
    }
}

/// Expand directories into their `*.edl` files, sorted by name
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(input).with_context(|| format!("Failed to read directory: {:?}", input))? {
                let path = entry?.path();
                if path.is_file() && is_edl(&path) {
                    found.push(path);
                }
            }
            found.sort();
            if found.is_empty() {
                log::warn!("No EDL files in {:?}", input);
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        bail!("No EDL files found in {:?}", inputs);
    }
    Ok(files)
}

fn is_edl(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("edl"))
}

/// CSV destination when `--output` is not given
fn output_path(inputs: &[PathBuf], output: Option<&Path>) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }
    match inputs {
        [dir] if dir.is_dir() => {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "turnover".to_string());
            dir.join(format!("{}.csv", name))
        }
        [first, ..] => first.with_extension("csv"),
        [] => PathBuf::from("turnover.csv"),
    }
}

fn subcap_path(csv_path: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "turnover".to_string());
    csv_path.with_file_name(format!("{}_subcap.txt", stem))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
