//! babymaker CLI

use anyhow::{Context, Result};
use bm_core::{EventRecord, LorentzVector, PrescaleLookup};
use bm_select::{NoPrescales, PrescaleTable, TriggerFamily, TriggerMatcher};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};

mod baby;
mod config;
mod scan;
mod source;

use baby::BabyWriter;
use config::{FlavorSelection, ScanConfig, read_scan_config};
use scan::{ScanDriver, ScanOptions, ScanSummary};
use source::EventChain;

#[derive(Parser)]
#[command(name = "babymaker")]
#[command(about = "babymaker - lepton fake-rate ntuples with trigger matching")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan event files and write one baby record per lepton candidate
    Scan {
        /// Scan configuration (YAML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Event file or directory of `.jsonl` files (repeatable). Replaces config inputs.
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Output baby file (JSON lines). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many processed events
        #[arg(long)]
        max_events: Option<u64>,

        /// Lepton flavors to build candidates from
        #[arg(long, value_enum)]
        flavor: Option<FlavorSelection>,

        /// Treat all events as real data (enables duplicate removal)
        #[arg(long, conflicts_with = "mc")]
        data: bool,

        /// Treat all events as simulation
        #[arg(long)]
        mc: bool,

        /// HLT/L1 prescale table (JSON or YAML)
        #[arg(long)]
        prescales: Option<PathBuf>,

        /// Trigger-object matching radius
        #[arg(long)]
        delta_r: Option<f64>,

        /// Keep candidates that form a Z with another lepton
        #[arg(long)]
        no_z_veto: bool,

        /// Write the scan summary (pretty JSON) here
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Print the built-in trigger families
    Families {
        /// Restrict to one flavor
        #[arg(long, value_enum, default_value = "both")]
        flavor: FlavorSelection,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Match one lepton against one trigger family in a single event
    Match {
        /// Event record (JSON)
        #[arg(long)]
        event: PathBuf,

        /// Version pattern with one capture group, e.g. `HLT_Mu8_v(\d+)`
        #[arg(long)]
        pattern: String,

        /// Family name used in diagnostics
        #[arg(long, default_value = "family")]
        name: String,

        /// Expected trigger-object particle type
        #[arg(long, default_value = "11", allow_hyphen_values = true)]
        pdg: i32,

        /// Matching radius
        #[arg(long, default_value = "0.4")]
        delta_r: f64,

        /// Lepton transverse momentum
        #[arg(long)]
        pt: f64,

        /// Lepton pseudorapidity
        #[arg(long, allow_hyphen_values = true)]
        eta: f64,

        /// Lepton azimuth
        #[arg(long, allow_hyphen_values = true)]
        phi: f64,

        /// L1 seed to look up in the prescale table
        #[arg(long)]
        l1_seed: Option<String>,

        /// HLT/L1 prescale table (JSON or YAML)
        #[arg(long)]
        prescales: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan {
            config,
            input,
            output,
            max_events,
            flavor,
            data,
            mc,
            prescales,
            delta_r,
            no_z_veto,
            summary,
        } => {
            let mut cfg = match config {
                Some(path) => read_scan_config(&path)
                    .with_context(|| format!("failed to read config {}", path.display()))?,
                None => ScanConfig::default(),
            };
            if !input.is_empty() {
                cfg.inputs = input;
            }
            if output.is_some() {
                cfg.output = output;
            }
            if max_events.is_some() {
                cfg.max_events = max_events;
            }
            if let Some(flavor) = flavor {
                cfg.flavor = flavor;
            }
            if data {
                cfg.is_data = Some(true);
            } else if mc {
                cfg.is_data = Some(false);
            }
            if prescales.is_some() {
                cfg.prescales = prescales;
            }
            if let Some(dr) = delta_r {
                cfg.delta_r_cut = dr;
            }
            if no_z_veto {
                cfg.z_veto = false;
            }
            cmd_scan(&cfg, summary.as_ref())
        }
        Commands::Families { flavor, output } => cmd_families(flavor, output.as_ref()),
        Commands::Match {
            event,
            pattern,
            name,
            pdg,
            delta_r,
            pt,
            eta,
            phi,
            l1_seed,
            prescales,
        } => {
            let mut family = TriggerFamily::new(name, &pattern, pdg)?;
            if let Some(seed) = l1_seed {
                family = family.with_l1_seed(seed);
            }
            let p4 = LorentzVector::from_pt_eta_phi_m(pt, eta, phi, 0.0);
            cmd_match(&event, &family, &p4, delta_r, prescales.as_deref())
        }
        Commands::Version => {
            println!("babymaker {}", bm_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_scan(cfg: &ScanConfig, summary_out: Option<&PathBuf>) -> Result<()> {
    cfg.validate()?;

    let families = match &cfg.families {
        Some(specs) => bm_select::compile_families(specs)?,
        None => bm_select::catalog::all_families()?,
    };
    tracing::info!(families = families.len(), "trigger families loaded");

    let chain = EventChain::from_paths(&cfg.inputs)?;
    if chain.is_empty() {
        anyhow::bail!("no event files found in inputs");
    }

    let summary = match &cfg.prescales {
        Some(path) => {
            let table = PrescaleTable::from_path(path)
                .with_context(|| format!("failed to read prescales {}", path.display()))?;
            scan_into_output(cfg, families, table, &chain)?
        }
        None => scan_into_output(cfg, families, NoPrescales, &chain)?,
    };

    if let Some(path) = summary_out {
        write_json(Some(path), serde_json::to_value(&summary)?)?;
    }
    Ok(())
}

fn scan_into_output<P: PrescaleLookup>(
    cfg: &ScanConfig,
    families: Vec<TriggerFamily>,
    prescales: P,
    chain: &EventChain,
) -> Result<ScanSummary> {
    let mut driver = ScanDriver::new(ScanOptions::from(cfg), families, prescales);
    match &cfg.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            run_to_writer(&mut driver, chain, BabyWriter::new(file))
        }
        None => run_to_writer(&mut driver, chain, BabyWriter::new(std::io::stdout().lock())),
    }
}

fn run_to_writer<P: PrescaleLookup, W: std::io::Write>(
    driver: &mut ScanDriver<P>,
    chain: &EventChain,
    mut writer: BabyWriter<W>,
) -> Result<ScanSummary> {
    let result = driver.run(chain, &mut writer);
    // Records written before an abort are still flushed.
    let written = writer.finish()?;
    let summary = result?;
    tracing::info!(records = written, "baby written");
    Ok(summary)
}

fn cmd_families(flavor: FlavorSelection, output: Option<&PathBuf>) -> Result<()> {
    let mut specs = Vec::new();
    for &f in flavor.flavors() {
        specs.extend(bm_select::catalog::families_for(f)?.iter().map(TriggerFamily::to_spec));
    }
    write_json(output, serde_json::to_value(&specs)?)
}

fn cmd_match(
    event_path: &Path,
    family: &TriggerFamily,
    lepton: &LorentzVector,
    dr_cut: f64,
    prescales: Option<&Path>,
) -> Result<()> {
    let bytes = std::fs::read(event_path)
        .with_context(|| format!("failed to read {}", event_path.display()))?;
    let event: EventRecord = serde_json::from_slice(&bytes)?;
    tracing::info!(run = event.run, event = event.event, family = family.name(), "matching");

    let matcher = TriggerMatcher::new(dr_cut);
    let result = match prescales {
        Some(path) => {
            matcher.match_family(&event, lepton, family, &PrescaleTable::from_path(path)?)?
        }
        None => matcher.match_family(&event, lepton, family, &NoPrescales)?,
    };
    write_json(None, serde_json::to_value(result)?)
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
