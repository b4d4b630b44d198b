//! Norm Evolution - command line driver
//!
//! Builds an experiment from defaults, an optional TOML file and command line
//! overrides, runs it, and writes one row of statistics per generation.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use norm_evolution::core::config::ExperimentConfig;
use norm_evolution::engine::{GenerationReport, SimEngine};
use norm_evolution::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Simulate the evolution of indirect reciprocity norms among tribes
#[derive(Parser, Debug)]
#[command(name = "runsim")]
#[command(about = "Run a tribal indirect reciprocity simulation and print per-generation stats")]
struct Args {
    /// TOML experiment file; command line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations
    #[arg(short = 'g', long)]
    generations: Option<u32>,

    /// Donation cost
    #[arg(short = 'c', long)]
    cost: Option<i64>,

    /// Donation benefit
    #[arg(short = 'b', long)]
    benefit: Option<i64>,

    /// Number of tribes
    #[arg(short = 't', long)]
    tribes: Option<usize>,

    /// Agents per tribe
    #[arg(short = 'a', long)]
    agents: Option<usize>,

    /// Probability of assessment error
    #[arg(long)]
    passerr: Option<f64>,

    /// Probability of action module bit mutation
    #[arg(long)]
    pactmut: Option<f64>,

    /// Probability of execution error
    #[arg(long)]
    pexeerr: Option<f64>,

    /// Probability of conflict between two tribes
    #[arg(long)]
    pcon: Option<f64>,

    /// Conflict selection strength (accepts "inf")
    #[arg(long)]
    beta: Option<f64>,

    /// Norm adoption strength
    #[arg(long)]
    eta: Option<f64>,

    /// Probability of migration per agent slot
    #[arg(long)]
    pmig: Option<f64>,

    /// Probability of assess module bit mutation
    #[arg(long)]
    passmut: Option<f64>,

    /// Allow a tribe to be defeated by several winners per generation
    #[arg(long)]
    multidef: bool,

    /// Attempt a mutation on every assess bit during a norm shift
    #[arg(long)]
    passmutall: bool,

    /// Use the adaptive mutation rate
    #[arg(long)]
    useam: bool,

    /// Disable the parallel game phase
    #[arg(long)]
    nomp: bool,

    /// Number of parallel workers
    #[arg(long)]
    workers: Option<usize>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("norm_evolution=info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let experiment = build_experiment(&args)?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let mut out = BufWriter::new(out);

    let mut engine = SimEngine::new(experiment.engine.clone())?;

    tracing::info!(
        generations = experiment.generations,
        cost = experiment.cost,
        benefit = experiment.benefit,
        "starting simulation"
    );
    let start = Instant::now();

    if args.format == OutputFormat::Csv {
        writeln!(out, "{}", csv_header())?;
    }
    for _ in 0..experiment.generations {
        let report = engine.run_generation(experiment.cost, experiment.benefit)?;
        match args.format {
            OutputFormat::Csv => writeln!(out, "{}", csv_row(&report))?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
        }
    }
    out.flush()?;

    tracing::info!(
        seed = engine.seed(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "simulation complete"
    );
    Ok(())
}

fn build_experiment(args: &Args) -> Result<ExperimentConfig> {
    let mut experiment = match &args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };

    if let Some(g) = args.generations {
        experiment.generations = g;
    }
    if let Some(c) = args.cost {
        experiment.cost = c;
    }
    if let Some(b) = args.benefit {
        experiment.benefit = b;
    }

    let engine = &mut experiment.engine;
    if let Some(t) = args.tribes {
        engine.num_tribes = t;
    }
    if let Some(a) = args.agents {
        engine.num_agents = a;
    }

    let floats = [
        ("passerr", args.passerr),
        ("pactmut", args.pactmut),
        ("pexeerr", args.pexeerr),
        ("pcon", args.pcon),
        ("beta", args.beta),
        ("eta", args.eta),
        ("pmig", args.pmig),
        ("passmut", args.passmut),
    ];
    for (key, value) in floats {
        if let Some(v) = value {
            engine.set_float(key, v)?;
        }
    }

    // flags only ever switch a default off or on, never back
    if args.multidef {
        engine.set_bool("singledef", false)?;
    }
    if args.passmutall {
        engine.set_bool("passmutall", true)?;
    }
    if args.useam {
        engine.set_bool("useam", true)?;
    }
    if args.nomp {
        engine.set_bool("nomp", true)?;
    }
    if args.workers.is_some() {
        engine.workers = args.workers;
    }
    if args.seed.is_some() {
        engine.seed = args.seed;
    }

    experiment.validate()?;
    Ok(experiment)
}

fn csv_header() -> String {
    let mut cols = vec!["generation".to_string(), "total_payouts".to_string()];
    cols.extend((0..8).map(|i| format!("assess_{}", i)));
    cols.extend((0..4).map(|i| format!("action_{}", i)));
    cols.extend(
        ["all_c", "all_d", "conflicts", "bits_adopted", "bits_mutated", "migrated"]
            .iter()
            .map(|s| s.to_string()),
    );
    cols.join(",")
}

fn csv_row(report: &GenerationReport) -> String {
    let stats = &report.stats;
    let mut cols = vec![report.generation.to_string(), report.total_payouts.to_string()];
    cols.extend(stats.assess_bit_counts.iter().map(u32::to_string));
    cols.extend(stats.action_bit_counts.iter().map(u32::to_string));
    cols.extend(
        [
            stats.all_cooperators,
            stats.all_defectors,
            report.evolution.conflicts,
            report.evolution.bits_adopted,
            report.evolution.bits_mutated,
            report.evolution.agents_migrated,
        ]
        .iter()
        .map(u32::to_string),
    );
    cols.join(",")
}
