use clap::{Parser, Subcommand};
use ef_model::CompartmentalModel;
use ef_sim::{
    EnsembleOptions, SimOptions, SimRecord, ensemble_percentile, run_ensemble, run_sim,
};
use std::path::{Path, PathBuf};

mod scenario;

use scenario::{COMPARTMENT_NAMES, ScenarioOptions};

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "ef-cli")]
#[command(about = "Epiflow CLI - Compartmental epidemic simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone, Copy)]
struct ScenarioArgs {
    /// Number of population groups (age bands)
    #[arg(long, default_value_t = 3)]
    groups: usize,
    /// Simulated days
    #[arg(long, default_value_t = 100.0)]
    days: f64,
    /// Time step in days
    #[arg(long, default_value_t = 0.1)]
    dt: f64,
    /// Intervention day
    #[arg(long, default_value_t = 30.0)]
    damping_time: f64,
    /// Intervention contact reduction in [0, 1]
    #[arg(long, default_value_t = 0.7)]
    damping_value: f64,
    /// Disable the intervention entirely
    #[arg(long)]
    undamped: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single deterministic simulation and export compartment series
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a sampled ensemble and export infected-percentile envelopes
    Ensemble {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Number of ensemble members
        #[arg(long, default_value_t = 32)]
        runs: usize,
        /// Base RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the scenario's parameter set as JSON
    Params {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, output } => cmd_run(&scenario, output.as_deref()),
        Commands::Ensemble {
            scenario,
            runs,
            seed,
            output,
        } => cmd_ensemble(&scenario, runs, seed, output.as_deref()),
        Commands::Params { scenario, output } => cmd_params(&scenario, output.as_deref()),
    }
}

fn scenario_options(args: &ScenarioArgs) -> ScenarioOptions {
    ScenarioOptions {
        num_groups: args.groups,
        damping: if args.undamped {
            None
        } else {
            Some((args.damping_time, args.damping_value))
        },
        ..ScenarioOptions::default()
    }
}

fn sim_options(args: &ScenarioArgs) -> SimOptions {
    SimOptions {
        dt: args.dt,
        t_end: args.days,
        record_every: 10,
        ..SimOptions::default()
    }
}

fn cmd_run(args: &ScenarioArgs, output: Option<&Path>) -> CliResult<()> {
    let model = scenario::build(&scenario_options(args))?;
    println!(
        "Running SEIR scenario: {} groups, {} days, dt = {}",
        args.groups, args.days, args.dt
    );

    let record = run_sim(&model, &sim_options(args))?;
    println!("✓ Simulation completed: {} time points", record.len());

    let csv = compartment_csv(&model, &record);
    write_output(&csv, output)?;
    Ok(())
}

fn cmd_ensemble(args: &ScenarioArgs, runs: usize, seed: u64, output: Option<&Path>) -> CliResult<()> {
    let model = scenario::build(&scenario_options(args))?;
    println!(
        "Running ensemble: {} members, seed {}, {} groups, {} days",
        runs, seed, args.groups, args.days
    );

    let results = run_ensemble(
        &model,
        &EnsembleOptions {
            num_runs: runs,
            seed,
            sim: sim_options(args),
        },
    )?;
    println!("✓ Ensemble completed: {} members", results.len());

    let csv = infected_envelope_csv(&model, &results)?;
    write_output(&csv, output)?;
    Ok(())
}

fn cmd_params(args: &ScenarioArgs, output: Option<&Path>) -> CliResult<()> {
    let model = scenario::build(&scenario_options(args))?;
    let json = serde_json::to_string_pretty(&model)?;
    write_output(&json, output)?;
    Ok(())
}

/// One row per recorded time point, one column per (group, compartment).
fn compartment_csv(model: &CompartmentalModel, record: &SimRecord) -> String {
    let layout = model.layout();
    let mut csv = String::from("time_day");
    for g in 0..layout.num_groups() {
        for name in COMPARTMENT_NAMES {
            csv.push_str(&format!(",{}_{}", name, g));
        }
    }
    csv.push('\n');

    for (t, state) in record.t.iter().zip(&record.x) {
        csv.push_str(&format!("{}", t));
        for v in state.iter() {
            csv.push_str(&format!(",{}", v));
        }
        csv.push('\n');
    }
    csv
}

/// Percentile envelope of the total infected count over time.
fn infected_envelope_csv(model: &CompartmentalModel, results: &[SimRecord]) -> CliResult<String> {
    const PERCENTILES: [(f64, &str); 5] = [
        (0.05, "p05"),
        (0.25, "p25"),
        (0.50, "p50"),
        (0.75, "p75"),
        (0.95, "p95"),
    ];

    let layout = model.layout();
    let infected_total = |state: &nalgebra::DVector<f64>| -> f64 {
        (0..layout.num_groups())
            .map(|g| state[layout.index(g, scenario::INFECTED)])
            .sum()
    };

    let envelopes: Vec<SimRecord> = PERCENTILES
        .iter()
        .map(|(p, _)| ensemble_percentile(results, *p))
        .collect::<Result<_, _>>()?;

    let mut csv = String::from("time_day");
    for (_, label) in PERCENTILES {
        csv.push_str(&format!(",infected_{}", label));
    }
    csv.push('\n');

    for k in 0..envelopes[0].len() {
        csv.push_str(&format!("{}", envelopes[0].t[k]));
        for envelope in &envelopes {
            csv.push_str(&format!(",{}", infected_total(&envelope.x[k])));
        }
        csv.push('\n');
    }
    Ok(csv)
}

fn write_output(content: &str, output: Option<&Path>) -> CliResult<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        println!("✓ Wrote {}", path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}
