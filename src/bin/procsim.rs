//! Command-line front end for the scheduling simulator.
//!
//! Collects a workload (explicit specs or a random one), drives the engine
//! through its public operation surface, and renders what the snapshots
//! contain: a per-tick dispatch log, an ASCII Gantt chart of the timeline,
//! and the final results table. Everything printed here comes out of
//! snapshots; engine internals are never touched.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use procsim::{
    validate_specs, Algorithm, Occupant, ProcessSpec, SimConfig, Simulator, Snapshot, Tick,
};

/// procsim: a discrete-tick CPU scheduling simulator.
///
/// Simulates FCFS, non-preemptive SJF, and Round Robin over single-burst
/// processes. By default each simulated tick is paced by a wall-clock
/// timer so the dispatch log unfolds in real time; --fast steps the
/// engine headlessly and prints the same output at once.
#[derive(Debug, Parser)]
#[clap(version)]
struct Opts {
    /// Process spec as NAME:ARRIVAL:BURST, e.g. -p editor:0:5. Repeatable.
    #[clap(short = 'p', long = "process", value_name = "SPEC")]
    processes: Vec<String>,

    /// Generate N random processes instead of (or in addition to) -p.
    #[clap(short = 'r', long, value_name = "N")]
    random: Option<usize>,

    /// Seed for the random workload generator.
    #[clap(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Scheduling algorithm: fcfs, sjf, or rr. Unknown values are ignored
    /// and the default (fcfs) is kept.
    #[clap(short = 'a', long, default_value = "fcfs")]
    algorithm: String,

    /// Round Robin quantum in ticks (clamped to >= 1).
    #[clap(short = 'q', long, default_value = "2")]
    quantum: u64,

    /// Wall-clock milliseconds per tick (clamped to >= 250).
    #[clap(short = 't', long = "tick-ms", default_value = "1000")]
    tick_ms: u64,

    /// Step as fast as possible instead of pacing with the timer.
    #[clap(short = 'f', long)]
    fast: bool,

    /// Abort if the simulation has not finished after this many ticks.
    #[clap(long, default_value = "10000")]
    max_ticks: u64,

    /// Increase verbosity. Specify multiple times for more detail.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parses a NAME:ARRIVAL:BURST argument. Burst is clamped to >= 1 at this
/// boundary; the engine itself stays permissive.
fn parse_process_arg(arg: &str) -> Result<ProcessSpec> {
    let parts: Vec<&str> = arg.split(':').collect();
    let [name, arrival, burst] = parts.as_slice() else {
        bail!("expected NAME:ARRIVAL:BURST, got '{arg}'");
    };
    let arrival: Tick = arrival
        .parse()
        .with_context(|| format!("invalid arrival '{arrival}' in '{arg}'"))?;
    let burst: Tick = burst
        .parse()
        .with_context(|| format!("invalid burst '{burst}' in '{arg}'"))?;
    Ok(ProcessSpec::new(*name, arrival, burst.max(1)))
}

/// Generates `n` random process specs named P1..Pn.
fn random_specs(n: usize, rng: &mut SmallRng) -> Vec<ProcessSpec> {
    (0..n)
        .map(|i| {
            let arrival = rng.random_range(0..=(2 * n as Tick));
            let burst = rng.random_range(1..=8);
            ProcessSpec::new(format!("P{}", i + 1), arrival, burst)
        })
        .collect()
}

/// Display name for the occupant of tick `t`, or None past the timeline.
fn occupant_at(snapshot: &Snapshot, t: Tick) -> Option<String> {
    let slice = snapshot
        .timeline
        .slices()
        .iter()
        .find(|s| s.start <= t && t < s.end)?;
    Some(display_name(snapshot, &slice.occupant))
}

fn display_name(snapshot: &Snapshot, occupant: &Occupant) -> String {
    match occupant {
        Occupant::Idle => "IDLE".to_string(),
        Occupant::Process(id) => snapshot
            .processes
            .iter()
            .find(|p| &p.id == id)
            .map_or_else(|| id.clone(), |p| p.name.clone()),
    }
}

/// Prints one dispatch-log line per tick the snapshot newly covers.
fn print_new_ticks(snapshot: &Snapshot, printed_up_to: &mut Tick) {
    while *printed_up_to < snapshot.time {
        let t = *printed_up_to;
        if let Some(name) = occupant_at(snapshot, t) {
            println!("t={t:>4}  {name}");
        }
        *printed_up_to += 1;
    }
}

fn render_gantt(snapshot: &Snapshot) {
    println!();
    println!("Gantt chart (1 column = 1 tick):");
    for slice in snapshot.timeline.slices() {
        let name = display_name(snapshot, &slice.occupant);
        let pad = " ".repeat(slice.start as usize);
        let bar = "#".repeat(slice.len() as usize);
        println!("{name:>12} {pad}{bar}  [{}..{})", slice.start, slice.end);
    }
}

fn fmt_opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |x| x.to_string())
}

fn render_results(snapshot: &Snapshot) {
    println!();
    println!(
        "{:>12} {:>7} {:>5} {:>6} {:>5} {:>11} {:>8} {:>9} {:>11}",
        "process", "arrival", "burst", "start", "done", "turnaround", "waiting", "response", "efficiency"
    );
    for row in &snapshot.results.rows {
        let marker = if snapshot.results.best.as_ref() == Some(&row.id) {
            " *"
        } else {
            ""
        };
        println!(
            "{:>12} {:>7} {:>5} {:>6} {:>5} {:>11} {:>8} {:>9} {:>11}{marker}",
            row.name,
            row.arrival,
            row.burst,
            fmt_opt(row.first_start),
            fmt_opt(row.completion),
            fmt_opt(row.turnaround),
            fmt_opt(row.waiting),
            fmt_opt(row.response),
            fmt_opt(row.efficiency.map(|e| format!("{e:.3}"))),
        );
    }
    let avg = &snapshot.results.averages;
    println!(
        "{:>12} {:>7} {:>5} {:>6} {:>5} {:>11.3} {:>8.3} {:>9.3} {:>11.3}",
        "average", "", "", "", "", avg.turnaround, avg.waiting, avg.response, avg.efficiency
    );
    if snapshot.results.best.is_some() {
        println!("{:>12} * best efficiency", "");
    }
}

fn init_logging(opts: &Opts) -> Result<()> {
    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Warn,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn collect_specs(opts: &Opts) -> Result<Vec<ProcessSpec>> {
    let mut specs = Vec::new();
    for arg in &opts.processes {
        specs.push(parse_process_arg(arg)?);
    }
    if let Some(n) = opts.random {
        let seed = opts.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = SmallRng::seed_from_u64(seed);
        specs.extend(random_specs(n, &mut rng));
    }
    if specs.is_empty() {
        bail!("no processes given; use --process or --random (see --help)");
    }
    if let Err(errors) = validate_specs(&specs) {
        for e in &errors {
            warn!("{}", e.message);
        }
        bail!("invalid workload ({} error(s))", errors.len());
    }
    Ok(specs)
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(&opts)?;

    let algorithm = match Algorithm::from_str(&opts.algorithm) {
        Ok(a) => a,
        Err(e) => {
            // Same contract as the engine: unknown identifiers change nothing.
            warn!("{e}; keeping {}", Algorithm::default());
            Algorithm::default()
        }
    };
    let config = SimConfig::new()
        .with_algorithm(algorithm)
        .with_quantum(opts.quantum)
        .with_tick_interval_ms(opts.tick_ms);

    let specs = collect_specs(&opts)?;
    println!(
        "{} | quantum {} | {} processes",
        config.algorithm,
        config.quantum,
        specs.len()
    );

    let sim = Simulator::new(&specs, config);
    let sub = sim.subscribe();
    // Drop the initial snapshot so every received one maps to one step.
    let _ = sub.try_recv();
    let mut printed_up_to: Tick = 0;

    let final_snapshot = if opts.fast {
        loop {
            sim.step();
            let snapshot = sub.try_recv().context("snapshot stream ended")?;
            print_new_ticks(&snapshot, &mut printed_up_to);
            if snapshot.finished {
                break snapshot;
            }
            if snapshot.time >= opts.max_ticks {
                bail!("not finished after {} ticks", opts.max_ticks);
            }
        }
    } else {
        sim.start();
        let timeout = Duration::from_millis(config.tick_interval_ms * 4);
        loop {
            let snapshot = sub.recv_timeout(timeout).context("timer stalled")?;
            print_new_ticks(&snapshot, &mut printed_up_to);
            if snapshot.finished {
                break snapshot;
            }
            if snapshot.time >= opts.max_ticks {
                sim.pause();
                bail!("not finished after {} ticks", opts.max_ticks);
            }
        }
    };

    render_gantt(&final_snapshot);
    render_results(&final_snapshot);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_arg() {
        let spec = parse_process_arg("editor:2:5").unwrap();
        assert_eq!(spec.name, "editor");
        assert_eq!(spec.arrival, 2);
        assert_eq!(spec.burst, 5);
    }

    #[test]
    fn test_parse_clamps_zero_burst() {
        let spec = parse_process_arg("z:0:0").unwrap();
        assert_eq!(spec.burst, 1);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_process_arg("no-colons").is_err());
        assert!(parse_process_arg("a:b:c").is_err());
        assert!(parse_process_arg("a:1").is_err());
        assert!(parse_process_arg("a:1:2:3").is_err());
    }

    #[test]
    fn test_random_specs_shape() {
        let mut rng = SmallRng::seed_from_u64(1);
        let specs = random_specs(5, &mut rng);
        assert_eq!(specs.len(), 5);
        for (i, s) in specs.iter().enumerate() {
            assert_eq!(s.name, format!("P{}", i + 1));
            assert!(s.burst >= 1 && s.burst <= 8);
            assert!(s.arrival <= 10);
        }
    }
}
