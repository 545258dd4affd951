use anyhow::Result;
use clap::Parser;
use gravity_common::{InjectionConfig, SimulationConfig, Snapshot};
use gravity_engine::output::{save_final_positions, save_snapshots, OutputFormat};
use gravity_engine::Environment;
use log::{info, warn, error, debug, trace};
use std::path::PathBuf;
use std::time::Instant;

/// Headless driver for the gravity simulation.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override timing.total_ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Override initial_conditions.initial_placement_seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Gravity Simulation Engine...");

    // --- Load Configuration ---
    let mut config = SimulationConfig::load(&args.config)?;
    if let Some(ticks) = args.ticks {
        config.timing.total_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.initial_conditions.initial_placement_seed = seed;
    }

    // --- Initialize Environment ---
    let mut env = Environment::from_config(&config)?;
    debug!("Simulation Parameters: {:#?}", env.params());

    let total_ticks = config.timing.total_ticks;
    let mut record_interval = config.timing.record_interval_ticks;
    if record_interval == 0 {
        warn!("record_interval_ticks is 0. Recording every tick.");
        record_interval = 1;
    }
    info!("Recording snapshot every {} ticks.", record_interval);

    let mut injections = config.initial_conditions.injections.clone();
    injections.sort_by_key(|injection| injection.at_tick);
    for injection in injections.iter().filter(|injection| injection.at_tick >= total_ticks) {
        warn!(
            "Injection at ({}, {}) is scheduled for tick {} but the run ends after {} ticks; it will be skipped.",
            injection.x, injection.y, injection.at_tick, total_ticks
        );
    }
    let mut next_injection = 0;

    let save_particles = config.output.save_particles_in_snapshot;
    let mut snapshots: Vec<Snapshot> = Vec::new();

    // --- Initial Snapshot (tick = 0) ---
    apply_due_injections(&mut env, &injections, &mut next_injection);
    snapshots.push(env.snapshot(save_particles));

    info!("Starting simulation loop for {} ticks...", total_ticks);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    for step in 0..total_ticks {
        apply_due_injections(&mut env, &injections, &mut next_injection);

        let step_start_time = Instant::now();
        let report = env.update();
        let step_duration = step_start_time.elapsed();

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_step = report.tick % record_interval == 0;
        let is_last_step = step == total_ticks - 1;

        if should_print_status || is_record_step || is_last_step {
            info!(
                "Tick [{}/{}] | Particles: {} | Merges: {} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                report.tick,
                total_ticks,
                env.particle_count(),
                env.total_merges(),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;

            if is_record_step || is_last_step {
                snapshots.push(env.snapshot(save_particles));
            }
        } else {
            trace!(
                "Tick [{}/{}] completed in {:.2} ms ({} merges, {} swept)",
                report.tick,
                total_ticks,
                step_duration.as_secs_f64() * 1000.0,
                report.merges,
                report.swept
            );
        }
    }

    info!(
        "Simulation finished in {:.3} seconds with {} particles left.",
        start_time.elapsed().as_secs_f64(),
        env.particle_count()
    );

    // --- Save Recorded Data ---
    let base_filename = &config.output.base_filename;
    if config.output.save_stats {
        let format = OutputFormat::from_setting(config.output.format.as_deref());
        if let Err(e) = save_snapshots(&snapshots, base_filename, format) {
            error!("{:#}", e);
            anyhow::bail!("Failed to save snapshots.");
        }
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if config.output.save_positions {
        if let Err(e) = save_final_positions(&env.particle_states(), base_filename) {
            error!("{:#}", e);
            anyhow::bail!("Failed to save final positions.");
        }
    } else {
        info!("Skipping saving final positions as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Adds every injection scheduled at or before the environment's current tick.
fn apply_due_injections(env: &mut Environment, injections: &[InjectionConfig], next: &mut usize) {
    while let Some(injection) = injections.get(*next) {
        if injection.at_tick > env.tick() {
            break;
        }
        let (radius, mass) = injection.radius_and_mass();
        env.add_particle((injection.x, injection.y), radius, mass);
        *next += 1;
    }
}
