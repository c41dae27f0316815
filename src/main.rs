//! Polybounce headless driver
//!
//! Steps the simulation with a fixed-timestep accumulator, logs progress once
//! per simulated second and prints the final snapshot as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use polybounce::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use polybounce::{AveragedResolver, CollisionBackend, SequentialResolver, SimConfig, Simulation};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Sequential,
    Averaged,
}

#[derive(Parser, Debug)]
#[command(
    name = "polybounce",
    version,
    about = "Run the spinning-polygon ball simulation headless"
)]
struct Opts {
    /// JSON config file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Physics rate in ticks per second
    #[arg(long, default_value_t = (1.0 / SIM_DT).round() as u32)]
    hz: u32,

    /// Frame rate of the simulated driver loop
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Override the number of polygon sides
    #[arg(long)]
    sides: Option<u32>,

    /// Override the spin rate (rad/s)
    #[arg(long)]
    omega: Option<f32>,

    #[arg(long, value_enum, default_value_t = Backend::Sequential)]
    backend: Backend,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

/// Fixed-step accumulator as a real frame loop would drive it
///
/// Runs exactly `round(seconds * hz)` ticks. A synthetic frame never lags, so
/// the per-frame substep cap is raised to cover a whole frame of ticks.
fn drive<B: CollisionBackend>(
    sim: &mut Simulation<B>,
    seconds: f32,
    hz: u32,
    fps: f32,
) -> Result<()> {
    anyhow::ensure!(hz > 0, "--hz must be positive");
    anyhow::ensure!(fps.is_finite() && fps > 0.0, "--fps must be positive");
    anyhow::ensure!(seconds.is_finite(), "--seconds must be finite");

    let sim_dt = 1.0 / hz as f32;
    let frame_dt = (1.0 / fps).min(MAX_FRAME_DT);
    let target_ticks = (seconds.max(0.0) * hz as f32).round() as u64;
    let max_substeps = MAX_SUBSTEPS.max((hz as f32 * frame_dt).ceil() as u32);
    if max_substeps > MAX_SUBSTEPS {
        log::debug!("Raising substep cap to {max_substeps} for {hz} Hz at {fps} fps");
    }

    let mut accumulator = 0.0_f32;
    let mut next_report = hz as u64;

    while sim.time_ticks() < target_ticks {
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= sim_dt && substeps < max_substeps && sim.time_ticks() < target_ticks {
            let report = sim.advance_tick(sim_dt);
            accumulator -= sim_dt;
            substeps += 1;

            if sim.time_ticks() >= next_report {
                next_report += hz as u64;
                let ball = sim.ball();
                log::info!(
                    "t={:.2}s pos=({:.1}, {:.1}) speed={:.1} sweeps={} residual={:.4}",
                    sim.time_ticks() as f32 * sim_dt,
                    ball.pos.x,
                    ball.pos.y,
                    ball.vel.length(),
                    report.sweeps,
                    report.residual_penetration
                );
            }
        }
    }
    Ok(())
}

fn run<B: CollisionBackend>(mut sim: Simulation<B>, opts: &Opts) -> Result<String> {
    drive(&mut sim, opts.seconds, opts.hz, opts.fps)?;

    let snapshot = sim.snapshot();
    let json = if opts.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();

    let mut config = match &opts.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(sides) = opts.sides {
        config.num_sides = sides;
    }
    if let Some(omega) = opts.omega {
        config.angular_velocity = omega;
    }

    let json = match opts.backend {
        Backend::Sequential => {
            let sim =
                Simulation::with_backend(&config, SequentialResolver).context("invalid config")?;
            run(sim, &opts)?
        }
        Backend::Averaged => {
            let sim =
                Simulation::with_backend(&config, AveragedResolver).context("invalid config")?;
            run(sim, &opts)?
        }
    };
    println!("{json}");
    Ok(())
}
