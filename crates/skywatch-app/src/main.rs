use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use skywatch_app::app::{HostConfig, SimApp, Sinks};
use skywatch_app::mission::MissionSource;
use skywatch_core::constants::DT;
use skywatch_render::{Canvas2d, Renderer};
use skywatch_sim::{PursuitEngine, SimConfig};

/// Interactive drone-intercept simulation.
#[derive(Parser)]
#[command(name = "skywatch", version)]
struct Args {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// RNG seed for missions and particle effects.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Run without a window on the 2D canvas path.
    #[arg(long)]
    headless: bool,

    /// Frame budget for a headless run.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Directory to write PNG frames into (headless only).
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.headless {
        run_headless(args)
    } else {
        run_windowed(args)
    }
}

fn run_windowed(args: Args) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SimApp::new(HostConfig {
        width: args.width,
        height: args.height,
        seed: args.seed,
    });
    event_loop.run_app(&mut app).context("event loop error")?;
    Ok(())
}

/// Headless run on the 2D canvas: one mission at a fixed frame cadence,
/// optionally recording frames to disk.
fn run_headless(args: Args) -> anyhow::Result<()> {
    let mut engine = PursuitEngine::new(SimConfig { seed: args.seed });
    let mut missions = MissionSource::new(args.seed);
    let mut renderer = Renderer::TwoD(Canvas2d::new(args.width, args.height));
    let mut sinks = Sinks::logging();

    let params = missions.next_mission();
    info!(
        mission = %params.mission_name,
        briefing = %params.briefing,
        "mission briefing"
    );
    engine.start_mission(&params);

    if let Some(dir) = &args.record {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    for frame_idx in 0..args.frames {
        let snapshot = engine.frame(DT);
        sinks.dispatch(&snapshot.events);
        renderer.sync(&snapshot);

        if let Some(dir) = &args.record {
            let (frame, width, height) = renderer
                .frame_rgba()
                .expect("headless run always has the 2D frame");
            let img = image::RgbaImage::from_raw(width, height, frame.to_vec())
                .context("frame buffer size mismatch")?;
            img.save(dir.join(format!("frame_{frame_idx:05}.png")))?;
        }

        // Let the terminal burst finish playing before stopping.
        if snapshot.status.is_terminal() && snapshot.particles.is_empty() {
            break;
        }
    }

    info!(
        status = %engine.status(),
        closest_approach = engine.closest_approach(),
        elapsed_secs = engine.time().elapsed_secs,
        "run complete"
    );
    Ok(())
}
