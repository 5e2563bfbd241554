use anyhow::{bail, Context};
use clap::Parser;
use keepsake::clock::{Clock, FixedStepClock, WallClock};
use keepsake::render::FrameStats;
use keepsake::tour::{default_tour, Tour};
use keepsake::{Scene, SceneConfig};
use std::path::PathBuf;
use std::time::Duration;
use web_time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (RON). Defaults to ./keepsake.ron if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value = "900")]
    frames: u64,

    /// Simulated frames per second
    #[arg(long, default_value = "60")]
    fps: f32,

    /// Pace frames with the wall clock instead of a fixed step
    #[arg(long)]
    realtime: bool,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    dump_config: bool,

    /// Log camera and render stats every N frames (0 disables)
    #[arg(long, default_value = "60")]
    log_every: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be positive, got {}", args.fps);
    }

    let config = SceneConfig::load(args.config.as_deref())?;

    if args.dump_config {
        let pretty = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default())
            .context("Failed to serialize configuration")?;
        println!("{}", pretty);
        return Ok(());
    }

    let mut scene = Scene::new(&config).context("Failed to build scene")?;
    let mut clock: Box<dyn Clock> = if args.realtime {
        Box::new(WallClock::new())
    } else {
        Box::new(FixedStepClock::from_fps(args.fps))
    };
    let mut tour = Tour::new(default_tour());
    let mut stats = FrameStats::new();
    let frame_budget = Duration::from_secs_f32(1.0 / args.fps);

    log::info!(
        "running {} frames at {} fps ({})",
        args.frames,
        args.fps,
        if args.realtime { "realtime" } else { "fixed step" }
    );

    for index in 0..args.frames {
        let frame_start = Instant::now();
        let frame = clock.tick().context("Clock produced an invalid frame")?;

        for step in tour.due(frame.elapsed()) {
            match scene.handle(step.input)? {
                Some(event) => log::info!("t={:.2}s {:?} -> focus #{} {:?}", step.at, step.input, event.sequence, event.change),
                None => log::info!("t={:.2}s {:?}", step.at, step.input),
            }
        }

        let report = scene.tick(frame);
        scene.apply(&mut stats);

        if args.log_every > 0 && index % args.log_every == 0 {
            let position = report.camera.position;
            log::info!(
                "frame {:>5} t={:>6.2}s {:?} camera ({:.2}, {:.2}, {:.2}) particles {} ({} bytes) cards {} lines {}",
                index,
                frame.elapsed(),
                report.mode,
                position.x,
                position.y,
                position.z,
                stats.total_particles(),
                stats.particle_bytes,
                stats.memory_cards.len(),
                stats.constellation_segments
            );
        }

        if args.realtime {
            if let Some(remaining) = frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    if !tour.is_finished() {
        log::warn!("run ended before the tour finished ({:.1}s scripted)", tour.duration());
    }
    log::info!(
        "done: {} frames, final mode {:?}, gift box {:?}, focused card {:?}",
        stats.frames,
        scene.camera().mode(),
        scene.gift_box().state(),
        scene.memories().selected()
    );
    Ok(())
}
