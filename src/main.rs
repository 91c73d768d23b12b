//! GlowSync - Simulated Wearable and Ambient Tile Workout Tracker
//!
//! Headless demo: runs one scripted session and prints the watch and tile
//! views after every state change.

use anyhow::Context;
use glowsync::display::{Control, TileView, WatchPanel, WatchView};
use glowsync::storage::config::{load_config, load_config_from, AppConfig};
use glowsync::workouts::{RandomJitter, SessionController};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Accelerometer noise sampling period.
const NOISE_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GlowSync v{}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => load_config_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => load_config().context("loading config")?,
    };

    run_demo(config).await
}

async fn run_demo(config: AppConfig) -> anyhow::Result<()> {
    let jitter = match config.demo.seed {
        Some(seed) => RandomJitter::seeded(seed),
        None => RandomJitter::new(),
    };
    let mut rng = match config.demo.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    let controller = SessionController::with_jitter(config.session.clone(), Box::new(jitter))
        .context("creating session")?;

    let mut updates = controller.subscribe();
    let renderer = tokio::spawn(async move {
        while let Some(state) = updates.recv().await {
            tracing::debug!(
                snapshot = %serde_json::to_string(&state).unwrap_or_default(),
                "State update"
            );
            println!("{}", WatchView::from_state(&state));
            println!("{}", TileView::from_state(&state));
        }
    });

    let mut panel = WatchPanel::new(&controller);
    panel.press(Control::Start);

    let mut noise = tokio::time::interval(NOISE_INTERVAL);
    let mut reps = tokio::time::interval_at(
        tokio::time::Instant::now() + Duration::from_millis(config.demo.rep_interval_ms),
        Duration::from_millis(config.demo.rep_interval_ms.max(1)),
    );

    while !controller.snapshot().is_goal_reached() {
        tokio::select! {
            _ = noise.tick() => panel.sample_noise(&mut rng),
            _ = reps.tick() => {
                panel.simulate_motion();
            }
        }
    }

    tracing::info!(
        peak = panel.trace().peak(),
        "Goal reached, accelerometer trace settled"
    );

    if config.demo.pause_after_goal {
        panel.press(Control::Pause);
        tokio::time::sleep(config.session.tick_interval()).await;
    }

    let summary = controller.snapshot();
    println!(
        "Session summary: {} reps, {:.1} kcal, {}s, {:.0} bpm",
        summary.count, summary.calories, summary.duration, summary.heart_rate
    );

    controller.reset();
    drop(panel);
    drop(controller);

    renderer.await.context("renderer task failed")?;
    Ok(())
}
