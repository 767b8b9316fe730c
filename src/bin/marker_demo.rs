//! Offline driver for the marker publisher
//!
//! Runs the tick loop without ROS: a simulated controller feeds elapsed
//! seconds and moves the reference along the trajectory, and every scene is
//! reported through the log.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracking_markers::input::InputAdapter;
use tracking_markers::scene::{ElementId, MarkerShape, SceneSnapshot};
use tracking_markers::trajectory::TrajectoryCurve;
use tracking_markers::{MarkerConfig, MarkerError, MarkerPublisher, SceneSink, StartupParams};

/// Seconds the simulated controller records after smoothing
const RECORDING_TIME: i64 = 10;

#[derive(Parser, Debug)]
#[command(name = "marker_demo", about = "Drive the tracking markers with a simulated controller")]
struct Args {
    /// Sweep the trajectory in depth (non-zero enables)
    #[arg(long, default_value_t = 0)]
    use_depth: i64,

    /// Participant id, only displayed
    #[arg(long, default_value_t = 0)]
    part_id: i64,

    /// Alpha id, only displayed
    #[arg(long, default_value_t = 0)]
    alpha_id: i64,

    /// Trajectory preset (0-5)
    #[arg(long, default_value_t = 0)]
    traj_id: i64,

    /// Seconds to run
    #[arg(long, default_value_t = 16.0)]
    duration: f64,
}

/// Logs scenes, and the countdown text whenever it changes
#[derive(Default)]
struct LoggingSink {
    published: AtomicU64,
    last_text: Mutex<Option<String>>,
}

impl LoggingSink {
    fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl SceneSink for LoggingSink {
    fn publish(&self, scene: &SceneSnapshot) -> Result<(), MarkerError> {
        let count = self.published.fetch_add(1, Ordering::Relaxed) + 1;

        let text = scene
            .get(ElementId::CountdownText)
            .and_then(|element| match &element.shape {
                MarkerShape::Text(text) => Some(text.clone()),
                _ => None,
            });

        let mut last_text = self.last_text.lock().unwrap_or_else(PoisonError::into_inner);
        if *last_text != text {
            match &text {
                Some(text) => info!("Countdown: {}", text),
                None => info!("Countdown hidden"),
            }
            *last_text = text;
        }

        if let Some(reference) = scene.get(ElementId::ReferenceMarker) {
            debug!(
                "Scene {}: {} elements, reference at ({:.4}, {:.4}, {:.4}) size {:.4}",
                count,
                scene.len(),
                reference.position.x,
                reference.position.y,
                reference.position.z,
                reference.scale.x
            );
        }
        Ok(())
    }
}

/// Tick until `duration` has passed
async fn run_ticks(publisher: Arc<MarkerPublisher>, sink: Arc<LoggingSink>, duration: Duration) {
    let mut interval = time::interval(publisher.config().tick_period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = interval.tick() => {
                match publisher.publish_tick(sink.as_ref()) {
                    // already logged by the publisher
                    Ok(()) | Err(MarkerError::Publish(_)) => {}
                    Err(e) => warn!("Marker tick failed: {}", e),
                }
            }
        }
    }
}

/// Elapsed seconds as the controller reports them, once per second
async fn feed_elapsed(input: Arc<InputAdapter>, last_second: i64) {
    let mut interval = time::interval(Duration::from_secs(1));
    // the first tick fires immediately, the controller starts at zero
    for second in 0..=last_second {
        interval.tick().await;
        input.on_elapsed(second as f64);
    }
}

/// Walk the reference along the curve once smoothing is over
async fn feed_positions(
    input: Arc<InputAdapter>,
    curve: TrajectoryCurve,
    smoothing: Duration,
    recording: Duration,
) {
    time::sleep(smoothing).await;

    let steps = curve.len().max(1) as u32;
    let mut interval = time::interval((recording / steps).max(Duration::from_millis(1)));
    for point in curve.points() {
        interval.tick().await;
        input.on_position(*point);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if !args.duration.is_finite() || args.duration < 0.0 {
        return Err(anyhow!("duration must be a non-negative number of seconds"));
    }

    let params = StartupParams::from_raw(args.use_depth, args.part_id, args.alpha_id, args.traj_id);
    let config = MarkerConfig::default();
    let smoothing = config.max_smoothing_time;

    let publisher = Arc::new(MarkerPublisher::start(config, params)?);
    let curve = publisher
        .curve()
        .cloned()
        .ok_or_else(|| anyhow!("publisher has no trajectory"))?;
    let input = publisher.input();
    let sink = Arc::new(LoggingSink::default());

    let elapsed_feed = tokio::spawn(feed_elapsed(Arc::clone(&input), smoothing + RECORDING_TIME));
    let position_feed = tokio::spawn(feed_positions(
        Arc::clone(&input),
        curve,
        Duration::from_secs(smoothing.max(0) as u64),
        Duration::from_secs(RECORDING_TIME as u64),
    ));

    info!("Running marker demo for {:.1} s", args.duration);
    run_ticks(
        Arc::clone(&publisher),
        Arc::clone(&sink),
        Duration::from_secs_f64(args.duration),
    )
    .await;

    elapsed_feed.abort();
    position_feed.abort();

    info!("Published {} scenes", sink.published());
    Ok(())
}
