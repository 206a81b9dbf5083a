use std::sync::Arc;

use mood_core::{MoodEngine, Scene, now_unix_secs};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Compose one frame per tick interval and publish it. Late ticks are
/// skipped, not bunched. Dropping the sender on exit ends every subscriber.
pub async fn run_ticker(
    mut engine: MoodEngine,
    scenes: watch::Sender<Arc<Scene>>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(engine.config().tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let scene = engine.on_tick(now_unix_secs());
                scenes.send_replace(Arc::new(scene));
            }
        }
    }
    tracing::info!(ticks = engine.animation().ticks(), "ticker stopped");
}
