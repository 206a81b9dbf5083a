use rand::SeedableRng;
use rand::rngs::SmallRng;
use uuid::Uuid;

use crate::animation::{AnimationState, starfield};
use crate::buffer::EventBuffer;
use crate::cluster::{ClusterParams, cluster_events};
use crate::compose::{FrameMeta, compose};
use crate::config::EngineConfig;
use crate::error::{ConfigError, IngestError};
use crate::event::{Event, RawItem};
use crate::heat::{HeatParams, heat_field};
use crate::scene::Scene;
use crate::sentiment::Classifier;
use crate::visual::{Heartbeat, VisualAttributes, map_cluster};

/// Owns all process-wide state of the mood globe: the shared event buffer,
/// the animation state and the RNG behind jitter, stars and comets.
///
/// Ingestion talks to the buffer through [`MoodEngine::buffer`] handles; the
/// tick path calls [`MoodEngine::on_tick`], which prunes the buffer once and
/// derives every layer of the frame from that single retained snapshot.
pub struct MoodEngine {
    config: EngineConfig,
    buffer: EventBuffer,
    animation: AnimationState,
    rng: SmallRng,
}

impl MoodEngine {
    /// Engine with an OS-seeded RNG.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    /// Deterministic engine: same seed, events and clock ⇒ same scenes.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: EngineConfig, mut rng: SmallRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let animation = AnimationState::new(&config, &mut rng);
        Ok(Self {
            config,
            buffer: EventBuffer::new(),
            animation,
            rng,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared handle for producers. Clones see the same events.
    pub fn buffer(&self) -> EventBuffer {
        self.buffer.clone()
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Validate, classify and buffer one raw item.
    pub fn ingest(
        &self,
        item: &RawItem,
        classifier: &dyn Classifier,
        observed_at: f64,
    ) -> Result<Uuid, IngestError> {
        let event = Event::from_raw(item, classifier, observed_at)?;
        let id = event.id;
        self.buffer.append(event);
        Ok(id)
    }

    /// Advance one frame at wall-clock `now` (Unix seconds).
    pub fn on_tick(&mut self, now: f64) -> Scene {
        let window = self.config.window_seconds;
        let retained = self.buffer.prune(now, window);

        let clusters = cluster_events(
            &retained,
            &ClusterParams {
                eps: self.config.cluster_eps,
                min_samples: self.config.cluster_min_samples,
            },
        );

        let heartbeat = Heartbeat {
            amplitude: self.config.heartbeat_amplitude,
            frequency: self.config.heartbeat_frequency,
        }
        .factor(now);
        let attrs: Vec<VisualAttributes> = clusters
            .iter()
            .map(|c| map_cluster(c, window, heartbeat))
            .collect();

        let heat = heat_field(
            &clusters,
            &attrs,
            &HeatParams {
                points_per_member: self.config.heat_points_per_member,
                jitter: self.config.heat_jitter,
                weight_floor: self.config.heat_weight_floor,
            },
            &mut self.rng,
        );
        let stars = starfield(self.config.star_count, &mut self.rng);
        self.animation.advance(now);

        let scene = compose(
            &retained,
            &clusters,
            &attrs,
            heat,
            &self.animation,
            stars,
            FrameMeta {
                tick: self.animation.ticks(),
                heartbeat,
            },
        );

        tracing::debug!(
            tick = scene.tick,
            retained = scene.retained_count,
            clusters = scene.cluster_markers.len(),
            heat = scene.heat_points.len(),
            "composed frame"
        );
        scene
    }

    /// Drop all buffered events and respawn the animation.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.animation.reset(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{LexiconClassifier, Sentiment};

    fn engine() -> MoodEngine {
        MoodEngine::with_seed(EngineConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            window_seconds: -1.0,
            ..Default::default()
        };
        assert!(MoodEngine::with_seed(config, 1).is_err());
    }

    #[test]
    fn test_infinite_comet_speed_is_an_error_not_a_panic() {
        let config = EngineConfig {
            comet_speed_max: f64::INFINITY,
            ..Default::default()
        };
        assert!(MoodEngine::with_seed(config, 1).is_err());
    }

    #[test]
    fn test_marker_size_positive_at_heartbeat_trough() {
        let loud = EngineConfig {
            heartbeat_amplitude: 1.5,
            ..Default::default()
        };
        assert!(MoodEngine::with_seed(loud, 1).is_err());

        let config = EngineConfig {
            heartbeat_amplitude: 0.99,
            ..Default::default()
        };
        let mut engine = MoodEngine::with_seed(config, 1).unwrap();
        // sin(3t) = -1
        let now = std::f64::consts::FRAC_PI_2;
        engine
            .buffer()
            .append(Event::new(0.0, 0.0, Sentiment::Happy, "fresh", now).unwrap());
        let scene = engine.on_tick(now);
        assert!(scene.heartbeat > 0.0, "{}", scene.heartbeat);
        assert!(scene.cluster_markers[0].size > 0.0);
    }

    #[test]
    fn test_ingest_drops_malformed() {
        let engine = engine();
        let classifier = LexiconClassifier::new();
        let bad = RawItem {
            text: "lost".into(),
            geo: None,
            produced_at: None,
        };
        assert!(engine.ingest(&bad, &classifier, 0.0).is_err());
        assert!(engine.buffer().is_empty());

        let good = RawItem::at_point("great coffee", 10.0, 10.0);
        engine.ingest(&good, &classifier, 0.0).unwrap();
        assert_eq!(engine.buffer().len(), 1);
    }

    #[test]
    fn test_tick_counter_and_rotation() {
        let mut engine = engine();
        let first = engine.on_tick(10.0);
        let second = engine.on_tick(10.5);
        assert_eq!(first.tick, 1);
        assert_eq!(second.tick, 2);
        assert!((second.globe_rotation - 52.5).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let mut a = engine();
        let mut b = engine();
        for (lat, at) in [(1.0, 95.0), (2.0, 96.0), (60.0, 97.0)] {
            let e = Event::new(lat, 0.0, Sentiment::Happy, "x", at).unwrap();
            a.buffer().append(e.clone());
            b.buffer().append(e);
        }
        assert_eq!(a.on_tick(100.0), b.on_tick(100.0));
    }

    #[test]
    fn test_reset_clears_events() {
        let mut engine = engine();
        engine
            .ingest(
                &RawItem::at_point("happy", 0.0, 0.0),
                &LexiconClassifier::new(),
                1.0,
            )
            .unwrap();
        engine.on_tick(2.0);
        engine.reset();
        assert!(engine.buffer().is_empty());
        assert_eq!(engine.animation().ticks(), 0);
        assert!(engine.on_tick(3.0).is_empty());
    }
}
