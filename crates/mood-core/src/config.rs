use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Every tunable of the engine. Missing fields fall back to the defaults in
/// [`crate::constants`], so a partial TOML table is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_seconds: f64,
    pub cluster_eps: f64,
    pub cluster_min_samples: usize,
    pub num_comets: usize,
    pub comet_speed_min: f64,
    pub comet_speed_max: f64,
    pub star_count: usize,
    pub tick_interval_ms: u64,
    pub heartbeat_amplitude: f64,
    pub heartbeat_frequency: f64,
    pub rotation_deg_per_sec: f64,
    pub heat_points_per_member: usize,
    pub heat_jitter: f64,
    pub heat_weight_floor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_seconds: WINDOW_SECONDS,
            cluster_eps: CLUSTER_EPS,
            cluster_min_samples: CLUSTER_MIN_SAMPLES,
            num_comets: NUM_COMETS,
            comet_speed_min: COMET_SPEED_MIN,
            comet_speed_max: COMET_SPEED_MAX,
            star_count: STAR_COUNT,
            tick_interval_ms: TICK_INTERVAL_MS,
            heartbeat_amplitude: HEARTBEAT_AMPLITUDE,
            heartbeat_frequency: HEARTBEAT_FREQUENCY,
            rotation_deg_per_sec: ROTATION_DEG_PER_SEC,
            heat_points_per_member: HEAT_POINTS_PER_MEMBER,
            heat_jitter: HEAT_JITTER,
            heat_weight_floor: HEAT_WEIGHT_FLOOR,
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject values that would make a tick ill-defined or a frame
    /// unrenderable (negative sizes, NaN angles).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("window_seconds", self.window_seconds),
            ("cluster_eps", self.cluster_eps),
            ("comet_speed_min", self.comet_speed_min),
            ("comet_speed_max", self.comet_speed_max),
            ("heartbeat_amplitude", self.heartbeat_amplitude),
            ("heartbeat_frequency", self.heartbeat_frequency),
            ("rotation_deg_per_sec", self.rotation_deg_per_sec),
            ("heat_jitter", self.heat_jitter),
            ("heat_weight_floor", self.heat_weight_floor),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        positive("window_seconds", self.window_seconds)?;
        positive("cluster_eps", self.cluster_eps)?;
        positive("heat_weight_floor", self.heat_weight_floor)?;
        if self.cluster_eps < CLUSTER_EPS_MIN {
            return Err(ConfigError::OutOfRange {
                field: "cluster_eps",
                value: self.cluster_eps,
                min: CLUSTER_EPS_MIN,
                max: f64::INFINITY,
            });
        }
        if self.cluster_min_samples == 0 {
            return Err(ConfigError::Zero {
                field: "cluster_min_samples",
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Zero {
                field: "tick_interval_ms",
            });
        }
        if self.comet_speed_min > self.comet_speed_max {
            return Err(ConfigError::InvertedRange {
                field: "comet_speed",
                min: self.comet_speed_min,
                max: self.comet_speed_max,
            });
        }
        // Below 1 the heartbeat factor stays positive, and so do marker sizes
        if !(0.0..1.0).contains(&self.heartbeat_amplitude) {
            return Err(ConfigError::OutOfRange {
                field: "heartbeat_amplitude",
                value: self.heartbeat_amplitude,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.heat_jitter < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "heat_jitter",
                value: self.heat_jitter,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
