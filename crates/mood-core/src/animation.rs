//! Event-independent motion: globe spin, comets and the starfield.
//!
//! Rotation is a pure function of wall-clock time. Comets carry state
//! across ticks: each keeps its latitude and speed for the engine lifetime
//! and steps east by `speed` degrees per tick, wrapping into [-180, 180).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comet {
    pub lat: f64,
    pub lon: f64,
    /// Degrees of longitude per tick.
    pub speed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarPoint {
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
}

/// Map any longitude into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 { -180.0 } else { wrapped }
}

/// Globe rotation in [0, 360) at wall-clock second `t`.
pub fn rotation_at(t: f64, deg_per_sec: f64) -> f64 {
    let r = (deg_per_sec * t).rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Uniformly scattered stars; redrawn every frame for the twinkle.
pub fn starfield(count: usize, rng: &mut impl Rng) -> Vec<StarPoint> {
    (0..count)
        .map(|_| StarPoint {
            lat: rng.random_range(-90.0..=90.0),
            lon: rng.random_range(-180.0..180.0),
            size: 1.0,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimationState {
    comets: Vec<Comet>,
    rotation: f64,
    ticks: u64,
    #[serde(skip)]
    deg_per_sec: f64,
    #[serde(skip)]
    speed_range: (f64, f64),
}

impl AnimationState {
    pub fn new(config: &EngineConfig, rng: &mut impl Rng) -> Self {
        let speed_range = (config.comet_speed_min, config.comet_speed_max);
        Self {
            comets: spawn_comets(config.num_comets, speed_range, rng),
            rotation: 0.0,
            ticks: 0,
            deg_per_sec: config.rotation_deg_per_sec,
            speed_range,
        }
    }

    /// Step one tick: rotation from the clock, comets by their speed.
    pub fn advance(&mut self, now: f64) {
        self.rotation = rotation_at(now, self.deg_per_sec);
        for comet in &mut self.comets {
            comet.lon = wrap_longitude(comet.lon + comet.speed);
        }
        self.ticks += 1;
    }

    /// Respawn comets and zero the tick counter.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.comets = spawn_comets(self.comets.len(), self.speed_range, rng);
        self.rotation = 0.0;
        self.ticks = 0;
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn spawn_comets(count: usize, (min, max): (f64, f64), rng: &mut impl Rng) -> Vec<Comet> {
    (0..count)
        .map(|_| Comet {
            lat: rng.random_range(-90.0..=90.0),
            lon: rng.random_range(-180.0..180.0),
            speed: rng.random_range(min..=max),
        })
        .collect()
}
