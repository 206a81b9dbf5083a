/// Retention horizon: events older than this many seconds are evicted.
pub const WINDOW_SECONDS: f64 = 60.0;

/// DBSCAN neighbourhood radius in degrees of (lat, lon).
pub const CLUSTER_EPS: f64 = 3.0;

/// Smallest accepted `cluster_eps`. Finer grids index nothing useful.
pub const CLUSTER_EPS_MIN: f64 = 1e-6;

/// DBSCAN minimum neighbourhood size (the point itself included).
pub const CLUSTER_MIN_SAMPLES: usize = 2;

/// Number of comets orbiting the globe.
pub const NUM_COMETS: usize = 10;

/// Comet longitude step per tick, degrees.
pub const COMET_SPEED_MIN: f64 = 0.5;
pub const COMET_SPEED_MAX: f64 = 2.0;

/// Decorative stars redrawn every tick.
pub const STAR_COUNT: usize = 500;

/// Tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 500;

/// Heartbeat: 1 + amplitude * sin(frequency * t)
pub const HEARTBEAT_AMPLITUDE: f64 = 0.3;
pub const HEARTBEAT_FREQUENCY: f64 = 3.0;

/// Globe spin in degrees per wall-clock second.
pub const ROTATION_DEG_PER_SEC: f64 = 5.0;

/// Heat points emitted per cluster member.
pub const HEAT_POINTS_PER_MEMBER: usize = 3;

/// Half-width of the uniform heat jitter, degrees.
pub const HEAT_JITTER: f64 = 0.5;

/// Heat weights never drop below this.
pub const HEAT_WEIGHT_FLOOR: f64 = 0.1;

/// Marker size terms: base + per-member + freshness bonus.
pub const SIZE_BASE: f64 = 20.0;
pub const SIZE_PER_MEMBER: f64 = 5.0;
pub const SIZE_FRESHNESS: f64 = 20.0;

/// Opacity = OPACITY_BASE + OPACITY_FRESHNESS * decay, clamped.
pub const OPACITY_BASE: f64 = 0.3;
pub const OPACITY_FRESHNESS: f64 = 0.7;
pub const OPACITY_MIN: f64 = 0.1;
pub const OPACITY_MAX: f64 = 1.0;

/// Classifier polarity cutoffs.
pub const POLARITY_HAPPY: f64 = 0.2;
pub const POLARITY_SAD: f64 = -0.2;
