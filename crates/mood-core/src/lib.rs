//! Mood globe engine.
//!
//! Turns an unbounded stream of geotagged, sentiment-classified text events
//! into one renderer-agnostic [`Scene`] per animation tick: a 60-second
//! retention window, DBSCAN clustering in lat/lon space, age-decayed marker
//! styling with a global heartbeat pulse, a jittered heat field, and
//! event-independent globe rotation, comets and stars.
//!
//! No network I/O: sources, timers and renderers live in the caller.

pub mod animation;
pub mod buffer;
pub mod cluster;
pub mod compose;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod event;
pub mod heat;
pub mod retention;
pub mod scene;
pub mod sentiment;
pub mod time;
pub mod tokenizer;
pub mod visual;

pub use animation::{AnimationState, Comet, StarPoint, rotation_at, starfield, wrap_longitude};
pub use buffer::EventBuffer;
pub use cluster::{Cluster, ClusterParams, cluster_events, dbscan, group_points};
pub use compose::{FrameMeta, compose};
pub use config::EngineConfig;
pub use engine::MoodEngine;
pub use error::{ConfigError, IngestError};
pub use event::{Event, GeoPoint, GeoRef, RawItem};
pub use heat::{HeatParams, HeatPoint, heat_field};
pub use retention::{RetainedSet, prune};
pub use scene::{ClusterMarker, Scene};
pub use sentiment::{Classifier, LexiconClassifier, Sentiment, SentimentCounts};
pub use time::{now_unix_secs, unix_to_iso8601};
pub use tokenizer::tokenize;
pub use visual::{Heartbeat, MoodStyle, VisualAttributes, map_cluster, style_for};
