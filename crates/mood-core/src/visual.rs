use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::constants::{
    HEARTBEAT_AMPLITUDE, HEARTBEAT_FREQUENCY, OPACITY_BASE, OPACITY_FRESHNESS, OPACITY_MAX,
    OPACITY_MIN, SIZE_BASE, SIZE_FRESHNESS, SIZE_PER_MEMBER,
};
use crate::sentiment::Sentiment;

/// Global sinusoidal pulse shared by every marker of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub amplitude: f64,
    pub frequency: f64,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            amplitude: HEARTBEAT_AMPLITUDE,
            frequency: HEARTBEAT_FREQUENCY,
        }
    }
}

impl Heartbeat {
    /// `1 + amplitude * sin(frequency * t)`, t in wall-clock seconds.
    pub fn factor(&self, t: f64) -> f64 {
        1.0 + self.amplitude * (self.frequency * t).sin()
    }
}

/// Display style for one mood.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoodStyle {
    pub color: &'static str,
    pub emoji: &'static str,
}

pub fn style_for(sentiment: Sentiment) -> MoodStyle {
    match sentiment {
        Sentiment::Happy => MoodStyle {
            color: "yellow",
            emoji: "\u{1F60A}",
        },
        Sentiment::Sad => MoodStyle {
            color: "blue",
            emoji: "\u{1F622}",
        },
        Sentiment::Neutral => MoodStyle {
            color: "red",
            emoji: "\u{1F610}",
        },
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualAttributes {
    pub size: f64,
    pub color: String,
    pub opacity: f64,
    pub label: String,
}

/// Freshness in [0, 1]: 1 for a brand-new cluster, 0 at or past the window.
pub fn decay(mean_age: f64, window: f64) -> f64 {
    (1.0 - mean_age / window).clamp(0.0, 1.0)
}

pub fn marker_size(member_count: usize, mean_age: f64, window: f64, heartbeat: f64) -> f64 {
    let base = SIZE_BASE
        + SIZE_PER_MEMBER * member_count as f64
        + SIZE_FRESHNESS * decay(mean_age, window);
    base * heartbeat
}

pub fn marker_opacity(mean_age: f64, window: f64) -> f64 {
    (OPACITY_BASE + OPACITY_FRESHNESS * decay(mean_age, window)).clamp(OPACITY_MIN, OPACITY_MAX)
}

/// Derive a cluster's marker attributes from its count, age and this
/// frame's heartbeat factor. Pure.
pub fn map_cluster(cluster: &Cluster, window: f64, heartbeat: f64) -> VisualAttributes {
    let style = style_for(cluster.dominant_sentiment);
    VisualAttributes {
        size: marker_size(cluster.member_count, cluster.mean_age, window, heartbeat),
        color: style.color.to_string(),
        opacity: marker_opacity(cluster.mean_age, window),
        label: format!("{} ({} events)", style.emoji, cluster.member_count),
    }
}
