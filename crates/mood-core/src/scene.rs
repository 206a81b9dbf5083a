use serde::{Deserialize, Serialize};

use crate::animation::{Comet, StarPoint};
use crate::event::GeoPoint;
use crate::heat::HeatPoint;
use crate::sentiment::{Sentiment, SentimentCounts};

/// One cluster as the renderer sees it: where, what mood, and how to draw it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterMarker {
    pub id: usize,
    pub lat: f64,
    pub lon: f64,
    pub member_count: usize,
    pub sentiment: Sentiment,
    pub mean_age: f64,
    pub size: f64,
    pub color: String,
    pub opacity: f64,
    pub label: String,
}

impl ClusterMarker {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Complete renderer-agnostic description of one animation frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub tick: u64,
    /// Wall-clock instant the frame was composed for, Unix seconds.
    pub timestamp: f64,
    /// `timestamp` as ISO-8601 UTC.
    pub time: String,
    pub globe_rotation: f64,
    pub heartbeat: f64,
    pub retained_count: usize,
    pub sentiment_counts: SentimentCounts,
    pub cluster_markers: Vec<ClusterMarker>,
    pub heat_points: Vec<HeatPoint>,
    pub star_points: Vec<StarPoint>,
    pub comet_points: Vec<Comet>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.cluster_markers.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
