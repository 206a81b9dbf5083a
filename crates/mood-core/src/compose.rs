//! Frame composition: fold one tick's derived layers into a [`Scene`].
//!
//! Everything here is assembly. Clustering, mapping, jitter and comet
//! motion already happened upstream against the same retained snapshot;
//! this only zips clusters with their attributes and copies the layers.

use crate::animation::{AnimationState, StarPoint};
use crate::cluster::Cluster;
use crate::heat::HeatPoint;
use crate::retention::RetainedSet;
use crate::scene::{ClusterMarker, Scene};
use crate::time::unix_to_iso8601;
use crate::visual::VisualAttributes;

/// Per-frame values that are not layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMeta {
    pub tick: u64,
    pub heartbeat: f64,
}

/// Assemble an immutable [`Scene`]. `visual_attrs[i]` belongs to
/// `clusters[i]`; the frame timestamp is the retained set's prune instant.
pub fn compose(
    retained: &RetainedSet,
    clusters: &[Cluster],
    visual_attrs: &[VisualAttributes],
    heat_points: Vec<HeatPoint>,
    animation: &AnimationState,
    star_points: Vec<StarPoint>,
    meta: FrameMeta,
) -> Scene {
    debug_assert_eq!(clusters.len(), visual_attrs.len());

    let cluster_markers = clusters
        .iter()
        .zip(visual_attrs)
        .map(|(c, v)| ClusterMarker {
            id: c.id,
            lat: c.centroid.lat,
            lon: c.centroid.lon,
            member_count: c.member_count,
            sentiment: c.dominant_sentiment,
            mean_age: c.mean_age,
            size: v.size,
            color: v.color.clone(),
            opacity: v.opacity,
            label: v.label.clone(),
        })
        .collect();

    Scene {
        tick: meta.tick,
        timestamp: retained.now(),
        time: unix_to_iso8601(retained.now()),
        globe_rotation: animation.rotation(),
        heartbeat: meta.heartbeat,
        retained_count: retained.len(),
        sentiment_counts: retained.sentiment_counts(),
        cluster_markers,
        heat_points,
        star_points,
        comet_points: animation.comets().to_vec(),
    }
}
