use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::constants::{HEAT_JITTER, HEAT_POINTS_PER_MEMBER, HEAT_WEIGHT_FLOOR};
use crate::visual::VisualAttributes;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatParams {
    pub points_per_member: usize,
    pub jitter: f64,
    pub weight_floor: f64,
}

impl Default for HeatParams {
    fn default() -> Self {
        Self {
            points_per_member: HEAT_POINTS_PER_MEMBER,
            jitter: HEAT_JITTER,
            weight_floor: HEAT_WEIGHT_FLOOR,
        }
    }
}

/// Scatter `points_per_member × member_count` jittered points around each
/// centroid, weighted by the cluster's opacity (floored). `attrs` is indexed
/// in step with `clusters`.
pub fn heat_field(
    clusters: &[Cluster],
    attrs: &[VisualAttributes],
    params: &HeatParams,
    rng: &mut impl Rng,
) -> Vec<HeatPoint> {
    let total: usize = clusters
        .iter()
        .map(|c| c.member_count * params.points_per_member)
        .sum();
    let mut points = Vec::with_capacity(total);

    for (cluster, attr) in clusters.iter().zip(attrs) {
        let weight = attr.opacity.max(params.weight_floor);
        for _ in 0..cluster.member_count * params.points_per_member {
            points.push(HeatPoint {
                lat: cluster.centroid.lat + jitter(params.jitter, rng),
                lon: cluster.centroid.lon + jitter(params.jitter, rng),
                weight,
            });
        }
    }

    points
}

fn jitter(half_width: f64, rng: &mut impl Rng) -> f64 {
    if half_width > 0.0 {
        rng.random_range(-half_width..half_width)
    } else {
        0.0
    }
}
