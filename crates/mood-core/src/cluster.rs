//! Density-based clustering of retained events (DBSCAN).
//!
//! Points live in plain (lat, lon) degree space with Euclidean distance.
//! A point is *core* when at least `min_samples` points (itself included)
//! lie within `eps`. Core points chain into clusters; non-core points within
//! reach of a core point join the first cluster that reaches them. Points
//! that no cluster reaches are not dropped: each becomes its own
//! one-member cluster, so every retained event lands in exactly one cluster.
//!
//! Neighbour lookup goes through a uniform grid with `eps`-sized cells, so a
//! region query only inspects the 3×3 block around the point.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CLUSTER_EPS, CLUSTER_MIN_SAMPLES};
use crate::event::GeoPoint;
use crate::retention::RetainedSet;
use crate::sentiment::{Sentiment, SentimentCounts};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterParams {
    pub eps: f64,
    pub min_samples: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: CLUSTER_EPS,
            min_samples: CLUSTER_MIN_SAMPLES,
        }
    }
}

/// A spatially coherent group of retained events. Rebuilt every tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    pub centroid: GeoPoint,
    pub member_count: usize,
    pub dominant_sentiment: Sentiment,
    pub sentiment_counts: SentimentCounts,
    /// Mean of `now - observed_at` over members, seconds.
    pub mean_age: f64,
    /// Indices into the retained set this cluster was built from.
    pub members: Vec<usize>,
}

struct Grid {
    cell: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl Grid {
    fn new(points: &[GeoPoint], cell: f64) -> Self {
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            cells.entry(Self::key(*p, cell)).or_default().push(i);
        }
        Self { cell, cells }
    }

    fn key(p: GeoPoint, cell: f64) -> (i64, i64) {
        ((p.lat / cell).floor() as i64, (p.lon / cell).floor() as i64)
    }

    /// All indices within `eps` of `points[i]`, including `i`.
    fn region(&self, points: &[GeoPoint], i: usize, eps: f64) -> Vec<usize> {
        let (cy, cx) = Self::key(points[i], self.cell);
        let mut out = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                // Saturated keys have no neighbour cell past the edge
                let (Some(y), Some(x)) = (cy.checked_add(dy), cx.checked_add(dx)) else {
                    continue;
                };
                if let Some(bucket) = self.cells.get(&(y, x)) {
                    out.extend(
                        bucket
                            .iter()
                            .copied()
                            .filter(|&j| points[i].distance(points[j]) <= eps),
                    );
                }
            }
        }
        out
    }
}

/// DBSCAN labels: `Some(cluster)` for clustered points, `None` for noise.
pub fn dbscan(points: &[GeoPoint], params: &ClusterParams) -> Vec<Option<usize>> {
    let n = points.len();
    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    if n == 0 {
        return labels;
    }

    let grid = Grid::new(points, params.eps);
    let mut next_label = 0;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let neighbours = grid.region(points, i, params.eps);
        if neighbours.len() < params.min_samples {
            continue;
        }

        let label = next_label;
        next_label += 1;
        labels[i] = Some(label);

        let mut frontier = neighbours;
        while let Some(j) = frontier.pop() {
            if labels[j].is_none() {
                labels[j] = Some(label);
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;
            let reach = grid.region(points, j, params.eps);
            if reach.len() >= params.min_samples {
                frontier.extend(reach);
            }
        }
    }

    labels
}

/// Partition point indices into groups: DBSCAN clusters plus one singleton
/// per noise point, ordered by each group's lowest index.
pub fn group_points(points: &[GeoPoint], params: &ClusterParams) -> Vec<Vec<usize>> {
    let labels = dbscan(points, params);
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut slot_of_label: HashMap<usize, usize> = HashMap::new();

    for (i, label) in labels.iter().enumerate() {
        match label {
            Some(l) => {
                let slot = *slot_of_label.entry(*l).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[slot].push(i);
            }
            None => groups.push(vec![i]),
        }
    }

    groups
}

/// Cluster a retained set and summarise each group.
pub fn cluster_events(retained: &RetainedSet, params: &ClusterParams) -> Vec<Cluster> {
    let events = retained.events();
    let now = retained.now();
    let points: Vec<GeoPoint> = events.iter().map(|e| e.position()).collect();

    group_points(&points, params)
        .into_iter()
        .enumerate()
        .map(|(id, members)| {
            let count = members.len() as f64;
            let (lat_sum, lon_sum, age_sum) = members.iter().fold((0.0, 0.0, 0.0), |acc, &m| {
                let e = &events[m];
                (acc.0 + e.latitude, acc.1 + e.longitude, acc.2 + e.age(now))
            });
            let sentiment_counts: SentimentCounts =
                members.iter().map(|&m| events[m].sentiment).collect();

            Cluster {
                id,
                centroid: GeoPoint::new(lat_sum / count, lon_sum / count),
                member_count: members.len(),
                dominant_sentiment: sentiment_counts.dominant(),
                sentiment_counts,
                mean_age: age_sum / count,
                members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::retention::prune;
    use approx::assert_relative_eq;

    fn ev(lat: f64, lon: f64, sentiment: Sentiment, observed_at: f64) -> Event {
        Event::new(lat, lon, sentiment, "t", observed_at).unwrap()
    }

    fn retained(events: Vec<Event>, now: f64) -> RetainedSet {
        prune(&events, now, 60.0)
    }

    #[test]
    fn test_empty_gives_no_clusters() {
        let clusters = cluster_events(&retained(vec![], 0.0), &ClusterParams::default());
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_single_event_is_singleton() {
        let set = retained(vec![ev(10.0, 10.0, Sentiment::Sad, 95.0)], 100.0);
        let clusters = cluster_events(&set, &ClusterParams::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_count, 1);
        assert_eq!(clusters[0].dominant_sentiment, Sentiment::Sad);
        assert_relative_eq!(clusters[0].mean_age, 5.0);
    }

    #[test]
    fn test_three_close_happy_events() {
        let now = 1_000.0;
        let set = retained(
            vec![
                ev(40.0, -74.0, Sentiment::Happy, now),
                ev(41.0, -73.5, Sentiment::Happy, now - 10.0),
                ev(41.5, -72.5, Sentiment::Happy, now - 20.0),
            ],
            now,
        );
        let clusters = cluster_events(&set, &ClusterParams::default());
        assert_eq!(clusters.len(), 1);
        let c = &clusters[0];
        assert_eq!(c.member_count, 3);
        assert_eq!(c.dominant_sentiment, Sentiment::Happy);
        assert_relative_eq!(c.mean_age, 10.0);
        assert_relative_eq!(c.centroid.lat, 122.5 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(c.centroid.lon, -220.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_chain_connects_beyond_eps() {
        // 0 → 2.5 → 5.0: endpoints are 5° apart but chained through the middle
        let points = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 2.5),
            GeoPoint::new(0.0, 5.0),
        ];
        let groups = group_points(&points, &ClusterParams::default());
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_eps_boundary_is_inclusive() {
        let points = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 3.0)];
        let groups = group_points(&points, &ClusterParams::default());
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_noise_points_become_singletons() {
        let points = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(50.0, 50.0),
            GeoPoint::new(0.5, 0.5),
            GeoPoint::new(-60.0, 120.0),
        ];
        let groups = group_points(&points, &ClusterParams::default());
        assert_eq!(groups, vec![vec![0, 2], vec![1], vec![3]]);
    }

    #[test]
    fn test_min_samples_three_leaves_pairs_as_noise() {
        let params = ClusterParams {
            eps: 3.0,
            min_samples: 3,
        };
        let points = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];
        let labels = dbscan(&points, &params);
        assert_eq!(labels, vec![None, None]);
        assert_eq!(group_points(&points, &params).len(), 2);
    }

    #[test]
    fn test_border_point_joins_cluster() {
        // Core triple around the origin, plus a border point reachable from
        // one core point only.
        let params = ClusterParams {
            eps: 1.0,
            min_samples: 3,
        };
        let points = [
            GeoPoint::new(0.0, 1.9),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.5),
            GeoPoint::new(0.0, 1.0),
        ];
        let labels = dbscan(&points, &params);
        assert!(labels.iter().all(|l| *l == Some(0)), "{labels:?}");
    }

    #[test]
    fn test_coverage_sums_to_retained_size() {
        let now = 500.0;
        let events: Vec<Event> = (0..40)
            .map(|i| {
                let lat = ((i * 37) % 160) as f64 - 80.0;
                let lon = ((i * 53) % 340) as f64 - 170.0;
                ev(lat, lon, Sentiment::Neutral, now - (i % 30) as f64)
            })
            .collect();
        let set = retained(events, now);
        let clusters = cluster_events(&set, &ClusterParams::default());

        let total: usize = clusters.iter().map(|c| c.member_count).sum();
        assert_eq!(total, set.len());

        let mut seen = vec![0usize; set.len()];
        for c in &clusters {
            for &m in &c.members {
                seen[m] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_dominant_sentiment_tie_break() {
        let now = 10.0;
        let set = retained(
            vec![
                ev(0.0, 0.0, Sentiment::Neutral, now),
                ev(0.1, 0.0, Sentiment::Sad, now),
                ev(0.2, 0.0, Sentiment::Neutral, now),
                ev(0.3, 0.0, Sentiment::Sad, now),
            ],
            now,
        );
        let clusters = cluster_events(&set, &ClusterParams::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].dominant_sentiment, Sentiment::Sad);
        assert_eq!(clusters[0].sentiment_counts.neutral, 2);
    }

    #[test]
    fn test_ids_follow_lowest_member_index() {
        let points = [
            GeoPoint::new(70.0, 70.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(70.5, 70.0),
            GeoPoint::new(0.5, 0.0),
        ];
        let groups = group_points(&points, &ClusterParams::default());
        assert_eq!(groups, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn test_saturated_grid_keys_do_not_overflow() {
        let points = [
            GeoPoint::new(45.0, 10.0),
            GeoPoint::new(45.0, 10.0),
            GeoPoint::new(-45.0, -10.0),
        ];
        let params = ClusterParams {
            eps: 1e-18,
            min_samples: 2,
        };
        assert_eq!(group_points(&points, &params), vec![vec![0, 1], vec![2]]);
    }
}
