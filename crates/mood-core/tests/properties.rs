//! Property checks for the invariants every frame must hold.

use mood_core::{
    ClusterParams, Event, GeoPoint, Sentiment, cluster_events, group_points, map_cluster, prune,
    wrap_longitude,
};
use mood_core::cluster::Cluster;
use mood_core::sentiment::SentimentCounts;
use proptest::prelude::*;

fn arb_sentiment() -> impl Strategy<Value = Sentiment> {
    prop_oneof![
        Just(Sentiment::Happy),
        Just(Sentiment::Sad),
        Just(Sentiment::Neutral),
    ]
}

fn arb_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(
        (-90.0f64..=90.0, -180.0f64..=180.0, arb_sentiment(), 0.0f64..200.0),
        0..80,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(lat, lon, s, t)| Event::new(lat, lon, s, "p", t).unwrap())
            .collect()
    })
}

fn cluster_with(member_count: usize, mean_age: f64) -> Cluster {
    Cluster {
        id: 0,
        centroid: GeoPoint::new(0.0, 0.0),
        member_count,
        dominant_sentiment: Sentiment::Neutral,
        sentiment_counts: SentimentCounts::default(),
        mean_age,
        members: Vec::new(),
    }
}

proptest! {
    #[test]
    fn pruning_is_idempotent(events in arb_events(), now in 0.0f64..250.0) {
        let once = prune(&events, now, 60.0);
        let twice = prune(once.events(), now, 60.0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn retained_events_are_inside_window(events in arb_events(), now in 0.0f64..250.0) {
        let retained = prune(&events, now, 60.0);
        for e in &retained {
            prop_assert!(now - e.observed_at <= 60.0);
        }
    }

    #[test]
    fn every_event_in_exactly_one_cluster(events in arb_events(), now in 100.0f64..250.0) {
        let retained = prune(&events, now, 60.0);
        let clusters = cluster_events(&retained, &ClusterParams::default());
        let total: usize = clusters.iter().map(|c| c.member_count).sum();
        prop_assert_eq!(total, retained.len());

        let mut seen = vec![0u8; retained.len()];
        for c in &clusters {
            prop_assert!(c.member_count >= 1);
            prop_assert_eq!(c.member_count, c.members.len());
            for &m in &c.members {
                seen[m] += 1;
            }
        }
        prop_assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn grouping_ignores_min_samples_for_coverage(
        coords in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..60),
        eps in 0.1f64..20.0,
        min_samples in 1usize..6,
    ) {
        let points: Vec<GeoPoint> = coords.iter().map(|&(a, b)| GeoPoint::new(a, b)).collect();
        let groups = group_points(&points, &ClusterParams { eps, min_samples });
        let total: usize = groups.iter().map(Vec::len).sum();
        prop_assert_eq!(total, points.len());
    }

    #[test]
    fn older_clusters_never_look_bigger_or_brighter(
        count in 1usize..50,
        age_a in -10.0f64..120.0,
        age_b in -10.0f64..120.0,
        heartbeat in 0.7f64..1.3,
    ) {
        let (young, old) = if age_a <= age_b { (age_a, age_b) } else { (age_b, age_a) };
        let y = map_cluster(&cluster_with(count, young), 60.0, heartbeat);
        let o = map_cluster(&cluster_with(count, old), 60.0, heartbeat);
        prop_assert!(o.size <= y.size);
        prop_assert!(o.opacity <= y.opacity);
        prop_assert!((0.1..=1.0).contains(&o.opacity));
        prop_assert!(o.size > 0.0);
    }

    #[test]
    fn comet_longitude_stays_wrapped(
        start in -180.0f64..180.0,
        speed in 0.5f64..=2.0,
        ticks in 0usize..5_000,
    ) {
        let mut lon = start;
        for _ in 0..ticks {
            lon = wrap_longitude(lon + speed);
        }
        prop_assert!((-180.0..180.0).contains(&lon), "lon = {}", lon);
    }
}
