use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IngestError, Result};
use crate::sentiment::{Classifier, Sentiment};

/// A (latitude, longitude) pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Euclidean distance in degree space. Matches how the clustering radius
    /// is expressed; it is not a great-circle distance.
    pub fn distance(self, other: Self) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Location attached to a raw item by the event source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoRef {
    Point { lat: f64, lon: f64 },
    /// GeoJSON order: `[west, south, east, north]`.
    BoundingBox([f64; 4]),
}

impl GeoRef {
    /// The point itself, or the midpoint of the box. A box whose west edge
    /// lies east of its east edge spans the antimeridian.
    pub fn resolve(&self) -> GeoPoint {
        match *self {
            GeoRef::Point { lat, lon } => GeoPoint::new(lat, lon),
            GeoRef::BoundingBox([west, south, east, north]) => {
                let lat = (south + north) / 2.0;
                let east = if west > east { east + 360.0 } else { east };
                let mut lon = (west + east) / 2.0;
                if lon >= 180.0 {
                    lon -= 360.0;
                }
                GeoPoint::new(lat, lon)
            }
        }
    }
}

/// One unclassified item as delivered by the event source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub geo: Option<GeoRef>,
    /// Producer timestamp, Unix seconds.
    #[serde(default)]
    pub produced_at: Option<f64>,
}

impl RawItem {
    pub fn at_point(text: &str, lat: f64, lon: f64) -> Self {
        Self {
            text: text.to_string(),
            geo: Some(GeoRef::Point { lat, lon }),
            produced_at: None,
        }
    }
}

/// One classified geotagged observation. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub sentiment: Sentiment,
    pub text: String,
    /// Arrival time at the ingestion boundary, Unix seconds.
    pub observed_at: f64,
}

impl Event {
    pub fn new(
        latitude: f64,
        longitude: f64,
        sentiment: Sentiment,
        text: &str,
        observed_at: f64,
    ) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(IngestError::EmptyText);
        }
        if !GeoPoint::new(latitude, longitude).is_valid() {
            return Err(IngestError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            latitude,
            longitude,
            sentiment,
            text: text.to_string(),
            observed_at,
        })
    }

    /// Validate, geo-resolve and classify a raw item.
    pub fn from_raw(item: &RawItem, classifier: &dyn Classifier, observed_at: f64) -> Result<Self> {
        if item.text.trim().is_empty() {
            return Err(IngestError::EmptyText);
        }
        let point = item.geo.as_ref().ok_or(IngestError::MissingGeo)?.resolve();
        let sentiment = classifier.classify(&item.text);
        Self::new(point.lat, point.lon, sentiment, &item.text, observed_at)
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Seconds since observation; negative if observed in the future.
    pub fn age(&self, now: f64) -> f64 {
        now - self.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::LexiconClassifier;

    #[test]
    fn test_bbox_midpoint() {
        // west, south, east, north
        let geo = GeoRef::BoundingBox([-74.0, 40.0, -73.0, 41.0]);
        assert_eq!(geo.resolve(), GeoPoint::new(40.5, -73.5));
    }

    #[test]
    fn test_bbox_across_antimeridian() {
        let geo = GeoRef::BoundingBox([170.0, -10.0, -170.0, 10.0]);
        let p = geo.resolve();
        assert_eq!(p.lat, 0.0);
        assert!((p.lon - -180.0).abs() < 1e-9, "got {}", p.lon);
    }

    #[test]
    fn test_from_raw_classifies() {
        let item = RawItem::at_point("such a wonderful morning", 51.5, -0.1);
        let event = Event::from_raw(&item, &LexiconClassifier::new(), 100.0).unwrap();
        assert_eq!(event.sentiment, Sentiment::Happy);
        assert_eq!(event.observed_at, 100.0);
        assert_eq!(event.position(), GeoPoint::new(51.5, -0.1));
    }

    #[test]
    fn test_from_raw_rejects_missing_geo() {
        let item = RawItem {
            text: "hello".into(),
            geo: None,
            produced_at: None,
        };
        assert_eq!(
            Event::from_raw(&item, &LexiconClassifier::new(), 0.0),
            Err(IngestError::MissingGeo)
        );
    }

    #[test]
    fn test_from_raw_rejects_blank_text() {
        let item = RawItem::at_point("   ", 0.0, 0.0);
        assert_eq!(
            Event::from_raw(&item, &LexiconClassifier::new(), 0.0),
            Err(IngestError::EmptyText)
        );
    }

    #[test]
    fn test_rejects_out_of_range_and_nan() {
        assert!(matches!(
            Event::new(91.0, 0.0, Sentiment::Happy, "x", 0.0),
            Err(IngestError::InvalidCoordinate { .. })
        ));
        assert!(Event::new(0.0, f64::NAN, Sentiment::Happy, "x", 0.0).is_err());
        assert!(Event::new(-90.0, 180.0, Sentiment::Sad, "edge", 0.0).is_ok());
    }

    #[test]
    fn test_raw_item_json_shapes() {
        let point: RawItem =
            serde_json::from_str(r#"{"text":"hi","geo":{"point":{"lat":1.0,"lon":2.0}}}"#)
                .unwrap();
        assert_eq!(point.geo.unwrap().resolve(), GeoPoint::new(1.0, 2.0));

        let bbox: RawItem = serde_json::from_str(
            r#"{"text":"hi","geo":{"bounding_box":[0.0,0.0,2.0,4.0]},"produced_at":5.5}"#,
        )
        .unwrap();
        assert_eq!(bbox.geo.unwrap().resolve(), GeoPoint::new(2.0, 1.0));
        assert_eq!(bbox.produced_at, Some(5.5));

        let bare: RawItem = serde_json::from_str(r#"{"text":"no geo"}"#).unwrap();
        assert!(bare.geo.is_none());
    }
}
