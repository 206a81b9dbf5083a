use std::fmt;

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f64 },
    Zero { field: &'static str },
    InvertedRange { field: &'static str, min: f64, max: f64 },
    NonFinite { field: &'static str, value: f64 },
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            ConfigError::Zero { field } => write!(f, "{field} must be at least 1"),
            ConfigError::InvertedRange { field, min, max } => {
                write!(f, "{field} range is inverted: min {min} > max {max}")
            }
            ConfigError::NonFinite { field, value } => {
                write!(f, "{field} must be finite, got {value}")
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must lie in [{min}, {max}), got {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A raw item that cannot become an [`Event`](crate::event::Event).
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    EmptyText,
    MissingGeo,
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::EmptyText => write!(f, "item has no text"),
            IngestError::MissingGeo => write!(f, "item has no geo point or bounding box"),
            IngestError::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(f, "coordinate out of range: ({latitude}, {longitude})"),
        }
    }
}

impl std::error::Error for IngestError {}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
