//! Geographic coordinates for service areas.

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the WGS84 range
    pub fn new(lat: f64, lng: f64) -> DomainResult<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Build coordinates only when both halves are present.
    ///
    /// A lone latitude or longitude is ignored rather than rejected.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> DomainResult<Option<Self>> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            _ => Ok(None),
        }
    }
}
