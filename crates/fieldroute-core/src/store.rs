use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A physical retail location ("sala") that may appear on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    /// Economic tier ("quintil"), 1–5. Reporting only.
    pub tier: Option<i16>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds coordinates only when both halves are known.
    ///
    /// Storage keeps latitude and longitude as independent nullable columns;
    /// a lone half is treated as unknown.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Checks that a store tier is within `1..=5`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTier`] when the tier is out of range.
pub fn validate_tier(tier: i16) -> Result<i16, CoreError> {
    if (1..=5).contains(&tier) {
        Ok(tier)
    } else {
        Err(CoreError::InvalidTier { tier })
    }
}
