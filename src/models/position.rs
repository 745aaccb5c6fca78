//! Caller position.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair supplied by the caller (or extracted from an
/// LLM-interpreted intent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    /// Latitude in degrees, -90.0 to 90.0.
    pub latitude: f64,
    /// Longitude in degrees, -180.0 to 180.0.
    pub longitude: f64,
}

impl UserPosition {
    /// Creates a position, validating coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either coordinate is out of range
    /// or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let position = Self {
            latitude,
            longitude,
        };
        position.validate()?;
        Ok(position)
    }

    /// Validates coordinate ranges.
    ///
    /// Deserialized positions (from LLM output or provider JSON) carry
    /// whatever the upstream sent; callers must validate before trusting.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_position() {
        let position = UserPosition::new(40.0, -73.0);
        assert!(position.is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert!(UserPosition::new(91.0, 0.0).is_err());
        assert!(UserPosition::new(-90.1, 0.0).is_err());
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert!(UserPosition::new(0.0, 180.5).is_err());
        assert!(UserPosition::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(UserPosition::new(f64::NAN, 0.0).is_err());
        assert!(UserPosition::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert!(UserPosition::new(90.0, 180.0).is_ok());
        assert!(UserPosition::new(-90.0, -180.0).is_ok());
    }
}
