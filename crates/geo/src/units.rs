//! Distance units and the validated search radius.

use crate::{GeoError, Result};
use std::fmt;
use std::str::FromStr;

/// Meters in one international mile (exact by definition).
pub const METERS_PER_MILE: f64 = 1609.344;

/// Converts miles to meters.
#[inline]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

/// Converts meters to miles.
#[inline]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Search radius in miles.
///
/// Always finite and non-negative. Zero is allowed and matches only points
/// at distance exactly zero from the center.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize)]
pub struct RadiusMiles(f64);

impl RadiusMiles {
    /// Validates a radius in miles.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidRadius`] for negative, NaN or infinite values.
    pub fn new(miles: f64) -> Result<Self> {
        if !miles.is_finite() {
            return Err(GeoError::InvalidRadius(format!("{} is not a finite number", miles)));
        }
        if miles < 0.0 {
            return Err(GeoError::InvalidRadius(format!("{} is negative", miles)));
        }
        Ok(Self(miles))
    }

    /// The radius in miles.
    #[inline]
    pub fn miles(self) -> f64 {
        self.0
    }

    /// The radius in meters.
    #[inline]
    pub fn meters(self) -> f64 {
        miles_to_meters(self.0)
    }

    /// Label text with one decimal place, e.g. `"50.0"`.
    ///
    /// Exact halves round up (`12.25` is `"12.3"`), unlike `{:.1}` which
    /// rounds them to even.
    pub fn label(self) -> String {
        // Only multiples of 0.25 can sit exactly between two tenths.
        let quarters = self.0 * 4.0;
        if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
            return format!("{:.1}", (self.0 * 10.0 + 0.5).floor() / 10.0);
        }
        format!("{:.1}", self.0)
    }
}

impl fmt::Display for RadiusMiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mi", self.0)
    }
}

impl FromStr for RadiusMiles {
    type Err = GeoError;

    /// Parses the raw text of a numeric input control.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let miles: f64 = trimmed
            .parse()
            .map_err(|_| GeoError::InvalidRadius(format!("{:?} is not a number", trimmed)))?;
        Self::new(miles)
    }
}

impl TryFrom<f64> for RadiusMiles {
    type Error = GeoError;

    fn try_from(miles: f64) -> Result<Self> {
        Self::new(miles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_constant_is_exact() {
        assert_eq!(miles_to_meters(1.0), 1609.344);
        assert!((miles_to_meters(50.0) - 80_467.2).abs() < 1e-9);
        assert_eq!(meters_to_miles(1609.344), 1.0);
    }

    #[test]
    fn test_radius_accepts_zero_and_positive() {
        assert_eq!(RadiusMiles::new(0.0).unwrap().meters(), 0.0);
        assert!((RadiusMiles::new(50.0).unwrap().meters() - 80_467.2).abs() < 1e-9);
    }

    #[test]
    fn test_radius_rejects_invalid() {
        assert!(matches!(RadiusMiles::new(-1.0), Err(GeoError::InvalidRadius(_))));
        assert!(RadiusMiles::new(f64::NAN).is_err());
        assert!(RadiusMiles::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_radius_label() {
        assert_eq!(RadiusMiles::new(50.0).unwrap().label(), "50.0");
        assert_eq!(RadiusMiles::new(12.34).unwrap().label(), "12.3");
        assert_eq!(RadiusMiles::new(0.0).unwrap().label(), "0.0");
    }

    #[test]
    fn test_radius_label_rounds_halves_up() {
        assert_eq!(RadiusMiles::new(0.25).unwrap().label(), "0.3");
        assert_eq!(RadiusMiles::new(0.75).unwrap().label(), "0.8");
        assert_eq!(RadiusMiles::new(12.25).unwrap().label(), "12.3");
        assert_eq!(RadiusMiles::new(2.5).unwrap().label(), "2.5");
        // 0.35 is stored just below the half, so it rounds down
        assert_eq!(RadiusMiles::new(0.35).unwrap().label(), "0.3");
    }

    #[test]
    fn test_radius_from_input_text() {
        assert_eq!("0".parse::<RadiusMiles>().unwrap().miles(), 0.0);
        assert_eq!(" 12.5 ".parse::<RadiusMiles>().unwrap().miles(), 12.5);
        assert!("abc".parse::<RadiusMiles>().is_err());
        assert!("".parse::<RadiusMiles>().is_err());
        assert!("-3".parse::<RadiusMiles>().is_err());
    }
}
