use core::fmt;

use geo::{HaversineDistance, Point};
use thiserror::Error;

use crate::units::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is not within [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is not within [-180, 180]")]
    Longitude(f64),
}

/// A validated position on the globe. `geo` keeps points as (x, y), so the
/// longitude is stored as x and the latitude as y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint(Point);

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self(Point::new(longitude, latitude)))
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }

    /// Great-circle distance in kilometres on a sphere of the mean Earth radius.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        self.0.haversine_distance(&other.0) / 1000.0
    }

    pub fn distance(&self, other: &GeoPoint, unit: Unit) -> f64 {
        unit.from_km(self.distance_km(other))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude(), self.longitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(CoordinateError::Latitude(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.1),
            Err(CoordinateError::Longitude(-180.1))
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn half_degree_along_equator() {
        let d = point(0.0, 0.0).distance(&point(0.0, 0.5), Unit::Miles);
        assert!((d - 34.55).abs() < 0.1, "{d}");

        let d = point(0.0, 0.0).distance(&point(0.0, 0.5), Unit::Kilometers);
        assert!((d - 55.6).abs() < 0.1, "{d}");
    }

    #[test]
    fn same_point_is_zero() {
        let p = point(-33.8688, 151.2093);
        assert_eq!(p.distance_km(&p), 0.0);
    }

    #[test]
    fn symmetric() {
        let sydney = point(-33.8688, 151.2093);
        let melbourne = point(-37.8136, 144.9631);
        let there = sydney.distance_km(&melbourne);
        let back = melbourne.distance_km(&sydney);
        assert!((there - back).abs() < 1e-9);
        // roughly 714 km as the crow flies
        assert!((there - 714.0).abs() < 5.0, "{there}");
    }

    #[test]
    fn accessors_keep_lat_lon_order() {
        let p = point(12.5, -45.25);
        assert_eq!(p.latitude(), 12.5);
        assert_eq!(p.longitude(), -45.25);
        assert_eq!(p.to_string(), "(12.5, -45.25)");
    }
}
