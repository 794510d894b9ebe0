use socialspot_data::Coordinate;

/// Mean Earth radius used by every distance and bounds computation.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

pub const METERS_PER_MILE: f64 = 1609.344;

/// Great-circle distance in miles (Haversine).
///
/// Exactly symmetric in its arguments and zero for identical points. The
/// `1 - a` term is clamped so antipodal inputs never produce `NaN`.
///
/// The result is unrounded; cut against a radius with this value and only
/// round for display with [`round_for_display`].
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).abs().to_radians();
    let d_lon = (b.longitude - a.longitude).abs().to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();
    let a_term = (half_lat * half_lat + lat1.cos() * lat2.cos() * half_lon * half_lon).clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_MILES * a_term.sqrt().atan2((1.0 - a_term).max(0.0).sqrt())
}

/// Point reached by travelling `distance` miles from `start` along the
/// initial `bearing_deg` (clockwise from north) on a great circle.
pub fn destination(start: Coordinate, bearing_deg: f64, distance: f64) -> Coordinate {
    let lat1 = start.latitude.to_radians();
    let lon1 = start.longitude.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance / EARTH_RADIUS_MILES;

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = angular.sin_cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * bearing.cos()).clamp(-1.0, 1.0).asin();
    let lon2 = lon1 + (bearing.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());

    let mut longitude = lon2.to_degrees();
    if longitude > 180.0 {
        longitude -= 360.0;
    } else if longitude < -180.0 {
        longitude += 360.0;
    }

    Coordinate {
        latitude: lat2.to_degrees().clamp(-90.0, 90.0),
        longitude,
    }
}

pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

/// Round to one decimal place for display.
pub fn round_for_display(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_identical_points() {
        let annapolis = coord(38.9784, -76.4922);
        assert_eq!(distance_miles(annapolis, annapolis), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Baltimore to Annapolis is about 22.5 miles as the crow flies.
        let baltimore = coord(39.2904, -76.6122);
        let annapolis = coord(38.9784, -76.4922);
        let d = distance_miles(baltimore, annapolis);
        assert!((d - 22.6).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_antipodal_points_do_not_fail() {
        let d = distance_miles(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);

        let poles = distance_miles(coord(90.0, 0.0), coord(-90.0, 0.0));
        assert!((poles - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    #[test]
    fn test_destination_round_trip() {
        let start = coord(38.9784, -76.4922);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0, 333.0] {
            let end = destination(start, bearing, 12.5);
            assert!((distance_miles(start, end) - 12.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let end = destination(coord(0.0, 179.9), 90.0, 20.0);
        assert!(end.longitude < -179.0, "got {}", end.longitude);
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(round_for_display(9.96), 10.0);
        assert_eq!(round_for_display(2.04), 2.0);
        assert!((miles_to_meters(1.0) - 1609.344).abs() < f64::EPSILON);
    }
}
