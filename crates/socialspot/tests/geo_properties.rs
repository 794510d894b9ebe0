//! Property tests for distance math and geohash bound coverage.

use proptest::prelude::*;
use proptest::test_runner::Config;
use socialspot::data::Coordinate;
use socialspot::geo::{
    DEFAULT_STORAGE_PRECISION, decode, destination, distance_miles, encode, miles_to_meters,
    query_bounds,
};

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0_f64..=90.0, -180.0_f64..=180.0).prop_map(|(latitude, longitude)| Coordinate {
        latitude,
        longitude,
    })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        let ab = distance_miles(a, b);
        prop_assert_eq!(ab, distance_miles(b, a));
        prop_assert!(ab >= 0.0 && ab.is_finite());
    }

    #[test]
    fn distance_to_self_is_zero(a in coordinate()) {
        prop_assert_eq!(distance_miles(a, a), 0.0);
    }

    #[test]
    fn bounds_cover_points_just_inside_radius(
        latitude in -89.0_f64..89.0,
        longitude in -180.0_f64..180.0,
        radius in 0.01_f64..300.0,
        bearing in 0.0_f64..360.0,
    ) {
        let center = Coordinate { latitude, longitude };
        let bounds = query_bounds(center, miles_to_meters(radius)).expect("bounds");
        let point = destination(center, bearing, radius - 0.001);
        let hash = encode(point, DEFAULT_STORAGE_PRECISION).expect("encode");
        prop_assert!(
            bounds.iter().any(|b| b.contains(&hash)),
            "{} at {} mi bearing {} not covered by {:?}", hash, radius, bearing, bounds
        );
    }

    #[test]
    fn bounds_are_deterministic(center in coordinate(), radius in 0.0_f64..500.0) {
        let meters = miles_to_meters(radius);
        prop_assert_eq!(query_bounds(center, meters).expect("bounds"), query_bounds(center, meters).expect("bounds"));
    }

    #[test]
    fn decoded_cell_contains_point(point in coordinate(), precision in 1_usize..=12) {
        let cell = decode(&encode(point, precision).expect("encode")).expect("decode");
        prop_assert!(cell.contains(point));
    }
}
