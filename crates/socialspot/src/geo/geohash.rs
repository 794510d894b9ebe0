//! Geohash encoding and disc-covering range bounds.
//!
//! Bits alternate between longitude and latitude, starting with longitude, and
//! are packed five to a character over [`GEOHASH_ALPHABET`].

use itertools::Itertools;
use socialspot_data::Coordinate;
use tracing::debug;

use super::{
    GeoError, Result,
    distance::{EARTH_RADIUS_MILES, METERS_PER_MILE},
};

pub const GEOHASH_ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Precision the catalog geohashes are written with.
pub const DEFAULT_STORAGE_PRECISION: usize = 6;

pub const MAX_PRECISION: usize = 22;

const BITS_PER_CHAR: usize = 5;

const MAX_BITS: usize = MAX_PRECISION * BITS_PER_CHAR;

/// Sorts after every alphabet character; closes ranges that would run past `z`.
const RANGE_END: char = '~';

/// Bounding-box inflation absorbing floating-point error at the disc edge.
const COVERAGE_PADDING: f64 = 1.005;

const EARTH_RADIUS_METERS: f64 = EARTH_RADIUS_MILES * METERS_PER_MILE;

fn check_precision(precision: usize) -> Result<()> {
    if (1..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(GeoError::InvalidPrecision {
            precision,
            max: MAX_PRECISION,
        })
    }
}

fn check_coordinate(coord: Coordinate) -> Result<()> {
    if coord.is_valid() {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate {
            latitude: coord.latitude,
            longitude: coord.longitude,
        })
    }
}

fn char_value(c: u8) -> Option<usize> {
    GEOHASH_ALPHABET.iter().position(|&a| a == c)
}

/// Encode `coord` as a geohash of `precision` characters.
pub fn encode(coord: Coordinate, precision: usize) -> Result<String> {
    check_precision(precision)?;
    check_coordinate(coord)?;
    Ok(encode_unchecked(coord.latitude, coord.longitude, precision))
}

fn encode_unchecked(latitude: f64, longitude: f64, precision: usize) -> String {
    let (mut lat_min, mut lat_max) = (-90.0_f64, 90.0_f64);
    let (mut lon_min, mut lon_max) = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);
    let mut even = true;

    for _ in 0..precision {
        let mut value = 0usize;
        for _ in 0..BITS_PER_CHAR {
            value <<= 1;
            if even {
                let mid = (lon_min + lon_max) / 2.0;
                if longitude >= mid {
                    value |= 1;
                    lon_min = mid;
                } else {
                    lon_max = mid;
                }
            } else {
                let mid = (lat_min + lat_max) / 2.0;
                if latitude >= mid {
                    value |= 1;
                    lat_min = mid;
                } else {
                    lat_max = mid;
                }
            }
            even = !even;
        }
        hash.push(char::from(GEOHASH_ALPHABET[value]));
    }
    hash
}

/// Bounding box of one geohash cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeohashCell {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeohashCell {
    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: (self.min_latitude + self.max_latitude) / 2.0,
            longitude: (self.min_longitude + self.max_longitude) / 2.0,
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coord.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&coord.longitude)
    }
}

/// Decode a geohash into the cell it names.
pub fn decode(hash: &str) -> Result<GeohashCell> {
    if hash.is_empty() || hash.len() > MAX_PRECISION {
        return Err(GeoError::InvalidGeohash(hash.to_string()));
    }

    let mut cell = GeohashCell {
        min_latitude: -90.0,
        max_latitude: 90.0,
        min_longitude: -180.0,
        max_longitude: 180.0,
    };
    let mut even = true;

    for byte in hash.bytes() {
        let value = char_value(byte.to_ascii_lowercase())
            .ok_or_else(|| GeoError::InvalidGeohash(hash.to_string()))?;
        for shift in (0..BITS_PER_CHAR).rev() {
            let bit = (value >> shift) & 1 == 1;
            if even {
                let mid = (cell.min_longitude + cell.max_longitude) / 2.0;
                if bit {
                    cell.min_longitude = mid;
                } else {
                    cell.max_longitude = mid;
                }
            } else {
                let mid = (cell.min_latitude + cell.max_latitude) / 2.0;
                if bit {
                    cell.min_latitude = mid;
                } else {
                    cell.max_latitude = mid;
                }
            }
            even = !even;
        }
    }
    Ok(cell)
}

/// Inclusive lexicographic range `[lower, upper]` over stored geohash strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeohashBound {
    pub lower: String,
    pub upper: String,
}

impl GeohashBound {
    pub fn contains(&self, hash: &str) -> bool {
        self.lower.as_str() <= hash && hash <= self.upper.as_str()
    }

    /// Range holding every hash that starts with the first `bits` bits of `hash`.
    fn for_prefix(hash: &str, bits: usize) -> Self {
        let len = bits.div_ceil(BITS_PER_CHAR);
        let prefix = &hash[..len];
        let (base, last) = prefix.split_at(len - 1);
        let last = last.bytes().next().and_then(char_value).unwrap_or_default();

        let unused = len * BITS_PER_CHAR - bits;
        let start = (last >> unused) << unused;
        let end = start + (1 << unused);

        let lower = format!("{base}{}", char::from(GEOHASH_ALPHABET[start]));
        let upper = match GEOHASH_ALPHABET.get(end) {
            Some(&c) => format!("{base}{}", char::from(c)),
            None => format!("{base}{RANGE_END}"),
        };
        Self { lower, upper }
    }
}

/// Number of bisections of `span` degrees that keep a cell at least
/// `half_extent` degrees wide.
fn axis_bits(span: f64, half_extent: f64) -> usize {
    if half_extent <= 0.0 {
        return MAX_BITS;
    }
    (span / half_extent)
        .log2()
        .floor()
        .clamp(0.0, MAX_BITS as f64) as usize
}

fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Ranges covering the disc of `radius_meters` around `center`, for hashes
/// stored at [`DEFAULT_STORAGE_PRECISION`].
pub fn query_bounds(center: Coordinate, radius_meters: f64) -> Result<Vec<GeohashBound>> {
    query_bounds_with_precision(center, radius_meters, DEFAULT_STORAGE_PRECISION)
}

/// Ranges covering the disc of `radius_meters` around `center`.
///
/// Every stored hash (of at least `max_precision` characters) whose point lies
/// in the disc falls inside one of the returned bounds. Bounds may over-cover
/// and never exceed nine. Duplicates are removed keeping first occurrence.
pub fn query_bounds_with_precision(
    center: Coordinate,
    radius_meters: f64,
    max_precision: usize,
) -> Result<Vec<GeohashBound>> {
    check_precision(max_precision)?;
    check_coordinate(center)?;
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(GeoError::InvalidRadius(radius_meters));
    }

    let angular = radius_meters * COVERAGE_PADDING / EARTH_RADIUS_METERS;
    let lat_rad = center.latitude.to_radians();

    let lat_extent = angular.to_degrees();
    let lon_extent = if angular >= std::f64::consts::FRAC_PI_2 - lat_rad.abs() {
        // The disc reaches a pole.
        180.0
    } else {
        (angular.sin() / lat_rad.cos()).clamp(-1.0, 1.0).asin().to_degrees()
    };

    let lat_bits = axis_bits(180.0, lat_extent);
    let lon_bits = axis_bits(360.0, lon_extent);
    let bits = (2 * lon_bits)
        .min(2 * lat_bits + 1)
        .clamp(1, max_precision * BITS_PER_CHAR);
    let hash_len = bits.div_ceil(BITS_PER_CHAR);

    let latitudes = [
        (center.latitude - lat_extent).max(-90.0),
        center.latitude,
        (center.latitude + lat_extent).min(90.0),
    ];
    let longitudes = [
        wrap_longitude(center.longitude - lon_extent),
        center.longitude,
        wrap_longitude(center.longitude + lon_extent),
    ];

    let bounds: Vec<GeohashBound> = latitudes
        .iter()
        .cartesian_product(longitudes.iter())
        .map(|(&lat, &lon)| GeohashBound::for_prefix(&encode_unchecked(lat, lon, hash_len), bits))
        .unique()
        .collect();

    debug!(
        center = %center,
        radius_meters,
        bits,
        bounds = bounds.len(),
        "Computed geohash query bounds"
    );
    Ok(bounds)
}
