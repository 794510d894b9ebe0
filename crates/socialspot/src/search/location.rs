use socialspot_data::{Coordinate, LocationError, LocationProvider, ZipResolver};
use tracing::{info, warn};

/// Where the search center should come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocationRequest {
    #[default]
    None,
    Zip(String),
    CurrentPosition,
}

/// Outcome of turning a [`LocationRequest`] into a search center.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedLocation {
    Unfiltered,
    /// `fallback` is set when the code was unknown and the regional center was used.
    Zip { center: Coordinate, fallback: bool },
    Device(Coordinate),
    /// The device position could not be read; the search runs unfiltered.
    Unavailable(LocationError),
    /// Not a 5-digit code. No search should be issued for it.
    InvalidZip(String),
}

impl ResolvedLocation {
    pub fn center(&self) -> Option<Coordinate> {
        match self {
            Self::Zip { center, .. } => Some(*center),
            Self::Device(center) => Some(*center),
            Self::Unfiltered | Self::Unavailable(_) | Self::InvalidZip(_) => None,
        }
    }
}

/// Resolve a location request.
///
/// Never fails: unknown ZIP codes use the resolver's fallback and a denied or
/// unavailable device position means no location filter. Codes that are not
/// five digits resolve to [`ResolvedLocation::InvalidZip`].
pub async fn resolve_location<P>(
    request: &LocationRequest,
    zips: &ZipResolver,
    provider: &P,
) -> ResolvedLocation
where
    P: LocationProvider + ?Sized,
{
    match request {
        LocationRequest::None => ResolvedLocation::Unfiltered,
        LocationRequest::Zip(zip) if !ZipResolver::is_valid_zip(zip) => {
            warn!(zip = %zip, "Ignoring malformed ZIP code");
            ResolvedLocation::InvalidZip(zip.clone())
        }
        LocationRequest::Zip(zip) => {
            let known = zips.lookup(zip);
            if known.is_none() {
                info!(zip = %zip, "Unknown ZIP code, searching around the regional center");
            }
            ResolvedLocation::Zip {
                center: known.unwrap_or_else(|| zips.fallback()),
                fallback: known.is_none(),
            }
        }
        LocationRequest::CurrentPosition => match provider.current_coordinates().await {
            Ok(center) => ResolvedLocation::Device(center),
            Err(e) => {
                warn!(error = %e, "Current position unavailable, searching without location filter");
                ResolvedLocation::Unavailable(e)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use socialspot_data::{FixedLocationProvider, REGIONAL_CENTER};

    use super::*;

    fn here() -> Coordinate {
        Coordinate::new(39.0840, -77.1528).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_zip_uses_regional_center() {
        let provider = FixedLocationProvider::at(here());
        let resolved =
            resolve_location(&LocationRequest::Zip("99999".into()), &ZipResolver::new(), &provider).await;
        assert_eq!(
            resolved,
            ResolvedLocation::Zip {
                center: REGIONAL_CENTER,
                fallback: true
            }
        );
        assert_eq!(resolved.center(), Some(REGIONAL_CENTER));
    }

    #[tokio::test]
    async fn test_malformed_zip_is_rejected() {
        let provider = FixedLocationProvider::at(here());
        for zip in ["2140", "214011", "2140a", ""] {
            let resolved =
                resolve_location(&LocationRequest::Zip(zip.into()), &ZipResolver::new(), &provider).await;
            assert_eq!(resolved, ResolvedLocation::InvalidZip(zip.to_string()));
            assert_eq!(resolved.center(), None);
        }
    }

    #[tokio::test]
    async fn test_known_zip() {
        let provider = FixedLocationProvider::at(here());
        let resolved =
            resolve_location(&LocationRequest::Zip("20850".into()), &ZipResolver::new(), &provider).await;
        assert!(matches!(resolved, ResolvedLocation::Zip { fallback: false, .. }));
    }

    #[tokio::test]
    async fn test_device_position() {
        let provider = FixedLocationProvider::at(here());
        let resolved =
            resolve_location(&LocationRequest::CurrentPosition, &ZipResolver::new(), &provider).await;
        assert_eq!(resolved.center(), Some(here()));
    }

    #[tokio::test]
    async fn test_denied_permission_means_unfiltered() {
        let provider = FixedLocationProvider::failing(LocationError::PermissionDenied);
        let resolved =
            resolve_location(&LocationRequest::CurrentPosition, &ZipResolver::new(), &provider).await;
        assert_eq!(
            resolved,
            ResolvedLocation::Unavailable(LocationError::PermissionDenied)
        );
        assert_eq!(resolved.center(), None);
    }

    #[tokio::test]
    async fn test_no_request() {
        let provider = FixedLocationProvider::failing(LocationError::PermissionDenied);
        let resolved = resolve_location(&LocationRequest::None, &ZipResolver::new(), &provider).await;
        assert_eq!(resolved, ResolvedLocation::Unfiltered);
    }
}
