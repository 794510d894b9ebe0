use once_cell::sync::Lazy;
use std::path::PathBuf;
use tracing::debug;

pub mod catalog;
pub mod geocode;
pub mod location;
pub mod model;
pub mod raw;
pub mod store;
pub mod test_data;
pub mod view_state;

mod error;

pub use catalog::{DEFAULT_CATALOG_PAGE_SIZE, load_catalog};
pub use error::{DataError, Result};
pub use geocode::{REGIONAL_CENTER, ZipResolver};
pub use location::{FixedLocationProvider, LocationError, LocationProvider};
pub use model::{
    Coordinate, EventSchedule, Item, ItemFilters, ItemKind, ItemLocation, display_category,
};
pub use raw::{normalize_document, normalize_documents};
pub use store::{Cursor, Document, DocumentStore, MemoryStore, Page, RangeQuery};
pub use test_data::{TestDataConfig, create_test_store};
pub use view_state::{MapViewport, ViewState, ViewStateStore};

pub const DATA_DIR_DEFAULT: &str = "./socialspot_data";

/// Directory for persisted state.
///
/// `SOCIALSPOT_DATA_DIR` wins; otherwise the platform data directory when the
/// `system-dirs` feature is enabled; otherwise [`DATA_DIR_DEFAULT`].
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(dir) = std::env::var("SOCIALSPOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(feature = "system-dirs")]
    if let Some(dirs) = directories::ProjectDirs::from("org", "socialspot", "socialspot") {
        let dir = dirs.data_dir().to_path_buf();
        debug!(dir = ?dir, "Using platform data directory");
        return dir;
    }

    debug!("Using default data directory");
    PathBuf::from(DATA_DIR_DEFAULT)
});

pub fn get_data_dir() -> &'static PathBuf {
    &DATA_DIR
}
