use socialspot_data::{DEFAULT_CATALOG_PAGE_SIZE, ItemKind};

use crate::{
    error::SocialSpotError,
    geo::{DEFAULT_STORAGE_PRECISION, MAX_PRECISION},
    search::FetchPolicy,
};

pub const DEFAULT_MAX_PER_BOUND: usize = 500;

/// How the coordinator obtains candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMode {
    /// Load the whole collection once and filter it in memory.
    #[default]
    Catalog,
    /// Run a geohash-bounded store query whenever the center or radius changes.
    GeoQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinatorConfig {
    pub mode: SearchMode,
    pub kind: ItemKind,
    pub collection: String,
    /// Documents per page when loading the full catalog.
    pub page_size: usize,
    /// Cap on documents returned by each geohash bound query.
    pub max_per_bound: usize,
    /// Length of the geohashes stored on documents.
    pub storage_precision: usize,
    pub fetch_policy: FetchPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            kind: ItemKind::Activity,
            collection: ItemKind::Activity.collection().to_string(),
            page_size: DEFAULT_CATALOG_PAGE_SIZE,
            max_per_bound: DEFAULT_MAX_PER_BOUND,
            storage_precision: DEFAULT_STORAGE_PRECISION,
            fetch_policy: FetchPolicy::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::new()
    }
}

/// Builder for creating coordinator configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfigBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the fully loaded catalog, as the list screens do
    pub fn catalog() -> Self {
        Self::new().mode(SearchMode::Catalog)
    }

    /// Geohash-bounded fetch per location change
    pub fn geo_query() -> Self {
        Self::new().mode(SearchMode::GeoQuery)
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the item kind; the collection follows unless set explicitly afterwards
    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.config.kind = kind;
        self.config.collection = kind.collection().to_string();
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.config.collection = collection.into();
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn max_per_bound(mut self, max: usize) -> Self {
        self.config.max_per_bound = max;
        self
    }

    pub fn storage_precision(mut self, precision: usize) -> Self {
        self.config.storage_precision = precision;
        self
    }

    pub fn fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.config.fetch_policy = policy;
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<CoordinatorConfig, SocialSpotError> {
        let config = self.config;
        if config.page_size == 0 {
            return Err(SocialSpotError::ConfigError(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if config.max_per_bound == 0 {
            return Err(SocialSpotError::ConfigError(
                "max_per_bound must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_PRECISION).contains(&config.storage_precision) {
            return Err(SocialSpotError::ConfigError(format!(
                "storage_precision must be between 1 and {MAX_PRECISION}, got {}",
                config.storage_precision
            )));
        }
        if config.collection.trim().is_empty() {
            return Err(SocialSpotError::ConfigError(
                "collection must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
