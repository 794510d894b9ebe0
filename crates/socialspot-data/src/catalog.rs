//! Full-catalog reads for the non-geographic browse path.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    error::Result,
    model::{Item, ItemKind},
    raw::normalize_documents,
    store::{DocumentStore, RangeQuery},
};

/// Page size used by the list screens when reading the whole catalog.
pub const DEFAULT_CATALOG_PAGE_SIZE: usize = 1000;

/// Read an entire collection, following the cursor until a short page.
///
/// The store may cap page sizes server-side, so a page shorter than
/// `page_size` is the only end-of-data signal. Documents are ordered by name;
/// records without a name are not returned by a name-ordered scan.
#[instrument(name = "Load catalog", skip(store), level = "info")]
pub async fn load_catalog<S: DocumentStore + ?Sized>(
    store: &S,
    kind: ItemKind,
    collection: &str,
    page_size: usize,
) -> Result<Vec<Arc<Item>>> {
    let t_load = std::time::Instant::now();
    let page_size = page_size.max(1);
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages = 0usize;

    loop {
        let query = RangeQuery::scan(collection, "name", page_size).after(cursor.take());
        let page = store.range_query(&query).await?;
        pages += 1;

        let returned = page.len();
        debug!(page = pages, returned, "Catalog page received");
        items.extend(
            normalize_documents(kind, &page.documents)
                .into_iter()
                .map(Arc::new),
        );

        if returned < page_size || page.cursor.is_none() {
            break;
        }
        cursor = page.cursor;
    }

    info!(
        collection,
        items = items.len(),
        pages,
        elapsed = ?t_load.elapsed(),
        "Catalog loaded"
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{Document, MemoryStore};

    fn store_with(n: usize) -> MemoryStore {
        MemoryStore::from_documents(
            "activities",
            (0..n)
                .map(|i| Document::new(format!("id-{i:03}"), json!({"name": format!("Item {i:03}")})))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_reads_all_pages() {
        let store = store_with(25);
        let items = load_catalog(&store, ItemKind::Activity, "activities", 10)
            .await
            .unwrap();
        assert_eq!(items.len(), 25);
        assert_eq!(store.query_count(), 3);
        assert_eq!(items[0].name(), "Item 000");
        assert_eq!(items[24].name(), "Item 024");
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_trailing_empty_page() {
        let store = store_with(20);
        let items = load_catalog(&store, ItemKind::Activity, "activities", 10)
            .await
            .unwrap();
        assert_eq!(items.len(), 20);
        assert_eq!(store.query_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let store = MemoryStore::new();
        let items = load_catalog(&store, ItemKind::Event, "events", 10)
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(store.query_count(), 1);
    }
}
