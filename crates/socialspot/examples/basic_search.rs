//! Basic proximity search over the sample catalog
//!
//! This example demonstrates the everyday flow of a list screen:
//! - Loading the full activity catalog into a coordinator
//! - Narrowing it by distance from a ZIP code
//! - Layering category, cost and age filters on top

use socialspot::{
    AgeBand, CoordinatorConfigBuilder, LocationRequest, SearchCoordinator, SearchHit, SearchQuery,
    data::{TestDataConfig, create_test_store},
};

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = create_test_store(&TestDataConfig::sample());
    let coordinator = SearchCoordinator::new(store, CoordinatorConfigBuilder::catalog().build()?);

    println!("Full catalog, alphabetical:");
    let snapshot = coordinator.load_catalog().await?;
    print_hits(&snapshot.results, 5);
    println!("Categories: {}", coordinator.categories().join(", "));

    // Annapolis ZIP, 10 mile radius
    println!("\nWithin 10 miles of 21401:");
    let query = SearchQuery::builder().radius_miles(10.0).build()?;
    let (resolved, snapshot) = coordinator
        .search_at(&LocationRequest::Zip("21401".to_string()), query)
        .await?;
    println!("  centered on {:?}", resolved.center());
    print_hits(&snapshot.results, 5);

    println!("\nFree outdoor places within 25 miles, toddler friendly:");
    let filtered = SearchQuery::builder()
        .location(resolved.center())
        .radius_miles(25.0)
        .category("Outdoor Fun")
        .free_only(true)
        .age_band(AgeBand::Toddler)
        .build()?;
    let snapshot = coordinator.search(filtered).await?;
    print_hits(&snapshot.results, 5);

    Ok(())
}

fn print_hits(hits: &[SearchHit], limit: usize) {
    for (i, hit) in hits.iter().take(limit).enumerate() {
        match hit.display_distance() {
            Some(miles) => println!("  {}. {} - {miles:.1} mi", i + 1, hit.name()),
            None => println!("  {}. {}", i + 1, hit.name()),
        }
    }

    if hits.len() > limit {
        println!("  ... and {} more results", hits.len() - limit);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await
}
