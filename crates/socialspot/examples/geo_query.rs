//! Geohash-bounded search for events
//!
//! This example shows how a map screen queries the store directly:
//! - Computing the geohash range bounds that cover a search disc
//! - Running a coordinator in geo query mode with a device location provider
//! - Narrowing events by date window and event type without refetching

use std::sync::Arc;

use socialspot::{
    CoordinatorConfigBuilder, DateWindow, FetchPolicy, LocationRequest, SearchCoordinator,
    SearchQuery,
    data::{Coordinate, FixedLocationProvider, ItemKind, TestDataConfig, create_test_store},
    geo::miles_to_meters,
    query_bounds,
};

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Downtown Baltimore
    let here = Coordinate::new(39.2851, -76.6084)?;

    println!("Bounds covering 15 miles around {here:?}:");
    for bound in query_bounds(here, miles_to_meters(15.0))? {
        println!("  {} .. {}", bound.lower, bound.upper);
    }

    let config = CoordinatorConfigBuilder::geo_query()
        .kind(ItemKind::Event)
        .fetch_policy(FetchPolicy::Degraded)
        .build()?;
    let coordinator = SearchCoordinator::new(create_test_store(&TestDataConfig::sample()), config)
        .with_location_provider(Arc::new(FixedLocationProvider::at(here)));

    let query = SearchQuery::builder()
        .radius_miles(15.0)
        .date_window(DateWindow::All)
        .build()?;
    let (_, snapshot) = coordinator
        .search_at(&LocationRequest::CurrentPosition, query)
        .await?;
    println!("\nEvents within 15 miles (degraded: {}):", snapshot.degraded);
    for hit in snapshot.results.iter() {
        println!(
            "  {} - {:.1} mi",
            hit.name(),
            hit.display_distance().unwrap_or_default()
        );
    }
    println!("Event types: {}", coordinator.event_types().join(", "));

    // Same center and radius, so the held candidates are reused.
    let community = SearchQuery {
        event_types: vec!["Community".to_string()],
        ..snapshot.query.clone()
    };
    let snapshot = coordinator.search(community).await?;
    println!("\nCommunity events only: {}", snapshot.results.len());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await
}
