//! End-to-end tests over the full converter → synthesizer → catalog chain.

use std::sync::Arc;

use chrono::Days;
use serde_json::Value;

use forecast_cascade::config::Tier;
use forecast_cascade::downstream::RemoteCatalog;
use forecast_cascade::forecast::{to_fahrenheit, CategorySet, ForecastRecord, SequenceRandom, StaticCatalog, Synthesizer};
use forecast_cascade::http::server::resilient_downstream;
use forecast_cascade::http::{catalog_app, forecast_app, ErrorBody, X_REQUEST_ID};
use forecast_cascade::resilience::{BreakerRegistry, FailureKind};

mod common;

use common::{client, fast_config, fast_config_to, spawn_app, spawn_tier, RunningTier};

// Temperature, then category index, for each of the five records.
const DRAWS: [i32; 10] = [10, 0, -5, 1, 30, 2, 0, 0, 54, 2];

async fn spawn_catalog(labels: &[&str]) -> RunningTier {
    let mut config = fast_config(0, 5, 1_000);
    config.catalog.categories = labels.iter().map(|s| s.to_string()).collect();
    spawn_tier(Tier::Catalog, config).await
}

/// Synthesizer tier with a deterministic random source.
async fn spawn_seeded_synthesizer(catalog: &RunningTier) -> RunningTier {
    let config = fast_config_to(&catalog.base_url(), 1, 5, 1_000);
    let policy = config.outbound_policy(Tier::Synthesizer);
    let registry = Arc::new(BreakerRegistry::new(policy.breaker));
    let downstream = resilient_downstream(Tier::Synthesizer, &config, policy, registry.clone()).unwrap();
    let synthesizer = Synthesizer::new(RemoteCatalog::new(downstream), SequenceRandom::new(DRAWS.to_vec()));
    let app = forecast_app(Tier::Synthesizer, Arc::new(synthesizer), registry);
    spawn_app(Tier::Synthesizer, config, app).await
}

#[tokio::test]
async fn test_catalog_serves_configured_categories() {
    let catalog = spawn_catalog(&["Cold", "Mild", "Hot"]).await;

    let res = client().get(catalog.url("/weatherforecast")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Vec<String> = res.json().await.unwrap();
    assert_eq!(body, vec!["Cold", "Mild", "Hot"]);

    catalog.stop();
}

#[tokio::test]
async fn test_catalog_defaults_to_ten_labels() {
    let catalog = spawn_tier(Tier::Catalog, fast_config(0, 5, 1_000)).await;

    let body: Vec<String> = client()
        .get(catalog.url("/weatherforecast"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.len(), 10);
    assert_eq!(body[0], "Freezing");
    assert_eq!(body[9], "Scorching");

    catalog.stop();
}

#[tokio::test]
async fn test_full_chain_converts_synthesized_records() {
    let catalog = spawn_catalog(&["Cold", "Mild", "Hot"]).await;
    let synthesizer = spawn_seeded_synthesizer(&catalog).await;
    let converter = spawn_tier(
        Tier::Converter,
        fast_config_to(&synthesizer.base_url(), 1, 5, 1_000),
    )
    .await;
    let client = client();

    // The sequence replays per request, so both calls see identical draws.
    let celsius: Vec<ForecastRecord> = client
        .get(synthesizer.url("/weatherforecast"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let res = client.get(converter.url("/weatherforecast")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let fahrenheit: Vec<ForecastRecord> = res.json().await.unwrap();

    assert_eq!(celsius.len(), 5);
    assert_eq!(
        celsius.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        vec![10, -5, 30, 0, 54]
    );
    assert_eq!(
        celsius.iter().map(|r| r.summary.as_str()).collect::<Vec<_>>(),
        vec!["Cold", "Mild", "Hot", "Cold", "Hot"]
    );
    for pair in celsius.windows(2) {
        assert_eq!(pair[0].date + Days::new(1), pair[1].date);
    }

    assert_eq!(fahrenheit.len(), celsius.len());
    for (f, c) in fahrenheit.iter().zip(&celsius) {
        assert_eq!(f.temperature, to_fahrenheit(c.temperature));
        assert_eq!(f.summary, c.summary);
        assert_eq!(f.date, c.date);
    }
    assert_eq!(fahrenheit[0].temperature, 49);
    assert_eq!(fahrenheit[3].temperature, 32);

    converter.stop();
    synthesizer.stop();
    catalog.stop();
}

#[tokio::test]
async fn test_chain_with_random_draws_stays_in_range() {
    let catalog = spawn_catalog(&["Cold", "Mild", "Hot"]).await;
    let synthesizer = spawn_tier(
        Tier::Synthesizer,
        fast_config_to(&catalog.base_url(), 1, 5, 1_000),
    )
    .await;
    let converter = spawn_tier(
        Tier::Converter,
        fast_config_to(&synthesizer.base_url(), 1, 5, 1_000),
    )
    .await;

    let records: Vec<ForecastRecord> = client()
        .get(converter.url("/weatherforecast"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(records.len(), 5);
    let allowed = CategorySet::from_iter(["Cold", "Mild", "Hot"]);
    for record in &records {
        assert!((-4..=130).contains(&record.temperature), "{}", record.temperature);
        assert!(allowed.contains(&record.summary));
    }

    converter.stop();
    synthesizer.stop();
    catalog.stop();
}

#[tokio::test]
async fn test_record_wire_shape() {
    let catalog = spawn_catalog(&["Cold"]).await;
    let synthesizer = spawn_seeded_synthesizer(&catalog).await;

    let body: Value = client()
        .get(synthesizer.url("/weatherforecast"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let first = &body[0];
    assert!(first["date"].is_string());
    assert_eq!(first["temperature"], 10);
    assert_eq!(first["summary"], "Cold");

    synthesizer.stop();
    catalog.stop();
}

#[tokio::test]
async fn test_empty_category_set_surfaces_at_the_front() {
    let config = fast_config(0, 5, 1_000);
    let registry = Arc::new(BreakerRegistry::new(config.outbound_policy(Tier::Catalog).breaker));
    let app = catalog_app(Arc::new(StaticCatalog::new(CategorySet::default())), registry);
    let catalog = spawn_app(Tier::Catalog, config, app).await;
    let synthesizer = spawn_tier(
        Tier::Synthesizer,
        fast_config_to(&catalog.base_url(), 1, 5, 1_000),
    )
    .await;
    let converter = spawn_tier(
        Tier::Converter,
        fast_config_to(&synthesizer.base_url(), 1, 5, 1_000),
    )
    .await;
    let client = client();

    let res = client.get(catalog.url("/weatherforecast")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Vec<String>>().await.unwrap(), Vec::<String>::new());

    for tier in [&synthesizer, &converter] {
        let res = client.get(tier.url("/weatherforecast")).send().await.unwrap();
        assert_eq!(res.status(), 500);
        let body: ErrorBody = res.json().await.unwrap();
        assert_eq!(body.kind, FailureKind::EmptyCategorySet);
    }

    converter.stop();
    synthesizer.stop();
    catalog.stop();
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let catalog = spawn_catalog(&["Cold"]).await;
    let client = client();

    let res = client.get(catalog.url("/weatherforecast")).send().await.unwrap();
    let generated = res.headers().get(X_REQUEST_ID).expect("request id");
    assert_eq!(generated.to_str().unwrap().len(), 36);

    let res = client
        .get(catalog.url("/weatherforecast"))
        .header(X_REQUEST_ID, "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get(X_REQUEST_ID).unwrap(), "trace-me");

    catalog.stop();
}

#[tokio::test]
async fn test_admin_surface() {
    let catalog = spawn_catalog(&["Cold"]).await;
    let synthesizer = spawn_seeded_synthesizer(&catalog).await;
    let client = client();

    let health: Value = client.get(synthesizer.url("/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["tier"], "synthesizer");

    client.get(synthesizer.url("/weatherforecast")).send().await.unwrap();

    let status: Value = client.get(synthesizer.url("/admin/status")).send().await.unwrap().json().await.unwrap();
    assert_eq!(status["tier"], "synthesizer");
    assert_eq!(status["version"], env!("CARGO_PKG_VERSION"));

    let breakers: Value = client.get(synthesizer.url("/admin/breakers")).send().await.unwrap().json().await.unwrap();
    let breakers = breakers.as_array().unwrap();
    assert_eq!(breakers.len(), 1);
    assert_eq!(breakers[0]["caller"], "synthesizer");
    assert_eq!(breakers[0]["state"], "closed");
    assert_eq!(breakers[0]["consecutive_failures"], 0);

    synthesizer.stop();
    catalog.stop();
}
