//! Tilt API - HTTP surface for the counter-recommendation engine.
//!
//! Wires the engine to its external capabilities:
//! - Leaning classification via the model server ([`ModelClassifier`])
//! - Keyword extraction via the keyword server ([`KeywordService`])
//! - Candidate search via Reddit's public listing API ([`RedditSearch`])
//! - Durable activity logging in SQLite ([`store::ActivityStore`])
//!
//! ## Architecture
//!
//! ```text
//! Client → API (validate → record → count) → threshold? → search + classify
//!                                                              ↓
//!                                                  counter recommendations
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod provider;
pub mod routes;
pub mod store;

pub use provider::{KeywordService, ModelClassifier, RedditSearch};
pub use routes::AppState;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tilt_common::config::Config;
use tilt_engine::{
    ActivityRecorder, BiasTracker, Classifier, ContentSearch, CounterSelector, KeywordExtractor,
    ObservationIntake,
};
use tower_http::cors::{Any, CorsLayer};

/// The pluggable capabilities behind the API. Production wiring comes from
/// [`build_capabilities`]; tests substitute mocks.
pub struct Capabilities {
    pub classifier: Arc<dyn Classifier>,
    pub keywords: Arc<dyn KeywordExtractor>,
    pub search: Arc<dyn ContentSearch>,
    pub recorder: Arc<dyn ActivityRecorder>,
}

/// Build the production capability set from configuration.
pub fn build_capabilities(config: &Config) -> anyhow::Result<Capabilities> {
    let db_path = config.service.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let timeout = config.providers.timeout_secs;
    Ok(Capabilities {
        classifier: Arc::new(ModelClassifier::new(&config.providers.model_url, timeout)),
        keywords: Arc::new(KeywordService::new(&config.providers.keywords_url, timeout)),
        search: Arc::new(RedditSearch::new(
            &config.providers.search_url,
            &config.providers.search_user_agent,
            timeout,
        )),
        recorder: Arc::new(store::ActivityStore::open(&db_path)?),
    })
}

/// Build the API router around an explicit capability set.
pub fn build_router_with(config: &Config, capabilities: Capabilities) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let selector = CounterSelector::new(
        capabilities.classifier.clone(),
        capabilities.keywords,
        capabilities.search.clone(),
        config.engine.candidate_limit,
    );
    let intake = ObservationIntake::new(
        BiasTracker::new(config.engine.bias_threshold),
        selector,
        capabilities.recorder,
    );

    let state = AppState {
        intake: Arc::new(intake),
        classifier: capabilities.classifier,
        search: capabilities.search,
    };

    routes::api_routes(state).layer(cors)
}

/// Build the API router with the production capabilities.
pub fn build_router(config: &Config) -> anyhow::Result<Router> {
    let capabilities = build_capabilities(config)?;
    Ok(build_router_with(config, capabilities))
}

/// Start the API server.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let addr = SocketAddr::from((
        config.network.bind.parse::<std::net::IpAddr>()?,
        config.service.port,
    ));

    let router = build_router(config)?;

    tracing::info!("Starting Tilt API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
