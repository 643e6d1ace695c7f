//! Route definitions for the Tilt API.
//!
//! Provides HTTP endpoints for observation intake, related-content lookup,
//! direct classification, and health checks.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tilt_engine::{
    CandidatePost, Classifier, ContentSearch, Leaning, Observation, ObservationIntake,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<ObservationIntake>,
    pub classifier: Arc<dyn Classifier>,
    pub search: Arc<dyn ContentSearch>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Observed post submitted by a client.
#[derive(Debug, Deserialize)]
pub struct ObservationRequest {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub bias_label: String,
    #[serde(default)]
    pub subreddit: Option<String>,
}

/// One recommended post.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendedPost {
    pub title: String,
    pub url: String,
    pub leaning: Leaning,
    pub upvotes: i64,
    pub comments: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
}

impl From<CandidatePost> for RecommendedPost {
    fn from(post: CandidatePost) -> Self {
        Self {
            title: post.title,
            url: post.url,
            leaning: post.leaning,
            upvotes: post.upvotes,
            comments: post.comments,
            subreddit: post.subreddit,
        }
    }
}

/// Response for a triggered counter recommendation.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub user_id: String,
    pub bias: Leaning,
    pub recommendations: Vec<RecommendedPost>,
}

/// Response for a related-content lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelatedResponse {
    pub related_posts: Vec<RecommendedPost>,
}

/// Classification request body.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// Batch classification request body.
#[derive(Debug, Deserialize)]
pub struct ClassifyBatchRequest {
    pub texts: Vec<String>,
}

/// Classification result.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub label: Leaning,
    pub confidence: f64,
}

/// Batch classification results, in input order.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyBatchResponse {
    pub results: Vec<ClassifyResponse>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub search_connected: bool,
    pub service: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: &tilt_common::Error) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().into(),
        }),
    )
}

fn invalid_input(message: &str) -> ApiError {
    error_response(&tilt_common::Error::InvalidInput(message.into()))
}

fn parse_observation(request: ObservationRequest) -> Result<Observation, ApiError> {
    if request.user_id.trim().is_empty() {
        return Err(invalid_input("user_id is required"));
    }
    if request.title.trim().is_empty() {
        return Err(invalid_input("title is required"));
    }
    let label: Leaning = request
        .bias_label
        .parse()
        .map_err(|e: tilt_common::Error| error_response(&e))?;

    Ok(Observation {
        user_id: request.user_id,
        title: request.title,
        body: request.body,
        label,
        subreddit: request.subreddit,
    })
}

/// Build all API routes.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/recommend", post(recommend_handler))
        .route("/api/related", post(related_handler))
        .route("/classify", post(classify_handler))
        .route("/classify_batch", post(classify_batch_handler))
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// Record an observation and return counter recommendations when the bias
/// threshold trips. A non-triggering observation yields 204 No Content.
async fn recommend_handler(
    State(state): State<AppState>,
    Json(request): Json<ObservationRequest>,
) -> Result<Response, ApiError> {
    let observation = parse_observation(request)?;
    let user_id = observation.user_id.clone();

    let outcome = state
        .intake
        .process(observation)
        .await
        .map_err(|e| error_response(&e))?;

    match outcome.bias {
        Some(bias) => {
            let response = RecommendResponse {
                user_id,
                bias,
                recommendations: outcome
                    .recommendations
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            };
            Ok((StatusCode::OK, Json(response)).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Return a balanced related-content set for a post without touching the
/// bias counters.
async fn related_handler(
    State(state): State<AppState>,
    Json(request): Json<ObservationRequest>,
) -> Result<Json<RelatedResponse>, ApiError> {
    let observation = parse_observation(request)?;

    let recommendations = state
        .intake
        .related(observation)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(RelatedResponse {
        related_posts: recommendations.into_iter().map(Into::into).collect(),
    }))
}

/// Classify a single text.
async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let classification = state.classifier.classify(&request.text).await.map_err(|e| {
        tracing::error!(error = %e, "Classification failed");
        error_response(&tilt_common::Error::Dependency(format!(
            "classifier unavailable: {e}"
        )))
    })?;

    Ok(Json(ClassifyResponse {
        label: classification.label,
        confidence: classification.confidence,
    }))
}

/// Classify a batch of texts, preserving input order.
async fn classify_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassifyBatchRequest>,
) -> Result<Json<ClassifyBatchResponse>, ApiError> {
    if request.texts.is_empty() {
        return Err(invalid_input("texts must not be empty"));
    }

    let classifications = state
        .classifier
        .classify_batch(&request.texts)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Batch classification failed");
            error_response(&tilt_common::Error::Dependency(format!(
                "classifier unavailable: {e}"
            )))
        })?;

    Ok(Json(ClassifyBatchResponse {
        results: classifications
            .into_iter()
            .map(|c| ClassifyResponse {
                label: c.label,
                confidence: c.confidence,
            })
            .collect(),
    }))
}

/// Health check reporting downstream capability reachability.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.classifier.health().await;
    let search_connected = state.search.health().await;
    let status = if model_loaded && search_connected {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.into(),
        model_loaded,
        search_connected,
        service: "tilt-api".into(),
    })
}
