//! HTTP API Layer
//!
//! This crate provides the REST API for the claims service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claim processing, document download, skills, health
//! - **Middleware**: request ids, tracing, audit logging, body limits
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::ApiConfig};
//!
//! let state = AppState::from_config(ApiConfig::from_env()?)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use domain_claims::{
    ClaimOrchestrator, Classifier, ClassifierKind, KeywordMockClassifier, Notifier,
    RandomMockClassifier,
};
use domain_policy::PolicyTable;
use infra_adapters::{CompositeNotifier, EmailNotifier, HttpVisionClassifier, PdfDocumentStore, SlackNotifier};

use crate::config::ApiConfig;
use crate::error::StartupError;
use crate::handlers::{claims, health, tools};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub orchestrator: ClaimOrchestrator,
    pub documents: Arc<PdfDocumentStore>,
}

impl AppState {
    /// Wires the policy table, classifier, document store and notifiers
    /// selected by the configuration
    ///
    /// # Errors
    ///
    /// Fails when the policy table cannot be loaded, the `model`
    /// classifier has no endpoint, or an HTTP client cannot be built.
    pub fn from_config(config: ApiConfig) -> Result<Self, StartupError> {
        let policies = match &config.policy_table_path {
            Some(path) => PolicyTable::from_file(path)?,
            None => PolicyTable::builtin(),
        }
        .with_matching(config.coverage_match);

        let classifier = build_classifier(&config)?;
        let documents = Arc::new(PdfDocumentStore::new(config.output_dir.clone()));

        let mut orchestrator = ClaimOrchestrator::new(Arc::new(policies), classifier)
            .with_document_store(documents.clone())
            .with_notification_timeout(config.notification_timeout());

        if config.notifications_enabled {
            let notifier = CompositeNotifier::new()
                .with(Arc::new(SlackNotifier::new(
                    config.slack_webhook_url.clone(),
                    config.notification_timeout(),
                )?))
                .with(Arc::new(EmailNotifier::new()));
            orchestrator = orchestrator.with_notifier(Arc::new(notifier) as Arc<dyn Notifier>);
        }

        info!(
            classifier = %config.classifier,
            coverage_match = ?config.coverage_match,
            notifications = config.notifications_enabled,
            "Claim pipeline configured"
        );

        Ok(Self {
            config: Arc::new(config),
            orchestrator,
            documents,
        })
    }
}

fn build_classifier(config: &ApiConfig) -> Result<Arc<dyn Classifier>, StartupError> {
    let classifier: Arc<dyn Classifier> = match config.classifier {
        ClassifierKind::RandomMock => Arc::new(RandomMockClassifier::new()),
        ClassifierKind::KeywordMock => Arc::new(KeywordMockClassifier::new()),
        ClassifierKind::RealModel => {
            let url = config.vision_model_url.clone().ok_or_else(|| {
                StartupError::Config("API_VISION_MODEL_URL is required for the model classifier".to_string())
            })?;
            Arc::new(HttpVisionClassifier::new(url, config.vision_timeout())?)
        }
    };
    Ok(classifier)
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Wired application state
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let max_body = state.config.max_upload_bytes;

    // Public routes
    let public_routes = Router::new()
        .route("/", get(health::keep_alive))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/process", post(claims::process_claim))
        .route("/:claim_id/pdf", get(claims::download_document));

    // Skill routes, one agent step each
    let tool_routes = Router::new()
        .route("/analyze-image", post(tools::analyze_image))
        .route("/calculate-payout", post(tools::calculate_payout))
        .route("/generate-pdf", post(tools::generate_pdf));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/claims", claims_routes)
        .nest("/tools", tool_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
