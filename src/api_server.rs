// Axum API Server Module
//
// Purpose: HTTP rendition of the presentation shell. Fetches creatures from
// the data source and returns render-ready cards. Nothing is cached.

#[cfg(feature = "api")]
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use crate::config::CalcConfig;

#[cfg(feature = "api")]
use crate::error::CalcError;

#[cfg(feature = "api")]
use crate::record::CreatureRecord;

#[cfg(feature = "api")]
use crate::rules::{Assessment, Rule, RuleChain};

#[cfg(feature = "api")]
use crate::shell::{CreatureCard, IdPicker, RandomIdPicker};

#[cfg(feature = "api")]
use crate::source::{CreatureSource, PokeApiSource};

#[cfg(feature = "api")]
use crate::utils::{format_grouped, to_novelty_units};

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn CreatureSource>,
    pub chain: Arc<RuleChain>,
    pub config: Arc<CalcConfig>,
}

#[cfg(feature = "api")]
impl AppState {
    /// State backed by the live PokeAPI source.
    pub fn new(config: CalcConfig, chain: RuleChain) -> Result<Self, CalcError> {
        tracing::info!("Initializing PokeAPI source at {}", config.api_base_url);
        let source = PokeApiSource::new(&config)?;
        Ok(Self::with_source(config, chain, Arc::new(source)))
    }

    pub fn with_source(
        config: CalcConfig,
        chain: RuleChain,
        source: Arc<dyn CreatureSource>,
    ) -> Self {
        Self {
            source,
            chain: Arc::new(chain),
            config: Arc::new(config),
        }
    }

    async fn card_for(&self, id: u32) -> Result<CreatureCard, AppError> {
        let profile = self.source.fetch(id).await?;
        Ok(CreatureCard::build(&profile, &self.chain, self.config.cracker_weight_g)?)
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Creature cards
        // IMPORTANT: random route must come before :id route
        .route("/api/creatures/random", get(random_creature))
        .route("/api/creatures/:id", get(get_creature))

        // Offline assessment of a caller-supplied record
        .route("/api/assess", post(assess_record))
        .route("/api/rules", get(list_rules))

        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn random_creature(State(state): State<AppState>) -> Result<Json<CreatureCard>, AppError> {
    let id = RandomIdPicker::thread().pick(state.config.max_creature_id);
    tracing::debug!(id, "picked random creature");
    Ok(Json(state.card_for(id).await?))
}

#[cfg(feature = "api")]
async fn get_creature(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<CreatureCard>, AppError> {
    Ok(Json(state.card_for(id).await?))
}

#[cfg(feature = "api")]
#[derive(serde::Serialize)]
struct AssessResponse {
    crackers: f64,
    crackers_display: String,
    assessment: Assessment,
}

#[cfg(feature = "api")]
async fn assess_record(
    State(state): State<AppState>,
    Json(record): Json<CreatureRecord>,
) -> Result<Json<AssessResponse>, AppError> {
    let crackers = to_novelty_units(record.mass_hg, state.config.cracker_weight_g)?;
    let assessment = state.chain.assess(&record)?;
    Ok(Json(AssessResponse {
        crackers,
        crackers_display: format_grouped(crackers),
        assessment,
    }))
}

#[cfg(feature = "api")]
async fn list_rules(State(state): State<AppState>) -> Json<Vec<Rule>> {
    Json(state.chain.rules().to_vec())
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
struct AppError(CalcError);

#[cfg(feature = "api")]
impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        AppError(err)
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            CalcError::NotFound(_) => StatusCode::NOT_FOUND,
            CalcError::MalformedRecord(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CalcError::DataUnavailable(_) => StatusCode::BAD_GATEWAY,
            CalcError::InvalidConfiguration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(error = %self.0, %status, "request failed");

        let body = Json(serde_json::json!({
            "error": self.0.to_string(),
            "message": self.0.user_message(),
        }));

        (status, body).into_response()
    }
}
