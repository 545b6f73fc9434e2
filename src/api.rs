use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::agents::{AssistantConfig, FinanceAssistantFactory};
use crate::analysis::{analysis_options, build_prompt, AnalysisRequest, AnalysisResponse};
use crate::config::{AppConfig, CorsConfig};
use crate::constants::messages;
use crate::error::{ApiError, ConfigError};
use crate::services::AnalysisDispatcher;

pub struct AppState {
    pub dispatcher: AnalysisDispatcher,
}

impl AppState {
    pub fn new(dispatcher: AnalysisDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Production wiring: OpenAI-backed assistants built per request.
    pub fn from_config(config: &AppConfig) -> Self {
        let factory = FinanceAssistantFactory::new(AssistantConfig::from(config));
        let dispatcher = AnalysisDispatcher::new(Arc::new(factory))
            .with_policy(config.llm.stream_error_policy)
            .with_timeout(config.llm.request_timeout());
        Self::new(dispatcher)
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze-stock", post(analyze_stock))
        .route("/health", get(health_check))
        .route("/analysis-types", get(list_analysis_types))
        .with_state(state)
}

/// Build the CORS layer from the allow-list. `"*"` with credentials is refused.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let origin = if config.allows_any_origin() {
        if config.allow_credentials {
            return Err(ConfigError::Invalid(
                "cors.allow_credentials cannot be combined with the \"*\" origin".into(),
            ));
        }
        AllowOrigin::any()
    } else {
        let origins = config
            .origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .map_err(|_| ConfigError::Invalid(format!("invalid CORS origin: {}", o)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials))
}

pub async fn run_server(app: Router, bind_addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("API Server listening on {}", bind_addr);
    axum::serve(listener, app).await
}

async fn analyze_stock(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("🚫 Rejected analysis request: {}", rejection.body_text());
        ApiError::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    })?;

    let request_id = Uuid::new_v4();
    let span = info_span!(
        "analyze_stock",
        %request_id,
        symbol = %request.stock_symbol,
        analysis_type = %request.analysis_type
    );

    async move {
        let prompt = build_prompt(&request.stock_symbol, request.analysis_type);

        match state.dispatcher.dispatch(&prompt).await {
            Ok(analysis) => {
                info!("📈 Analysis ready for {}", request.stock_symbol);
                Ok(Json(AnalysisResponse {
                    stock_symbol: request.stock_symbol,
                    analysis,
                }))
            }
            Err(e) => {
                error!("❌ Error in analyze_stock: {}", e);
                Err(ApiError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": messages::HEALTHY }))
}

async fn list_analysis_types() -> Json<Value> {
    Json(json!({ "analysis_types": analysis_options() }))
}
