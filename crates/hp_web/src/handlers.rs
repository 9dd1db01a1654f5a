use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use hp_core::{format_currency, HouseInput, Neighborhood, NUMERIC_FIELDS};

use crate::error::ApiResult;
use crate::{page, AppState};

pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(page::render(&state.registry))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "models": state.registry.names(),
        "default_model": state.registry.default_name(),
    }))
}

pub async fn schema(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    let neighborhoods: Vec<&str> = Neighborhood::ALL.iter().map(|n| n.as_str()).collect();
    Json(json!({
        "fields": NUMERIC_FIELDS,
        "neighborhoods": neighborhoods,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Defaults to the registry's default model
    pub model: Option<String>,
    #[serde(default)]
    pub input: HouseInput,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub model: String,
    pub estimate: f64,
    pub formatted: String,
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    request.input.validate()?;
    let name = request
        .model
        .unwrap_or_else(|| state.registry.default_name().to_string());
    let predictor = state.registry.get(&name)?;
    let record = request.input.to_record();
    let estimate = predictor.predict(&record).await?;
    let formatted = format_currency(estimate);
    tracing::info!("💰 {} estimated {}", name, formatted);
    Ok(Json(PredictResponse {
        model: name,
        estimate,
        formatted,
    }))
}
