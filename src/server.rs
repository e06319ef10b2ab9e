//! Minimal HTTP hand-off to the isochrone engine. The framing here is
//! intentionally thin: it demonstrates the request/response shape
//! rather than fixing a wire contract callers must match exactly.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::RequestError;
use crate::{Engine, SearchParams};

/// Bounding box an origin must fall inside. Optional: a deployment with
/// no natural service area can leave `supported_area` unset.
#[derive(Clone, Copy, Debug)]
pub struct SupportedArea {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl SupportedArea {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub supported_area: Option<SupportedArea>,
    request_counter: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, supported_area: Option<SupportedArea>) -> Self {
        Self {
            engine,
            supported_area,
            request_counter: Arc::new(AtomicU64::new(0)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/isochrone", post(isochrone))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wire shape of one search request. Times are plain `i64` on the wire
/// so out-of-range values can be rejected as `RequestError` rather than
/// silently wrapping.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsochroneRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_t_start")]
    pub t_start: i64,
    #[serde(default = "default_budget")]
    pub budget: i64,
    #[serde(default = "default_transfer_penalty")]
    pub transfer_penalty: i64,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub collect_samples: bool,
}

fn default_t_start() -> i64 {
    28_800
}
fn default_budget() -> i64 {
    3_600
}
fn default_transfer_penalty() -> i64 {
    60
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsochroneResponse {
    pub edge_times: std::collections::HashMap<String, i64>,
    pub request_id: String,
    pub truncated: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IsochroneRequest {
    fn into_params(self) -> Result<SearchParams, RequestError> {
        if self.budget < 0 {
            return Err(RequestError::InvalidBudget(self.budget));
        }
        if self.t_start < 0 {
            return Err(RequestError::InvalidTStart(self.t_start));
        }
        if self.transfer_penalty < 0 {
            return Err(RequestError::InvalidTransferPenalty(self.transfer_penalty));
        }

        let date = self.date.unwrap_or_else(|| chrono::Local::now().date_naive());

        let mut params = SearchParams::new(self.latitude, self.longitude, date);
        params.t_start = self.t_start as u32;
        params.budget = self.budget as u32;
        params.transfer_penalty = self.transfer_penalty as u32;
        params.collect_samples = self.collect_samples;
        Ok(params)
    }
}

async fn isochrone(
    State(state): State<AppState>,
    Json(req): Json<IsochroneRequest>,
) -> Result<Json<IsochroneResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Some(area) = state.supported_area {
        if !area.contains(req.latitude, req.longitude) {
            let err = RequestError::OutOfArea {
                lat: req.latitude,
                lon: req.longitude,
            };
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ));
        }
    }

    let params = req.into_params().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let request_id = state.request_counter.fetch_add(1, Ordering::Relaxed);
    info!(
        request_id,
        lat = params.origin_lat,
        lon = params.origin_lon,
        "running isochrone search"
    );

    let outcome = state.engine.query(&params);

    Ok(Json(IsochroneResponse {
        edge_times: outcome.result.edge_times,
        request_id: format!("req-{request_id}"),
        truncated: outcome.truncated,
    }))
}
