//! Analysis API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stock_analyzer::error::AppError;
use stock_analyzer::services::MarketSnapshot;
use stock_analyzer::types::{AnalysisReport, IndicatorSeries, LookbackPeriod};

use crate::AppState;

/// API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    pub ticker: String,
    pub period: LookbackPeriod,
    pub bars: usize,
    pub fetched_at: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    fn new(data: T, snapshot: &MarketSnapshot) -> Self {
        Self {
            data,
            meta: ApiMeta {
                ticker: snapshot.ticker.clone(),
                period: snapshot.period,
                bars: snapshot.bars.len(),
                fetched_at: snapshot.fetched_at,
            },
        }
    }
}

/// Query parameters shared by the analysis endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    /// Lookback such as "6mo" or "1y". Defaults to the configured period.
    pub period: Option<String>,
}

fn resolve_period(query: &AnalysisQuery, default: LookbackPeriod) -> Result<LookbackPeriod, AppError> {
    match query.period.as_deref() {
        None => Ok(default),
        Some(raw) => raw
            .parse::<LookbackPeriod>()
            .map_err(|_| AppError::BadRequest(format!("unknown period: {raw:?}"))),
    }
}

async fn load_snapshot(
    state: &AppState,
    ticker: &str,
    query: &AnalysisQuery,
) -> Result<std::sync::Arc<MarketSnapshot>, AppError> {
    let period = resolve_period(query, state.config.default_period)?;
    state.market_data.snapshot(ticker, period).await
}

/// Verdict, rationale, latest values and narrative for a ticker.
async fn get_analysis(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<ApiResponse<AnalysisReport>>, AppError> {
    let snapshot = load_snapshot(&state, &ticker, &query).await?;
    let report = state.market_data.analyze(&snapshot)?;
    Ok(Json(ApiResponse::new(report, &snapshot)))
}

/// The full enriched indicator table.
async fn get_indicators(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<ApiResponse<IndicatorSeries>>, AppError> {
    let snapshot = load_snapshot(&state, &ticker, &query).await?;
    let indicators = state.market_data.indicators(&snapshot)?;
    Ok(Json(ApiResponse::new(indicators, &snapshot)))
}

/// The narrative alone, as markdown.
async fn get_narrative(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load_snapshot(&state, &ticker, &query).await?;
    let report = state.market_data.analyze(&snapshot)?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        report.narrative,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:ticker", get(get_analysis))
        .route("/:ticker/indicators", get(get_indicators))
        .route("/:ticker/narrative", get(get_narrative))
}
