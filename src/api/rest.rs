// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Instrument symbols that contain `/`
// are addressed either URL-encoded (`XAU%2FUSD`) or with `-` in its place
// (`XAU-USD`).
//
// CORS is configured permissively; the dashboard is served from another
// origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::market_data::PriceQuote;
use crate::scoring::{score_stock, Benchmarks, ScoredStock, StockMetrics, WeightConfig};
use crate::types::{Instrument, Timeframe};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/instruments", get(instruments))
        .route("/api/v1/ohlc/:symbol", get(ohlc))
        .route("/api/v1/analysis/:symbol", get(analysis))
        .route("/api/v1/prediction-request/:symbol", get(prediction_request))
        .route(
            "/api/v1/live-price/:symbol",
            post(set_live_price).delete(clear_live_price),
        )
        .route("/api/v1/stocks/score", post(score_stocks))
        .layer(cors)
        .with_state(state)
}

/// Map a path segment onto a configured symbol.
fn resolve_symbol(state: &AppState, raw: &str) -> Result<String, ApiError> {
    if state.instrument(raw).is_some() {
        return Ok(raw.to_string());
    }
    let slashed = raw.replace('-', "/");
    if state.instrument(&slashed).is_some() {
        return Ok(slashed);
    }
    Err(api_error(
        StatusCode::NOT_FOUND,
        format!("unknown instrument: {raw}"),
    ))
}

fn no_data(symbol: &str) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        format!("no price data for {symbol}"),
    )
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
    uptime_secs: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    };
    Json(resp)
}

// =============================================================================
// Market data
// =============================================================================

#[derive(Serialize)]
struct InstrumentSummary {
    #[serde(flatten)]
    instrument: Instrument,
    quote: Option<PriceQuote>,
}

async fn instruments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summaries: Vec<InstrumentSummary> = state
        .instruments()
        .into_iter()
        .map(|instrument| {
            let live = state.live_price(&instrument.symbol).is_some();
            let quote = state
                .series(&instrument.symbol)
                .and_then(|bars| PriceQuote::from_bars(&instrument.symbol, &bars, live));
            InstrumentSummary { instrument, quote }
        })
        .collect();
    Json(summaries)
}

async fn ohlc(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = resolve_symbol(&state, &raw)?;
    let bars = state.series(&symbol).ok_or_else(|| no_data(&symbol))?;
    Ok(Json(bars))
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = resolve_symbol(&state, &raw)?;
    let report = state.analysis(&symbol).ok_or_else(|| no_data(&symbol))?;
    Ok(Json(report.as_ref().clone()))
}

#[derive(Deserialize)]
struct PredictionQuery {
    timeframe: Option<String>,
}

async fn prediction_request(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
    Query(query): Query<PredictionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = resolve_symbol(&state, &raw)?;
    let timeframe = match query.timeframe.as_deref() {
        Some(tf) => tf
            .parse::<Timeframe>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => Timeframe::default(),
    };
    let request = state
        .prediction_request(&symbol, timeframe)
        .ok_or_else(|| no_data(&symbol))?;
    Ok(Json(request))
}

// =============================================================================
// Live price override
// =============================================================================

#[derive(Deserialize)]
struct LivePriceBody {
    price: f64,
}

async fn set_live_price(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
    Json(body): Json<LivePriceBody>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = resolve_symbol(&state, &raw)?;
    state.set_live_price(&symbol, body.price).map_err(|e| {
        warn!(symbol = %symbol, error = %e, "live price rejected");
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    Ok(Json(serde_json::json!({
        "symbol": symbol,
        "price": body.price,
        "state_version": state.current_state_version(),
    })))
}

async fn clear_live_price(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = resolve_symbol(&state, &raw)?;
    let cleared = state.clear_live_price(&symbol);
    Ok(Json(serde_json::json!({
        "symbol": symbol,
        "cleared": cleared,
        "state_version": state.current_state_version(),
    })))
}

// =============================================================================
// Stock scoring
// =============================================================================

#[derive(Deserialize)]
struct ScoreRequest {
    stocks: Vec<StockMetrics>,
    #[serde(default)]
    weights: WeightConfig,
    #[serde(default)]
    benchmarks: Benchmarks,
}

async fn score_stocks(Json(req): Json<ScoreRequest>) -> impl IntoResponse {
    let scored: Vec<ScoredStock> = req
        .stocks
        .into_iter()
        .map(|s| score_stock(s, &req.weights, &req.benchmarks))
        .collect();
    info!(count = scored.len(), "stocks scored");
    Json(scored)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    use crate::market_data::StaticSource;
    use crate::runtime_config::RuntimeConfig;
    use crate::testing::bars_from_closes;

    fn app() -> (Arc<AppState>, Router) {
        let closes: Vec<f64> = (0..80).map(|i| 2600.0 + (i % 7) as f64).collect();
        let source = StaticSource::new().with_series("XAU/USD", bars_from_closes(&closes));
        let state = Arc::new(AppState::new(RuntimeConfig::default(), Box::new(source)));
        (Arc::clone(&state), router(state))
    }

    async fn call(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (_, app) = app();
        let (status, body) = call(app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["state_version"], 1);
    }

    #[tokio::test]
    async fn instruments_list_with_quotes() {
        let (_, app) = app();
        let (status, body) = call(app, Method::GET, "/api/v1/instruments", None).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0]["symbol"], "XAU/USD");
        assert!(list[0]["quote"]["price"].is_number());
        // No fixture for ANTAM.
        assert!(list[2]["quote"].is_null());
    }

    #[tokio::test]
    async fn symbol_aliases_resolve() {
        let (_, app) = app();
        let (status, body) = call(app.clone(), Method::GET, "/api/v1/ohlc/XAU-USD", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 80);

        let (status, _) = call(app.clone(), Method::GET, "/api/v1/ohlc/XAU%2FUSD", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(app, Method::GET, "/api/v1/ohlc/BTCUSDT", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("BTCUSDT"));
    }

    #[tokio::test]
    async fn analysis_endpoint() {
        let (_, app) = app();
        let (status, body) = call(app.clone(), Method::GET, "/api/v1/analysis/XAU-USD", None).await;
        assert_eq!(status, StatusCode::OK);
        let score = body["signal"]["score"].as_u64().unwrap();
        assert!(score <= 100);
        assert_eq!(body["recentPrices"].as_array().unwrap().len(), 30);
        assert_eq!(body["chart"].as_array().unwrap().len(), 60);
        assert!(body["indicators"]["macd"]["histogram"].is_number());

        let (status, _) = call(app, Method::GET, "/api/v1/analysis/ANTAM", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn prediction_request_timeframes() {
        let (_, app) = app();
        let (status, body) = call(
            app.clone(),
            Method::GET,
            "/api/v1/prediction-request/XAU-USD?timeframe=3M",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timeframe"], "3M");

        let (_, body) = call(app.clone(), Method::GET, "/api/v1/prediction-request/XAU-USD", None).await;
        assert_eq!(body["timeframe"], "1W");

        let (status, _) = call(
            app,
            Method::GET,
            "/api/v1/prediction-request/XAU-USD?timeframe=5Y",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn live_price_roundtrip() {
        let (state, app) = app();
        let (status, body) = call(
            app.clone(),
            Method::POST,
            "/api/v1/live-price/XAU-USD",
            Some(r#"{"price": 2750.5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "XAU/USD");
        assert_eq!(body["state_version"], 2);
        assert_eq!(state.live_price("XAU/USD"), Some(2750.5));

        let (_, body) = call(app.clone(), Method::GET, "/api/v1/analysis/XAU-USD", None).await;
        assert_eq!(body["quote"]["live"], true);
        assert!((body["quote"]["price"].as_f64().unwrap() - 2750.5).abs() < 1e-9);

        let (status, body) = call(app.clone(), Method::DELETE, "/api/v1/live-price/XAU-USD", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cleared"], true);
        assert!(state.live_price("XAU/USD").is_none());

        let (status, _) = call(
            app,
            Method::POST,
            "/api/v1/live-price/XAU-USD",
            Some(r#"{"price": -1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn score_stocks_with_default_weights() {
        let (_, app) = app();
        let body = r#"{
            "stocks": [{
                "ticker": "BBCA.JK", "price": 9875, "changePercent": 0.8,
                "volume": 45000000, "avgVolume": 50000000,
                "der": 0.3, "roe": 21.5, "pbv": 4.8, "pe": 26.2,
                "beta": 0.85, "volatility": 1.2
            }]
        }"#;
        let (status, json) = call(app, Method::POST, "/api/v1/stocks/score", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        let scored = &json.as_array().unwrap()[0];
        assert_eq!(scored["ticker"], "BBCA.JK");
        assert_eq!(scored["valuationLabel"], "Expensive");
        assert_eq!(scored["riskLevel"], "Low");
        assert!(scored["overallScore"].as_u64().unwrap() <= 100);
    }
}
