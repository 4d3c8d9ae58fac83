use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use fud_court::routers::{
    get_history_day, get_status, get_weights, health_check, put_weights, score_market,
};
use fud_court::*;

fn sample_input() -> MarketAnalysisInput {
    MarketAnalysisInput {
        total_market_cap: 2.4e12,
        max_historical_market_cap: 3e12,
        total_volume_24h: 9e10,
        avg_30_day_volume: 6e10,
        btc_dominance: 40.0,
        altcoin_market_cap: 1.44e12,
        btc_market_cap: 9.6e11,
        fear_and_greed_index: 78.0,
        top_coins: vec![
            TopCoin {
                price_change_percentage_24h: Some(3.0),
                ath: 100.0,
                current_price: 90.0,
            },
            TopCoin {
                price_change_percentage_24h: Some(1.5),
                ath: 10.0,
                current_price: 10.0,
            },
        ],
    }
}

fn snapshot(date: NaiveDate, macro_score: u8) -> DailySnapshot {
    DailySnapshot {
        date,
        macro_score,
        market_cap_score: 50,
        volume_score: 50,
        btc_dominance_score: 50,
        fear_and_greed_score: 50,
        altseason_score: 50,
        market_breadth_score: 50,
        ath_score: 50,
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn state() -> AppState {
    AppState::from_config(&AppConfig::default()).unwrap()
}

#[tokio::test]
async fn test_snapshot_holder() {
    let holder = SnapshotHolder::new(10);

    holder.record(snapshot(day(1), 40)).await.unwrap();
    assert_eq!(holder.len().await.unwrap(), 1);

    // Same day replaces the row
    holder.record(snapshot(day(1), 55)).await.unwrap();
    assert_eq!(holder.len().await.unwrap(), 1);
    assert_eq!(holder.get_day(day(1)).await.unwrap().macro_score, 55);

    holder.record(snapshot(day(2), 60)).await.unwrap();
    assert_eq!(holder.latest().await.unwrap().map(|s| s.macro_score), Some(60));

    assert!(matches!(
        holder.get_day(day(9)).await,
        Err(FudCourtError::SnapshotNotFound(_))
    ));

    holder.clear().await.unwrap();
    assert_eq!(holder.len().await.unwrap(), 0);
    assert_eq!(holder.latest().await.unwrap(), None);
}

#[tokio::test]
async fn test_snapshot_history_is_bounded() {
    let holder = SnapshotHolder::new(3);

    // Inserted out of order
    for d in [4, 1, 5, 2, 3] {
        holder.record(snapshot(day(d), d as u8)).await.unwrap();
    }

    let dates: Vec<NaiveDate> = holder.get().await.unwrap().iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![day(3), day(4), day(5)]);
}

#[test]
fn test_snapshot_from_output_keeps_all_components() {
    let output = analyze_market(&sample_input(), &ScoreWeights::default()).unwrap();
    let row = DailySnapshot::from_output(day(19), &output);

    assert_eq!(row.macro_score, output.macro_score);
    assert_eq!(row.market_cap_score, 80);
    assert_eq!(row.volume_score, 100);
    assert_eq!(row.btc_dominance_score, 60);
    assert_eq!(row.fear_and_greed_score, 78);
    assert_eq!(row.altseason_score, 100);
    assert_eq!(row.market_breadth_score, 100);
    assert_eq!(row.ath_score, 95);
}

#[test]
fn test_config_validation() {
    let mut config = AppConfig::default();
    assert!(config.validate().is_ok());

    config.top_coins_limit = 0;
    assert!(config.validate().is_err());
    config.top_coins_limit = 2000;
    assert!(config.validate().is_err());
    config.top_coins_limit = 100;

    config.max_concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.max_concurrent_requests = 100;
    assert!(config.validate().is_err());
    config.max_concurrent_requests = 4;

    config.request_timeout_secs = 0;
    assert!(config.validate().is_err());
    config.request_timeout_secs = 10;

    config.snapshot_history_days = 0;
    assert!(config.validate().is_err());
    config.snapshot_history_days = 30;

    config.historical_max_market_cap_usd = Some(-1.0);
    assert!(config.validate().is_err());
    config.historical_max_market_cap_usd = Some(3.7e12);
    assert!(config.validate().is_ok());

    config.vs_currency = " ".to_string();
    assert!(config.validate().is_err());
    config.vs_currency = "usd".to_string();

    config.weights.market_cap = 0.9;
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_analysis_service_scores_input() {
    let state = state();

    let output = state.analysis.analyze_input(&sample_input()).await.unwrap();
    assert_eq!(output.macro_score, 85);
    assert_eq!(output.interpretation, Interpretation::Bullish);

    // Scoring caller input never records a snapshot
    assert_eq!(state.analysis.snapshots().len().await.unwrap(), 0);

    state.analysis.record(day(19), &output).await.unwrap();
    assert_eq!(state.analysis.snapshots().len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_weights_can_be_replaced() {
    let state = state();

    let mut invalid = ScoreWeights::default();
    invalid.altseason = 0.7;
    assert!(state.analysis.set_weights(invalid).await.is_err());
    assert_eq!(state.analysis.weights().await, ScoreWeights::default());

    let only_sentiment = ScoreWeights {
        market_cap: 0.0,
        volume: 0.0,
        btc_dominance: 0.0,
        fear_and_greed: 1.0,
        altseason: 0.0,
        market_breadth: 0.0,
        ath: 0.0,
    };
    state.analysis.set_weights(only_sentiment).await.unwrap();

    let output = state.analysis.analyze_input(&sample_input()).await.unwrap();
    assert_eq!(output.macro_score, 78);
}

#[tokio::test]
async fn test_handlers() {
    let state = state();

    let health = health_check().await;
    assert_eq!(health.status, "healthy");

    let Json(output) = score_market(State(state.clone()), Json(sample_input())).await.unwrap();
    assert_eq!(output.interpretation, Interpretation::Bullish);

    let mut bad = sample_input();
    bad.avg_30_day_volume = 0.0;
    let err = score_market(State(state.clone()), Json(bad)).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.error_type(), "invalid_input");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

    let err = get_history_day(State(state.clone()), Path(day(1))).await.unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let Json(status) = get_status(State(state.clone())).await.unwrap();
    assert_eq!(status.status, "ready");
    assert_eq!(status.recorded_snapshots, 0);
    assert!(status.latest_snapshot.is_none());
}

#[test]
fn test_weights_handlers() {
    tokio_test::block_on(async {
        let state = state();

        let mut weights = ScoreWeights::default();
        weights.market_cap = 0.25;
        weights.volume = 0.05;

        let Json(saved) = put_weights(State(state.clone()), Json(weights)).await.unwrap();
        assert_eq!(saved, weights);

        let Json(active) = get_weights(State(state.clone())).await;
        assert_eq!(active, weights);

        weights.ath = 0.5;
        let err = put_weights(State(state.clone()), Json(weights)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    });
}

#[test]
fn test_upstream_errors_map_to_insufficient_data() {
    let err = FudCourtError::InsufficientData("unavailable sources: CoinGecko global".to_string());
    assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err.error_type(), "insufficient_data");

    let err = FudCourtError::ApiError("CoinGecko global error: 429".to_string());
    assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
}
