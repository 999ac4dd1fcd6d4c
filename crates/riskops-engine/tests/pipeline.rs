//! End-to-end pipeline tests over both storage backends.

use std::sync::Arc;

use chrono::NaiveDate;
use riskops_core::{RiskParams, Symbol};
use riskops_engine::{ingest, EngineError, RiskEngine, RiskRequest};
use riskops_storage::{InMemoryStorage, PortfolioRecord, Position, RedbStorage, StorageAdapter};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn run_pipeline(storage: Arc<dyn StorageAdapter>) -> RiskEngine {
    let engine = RiskEngine::new(storage);
    let symbols = Symbol::parse_list("AAPL,MSFT,GOOG");

    engine
        .create_portfolio(
            PortfolioRecord::new(
                "demo",
                vec![
                    Position::new(symbols[0].clone(), 0.5),
                    Position::new(symbols[1].clone(), 0.3),
                    Position::new(symbols[2].clone(), 0.2),
                ],
            )
            .with_description("three-stock demo"),
        )
        .unwrap();

    let prices = ingest::synthetic_prices(&symbols, date(2023, 1, 2), date(2024, 6, 28), 42).unwrap();
    engine.ingest_prices(&prices).unwrap();
    engine.process_returns(&symbols).unwrap();
    engine
}

#[test]
fn test_pipeline_in_memory() {
    let engine = run_pipeline(Arc::new(InMemoryStorage::new()));

    let report = engine.calculate(&RiskRequest::new("demo")).unwrap();
    assert_eq!(report.risk.observations, 252);
    assert_eq!(report.risk.as_of_date, date(2024, 6, 28));
    assert!(report.risk.metrics.var > 0.0);
    assert!(report.risk.metrics.cvar >= report.risk.metrics.var);

    let stats = engine.storage().stats().unwrap();
    assert_eq!(stats.portfolio_count, 1);
    assert_eq!(stats.risk_result_count, 1);
}

#[test]
fn test_pipeline_same_seed_same_risk() {
    let a = run_pipeline(Arc::new(InMemoryStorage::new()))
        .calculate(&RiskRequest::new("demo").with_persist(false))
        .unwrap();
    let b = run_pipeline(Arc::new(InMemoryStorage::new()))
        .calculate(&RiskRequest::new("demo").with_persist(false))
        .unwrap();
    assert_eq!(a.risk, b.risk);
}

#[test]
fn test_pipeline_lookback_window() {
    let engine = run_pipeline(Arc::new(InMemoryStorage::new()));
    let params = RiskParams::default().with_lookback_days(60).with_alpha(0.95);

    let report = engine
        .calculate(&RiskRequest::new("demo").with_params(params))
        .unwrap();
    assert_eq!(report.risk.observations, 60);
    assert_eq!(report.record.unwrap().alpha, 0.95);
}

#[test]
fn test_pipeline_redb_latest_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("riskops.redb");

    let stored = {
        let storage = Arc::new(RedbStorage::open(&path).unwrap());
        let engine = run_pipeline(storage);
        engine.calculate(&RiskRequest::new("demo")).unwrap();
        // created_at orders the history
        std::thread::sleep(std::time::Duration::from_millis(5));
        engine
            .calculate(&RiskRequest::new("demo").with_model_version("candidate-v2"))
            .unwrap()
            .record
            .unwrap()
    };

    let engine = RiskEngine::new(Arc::new(RedbStorage::open(&path).unwrap()));
    let latest = engine.latest("demo").unwrap().unwrap();
    assert_eq!(latest.id, stored.id);
    assert_eq!(latest.model_version, "candidate-v2");
    assert_eq!(engine.history("demo", 10).unwrap().len(), 2);
}

#[test]
fn test_portfolio_symbol_without_returns() {
    let engine = run_pipeline(Arc::new(InMemoryStorage::new()));
    engine
        .create_portfolio(PortfolioRecord::new(
            "ghost",
            vec![Position::new(Symbol::new("TSLA").unwrap(), 1.0)],
        ))
        .unwrap();

    // TSLA has no returns at all
    let err = engine.calculate(&RiskRequest::new("ghost")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn test_redb_rejects_non_finite_close() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RiskEngine::new(Arc::new(RedbStorage::open(dir.path().join("prices.redb")).unwrap()));
    let symbols = Symbol::parse_list("AAPL,MSFT");

    let csv = dir.path().join("prices.csv");
    std::fs::write(
        &csv,
        "symbol,date,close\nAAPL,2024-01-02,100\nAAPL,2024-01-03,101\nMSFT,2024-01-02,NaN\n",
    )
    .unwrap();
    let err = ingest::load_price_csv(&csv, &symbols).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(ref m) if m.contains("MSFT")));

    let good = ingest::read_price_csv(
        "symbol,date,close\nAAPL,2024-01-02,100\nAAPL,2024-01-03,101\n".as_bytes(),
        &symbols,
    )
    .unwrap();
    let mut bad = good.clone();
    bad.push(riskops_storage::PriceRecord {
        symbol: Symbol::new("MSFT").unwrap(),
        date: date(2024, 1, 2),
        close: f64::INFINITY,
        currency: None,
        source: "test".to_string(),
    });
    assert!(matches!(
        engine.ingest_prices(&bad),
        Err(EngineError::InvalidInput(_))
    ));

    // The store stays readable for every symbol
    assert_eq!(engine.ingest_prices(&good).unwrap(), 2);
    assert_eq!(engine.process_returns(&symbols).unwrap(), 1);
    assert!(engine.storage().get_prices(&symbols).unwrap().iter().all(|p| p.close.is_finite()));
}
