use chrono::NaiveDate;
use serie_core::{
    AlignedTable, Column, DEFAULT_RISK_FREE_PCT, Frequency, MetricsOutcome, SerieError,
    column_metrics, compute_metrics, period_returns,
};

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

#[test]
fn two_point_rise() {
    let out = compute_metrics(
        "AAPL",
        &dates(2),
        &[100.0, 110.0],
        Frequency::Daily,
        DEFAULT_RISK_FREE_PCT,
    );
    let r = out.record().unwrap();
    assert_eq!(r.observations, 2);
    assert_eq!(r.last_price, 110.0);
    assert!((r.total_return_pct.unwrap() - 10.0).abs() < 1e-9);
    assert_eq!(r.max_drawdown_pct, 0.0);
    // a single return has no sample deviation
    assert_eq!(r.volatility_pct, None);
    assert_eq!(r.sharpe, None);
}

#[test]
fn single_observation_is_degenerate() {
    let out = compute_metrics("X", &dates(1), &[42.0], Frequency::Daily, 2.0);
    assert_eq!(
        out,
        MetricsOutcome::Degenerate {
            symbol: "X".into(),
            observations: 1
        }
    );
    let err = out.into_result().unwrap_err();
    assert!(matches!(err, SerieError::Degenerate { observations: 1, .. }));
}

#[test]
fn volatility_annualizes_by_frequency() {
    let prices = [100.0, 102.0, 99.0, 101.0, 103.0];
    let d = dates(prices.len());
    let daily = compute_metrics("X", &d, &prices, Frequency::Daily, 2.0);
    let monthly = compute_metrics("X", &d, &prices, Frequency::Monthly, 2.0);
    let vd = daily.record().unwrap().volatility_pct.unwrap();
    let vm = monthly.record().unwrap().volatility_pct.unwrap();
    assert!((vd / vm - (252.0_f64 / 12.0).sqrt()).abs() < 1e-9);
}

#[test]
fn sharpe_uses_cagr_minus_risk_free_over_volatility() {
    let prices = [100.0, 105.0, 103.0, 108.0];
    let d = dates(prices.len());
    let r = compute_metrics("X", &d, &prices, Frequency::Daily, 2.0)
        .into_result()
        .unwrap();
    let expected = (r.cagr_pct.unwrap() - 2.0) / r.volatility_pct.unwrap();
    assert!((r.sharpe.unwrap() - expected).abs() < 1e-12);
}

#[test]
fn computation_is_idempotent() {
    let prices = [10.0, 9.0, 11.0, 12.5, 8.0];
    let d = dates(prices.len());
    let a = compute_metrics("X", &d, &prices, Frequency::Weekly, 2.0);
    let b = compute_metrics("X", &d, &prices, Frequency::Weekly, 2.0);
    assert_eq!(a, b);
    assert!((a.record().unwrap().max_drawdown_pct - -36.0).abs() < 1e-9);
}

#[test]
fn table_metrics_follow_column_order() {
    let table = AlignedTable::try_new(
        dates(3),
        vec![
            Column {
                name: "B".into(),
                values: vec![1.0, 2.0, 3.0],
            },
            Column {
                name: "A".into(),
                values: vec![3.0, 2.0, 1.0],
            },
        ],
    )
    .unwrap();
    let out = column_metrics(&table, Frequency::Daily, 2.0);
    let names: Vec<&str> = out.iter().map(MetricsOutcome::symbol).collect();
    assert_eq!(names, ["B", "A"]);
    assert!(out[1].record().unwrap().max_drawdown_pct < 0.0);
}

#[test]
fn returns_are_simple_percent_changes() {
    let r = period_returns(&[100.0, 110.0, 99.0]);
    assert!((r[0] - 0.1).abs() < 1e-12);
    assert!((r[1] - -0.1).abs() < 1e-12);
}
