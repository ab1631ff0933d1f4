use serie::{AnalysisRequest, Frequency, MetricsOutcome, PriceField, Serie, SerieError};

use crate::helpers::mock_connector::MockConnector;
use crate::helpers::{AAPL, FUND_ISIN, MSFT, d, hist, jan_hist, sym};

fn january(symbols: &[&str]) -> AnalysisRequest {
    AnalysisRequest::new(symbols.iter().map(|s| sym(s)).collect())
        .period(d(2024, 1, 1), Some(d(2024, 1, 31)))
}

#[tokio::test]
async fn two_point_series_metrics() {
    let c = MockConnector::builder()
        .name("primary")
        .returns_history_for(vec![(AAPL, jan_hist(&[(2, 100.0), (3, 110.0)]))])
        .build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let report = serie
        .analyze_as_of(&january(&[AAPL]), d(2024, 2, 1))
        .await
        .unwrap();

    assert!(report.has_data());
    let m = report.metrics[0].record().unwrap();
    assert_eq!(format!("{:.2}", m.total_return_pct.unwrap()), "10.00");
    assert_eq!(format!("{:.2}", m.max_drawdown_pct), "0.00");
    assert!(report.correlation.is_none());
    let perf = &report.performance.column(AAPL).unwrap().values;
    assert_eq!(perf[0], 100.0);
    assert!((perf[1] - 110.0).abs() < 1e-9);
}

#[tokio::test]
async fn gaps_are_forward_filled_across_calendars() {
    // MSFT has no print on the 3rd
    let c = MockConnector::builder()
        .name("primary")
        .returns_history_for(vec![
            (AAPL, jan_hist(&[(2, 10.0), (3, 11.0), (4, 12.0)])),
            (MSFT, jan_hist(&[(2, 20.0), (4, 22.0)])),
        ])
        .build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let report = serie
        .analyze_as_of(&january(&[AAPL, MSFT]), d(2024, 2, 1))
        .await
        .unwrap();

    assert_eq!(report.table.index(), &[d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);
    assert_eq!(report.table.column(MSFT).unwrap().values, vec![20.0, 20.0, 22.0]);
    assert!(report.correlation.is_some());
    assert_eq!(report.metrics.len(), 2);
}

#[tokio::test]
async fn secondary_only_symbol_still_gets_metrics() {
    let primary = MockConnector::builder()
        .name("primary")
        .returns_history_for(vec![])
        .build();
    let funds = MockConnector::builder()
        .name("funds")
        .returns_history_for(vec![(
            FUND_ISIN,
            hist(&[(2, 50.0), (3, 49.0), (4, 51.0)], PriceField::Nav),
        )])
        .build();
    let serie = Serie::builder()
        .with_connector(primary)
        .with_connector(funds)
        .build()
        .unwrap();

    let report = serie
        .analyze_as_of(&january(&[FUND_ISIN]), d(2024, 2, 1))
        .await
        .unwrap();

    assert_eq!(report.resolutions[0].connector, "funds");
    let m = report.metrics[0].record().unwrap();
    assert_eq!(m.observations, 3);
    assert!(m.volatility_pct.is_some());
    assert!(m.max_drawdown_pct < 0.0);
}

#[tokio::test]
async fn single_observation_is_marked_degenerate() {
    let c = MockConnector::builder()
        .name("primary")
        .returns_history_for(vec![(AAPL, jan_hist(&[(2, 100.0)]))])
        .build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let report = serie
        .analyze_as_of(&january(&[AAPL]), d(2024, 2, 1))
        .await
        .unwrap();
    assert!(matches!(
        report.metrics[0],
        MetricsOutcome::Degenerate { observations: 1, .. }
    ));
}

#[tokio::test]
async fn nothing_resolved_means_no_data() {
    let c = MockConnector::builder()
        .name("primary")
        .returns_history_for(vec![])
        .build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let report = serie
        .analyze_as_of(&january(&["ZZZ", "YYY"]), d(2024, 2, 1))
        .await
        .unwrap();
    assert!(!report.has_data());
    assert_eq!(report.unresolved.len(), 2);
    assert!(report.metrics.is_empty());
}

#[tokio::test]
async fn empty_request_fetches_nothing() {
    let c = MockConnector::builder()
        .name("primary")
        .returns_history_ok(jan_hist(&[(2, 1.0)]))
        .build();
    let serie = Serie::builder().with_connector(c.clone()).build().unwrap();

    let req = AnalysisRequest::from_text(" ,; \n", serie::Horizon::Y1, Frequency::Daily);
    let err = serie.analyze(&req).await.unwrap_err();
    assert_eq!(err, SerieError::EmptyBatch);
    assert!(c.calls().is_empty());
}

#[tokio::test]
async fn weekly_resampling_keeps_last_day_of_week() {
    // 2024-01-08 is a Monday
    let c = MockConnector::builder()
        .name("primary")
        .returns_history_for(vec![(
            AAPL,
            jan_hist(&[(8, 1.0), (9, 2.0), (12, 3.0), (15, 4.0), (19, 5.0)]),
        )])
        .build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let req = january(&[AAPL]).frequency(Frequency::Weekly);
    let report = serie.analyze_as_of(&req, d(2024, 2, 1)).await.unwrap();
    assert_eq!(report.frequency, Frequency::Weekly);
    assert_eq!(report.table.index(), &[d(2024, 1, 12), d(2024, 1, 19)]);
    assert_eq!(report.table.column(AAPL).unwrap().values, vec![3.0, 5.0]);
}
