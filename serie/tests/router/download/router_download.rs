use serie::{Serie, SerieError};

use crate::helpers::mock_connector::MockConnector;
use crate::helpers::{AAPL, MSFT, d, jan_hist, sym};

#[tokio::test]
async fn unresolved_symbols_do_not_abort_the_batch() {
    let c = MockConnector::builder()
        .name("mock")
        .returns_history_for(vec![
            (AAPL, jan_hist(&[(2, 100.0), (3, 110.0)])),
            (MSFT, jan_hist(&[(2, 300.0)])),
        ])
        .build();

    let serie = Serie::builder().with_connector(c).build().unwrap();
    let report = serie
        .download()
        .symbols(&[sym(AAPL), sym("NOPE"), sym(MSFT)])
        .unwrap()
        .period(d(2024, 1, 1), Some(d(2024, 1, 31)))
        .run()
        .await
        .unwrap();

    let resolved: Vec<&str> = report.resolved.iter().map(|r| r.requested.as_str()).collect();
    assert_eq!(resolved, vec![AAPL, MSFT]);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].symbol.as_str(), "NOPE");
    assert!(matches!(
        report.unresolved[0].error,
        SerieError::NotFound { .. }
    ));
    assert_eq!(report.labeled_series()[0].0, AAPL);
}

#[tokio::test]
async fn empty_batch_is_rejected_before_any_fetch() {
    let c = MockConnector::builder()
        .name("mock")
        .returns_history_ok(jan_hist(&[(2, 1.0)]))
        .build();
    let serie = Serie::builder().with_connector(c.clone()).build().unwrap();

    let err = serie.download().run().await.unwrap_err();
    assert_eq!(err, SerieError::EmptyBatch);
    assert!(c.calls().is_empty());
}

#[tokio::test]
async fn duplicate_symbols_are_rejected() {
    let c = MockConnector::builder().build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    assert!(matches!(
        serie.download().symbols(&[sym(AAPL), sym("aapl")]),
        Err(SerieError::InvalidArg(_))
    ));
    let err = serie
        .download()
        .add_symbol(sym(AAPL))
        .unwrap()
        .add_symbol(sym(AAPL))
        .err()
        .unwrap();
    assert!(matches!(err, SerieError::InvalidArg(_)));
}

#[tokio::test]
async fn inverted_period_is_invalid() {
    let c = MockConnector::builder().build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let err = serie
        .download()
        .symbols(&[sym(AAPL)])
        .unwrap()
        .period(d(2024, 2, 1), Some(d(2024, 1, 1)))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, SerieError::InvalidArg(_)));
}

#[tokio::test]
async fn horizon_window_is_computed_from_reference_date() {
    let c = MockConnector::builder()
        .name("mock")
        .with_history_fn(|_s, r| {
            assert_eq!(r.start(), d(2023, 3, 2));
            assert_eq!(r.end(), Some(d(2024, 3, 1)));
            Ok(jan_hist(&[(2, 1.0)]))
        })
        .build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let report = serie
        .download()
        .symbols(&[sym(AAPL)])
        .unwrap()
        .horizon(serie::Horizon::Y1)
        .as_of(d(2024, 3, 1))
        .run()
        .await
        .unwrap();
    assert_eq!(report.resolved.len(), 1);
}
