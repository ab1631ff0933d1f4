use std::time::Duration;

use serie::{Serie, SerieError};

use crate::helpers::mock_connector::MockConnector;
use crate::helpers::{AAPL, jan_2024, jan_hist, sym};

#[tokio::test]
async fn all_not_found_collapses_to_not_found() {
    let a = MockConnector::builder()
        .name("a")
        .returns_history_for(vec![])
        .build();
    let b = MockConnector::builder()
        .name("b")
        .returns_history_ok(jan_hist(&[]))
        .build();

    let serie = Serie::builder()
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();

    let err = serie.history(&sym(AAPL), jan_2024()).await.unwrap_err();
    match err {
        SerieError::NotFound { what } => assert_eq!(what, "history for AAPL"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn all_timeouts_collapse_to_all_providers_timed_out() {
    let slow = |name| {
        MockConnector::builder()
            .name(name)
            .delay(Duration::from_millis(200))
            .returns_history_ok(jan_hist(&[(2, 1.0)]))
            .build()
    };

    let serie = Serie::builder()
        .with_connector(slow("s1"))
        .with_connector(slow("s2"))
        .provider_timeout(Duration::from_millis(10))
        .build()
        .unwrap();

    let err = serie.history(&sym(AAPL), jan_2024()).await.unwrap_err();
    assert!(matches!(err, SerieError::AllProvidersTimedOut { capability } if capability == "history"));
}

#[tokio::test]
async fn mixed_failures_are_aggregated_and_tagged() {
    let http = MockConnector::builder()
        .name("http")
        .fails_with(SerieError::connector("http", "HTTP 503"))
        .build();
    let garbled = MockConnector::builder()
        .name("garbled")
        .fails_with(SerieError::Data("unexpected payload".into()))
        .build();

    let serie = Serie::builder()
        .with_connector(http)
        .with_connector(garbled)
        .build()
        .unwrap();

    let err = serie.history(&sym(AAPL), jan_2024()).await.unwrap_err();
    let SerieError::AllProvidersFailed(errors) = err else {
        panic!("expected AllProvidersFailed");
    };
    assert_eq!(errors.len(), 2);
    assert!(matches!(&errors[0], SerieError::Connector { connector, .. } if connector == "http"));
    assert!(matches!(&errors[1], SerieError::Data(msg) if msg.starts_with("garbled: ")));
    assert!(err_is_actionable(&errors));
}

fn err_is_actionable(errors: &[SerieError]) -> bool {
    SerieError::AllProvidersFailed(errors.to_vec()).is_actionable()
}

#[tokio::test]
async fn no_history_capable_connector_is_unsupported() {
    let c = MockConnector::builder().name("none").without_history().build();
    let serie = Serie::builder().with_connector(c).build().unwrap();

    let err = serie.history(&sym(AAPL), jan_2024()).await.unwrap_err();
    assert!(matches!(err, SerieError::Unsupported { .. }));
}

#[tokio::test]
async fn builder_requires_a_connector() {
    assert!(matches!(
        Serie::builder().build(),
        Err(SerieError::InvalidArg(_))
    ));
}

#[tokio::test]
async fn builder_rejects_zero_concurrency() {
    let c = MockConnector::builder().build();
    assert!(matches!(
        Serie::builder().with_connector(c).concurrency(0).build(),
        Err(SerieError::InvalidArg(_))
    ));
}
