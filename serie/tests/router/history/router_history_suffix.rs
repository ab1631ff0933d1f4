use serie::{Serie, SerieError};

use crate::helpers::mock_connector::MockConnector;
use crate::helpers::{ENI, jan_2024, jan_hist, sym};

#[tokio::test]
async fn suffix_guess_reports_matched_symbol() {
    let yahoo = MockConnector::builder()
        .name("yahoo")
        .accepts_suffix_guesses()
        .returns_history_for(vec![("ENI.PA", jan_hist(&[(2, 14.0), (3, 14.2)]))])
        .build();
    let funds = MockConnector::builder()
        .name("funds")
        .returns_history_for(vec![])
        .build();

    let serie = Serie::builder()
        .with_connector(yahoo.clone())
        .with_connector(funds.clone())
        .suffix_guesses(&[".MI", ".PA", ".DE"])
        .build()
        .unwrap();

    let out = serie.history(&sym(ENI), jan_2024()).await.unwrap();
    assert_eq!(out.requested.as_str(), "ENI");
    assert_eq!(out.matched.as_str(), "ENI.PA");
    assert_eq!(out.connector, "yahoo");

    // verbatim on every connector first, guesses only on the suffix-capable one
    assert_eq!(yahoo.calls(), vec!["ENI", "ENI.MI", "ENI.PA"]);
    assert_eq!(funds.calls(), vec!["ENI"]);
}

#[tokio::test]
async fn guesses_are_not_tried_without_configuration() {
    let yahoo = MockConnector::builder()
        .name("yahoo")
        .accepts_suffix_guesses()
        .returns_history_for(vec![("ENI.MI", jan_hist(&[(2, 14.0)]))])
        .build();

    let serie = Serie::builder()
        .with_connector(yahoo.clone())
        .build()
        .unwrap();

    let err = serie.history(&sym(ENI), jan_2024()).await.unwrap_err();
    assert!(matches!(err, SerieError::NotFound { .. }));
    assert_eq!(yahoo.calls(), vec!["ENI"]);
}

#[tokio::test]
async fn suffix_already_present_is_skipped() {
    let yahoo = MockConnector::builder()
        .name("yahoo")
        .accepts_suffix_guesses()
        .returns_history_for(vec![])
        .build();

    let serie = Serie::builder()
        .with_connector(yahoo.clone())
        .suffix_guesses(&[".mi", ".DE"])
        .build()
        .unwrap();

    let _ = serie.history(&sym("ENI.MI"), jan_2024()).await;
    assert_eq!(yahoo.calls(), vec!["ENI.MI", "ENI.MI.DE"]);
}
