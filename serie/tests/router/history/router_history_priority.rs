use std::sync::Arc;

use serie::{Serie, SerieConnector};

use crate::helpers::mock_connector::MockConnector;
use crate::helpers::{AAPL, MSFT, jan_2024, jan_hist, sym};

#[tokio::test]
async fn prefer_symbol_reorders_only_that_symbol() {
    let a = MockConnector::builder()
        .name("a")
        .returns_history_ok(jan_hist(&[(2, 1.0)]))
        .build();
    let b = MockConnector::builder()
        .name("b")
        .returns_history_ok(jan_hist(&[(2, 2.0)]))
        .build();

    let serie = Serie::builder()
        .with_connector(a.clone())
        .with_connector(b.clone())
        .prefer_symbol("aapl", &[b.clone() as Arc<dyn SerieConnector>])
        .build()
        .unwrap();

    let aapl = serie.history(&sym(AAPL), jan_2024()).await.unwrap();
    assert_eq!(aapl.connector, "b");
    let msft = serie.history(&sym(MSFT), jan_2024()).await.unwrap();
    assert_eq!(msft.connector, "a");
}

#[tokio::test]
async fn unknown_preferred_connectors_are_dropped_at_build() {
    let a = MockConnector::builder()
        .name("a")
        .returns_history_ok(jan_hist(&[(2, 1.0)]))
        .build();
    let ghost = MockConnector::builder().name("ghost").build();

    let serie = Serie::builder()
        .with_connector(a)
        .prefer_symbol(AAPL, &[ghost as Arc<dyn SerieConnector>])
        .build()
        .unwrap();

    assert!(serie.config().per_symbol_priority[AAPL].is_empty());
    assert_eq!(serie.connector_names().collect::<Vec<_>>(), vec!["a"]);
}
