use std::time::{Duration, Instant};

use serie::{Capability, Serie, SerieError};

use crate::helpers::mock_connector::MockConnector;
use crate::helpers::{d, jan_2024, jan_hist, sym};

fn slow(delay: Duration) -> std::sync::Arc<MockConnector> {
    MockConnector::builder()
        .name("slow")
        .delay(delay)
        .returns_history_ok(jan_hist(&[(2, 1.0), (3, 2.0)]))
        .build()
}

#[tokio::test]
async fn request_deadline_bounds_the_batch() {
    let serie = Serie::builder()
        .with_connector(slow(Duration::from_millis(300)))
        .request_timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let err = serie
        .download()
        .symbols(&[sym("A"), sym("B")])
        .unwrap()
        .period(d(2024, 1, 1), Some(d(2024, 1, 31)))
        .run()
        .await
        .unwrap_err();
    match err {
        SerieError::RequestTimeout { capability } => {
            assert_eq!(capability, Capability::DownloadHistory.to_string());
        }
        other => panic!("expected RequestTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn request_deadline_bounds_a_single_history() {
    let serie = Serie::builder()
        .with_connector(slow(Duration::from_millis(300)))
        .request_timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = serie.history(&sym("A"), jan_2024()).await.unwrap_err();
    assert!(started.elapsed() < Duration::from_millis(250));
    match err {
        SerieError::RequestTimeout { capability } => {
            assert_eq!(capability, Capability::History.to_string());
        }
        other => panic!("expected RequestTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn batch_within_deadline_resolves_every_symbol() {
    let serie = Serie::builder()
        .with_connector(slow(Duration::from_millis(10)))
        .request_timeout(Duration::from_secs(5))
        .concurrency(2)
        .build()
        .unwrap();

    let report = serie
        .download()
        .symbols(&[sym("A"), sym("B")])
        .unwrap()
        .period(d(2024, 1, 1), Some(d(2024, 1, 31)))
        .run()
        .await
        .unwrap();
    assert_eq!(report.resolved.len(), 2);
    assert!(report.unresolved.is_empty());
}

#[tokio::test]
async fn concurrency_fans_out_and_preserves_order() {
    let serie = Serie::builder()
        .with_connector(slow(Duration::from_millis(100)))
        .concurrency(4)
        .build()
        .unwrap();

    let symbols = [sym("D"), sym("C"), sym("B"), sym("A")];
    let started = Instant::now();
    let report = serie
        .download()
        .symbols(&symbols)
        .unwrap()
        .period(d(2024, 1, 1), Some(d(2024, 1, 31)))
        .run()
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_millis(350));
    let order: Vec<&str> = report.resolved.iter().map(|r| r.requested.as_str()).collect();
    assert_eq!(order, vec!["D", "C", "B", "A"]);
}

#[tokio::test]
async fn concurrency_one_is_sequential() {
    let c = slow(Duration::from_millis(30));
    let serie = Serie::builder()
        .with_connector(c.clone())
        .concurrency(1)
        .build()
        .unwrap();

    let started = Instant::now();
    serie
        .download()
        .symbols(&[sym("A"), sym("B"), sym("C")])
        .unwrap()
        .period(d(2024, 1, 1), Some(d(2024, 1, 31)))
        .run()
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(90));
    assert_eq!(c.calls(), vec!["A", "B", "C"]);
}
