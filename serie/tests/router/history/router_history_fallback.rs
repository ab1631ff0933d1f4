use serie::{PriceField, Serie};

use crate::helpers::mock_connector::MockConnector;
use crate::helpers::{AAPL, FUND_ISIN, d, hist, jan_2024, jan_hist, sym};

#[tokio::test]
async fn history_falls_back_when_first_errors() {
    // First connector advertises history but has no fixture and errors
    let first = MockConnector::builder().name("err").build();
    let second = MockConnector::builder()
        .name("ok")
        .returns_history_ok(jan_hist(&[(10, 10.0), (11, 11.0)]))
        .build();

    let serie = Serie::builder()
        .with_connector(first.clone())
        .with_connector(second)
        .build()
        .unwrap();

    let out = serie.history(&sym(AAPL), jan_2024()).await.unwrap();
    assert_eq!(out.connector, "ok");
    assert_eq!(out.series.len(), 2);
    assert_eq!(out.series.first().unwrap().date, d(2024, 1, 10));
    assert_eq!(first.calls(), vec![AAPL.to_string()]);
}

#[tokio::test]
async fn primary_success_skips_secondary() {
    let primary = MockConnector::builder()
        .name("primary")
        .returns_history_ok(jan_hist(&[(2, 100.0), (3, 110.0)]))
        .build();
    let secondary = MockConnector::builder()
        .name("secondary")
        .returns_history_ok(jan_hist(&[(2, 1.0)]))
        .build();

    let serie = Serie::builder()
        .with_connector(primary)
        .with_connector(secondary.clone())
        .build()
        .unwrap();

    let out = serie.history(&sym(AAPL), jan_2024()).await.unwrap();
    assert_eq!(out.connector, "primary");
    assert_eq!(out.matched, out.requested);
    assert!(secondary.calls().is_empty());
}

#[tokio::test]
async fn fund_resolves_through_secondary_nav() {
    let primary = MockConnector::builder()
        .name("primary")
        .returns_history_for(vec![])
        .build();
    let secondary = MockConnector::builder()
        .name("funds")
        .returns_history_for(vec![(
            FUND_ISIN,
            hist(&[(2, 50.0), (3, 50.5), (4, 51.0)], PriceField::Nav),
        )])
        .build();

    let serie = Serie::builder()
        .with_connector(primary)
        .with_connector(secondary)
        .build()
        .unwrap();

    let out = serie.history(&sym(FUND_ISIN), jan_2024()).await.unwrap();
    assert_eq!(out.connector, "funds");
    assert_eq!(out.field, PriceField::Nav);
    assert_eq!(out.series.len(), 3);
}

#[tokio::test]
async fn empty_ok_response_continues_the_plan() {
    let empty = MockConnector::builder()
        .name("empty")
        .returns_history_ok(jan_hist(&[]))
        .build();
    let ok = MockConnector::builder()
        .name("ok")
        .returns_history_ok(jan_hist(&[(5, 7.0)]))
        .build();

    let serie = Serie::builder()
        .with_connector(empty)
        .with_connector(ok)
        .build()
        .unwrap();

    let out = serie.history(&sym(AAPL), jan_2024()).await.unwrap();
    assert_eq!(out.connector, "ok");
}

#[tokio::test]
async fn points_outside_window_are_clipped() {
    let c = MockConnector::builder()
        .name("wide")
        .with_history_fn(|_s, _r| {
            let mut resp = jan_hist(&[(15, 2.0), (15, 3.0), (20, f64::NAN)]);
            resp.points.push(serie::PricePoint::new(d(2023, 12, 29), 1.0));
            resp.points.push(serie::PricePoint::new(d(2024, 2, 1), 4.0));
            Ok(resp)
        })
        .build();

    let serie = Serie::builder().with_connector(c).build().unwrap();
    let out = serie.history(&sym(AAPL), jan_2024()).await.unwrap();
    let dates: Vec<_> = out.series.dates().collect();
    assert_eq!(dates, vec![d(2024, 1, 15)]);
    // last observation wins on a repeated date
    assert_eq!(out.series.get(d(2024, 1, 15)), Some(3.0));
}
