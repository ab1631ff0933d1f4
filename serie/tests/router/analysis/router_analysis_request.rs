use serie::{AnalysisRequest, DEFAULT_RISK_FREE_PCT, Frequency, Horizon, Window};

use crate::helpers::d;

#[test]
fn from_text_normalizes_and_dedups() {
    let req = AnalysisRequest::from_text(
        "swda.mi\nLU1287022708, aapl; AAPL",
        Horizon::Y5,
        Frequency::Monthly,
    );
    let symbols: Vec<&str> = req.symbols().iter().map(|s| s.as_str()).collect();
    assert_eq!(symbols, vec!["SWDA.MI", "LU1287022708", "AAPL"]);
    assert_eq!(req.window(), Window::Horizon(Horizon::Y5));
    assert_eq!(req.sampling(), Frequency::Monthly);
}

#[test]
fn defaults_and_overrides() {
    let req = AnalysisRequest::new(vec![]);
    assert_eq!(req.window(), Window::Horizon(Horizon::Y3));
    assert_eq!(req.sampling(), Frequency::Daily);

    let req = req.period(d(2020, 1, 1), None).risk_free_pct(DEFAULT_RISK_FREE_PCT + 1.0);
    assert_eq!(
        req.window(),
        Window::Period {
            start: d(2020, 1, 1),
            end: None
        }
    );
}
