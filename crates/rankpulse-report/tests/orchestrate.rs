//! End-to-end orchestration tests against mocked provider APIs.

use rankpulse_ai::{NarrativeClient, NarrativeOutcome};
use rankpulse_bing::BingClient;
use rankpulse_core::ReportPeriod;
use rankpulse_gsc::GscClient;
use rankpulse_report::{build_report, Providers, ReportError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn providers(server: &MockServer, with_bing: bool, with_narrative: bool) -> Providers {
    let uri = server.uri();
    let gsc = GscClient::with_base_url("test-token", 30, &uri)
        .expect("client construction should not fail")
        .with_retry_policy(0, 1);
    let bing = with_bing
        .then(|| BingClient::with_base_url("test-key", 30, &uri).unwrap());
    let narrative = with_narrative
        .then(|| NarrativeClient::with_base_url("test-key", "gpt-4o-mini", 30, &uri).unwrap());
    Providers {
        gsc,
        bing,
        narrative,
    }
}

async fn mock_inventories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/webmasters/v3/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "siteEntry": [
                { "siteUrl": "sc-domain:acme.com", "permissionLevel": "siteOwner" }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/GetUserSites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "d": [{ "Url": "https://acme.com/", "IsVerified": true }]
        })))
        .mount(server)
        .await;
}

async fn mock_query_window(
    server: &MockServer,
    dimension: &str,
    start_date: &str,
    rows: serde_json::Value,
) {
    Mock::given(method("POST"))
        .and(path(
            "/webmasters/v3/sites/sc-domain:acme.com/searchAnalytics/query",
        ))
        .and(body_partial_json(json!({
            "startDate": start_date,
            "dimensions": [dimension]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": rows })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn builds_a_full_report_from_both_providers() {
    let server = MockServer::start().await;
    mock_inventories(&server).await;

    // November 2025 window.
    mock_query_window(
        &server,
        "date",
        "2025-11-01",
        json!([
            { "keys": ["2025-11-03"], "clicks": 12.0, "impressions": 300.0, "ctr": 0.04, "position": 8.0 },
            { "keys": ["2025-11-04"], "clicks": 8.0, "impressions": 100.0, "ctr": 0.08, "position": 6.0 }
        ]),
    )
    .await;
    // October 2025 (previous month).
    mock_query_window(
        &server,
        "date",
        "2025-10-01",
        json!([
            { "keys": ["2025-10-10"], "clicks": 10.0, "impressions": 400.0, "ctr": 0.025, "position": 9.0 }
        ]),
    )
    .await;
    // November 2024 (year-over-year): no traffic recorded.
    mock_query_window(&server, "date", "2024-11-01", json!([])).await;
    // Top search terms for November 2025.
    mock_query_window(
        &server,
        "query",
        "2025-11-01",
        json!([
            { "keys": ["acme pricing"], "clicks": 9.0, "impressions": 120.0, "ctr": 0.075, "position": 3.2 },
            { "keys": ["acme"], "clicks": 11.0, "impressions": 200.0, "ctr": 0.055, "position": 2.1 }
        ]),
    )
    .await;
    // Trailing month-granularity series.
    mock_query_window(
        &server,
        "month",
        "2024-08-01",
        json!([
            { "keys": ["2025-10"], "clicks": 10.0, "impressions": 400.0, "ctr": 0.025, "position": 9.0 },
            { "keys": ["2025-11"], "clicks": 20.0, "impressions": 400.0, "ctr": 0.05, "position": 7.0 }
        ]),
    )
    .await;

    // 1762128000000 ms = 2025-11-03.
    Mock::given(method("GET"))
        .and(path("/GetRankAndTrafficStats"))
        .and(query_param("siteUrl", "https://acme.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "d": [
                { "Date": "/Date(1762128000000)/", "Clicks": 5, "Impressions": 100 },
                { "Date": "2025-10-15T00:00:00", "Clicks": 3, "Impressions": 60 }
            ]
        })))
        .mount(&server)
        .await;

    let narrative_json = json!({
        "highlights": ["Clicks doubled month over month"],
        "google_section": "Strong recovery in organic clicks.",
        "bing_section": "Modest but steady Bing traffic.",
        "trend_summary": "Upward over the trailing window.",
        "final_summary": "A good month."
    });
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "content": narrative_json.to_string() } }
            ]
        })))
        .mount(&server)
        .await;

    let providers = providers(&server, true, true);
    let period = ReportPeriod::new(2025, 11).unwrap();
    let report = build_report(&providers, "acme.com", period).await.unwrap();

    assert_eq!(report.site, "acme.com");
    assert_eq!(report.period, "2025-11");

    let google = &report.summary.google;
    let current = google.current.as_ref().unwrap();
    assert_eq!(current.clicks, 20);
    assert_eq!(current.impressions, 400);
    assert!((current.ctr - 5.0).abs() < 1e-9);
    assert_eq!(current.position, Some(7.0));

    assert_eq!(google.top_queries.len(), 2);
    assert_eq!(google.top_queries[0].query, "acme");
    assert_eq!(google.top_queries[0].metrics.clicks, 11);

    let mom = google.deltas.mom.as_ref().unwrap();
    assert_eq!(mom.clicks_delta_abs, 10);
    assert_eq!(mom.clicks_delta_pct, Some(100.0));

    // The YoY window succeeded but recorded nothing, so the comparison
    // exists with null percentage deltas.
    let yoy = google.deltas.yoy.as_ref().unwrap();
    assert_eq!(yoy.clicks_delta_abs, 20);
    assert_eq!(yoy.clicks_delta_pct, None);

    assert_eq!(google.last_16_months.len(), 2);

    let bing = report.summary.bing.as_ref().unwrap();
    let bing_current = bing.current.as_ref().unwrap();
    assert_eq!(bing_current.clicks, 5);
    assert_eq!(bing_current.impressions, 100);
    assert!(bing_current.position.is_none());
    assert!(bing.top_queries.is_empty());
    assert_eq!(bing.last_16_months.len(), 2);

    assert_eq!(report.daily.len(), 30);
    let nov3 = report
        .daily
        .iter()
        .find(|d| d.date == "2025-11-03")
        .unwrap();
    assert_eq!(nov3.google.clicks, 12);
    assert_eq!(nov3.bing.clicks, 5);

    match &report.narrative {
        NarrativeOutcome::Json { report } => {
            assert_eq!(report.highlights.len(), 1);
            assert_eq!(report.final_summary, "A good month.");
        }
        NarrativeOutcome::Raw { .. } => panic!("expected structured narrative"),
    }
}

#[tokio::test]
async fn narrative_failure_degrades_to_raw_placeholder() {
    let server = MockServer::start().await;
    mock_inventories(&server).await;

    for (dimension, start) in [
        ("date", "2025-11-01"),
        ("date", "2025-10-01"),
        ("date", "2024-11-01"),
        ("query", "2025-11-01"),
        ("month", "2024-08-01"),
    ] {
        mock_query_window(&server, dimension, start, json!([])).await;
    }
    Mock::given(method("GET"))
        .and(path("/GetRankAndTrafficStats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "d": [{ "Date": "2025-11-01T00:00:00", "Clicks": 1, "Impressions": 10 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let providers = providers(&server, true, true);
    let period = ReportPeriod::new(2025, 11).unwrap();
    let report = build_report(&providers, "acme.com", period).await.unwrap();

    assert!(matches!(
        report.narrative,
        NarrativeOutcome::Raw { ref text } if text.contains("unavailable")
    ));
    // The numeric report survives the narrative failure intact.
    let bing = report.summary.bing.as_ref().unwrap();
    assert_eq!(bing.current.as_ref().unwrap().clicks, 1);
}

#[tokio::test]
async fn current_window_outage_leaves_report_partial_without_deltas() {
    let server = MockServer::start().await;
    mock_inventories(&server).await;

    // Every current-month fetch (date and query dimension) fails
    // upstream; the history windows answer normally.
    Mock::given(method("POST"))
        .and(path(
            "/webmasters/v3/sites/sc-domain:acme.com/searchAnalytics/query",
        ))
        .and(body_partial_json(json!({ "startDate": "2025-11-01" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;
    mock_query_window(
        &server,
        "date",
        "2025-10-01",
        json!([
            { "keys": ["2025-10-10"], "clicks": 800.0, "impressions": 16000.0, "ctr": 0.05, "position": 9.0 }
        ]),
    )
    .await;
    mock_query_window(&server, "date", "2024-11-01", json!([])).await;
    mock_query_window(&server, "month", "2024-08-01", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/GetRankAndTrafficStats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "d": [{ "Date": "2025-11-02T00:00:00", "Clicks": 2, "Impressions": 40 }]
        })))
        .mount(&server)
        .await;

    let providers = providers(&server, true, false);
    let period = ReportPeriod::new(2025, 11).unwrap();
    let report = build_report(&providers, "acme.com", period).await.unwrap();

    let google = &report.summary.google;
    assert!(google.current.is_none());
    assert_eq!(google.previous.as_ref().unwrap().clicks, 800);
    // An outage must never read as a traffic collapse against real
    // history.
    assert!(google.deltas.mom.is_none());
    assert!(google.deltas.yoy.is_none());
    assert!(google.top_queries.is_empty());

    // Bing and the zero-filled daily series still come through.
    let bing = report.summary.bing.as_ref().unwrap();
    assert_eq!(bing.current.as_ref().unwrap().clicks, 2);
    assert_eq!(report.daily.len(), 30);
}

#[tokio::test]
async fn unknown_site_key_names_the_missing_provider() {
    let server = MockServer::start().await;
    mock_inventories(&server).await;

    let providers = providers(&server, true, false);
    let period = ReportPeriod::new(2025, 11).unwrap();
    let err = build_report(&providers, "nope.example", period)
        .await
        .unwrap_err();

    match err {
        ReportError::SiteNotFound { key, provider } => {
            assert_eq!(key, "nope.example");
            assert!(provider.contains("google") && provider.contains("bing"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_bing_client_is_a_configuration_error() {
    let server = MockServer::start().await;
    let providers = providers(&server, false, false);
    let period = ReportPeriod::new(2025, 11).unwrap();

    let err = build_report(&providers, "acme.com", period)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::ProviderNotConfigured { provider: "bing webmaster" }
    ));
}
