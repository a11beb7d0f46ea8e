//! HttpBracketSource against real schedule API servers on ephemeral ports.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{BracketSource, SourceError, TaxBracket};
use tax_data::{CsvBracketSource, api};
use tax_http::HttpBracketSource;
use tokio::net::TcpListener;

const SCHEDULE_CSV: &str = "tax_year,min,max,rate\n2023,0,50000,0.1\n2023,50000,100000,0.2\n";

/// Serve `app` on 127.0.0.1 and return its base URL.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server error");
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> HttpBracketSource {
    HttpBracketSource::new(base_url, Duration::from_secs(5)).expect("Failed to build client")
}

fn fixed(
    status: StatusCode,
    body: &'static str,
) -> Router {
    Router::new().route(
        "/tax-calculator/tax-year/:year",
        get(move || async move { (status, body) }),
    )
}

#[tokio::test]
async fn test_fetch_success() {
    let source = CsvBracketSource::from_reader(SCHEDULE_CSV.as_bytes()).unwrap();
    let base_url = serve(api::router(Arc::new(source))).await;

    let brackets = client(&base_url).fetch_brackets(2023).await.unwrap();

    assert_eq!(
        brackets,
        vec![
            TaxBracket::new(dec!(0), dec!(50000), dec!(0.1)),
            TaxBracket::new(dec!(50000), dec!(100000), dec!(0.2)),
        ]
    );
}

#[tokio::test]
async fn test_fetch_open_ended_band_without_max() {
    let base_url = serve(fixed(
        StatusCode::OK,
        r#"{"tax_brackets": [{"min": 0, "max": 10000, "rate": 0.1}, {"min": 10000, "rate": 0.3}]}"#,
    ))
    .await;

    let brackets = client(&base_url).fetch_brackets(2021).await.unwrap();

    assert_eq!(brackets[1], TaxBracket::new(dec!(10000), dec!(0), dec!(0.3)));
}

#[tokio::test]
async fn test_fetch_bad_status_code() {
    let base_url = serve(fixed(StatusCode::NOT_FOUND, "not found")).await;

    let err = client(&base_url).fetch_brackets(2023).await.unwrap_err();

    assert_eq!(
        err,
        SourceError::Status {
            status: 404,
            body: "not found".to_string()
        }
    );
    assert!(err.to_string().contains("unexpected response status"));
}

#[tokio::test]
async fn test_fetch_unknown_year_from_schedule_api() {
    let source = CsvBracketSource::from_reader(SCHEDULE_CSV.as_bytes()).unwrap();
    let base_url = serve(api::router(Arc::new(source))).await;

    let err = client(&base_url).fetch_brackets(1999).await.unwrap_err();

    assert!(matches!(err, SourceError::Status { status: 404, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_bad_json() {
    let base_url = serve(fixed(StatusCode::OK, "{invalid json")).await;

    let err = client(&base_url).fetch_brackets(2023).await.unwrap_err();

    assert!(matches!(err, SourceError::Decode(_)), "got {err:?}");
    assert!(err.to_string().contains("failed to decode response"));
}

#[tokio::test]
async fn test_fetch_empty_schedule() {
    let base_url = serve(fixed(StatusCode::OK, r#"{"tax_brackets": []}"#)).await;

    let err = client(&base_url).fetch_brackets(2023).await.unwrap_err();

    assert_eq!(err, SourceError::EmptySchedule(2023));
}

#[tokio::test]
async fn test_fetch_missing_brackets_field() {
    let base_url = serve(fixed(StatusCode::OK, r#"{"brackets": []}"#)).await;

    let err = client(&base_url).fetch_brackets(2023).await.unwrap_err();

    assert_eq!(err, SourceError::EmptySchedule(2023));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let app = Router::new().route(
        "/tax-calculator/tax-year/:year",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let base_url = serve(app).await;
    let source = HttpBracketSource::new(&base_url, Duration::from_millis(200)).unwrap();

    let err = source.fetch_brackets(2023).await.unwrap_err();

    assert!(matches!(err, SourceError::Request(_)), "got {err:?}");
    assert!(err.to_string().contains("failed to fetch tax brackets"));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Bind and drop to get a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .fetch_brackets(2023)
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Request(_)), "got {err:?}");
}
