//! Integration tests for [`forecast_client::OpenWeatherClient`] against a mockito server.
//!
//! Covers the request shape, success formatting, provider errors (verbatim and fallback),
//! malformed bodies, empty forecasts, and network failures/timeouts.

use std::time::Duration;

use forecast_client::{
    ForecastError, ForecastProvider, OpenWeatherClient, OpenWeatherConfig, UNKNOWN_API_ERROR,
};
use mockito::Matcher;

const FORECAST_PATH: &str = "^/data/2.5/forecast";

fn client_for(server: &mockito::ServerGuard) -> OpenWeatherClient {
    let config = OpenWeatherConfig::new("test-key")
        .with_api_url(format!("{}/data/2.5/forecast", server.url()))
        .with_lang("en")
        .with_points(6);
    OpenWeatherClient::new(config).expect("build client")
}

fn six_point_body() -> String {
    let points: Vec<String> = (0..6)
        .map(|i| {
            format!(
                r#"{{"dt_txt": "2024-05-01 {:02}:00:00",
                    "main": {{"temp": {}.4, "feels_like": 8.5}},
                    "wind": {{"speed": 2}},
                    "weather": [{{"description": "clear sky"}}]}}"#,
                i * 3,
                10 + i
            )
        })
        .collect();
    format!(
        r#"{{"cod": "200", "city": {{"name": "Berlin"}}, "list": [{}]}}"#,
        points.join(",")
    )
}

/// **Test: Successful lookup sends the fixed query and formats six points.**
///
/// **Setup:** Mock matching q, appid, units=metric, lang, cnt=6.
/// **Action:** `fetch("Berlin")`.
/// **Expected:** Header plus six lines; the mock was hit once.
#[tokio::test]
async fn test_fetch_success_formats_points() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(FORECAST_PATH.to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Berlin".into()),
            Matcher::UrlEncoded("appid".into(), "test-key".into()),
            Matcher::UrlEncoded("units".into(), "metric".into()),
            Matcher::UrlEncoded("lang".into(), "en".into()),
            Matcher::UrlEncoded("cnt".into(), "6".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(six_point_body())
        .create_async()
        .await;

    let forecast = client_for(&server).fetch("  Berlin ").await.unwrap();

    mock.assert_async().await;
    assert_eq!(forecast.city, "Berlin");
    let lines: Vec<&str> = forecast.text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(
        lines[1],
        "00:00  10°C (feels like 9°C), wind 2.0 m/s, Clear sky"
    );
}

/// **Test: Provider error message is returned verbatim.**
#[tokio::test]
async fn test_fetch_unknown_city_returns_provider_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(FORECAST_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"cod": "404", "message": "city not found"}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch("Atlantis").await.unwrap_err();

    assert_eq!(err, ForecastError::Provider("city not found".to_string()));
    assert!(err.to_string().contains("city not found"));
}

/// **Test: Error body without a message falls back to the generic text.**
#[tokio::test]
async fn test_fetch_error_without_message_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(FORECAST_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let err = client_for(&server).fetch("Oslo").await.unwrap_err();

    assert_eq!(err, ForecastError::Provider(UNKNOWN_API_ERROR.to_string()));
}

/// **Test: A 2xx body that is not a forecast is a protocol error, not a crash.**
#[tokio::test]
async fn test_fetch_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(FORECAST_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).fetch("Oslo").await.unwrap_err();

    assert_eq!(err, ForecastError::Malformed);
}

/// **Test: Success with an empty list is "no data".**
#[tokio::test]
async fn test_fetch_zero_points_is_no_data() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(FORECAST_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"city": {"name": "Oslo"}, "list": []}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch("Oslo").await.unwrap_err();

    assert_eq!(err, ForecastError::NoData);
}

/// **Test: Connection refused maps to the generic network error.**
#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    let config = OpenWeatherConfig::new("k").with_api_url("http://127.0.0.1:1/forecast");
    let client = OpenWeatherClient::new(config).unwrap();

    assert_eq!(client.fetch("Oslo").await.unwrap_err(), ForecastError::Network);
}

/// **Test: A server that never answers is cut off by the timeout.**
///
/// **Setup:** TCP listener that accepts and then stays silent; client timeout 200 ms.
/// **Expected:** `ForecastError::Network`, well before the server would respond.
#[tokio::test]
async fn test_fetch_timeout_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let config = OpenWeatherConfig::new("k")
        .with_api_url(format!("http://{}/forecast", addr))
        .with_timeout(Duration::from_millis(200));
    let client = OpenWeatherClient::new(config).unwrap();

    let started = std::time::Instant::now();
    let err = client.fetch("Oslo").await.unwrap_err();

    assert_eq!(err, ForecastError::Network);
    assert!(started.elapsed() < Duration::from_secs(5));
}
