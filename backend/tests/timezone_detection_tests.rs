//! Timezone detection against a mocked geolocation service.

use std::net::IpAddr;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coachtrack::config::GeolocationSettings;
use coachtrack::services::{TimezoneDetection, TimezoneResolver, TimezoneSource};

const PUBLIC_IP: &str = "8.8.8.8";

fn resolver(endpoint: String) -> TimezoneResolver {
    TimezoneResolver::new(GeolocationSettings {
        endpoint,
        timeout: Duration::from_millis(500),
        fallback_timezone: "America/Chicago".to_string(),
    })
    .unwrap()
}

fn fallback() -> TimezoneDetection {
    TimezoneDetection {
        timezone: "America/Chicago".to_string(),
        source: TimezoneSource::Fallback,
    }
}

async fn detect_with(response: ResponseTemplate) -> TimezoneDetection {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/{}/json/", PUBLIC_IP)))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;
    resolver(server.uri())
        .detect(Some(PUBLIC_IP.parse().unwrap()))
        .await
}

#[tokio::test]
async fn test_public_address_is_geolocated() {
    let detection = detect_with(
        ResponseTemplate::new(200).set_body_json(json!({
            "ip": PUBLIC_IP,
            "city": "Mountain View",
            "timezone": "America/Los_Angeles"
        })),
    )
    .await;
    assert_eq!(detection.timezone, "America/Los_Angeles");
    assert_eq!(detection.source, TimezoneSource::Geolocation);
}

#[tokio::test]
async fn test_lookup_failures_fall_back() {
    let responses = [
        ResponseTemplate::new(429).set_body_string("rate limited"),
        ResponseTemplate::new(200).set_body_json(json!({ "error": true, "reason": "Reserved IP Address" })),
        ResponseTemplate::new(200).set_body_json(json!({ "timezone": "   " })),
        ResponseTemplate::new(200).set_body_json(json!({ "city": "Nowhere" })),
        ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
    ];
    for response in responses {
        assert_eq!(detect_with(response).await, fallback());
    }
}

#[tokio::test]
async fn test_slow_service_falls_back() {
    let detection = detect_with(
        ResponseTemplate::new(200)
            .set_body_json(json!({ "timezone": "Asia/Tokyo" }))
            .set_delay(Duration::from_secs(2)),
    )
    .await;
    assert_eq!(detection, fallback());
}

#[tokio::test]
async fn test_private_and_missing_addresses_skip_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "timezone": "Asia/Tokyo" })))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = resolver(server.uri());
    for raw in ["127.0.0.1", "10.1.2.3", "192.168.0.8", "::1", "fe80::1", "fd00::7"] {
        let ip: IpAddr = raw.parse().unwrap();
        assert_eq!(resolver.detect(Some(ip)).await, fallback(), "{raw}");
    }
    assert_eq!(resolver.detect(None).await, fallback());
}
