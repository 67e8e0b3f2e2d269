//! Client timezone detection through IP geolocation.
//!
//! Detection never fails: a missing or non-public client address skips the
//! lookup, and any lookup failure falls back to the configured timezone.

use std::net::{IpAddr, SocketAddr};

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::config::GeolocationSettings;

/// Where a detected timezone came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneSource {
    Geolocation,
    Fallback,
}

/// Result of [`TimezoneResolver::detect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneDetection {
    /// IANA timezone name
    pub timezone: String,
    pub source: TimezoneSource,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Resolves a client address to an IANA timezone.
#[derive(Debug, Clone)]
pub struct TimezoneResolver {
    http: reqwest::Client,
    settings: GeolocationSettings,
}

impl TimezoneResolver {
    pub fn new(settings: GeolocationSettings) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &GeolocationSettings {
        &self.settings
    }

    pub fn fallback(&self) -> TimezoneDetection {
        TimezoneDetection {
            timezone: self.settings.fallback_timezone.clone(),
            source: TimezoneSource::Fallback,
        }
    }

    /// Detect the timezone of `client_ip`.
    pub async fn detect(&self, client_ip: Option<IpAddr>) -> TimezoneDetection {
        let ip = match client_ip {
            Some(ip) if is_public(ip) => ip,
            Some(ip) => {
                log::debug!("Skipping geolocation for non-public address {}", ip);
                return self.fallback();
            }
            None => return self.fallback(),
        };

        match self.lookup(ip).await {
            Ok(timezone) => TimezoneDetection {
                timezone,
                source: TimezoneSource::Geolocation,
            },
            Err(reason) => {
                log::warn!("Timezone lookup for {} failed: {}", ip, reason);
                self.fallback()
            }
        }
    }

    async fn lookup(&self, ip: IpAddr) -> Result<String, String> {
        let url = format!("{}/{}/json/", self.settings.endpoint, ip);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response: {}", e))?;
        if body.error {
            return Err(body
                .reason
                .unwrap_or_else(|| "service reported an error".to_string()));
        }

        body.timezone
            .map(|tz| tz.trim().to_string())
            .filter(|tz| !tz.is_empty())
            .ok_or_else(|| "response carried no timezone".to_string())
    }
}

/// Client address from proxy headers: the first `X-Forwarded-For` entry,
/// then `X-Real-IP`. Entries may carry a port.
pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(parse_ip);

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_ip)
    })
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

/// Whether geolocating `ip` can produce a meaningful answer.
pub fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation())
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            let unique_local = (first & 0xfe00) == 0xfc00;
            let link_local = (first & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_is_public() {
        for private in [
            "127.0.0.1",
            "10.1.2.3",
            "172.16.0.9",
            "192.168.1.1",
            "169.254.0.1",
            "0.0.0.0",
            "::1",
            "::",
            "fd00::1",
            "fe80::1",
            "::ffff:192.168.1.1",
        ] {
            assert!(!is_public(private.parse().unwrap()), "{}", private);
        }
        for public in ["8.8.8.8", "81.2.69.142", "2001:4860:4860::8888", "::ffff:8.8.8.8"] {
            assert!(is_public(public.parse().unwrap()), "{}", public);
        }
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(
            client_ip_from_headers(&headers),
            Some("203.0.113.7".parse().unwrap())
        );
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        headers.insert("x-real-ip", HeaderValue::from_static("81.2.69.142:443"));
        assert_eq!(
            client_ip_from_headers(&headers),
            Some("81.2.69.142".parse().unwrap())
        );
        assert_eq!(client_ip_from_headers(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_private_address_uses_fallback_without_lookup() {
        let resolver = TimezoneResolver::new(GeolocationSettings {
            // Unroutable endpoint: any lookup attempt would fail slowly
            endpoint: "http://192.0.2.1:9".to_string(),
            fallback_timezone: "Europe/Madrid".to_string(),
            ..GeolocationSettings::default()
        })
        .unwrap();

        let detection = resolver.detect(Some("192.168.0.10".parse().unwrap())).await;
        assert_eq!(detection.timezone, "Europe/Madrid");
        assert_eq!(detection.source, TimezoneSource::Fallback);
        assert_eq!(resolver.detect(None).await, resolver.fallback());
    }
}
