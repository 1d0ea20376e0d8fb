use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use std::thread;
use std::time::Duration;

use super::EventSource;
use crate::models::event::{DateRange, Event};
use crate::models::settings::EventServiceSettings;

/// Blocking client for `GET {base}/events?start=YYYY-MM-DD&end=YYYY-MM-DD`.
pub struct HttpEventSource {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
    max_response_bytes: usize,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl HttpEventSource {
    pub fn new(base_url: &str, auth_token: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = Self::parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build event service HTTP client")?;

        Ok(Self {
            client,
            base_url,
            auth_token,
            max_response_bytes: 2 * 1024 * 1024,
            max_retries: 2,
            retry_delay_ms: 400,
        })
    }

    /// Builds a client from settings; `Ok(None)` when no service is configured.
    pub fn from_settings(settings: &EventServiceSettings) -> Result<Option<Self>> {
        let Some(base_url) = settings.base_url.as_deref() else {
            return Ok(None);
        };
        Self::new(
            base_url,
            settings.auth_token.clone(),
            Duration::from_secs(settings.timeout_secs.max(1)),
        )
        .map(Some)
    }

    pub fn events_url(&self, range: DateRange) -> Result<Url> {
        let mut url = self
            .base_url
            .join("events")
            .context("Failed to build events URL")?;
        url.query_pairs_mut()
            .append_pair("start", &range.start.format("%Y-%m-%d").to_string())
            .append_pair("end", &range.end.format("%Y-%m-%d").to_string());
        Ok(url)
    }

    fn parse_base_url(raw: &str) -> Result<Url> {
        let trimmed = raw.trim();
        // join() replaces the last segment unless the base ends with '/'
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let url = Url::parse(&normalized)
            .with_context(|| format!("Invalid event service URL '{}'", trimmed))?;

        let is_loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
        if url.scheme() != "https" && !is_loopback {
            return Err(anyhow!("Event service URL must use HTTPS"));
        }
        Ok(url)
    }

    fn fetch_once(&self, url: &Url) -> Result<Vec<Event>> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .context("Network error during event fetch")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("Event fetch failed with HTTP status {}", status));
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_bytes {
                return Err(anyhow!(
                    "Event response too large ({} bytes > {} bytes)",
                    content_length,
                    self.max_response_bytes
                ));
            }
        }

        let bytes = response
            .bytes()
            .context("Failed to read event response body")?;

        if bytes.len() > self.max_response_bytes {
            return Err(anyhow!(
                "Event response too large ({} bytes > {} bytes)",
                bytes.len(),
                self.max_response_bytes
            ));
        }

        parse_events(&bytes)
    }
}

impl EventSource for HttpEventSource {
    fn fetch_events(&self, range: DateRange) -> Result<Vec<Event>> {
        let url = self.events_url(range)?;
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..=self.max_retries {
            match self.fetch_once(&url) {
                Ok(events) => {
                    log::info!(
                        "Fetched {} events for {}..={}",
                        events.len(),
                        range.start,
                        range.end
                    );
                    return Ok(events);
                }
                Err(err) => {
                    let is_last_attempt = attempt == self.max_retries;
                    if is_last_attempt {
                        last_error = Some(err.context(format!(
                            "Failed to fetch events for {}..={} after {} attempts",
                            range.start,
                            range.end,
                            attempt + 1
                        )));
                    } else {
                        log::warn!("Event fetch attempt {} failed: {}", attempt + 1, err);
                        thread::sleep(Duration::from_millis(self.retry_delay_ms));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Unknown event fetch error")))
    }
}

/// Decodes a JSON array of events, skipping entries that fail validation.
pub fn parse_events(body: &[u8]) -> Result<Vec<Event>> {
    let events: Vec<Event> =
        serde_json::from_slice(body).context("Event response is not a valid event list")?;

    Ok(events
        .into_iter()
        .filter(|event| match event.validate() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Dropping invalid event '{}': {}", event.title, err);
                false
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
        )
    }

    #[test]
    fn test_events_url_keeps_base_path() {
        let source =
            HttpEventSource::new("https://api.example.com/v1", None, Duration::from_secs(5))
                .unwrap();
        let url = source.events_url(range()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/events?start=2024-06-14&end=2024-06-16"
        );
    }

    #[test]
    fn test_rejects_plain_http_for_remote_hosts() {
        let result = HttpEventSource::new("http://api.example.com", None, Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_allows_plain_http_on_loopback() {
        let result =
            HttpEventSource::new("http://localhost:8080/api", None, Duration::from_secs(5));
        assert!(result.is_ok());
    }

    #[test]
    fn test_from_settings_without_url_is_offline() {
        let settings = EventServiceSettings::default();
        assert!(HttpEventSource::from_settings(&settings).unwrap().is_none());
    }

    #[test]
    fn test_parse_events_skips_invalid_entries() {
        let body = br#"[
            {"id": 1, "title": "School pickup", "start": "2024-06-15T15:00:00+00:00", "end": "2024-06-15T15:30:00+00:00"},
            {"id": 2, "title": "", "start": "2024-06-15T16:00:00+00:00", "end": "2024-06-15T17:00:00+00:00"}
        ]"#;
        let events = parse_events(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "School pickup");
        assert_eq!(events[0].id, Some(1));
    }

    #[test]
    fn test_parse_events_rejects_non_list() {
        assert!(parse_events(br#"{"error": "unauthorized"}"#).is_err());
    }
}
