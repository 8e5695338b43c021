//! HTTP provider for the local temperature API.
//!
//! One blocking GET per fetch, no retry and no request timeout. Non-success
//! statuses surface as `LoadError::Status` so the message carries the code.

use std::error::Error as StdError;
use std::net::IpAddr;

use tracing::{debug, info, warn};

use super::provider::{LoadError, SeriesProvider};
use crate::domain::HistoricalSeries;

/// Endpoint served by the local temperature API.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/temperature/historical";

/// Fetches the series from a JSON endpoint.
pub struct HttpProvider {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let url = url.into();
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(None)
            .user_agent(concat!("templine/", env!("CARGO_PKG_VERSION")));
        // The API is normally local; proxy env vars must not reroute loopback.
        if is_loopback(&url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| LoadError::Transport(error_chain(&e)))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn get_once(&self) -> Result<HistoricalSeries, LoadError> {
        debug!(url = %self.url, "requesting series");

        let resp = self.client.get(&self.url).send().map_err(|e| {
            warn!(url = %self.url, error = %e, "request failed");
            LoadError::Transport(error_chain(&e))
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "server returned failure status");
            return Err(LoadError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| LoadError::Transport(error_chain(&e)))?;
        let parsed: HistoricalSeries =
            serde_json::from_str(&body).map_err(|e| LoadError::Decode(e.to_string()))?;

        info!(
            points = parsed.len(),
            start = parsed.meta.start_year,
            end = parsed.meta.end_year,
            "series loaded"
        );
        Ok(parsed)
    }
}

impl SeriesProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self) -> Result<HistoricalSeries, LoadError> {
        self.get_once()
    }
}

fn is_loopback(url: &str) -> bool {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !msg.contains(&cause_msg) {
            msg.push_str(": ");
            msg.push_str(&cause_msg);
        }
        source = cause.source();
    }
    msg
}
