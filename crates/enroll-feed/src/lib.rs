// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use enroll_app::ApplicationRecord;
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_FEED_URL: &str = "https://raw.githubusercontent.com/RashitKhamidullin/Educhain-Assignment/refs/heads/main/applications";

/// Blocking reader for the applications feed. Cloning shares the underlying
/// connection pool, so a clone can be moved onto a worker thread.
#[derive(Debug, Clone)]
pub struct Client {
    url: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = parse_feed_url(url)?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { url, http })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn fetch_applications(&self) -> Result<Vec<ApplicationRecord>> {
        let started = Instant::now();
        tracing::info!(url = %self.url, "fetching applications");

        let response = self
            .http
            .get(self.url.clone())
            .send()
            .map_err(|error| connection_error(self.url.as_str(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let body = response.text().context("read applications response body")?;
        let records = decode_applications(&body)?;
        tracing::info!(
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched applications"
        );
        Ok(records)
    }
}

pub fn parse_feed_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("feed.url must not be empty");
    }
    let url = Url::parse(trimmed).with_context(|| format!("invalid feed url {trimmed:?}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("feed url {trimmed:?} uses unsupported scheme {other:?}; use http or https"),
    }
}

/// The body must be a JSON array. Entries that are not objects become blank
/// records rather than failing the whole load.
pub fn decode_applications(body: &str) -> Result<Vec<ApplicationRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("decode applications response")?;
    let serde_json::Value::Array(entries) = value else {
        bail!("applications response is not a JSON array");
    };

    let records = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(index, %error, "blank record for malformed entry");
                ApplicationRecord::default()
            }
        })
        .collect();
    Ok(records)
}

fn connection_error(url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("timed out reading {url} ({error})");
    }
    anyhow!("cannot reach {url} -- check the network or [feed].url ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}
