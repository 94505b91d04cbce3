//! The retriever (spec §4.2): produces a `Requests` bundle from a `Site` by
//! performing a fixed, bounded set of probes. This is the only layer in the
//! system that performs I/O; every other layer is a pure function over the
//! snapshot this module returns.

pub mod html;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::config::ScannerConfig;
use crate::cookies::ObservedCookie;
use crate::error::ScanError;
use crate::preload::{self, PreloadLookup};
use crate::site::Site;

/// One observed `(name, value)` response header, name lower-cased,
/// multi-value semantics preserved by repeating the name.
pub type HeaderPair = (String, String);

/// Snapshot of every observation the retriever collected for one scan
/// (spec §3 `Requests`). Owns its response bodies; read-only to every
/// downstream consumer.
#[derive(Debug, Clone)]
pub struct Requests {
    pub final_url: String,
    pub status_code: u16,
    pub headers: Vec<HeaderPair>,
    pub body: String,
    pub cookies: Vec<ObservedCookie>,
    pub hsts_preload: PreloadLookup,
    pub robots_txt: Option<String>,
    pub http_probe_status: Option<u16>,
    pub http_probe_location: Option<String>,
}

impl Requests {
    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All header values matching `name`, case-insensitively, in order.
    pub fn header_values<'a>(&'a self, name: &str) -> Vec<&'a str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .filter(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn is_https(&self) -> bool {
        self.final_url.starts_with("https://")
    }
}

const USER_AGENT: &str = concat!("httpobs-scanner/", env!("CARGO_PKG_VERSION"));

fn build_client(config: &ScannerConfig) -> Result<Client, ScanError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.probe_timeout())
        .build()
        .map_err(ScanError::from)
}

/// Run every probe of §4.2 for `site` and return the resulting `Requests`.
pub async fn fetch(site: &Site, config: &ScannerConfig) -> Result<Requests, ScanError> {
    let client = build_client(config)?;

    let scan_timeout = config.scan_timeout();
    tokio::time::timeout(scan_timeout, fetch_inner(&client, site, config))
        .await
        .map_err(|_| ScanError::ScanTimeout)?
}

async fn fetch_inner(
    client: &Client,
    site: &Site,
    config: &ScannerConfig,
) -> Result<Requests, ScanError> {
    let (final_url, status_code, headers, body, cookies) =
        follow_https_chain(client, site, config).await?;

    let final_host = Url::parse(&final_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| site.host().to_string());

    let (http_probe, robots_txt) = tokio::join!(
        plain_http_probe(client, site),
        fetch_robots_txt(client, &final_url, config),
    );
    let (http_probe_status, http_probe_location) = http_probe;
    let hsts_preload = preload::lookup(&final_host);

    Ok(Requests {
        final_url,
        status_code,
        headers,
        body,
        cookies,
        hsts_preload,
        robots_txt,
        http_probe_status,
        http_probe_location,
    })
}

/// Probe 1 (§4.2 item 1): HTTPS GET following redirects up to
/// `config.max_redirects`, capturing every `Set-Cookie` along the chain
/// tagged with the scheme/host of the hop that emitted it.
async fn follow_https_chain(
    client: &Client,
    site: &Site,
    config: &ScannerConfig,
) -> Result<(String, u16, Vec<HeaderPair>, String, Vec<ObservedCookie>), ScanError> {
    let mut current = site.base_url("https");
    let mut cookies = Vec::new();

    for hop in 0..=config.max_redirects {
        let url = Url::parse(&current)?;
        let scheme = url.scheme().to_string();
        let host = url.host_str().unwrap_or_default().to_string();

        debug!(hop, url = %current, "https probe hop");

        let response = client.get(url.clone()).send().await.map_err(|e| {
            if e.is_connect() {
                ScanError::ConnectionError
            } else {
                ScanError::from(e)
            }
        })?;

        let status = response.status();
        for raw in response.headers().get_all(reqwest::header::SET_COOKIE) {
            if let Ok(raw) = raw.to_str() {
                if let Some(cookie) = ObservedCookie::parse(raw, &scheme, &host) {
                    cookies.push(cookie);
                }
            }
        }

        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            match location {
                Some(loc) if hop < config.max_redirects => {
                    current = url
                        .join(&loc)
                        .map(|u| u.to_string())
                        .unwrap_or(loc);
                    continue;
                }
                Some(_) => return Err(ScanError::RedirectionLoop),
                None => {
                    // Redirect status with no Location: treat as final.
                    let (final_url, status_code, headers, body) =
                        finalize_response(response, status, config).await?;
                    return Ok((final_url, status_code, headers, body, cookies));
                }
            }
        }

        let (final_url, status_code, headers, body) = finalize_response(response, status, config).await?;
        return Ok((final_url, status_code, headers, body, cookies));
    }

    Err(ScanError::RedirectionLoop)
}

/// Finalizes a terminal HTTPS-probe response, truncating the body to
/// `config.max_body_bytes` (spec §4.2/§5's bounded-body requirement; matches
/// `fetch_robots_txt`'s cap below).
async fn finalize_response(
    response: reqwest::Response,
    status: StatusCode,
    config: &ScannerConfig,
) -> Result<(String, u16, Vec<HeaderPair>, String), ScanError> {
    let final_url = response.url().to_string();
    let headers: Vec<HeaderPair> = response
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                v.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    let bytes = response.bytes().await.map_err(ScanError::from)?;
    let capped = &bytes[..bytes.len().min(config.max_body_bytes)];
    let body = String::from_utf8_lossy(capped).to_string();

    Ok((final_url, status.as_u16(), headers, body))
}

/// Probe 2 (§4.2 item 2): plain HTTP GET, no redirect following, body discarded.
/// Best-effort: network failure here does not fail the scan.
async fn plain_http_probe(client: &Client, site: &Site) -> (Option<u16>, Option<String>) {
    let url = site.base_url("http");
    match client.get(&url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            (Some(status), location)
        }
        Err(e) => {
            warn!(error = %e, "plain http probe failed; tolerated");
            (None, None)
        }
    }
}

/// Probe 3 (§4.2 item 3): robots.txt against the final URL's origin, bounded
/// size, best-effort.
async fn fetch_robots_txt(
    client: &Client,
    final_url: &str,
    config: &ScannerConfig,
) -> Option<String> {
    let base = Url::parse(final_url).ok()?;
    let robots_url = base.join("/robots.txt").ok()?;

    let response = client
        .get(robots_url)
        .timeout(Duration::from_secs(config.probe_timeout_secs.min(5)))
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        return None;
    }

    let bytes = response.bytes().await.ok()?;
    let capped = &bytes[..bytes.len().min(config.max_body_bytes)];
    Some(String::from_utf8_lossy(capped).to_string())
}
