//! The four HTTP API endpoints (spec §6).

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task::JoinSet;
use tracing::info;

use crate::cache::{CacheDecision, PersistedRow};
use crate::error::ScanError;
use crate::grader;
use crate::report::ScanReport;
use crate::retriever;
use crate::site::Site;

use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HostQuery {
    pub host: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub urls: Vec<String>,
}

/// Uniform error body for validation failures (spec §6, §7): HTTP 422.
fn validation_error(e: &ScanError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": e.kind(), "message": e.to_string() })),
    )
}

fn summary_json(row: &PersistedRow, details_url: &str) -> Value {
    json!({
        "algorithmVersion": row.algorithm_version,
        "siteKey": row.site_key,
        "startTime": row.started_at.to_rfc3339(),
        "grade": row.grade,
        "score": row.score,
        "statusCode": row.status_code,
        "error": row.error,
        "testsPassed": row.tests_passed,
        "testsFailed": row.tests_failed,
        "testsQuantity": row.tests_quantity,
        "detailsUrl": details_url,
    })
}

fn summary_json_from_report(report: &ScanReport, details_url: &str) -> Value {
    json!({
        "algorithmVersion": report.algorithm_version,
        "siteKey": report.site_key,
        "grade": report.grade,
        "score": report.score,
        "statusCode": report.status_code,
        "error": report.error,
        "testsPassed": report.tests_passed,
        "testsFailed": report.tests_failed,
        "testsQuantity": report.tests_quantity,
        "detailsUrl": details_url,
    })
}

/// Run one scan to completion against `site`, participating in the
/// single-flight/cooldown protocol (spec §5). Returns the winning report
/// whether this caller led the scan or waited for another caller's result.
async fn scan_with_cache(
    state: &AppState,
    site: &Site,
    max_age: std::time::Duration,
) -> Result<ScanReport, ScanError> {
    let site_key = site.site_key();

    loop {
        match state.cache.decide(&site_key, max_age).await {
            CacheDecision::UseCached(row) => {
                return Ok(report_from_row(&row));
            }
            CacheDecision::WaitThen(notify) => {
                notify.notified().await;
                continue;
            }
            CacheDecision::LeadScan => {
                let start = Instant::now();
                info!(site_key = %site_key, "leading scan");
                let outcome = run_scan(state, site).await;
                match outcome {
                    Ok(report) => {
                        state.cache.complete(&site_key, &report, start).await;
                        return Ok(report);
                    }
                    Err(ScanError::ScanCancelled) => {
                        state.cache.abandon(&site_key).await;
                        return Err(ScanError::ScanCancelled);
                    }
                    Err(e) => {
                        let failure = ScanReport::failure(site_key.clone(), e.kind());
                        state.cache.complete(&site_key, &failure, start).await;
                        return Ok(failure);
                    }
                }
            }
        }
    }
}

/// Always re-run a fresh scan, bypassing cooldown (used by `scanFullDetails`
/// and batch endpoints, which need live `tests` data the summary row
/// doesn't retain — spec §6: "persistence holds only the summary").
async fn run_scan(state: &AppState, site: &Site) -> Result<ScanReport, ScanError> {
    let requests = retriever::fetch(site, &state.config).await?;
    Ok(grader::grade(&site.site_key(), &requests, &Default::default()))
}

fn report_from_row(row: &PersistedRow) -> ScanReport {
    ScanReport {
        algorithm_version: row.algorithm_version,
        site_key: row.site_key.clone(),
        grade: row.grade,
        score: row.score,
        status_code: row.status_code,
        error: row.error.clone(),
        tests_passed: row.tests_passed,
        tests_failed: row.tests_failed,
        tests_quantity: row.tests_quantity,
        response_headers: Default::default(),
        tests: Default::default(),
    }
}

/// `POST /api/v2/scan` — cooldown-gated summary.
pub async fn scan(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let site = Site::from_str(&query.host, state.config.allow_private_hosts)
        .map_err(|e| validation_error(&e))?;

    let report = scan_with_cache(&state, &site, state.config.cooldown())
        .await
        .map_err(|e| validation_error(&e))?;

    let details_url = state.details_url(&report.site_key);
    Ok(Json(json!({ "scan": summary_json_from_report(&report, &details_url) })))
}

/// `POST /api/v2/scanFullDetails` — cooldown-gated summary, always followed
/// by a fresh scan to populate `fullDetails`.
pub async fn scan_full_details(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let site = Site::from_str(&query.host, state.config.allow_private_hosts)
        .map_err(|e| validation_error(&e))?;

    scan_with_cache(&state, &site, state.config.cooldown())
        .await
        .map_err(|e| validation_error(&e))?;

    let full = run_scan(&state, &site).await.map_err(|e| validation_error(&e))?;
    let details_url = state.details_url(&full.site_key);

    Ok(Json(json!({
        "scan": summary_json_from_report(&full, &details_url),
        "tests": full.tests,
    })))
}

/// `GET /api/v2/analyze` — `cacheTimeForGet`-gated, includes history.
pub async fn analyze_get(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let site = Site::from_str(&query.host, state.config.allow_private_hosts)
        .map_err(|e| validation_error(&e))?;

    let report = scan_with_cache(&state, &site, state.config.get_cache_age())
        .await
        .map_err(|e| validation_error(&e))?;

    let details_url = state.details_url(&report.site_key);
    let history = state.cache.peek(&report.site_key).await;

    Ok(Json(json!({
        "scan": summary_json_from_report(&report, &details_url),
        "history": history.iter().map(|row| summary_json(row, &details_url)).collect::<Vec<_>>(),
    })))
}

/// `POST /api/v2/analyze` — cooldown-gated, includes history and fresh full details.
pub async fn analyze_post(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let site = Site::from_str(&query.host, state.config.allow_private_hosts)
        .map_err(|e| validation_error(&e))?;

    scan_with_cache(&state, &site, state.config.cooldown())
        .await
        .map_err(|e| validation_error(&e))?;

    let full = run_scan(&state, &site).await.map_err(|e| validation_error(&e))?;
    let details_url = state.details_url(&full.site_key);
    let history = state.cache.peek(&full.site_key).await;

    Ok(Json(json!({
        "scan": summary_json_from_report(&full, &details_url),
        "tests": full.tests,
        "history": history.iter().map(|row| summary_json(row, &details_url)).collect::<Vec<_>>(),
    })))
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scan: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tests: Option<Value>,
}

/// Canonicalizes every raw batch input into a siteKey, deduping by canonical
/// form (case/whitespace-insensitive, spec §8 property 7) and preserving
/// first-seen order. Split out from `scan_batch_full_details` so the dedup
/// logic is testable without performing any network I/O.
pub fn dedup_canonical_site_keys(
    urls: &[String],
    allow_private_hosts: bool,
) -> (Vec<String>, Vec<(String, ScanError)>) {
    let mut canonical_order: Vec<String> = Vec::new();
    let mut canonical_keys: HashSet<String> = HashSet::new();
    let mut invalid_inputs: Vec<(String, ScanError)> = Vec::new();

    for raw in urls {
        match Site::from_str(raw, allow_private_hosts) {
            Ok(site) => {
                let key = site.site_key();
                if canonical_keys.insert(key.clone()) {
                    canonical_order.push(key);
                }
            }
            Err(e) => invalid_inputs.push((raw.clone(), e)),
        }
    }

    (canonical_order, invalid_inputs)
}

/// `POST /api/v2/scanBatchFullDetails` — per-URL `scanFullDetails` semantics,
/// `MAX_BATCH_SIZE` = 10, `DEFAULT_CONCURRENCY` = 5, dedup by canonical form
/// (spec §5, testable property 7).
pub async fn scan_batch_full_details(
    State(state): State<AppState>,
    Json(body): Json<BatchRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.urls.len() > state.config.max_batch_size {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid-hostname",
                "message": format!("batch exceeds max size {}", state.config.max_batch_size),
            })),
        ));
    }

    // Dedup by canonical siteKey (case/whitespace-insensitive per §8 property 7):
    // one scan per distinct canonical form, regardless of how many raw aliases
    // in the request body mapped to it.
    let (canonical_order, invalid_inputs) =
        dedup_canonical_site_keys(&body.urls, state.config.allow_private_hosts);

    let concurrency = state.config.batch_concurrency;
    let mut pending: JoinSet<(String, Result<ScanReport, ScanError>)> = JoinSet::new();
    let mut remaining = canonical_order.clone();
    let mut results: HashMap<String, BatchEntry> = HashMap::new();

    while !remaining.is_empty() || !pending.is_empty() {
        while pending.len() < concurrency {
            let Some(key) = remaining.pop() else { break };
            let state = state.clone();
            pending.spawn(async move {
                let site = Site::from_str(&key, state.config.allow_private_hosts);
                let site = site.expect("already validated during dedup pass");
                let outcome = run_scan(&state, &site).await;
                (key, outcome)
            });
        }

        let Some(joined) = pending.join_next().await else { break };
        let (key, outcome) = joined.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "scan-failed", "message": e.to_string() })),
            )
        })?;
        let entry = match outcome {
            Ok(report) => {
                let details_url = state.details_url(&report.site_key);
                BatchEntry {
                    success: true,
                    error: None,
                    message: None,
                    scan: Some(summary_json_from_report(&report, &details_url)),
                    tests: Some(serde_json::to_value(&report.tests).unwrap_or(Value::Null)),
                }
            }
            Err(e) => BatchEntry {
                success: false,
                error: Some(e.kind().to_string()),
                message: Some(e.to_string()),
                scan: None,
                tests: None,
            },
        };
        results.insert(key, entry);
    }

    // Keyed by the normalized (canonical) input per spec.md:98 — one entry
    // per distinct siteKey, not one per raw alias that mapped to it.
    let mut by_input: HashMap<String, Value> = HashMap::new();
    for (canonical, entry) in &results {
        by_input.insert(canonical.clone(), serde_json::to_value(entry).unwrap());
    }
    for (raw, e) in invalid_inputs {
        by_input.insert(
            raw,
            json!({ "success": false, "error": e.kind(), "message": e.to_string() }),
        );
    }

    Ok(Json(json!(by_input)))
}
