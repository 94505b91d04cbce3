//! Report and test-result shapes (spec §3, §6).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Algorithm version stamped on every report (spec §9 open question,
/// resolved in DESIGN.md: `4` is authoritative).
pub const ALGORITHM_VERSION: u32 = 4;

/// Outcome of one test (spec §3 `TestResult`).
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub expectation: String,
    pub result: String,
    pub pass: bool,
    pub score_modifier: i32,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_description: Option<String>,
}

impl TestResult {
    /// `scoreDescription` is a human string used internally for the grader's
    /// trail; it is stripped before API/CLI emission (spec §3).
    pub fn strip_description(mut self) -> Self {
        self.score_description = None;
        self
    }
}

/// Letter grades, ordered worst to best to simplify monotonicity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    F,
    DMinus,
    D,
    DPlus,
    CMinus,
    C,
    CPlus,
    BMinus,
    B,
    BPlus,
    AMinus,
    A,
    APlus,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }
}

/// The full scan report (spec §3 `ScanReport`).
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub algorithm_version: u32,
    pub site_key: String,
    pub grade: Option<&'static str>,
    pub score: Option<i32>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub tests_passed: usize,
    pub tests_failed: usize,
    pub tests_quantity: usize,
    pub response_headers: BTreeMap<String, Vec<String>>,
    pub tests: BTreeMap<String, TestResult>,
}

impl ScanReport {
    /// A retrieval-failure report: grade/score null, empty tests map,
    /// `error` set (spec §4.4, §7).
    pub fn failure(site_key: String, error_kind: &str) -> Self {
        ScanReport {
            algorithm_version: ALGORITHM_VERSION,
            site_key,
            grade: None,
            score: None,
            status_code: None,
            error: Some(error_kind.to_string()),
            tests_passed: 0,
            tests_failed: 0,
            tests_quantity: 0,
            response_headers: BTreeMap::new(),
            tests: BTreeMap::new(),
        }
    }
}

/// The CLI/API wire envelope: `{"scan": <report-minus-tests>, "tests": {...}}`.
#[derive(Debug, Serialize)]
pub struct ScanEnvelope<'a> {
    pub scan: ScanSummary<'a>,
    pub tests: &'a BTreeMap<String, TestResult>,
}

#[derive(Debug, Serialize)]
pub struct ScanSummary<'a> {
    pub algorithm_version: u32,
    pub site_key: &'a str,
    pub grade: Option<&'static str>,
    pub score: Option<i32>,
    pub status_code: Option<u16>,
    pub error: Option<&'a str>,
    pub tests_passed: usize,
    pub tests_failed: usize,
    pub tests_quantity: usize,
    pub response_headers: &'a BTreeMap<String, Vec<String>>,
}

impl<'a> From<&'a ScanReport> for ScanEnvelope<'a> {
    fn from(r: &'a ScanReport) -> Self {
        ScanEnvelope {
            scan: ScanSummary {
                algorithm_version: r.algorithm_version,
                site_key: &r.site_key,
                grade: r.grade,
                score: r.score,
                status_code: r.status_code,
                error: r.error.as_deref(),
                tests_passed: r.tests_passed,
                tests_failed: r.tests_failed,
                tests_quantity: r.tests_quantity,
                response_headers: &r.response_headers,
            },
            tests: &r.tests,
        }
    }
}
