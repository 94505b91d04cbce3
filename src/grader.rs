//! The grader (spec §4.4): a closed-form, order-insensitive reduction from
//! a set of `TestResult`s to a score and letter grade.

use std::collections::BTreeMap;

use crate::battery::{self, ExpectationOverrides};
use crate::report::{Grade, ScanReport, TestResult, ALGORITHM_VERSION};
use crate::retriever::Requests;

const SCORE_FLOOR: i32 = 0;
const SCORE_CEILING: i32 = 135;
const STARTING_SCORE: i32 = 100;

/// Score-to-grade threshold table (spec §4.4), most permissive first.
const THRESHOLDS: &[(i32, Grade)] = &[
    (100, Grade::APlus),
    (90, Grade::A),
    (85, Grade::AMinus),
    (80, Grade::BPlus),
    (70, Grade::B),
    (65, Grade::BMinus),
    (60, Grade::CPlus),
    (50, Grade::C),
    (45, Grade::CMinus),
    (40, Grade::DPlus),
    (30, Grade::D),
    (25, Grade::DMinus),
];

fn grade_for_score(score: i32) -> Grade {
    THRESHOLDS
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

/// Run the full battery against `requests` and reduce it to a `ScanReport`
/// (spec §4.4). The grader never fails: an empty `tests` map, which only
/// happens upstream of this call on a retrieval failure, is handled by
/// `ScanReport::failure` instead of this function.
pub fn grade(site_key: &str, requests: &Requests, overrides: &ExpectationOverrides) -> ScanReport {
    let tests = battery::run_all(requests, overrides);
    report_from_tests(site_key, requests, tests)
}

fn report_from_tests(
    site_key: &str,
    requests: &Requests,
    tests: BTreeMap<String, TestResult>,
) -> ScanReport {
    let tests_passed = tests.values().filter(|t| t.pass).count();
    let tests_failed = tests.len() - tests_passed;

    let raw_score = STARTING_SCORE + tests.values().map(|t| t.score_modifier).sum::<i32>();
    let score = raw_score.clamp(SCORE_FLOOR, SCORE_CEILING);
    let grade = grade_for_score(score);

    let mut response_headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &requests.headers {
        response_headers.entry(name.clone()).or_default().push(value.clone());
    }

    ScanReport {
        algorithm_version: ALGORITHM_VERSION,
        site_key: site_key.to_string(),
        grade: Some(grade.as_str()),
        score: Some(score),
        status_code: Some(requests.status_code),
        error: None,
        tests_passed,
        tests_failed,
        tests_quantity: tests.len(),
        response_headers,
        tests,
    }
}
