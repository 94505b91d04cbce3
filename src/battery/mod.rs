//! The test battery (spec §4.3, §9 design note: "best expressed as a table
//! of `(name, expectation_default, evaluator, result_enum, modifier_table)`
//! records iterated by the grader; avoid class hierarchies"). Each evaluator
//! is a pure function over `Requests`; none perform I/O or share state.

pub mod cors_test;
pub mod hsts_test;
pub mod modifiers;

use std::collections::BTreeMap;

use crate::report::TestResult;
use crate::retriever::Requests;

/// Per-test expectation override map, keyed by test name (spec §3
/// "Expectation override"; the `(siteKey, testName)` half of the key is the
/// caller's responsibility — this battery only needs the per-test half for
/// one already-identified site).
pub type ExpectationOverrides = BTreeMap<String, String>;

type Evaluator = fn(&Requests, Option<&str>) -> TestResult;

const REGISTRY: &[(&str, Evaluator)] = &[
    (csp_test::NAME, csp_test::evaluate),
    (cookies_test::NAME, cookies_test::evaluate),
    (cors_test::NAME, cors_test::evaluate),
    (referrer_test::NAME, referrer_test::evaluate),
    (hsts_test::NAME, hsts_test::evaluate),
    (sri_test::NAME, sri_test::evaluate),
    (xcto_test::NAME, xcto_test::evaluate),
    (xfo_test::NAME, xfo_test::evaluate),
    (redirection_test::NAME, redirection_test::evaluate),
    (corp_test::NAME, corp_test::evaluate),
];

/// Run every test in the registry against `requests`, applying any
/// per-test expectation override. Tests are independent and may be run in
/// any order with identical results (spec §5).
pub fn run_all(requests: &Requests, overrides: &ExpectationOverrides) -> BTreeMap<String, TestResult> {
    REGISTRY
        .iter()
        .map(|(name, evaluate)| {
            let override_value = overrides.get(*name).map(|s| s.as_str());
            (name.to_string(), evaluate(requests, override_value))
        })
        .collect()
}
