//! `strict-transport-security` test (spec §4.3): `Strict-Transport-Security`
//! header on the HTTPS final response, cross-checked with the preload list.

use serde_json::json;

use crate::report::TestResult;
use crate::retriever::Requests;

use super::modifiers::modifier_for;

pub const NAME: &str = "strict-transport-security";
const DEFAULT_EXPECTATION: &str = "hsts-implemented-max-age-at-least-six-months";
const SIX_MONTHS_SECS: i64 = 15_768_000;

struct Parsed {
    max_age: Option<i64>,
    include_subdomains: bool,
}

fn parse_header(value: &str) -> Option<Parsed> {
    let mut max_age = None;
    let mut include_subdomains = false;
    let mut saw_max_age = false;

    for directive in value.split(';') {
        let directive = directive.trim();
        if directive.is_empty() {
            continue;
        }
        if let Some(v) = directive.strip_prefix("max-age=") {
            saw_max_age = true;
            max_age = v.trim().parse::<i64>().ok();
            if max_age.is_none() {
                return None;
            }
        } else if directive.eq_ignore_ascii_case("includeSubDomains") {
            include_subdomains = true;
        } else if directive.eq_ignore_ascii_case("preload") {
            // Header-level `preload` token is informational; the real
            // signal is List membership, checked against the snapshot.
        } else {
            return None;
        }
    }

    if !saw_max_age {
        return None;
    }

    Some(Parsed { max_age, include_subdomains })
}

pub fn evaluate(req: &Requests, expectation_override: Option<&str>) -> TestResult {
    let expectation = expectation_override.unwrap_or(DEFAULT_EXPECTATION).to_string();

    if !req.is_https() {
        let result = "hsts-not-implemented-no-https";
        return TestResult {
            name: NAME.to_string(),
            expectation,
            result: result.to_string(),
            pass: false,
            score_modifier: modifier_for(NAME, result),
            data: json!({ "preloaded": req.hsts_preload.preloaded }),
            score_description: None,
        };
    }

    let header = req.header("strict-transport-security");

    let result = match header {
        None => {
            if req.hsts_preload.preloaded {
                "hsts-implemented-max-age-at-least-six-months-including-subdomains-preload"
            } else {
                "hsts-not-implemented"
            }
        }
        Some(value) => match parse_header(value) {
            None => "hsts-header-invalid",
            Some(parsed) => {
                let max_age = parsed.max_age.unwrap_or(0);
                if max_age < SIX_MONTHS_SECS {
                    "hsts-implemented-max-age-less-than-six-months"
                } else if parsed.include_subdomains && req.hsts_preload.preloaded {
                    "hsts-implemented-max-age-at-least-six-months-including-subdomains-preload"
                } else {
                    "hsts-implemented-max-age-at-least-six-months"
                }
            }
        },
    };

    let pass = result == expectation
        || result == "hsts-implemented-max-age-at-least-six-months-including-subdomains-preload";
    let score_modifier = modifier_for(NAME, result);

    TestResult {
        name: NAME.to_string(),
        expectation,
        result: result.to_string(),
        pass,
        score_modifier,
        data: json!({ "header": header, "preloaded": req.hsts_preload.preloaded }),
        score_description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::Requests;

    fn base_requests(final_url: &str, headers: Vec<(&str, &str)>, preloaded: bool) -> Requests {
        Requests {
            final_url: final_url.to_string(),
            status_code: 200,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
            body: String::new(),
            cookies: Vec::new(),
            hsts_preload: crate::preload::PreloadLookup {
                preloaded,
                matched_entry: if preloaded { Some("example.test") } else { None },
            },
            robots_txt: None,
            http_probe_status: None,
            http_probe_location: None,
        }
    }

    #[test]
    fn strong_hsts_with_preload_passes() {
        let req = base_requests(
            "https://example.test/",
            vec![("strict-transport-security", "max-age=63072000; includeSubDomains; preload")],
            true,
        );
        let result = evaluate(&req, None);
        assert!(result.pass);
        assert_eq!(
            result.result,
            "hsts-implemented-max-age-at-least-six-months-including-subdomains-preload"
        );
        assert_eq!(result.score_modifier, 0);
    }

    #[test]
    fn missing_header_and_not_preloaded_fails() {
        let req = base_requests("https://example.test/", vec![], false);
        let result = evaluate(&req, None);
        assert!(!result.pass);
        assert_eq!(result.result, "hsts-not-implemented");
        assert_eq!(result.score_modifier, -20);
    }

    #[test]
    fn short_max_age_fails() {
        let req = base_requests(
            "https://example.test/",
            vec![("strict-transport-security", "max-age=100")],
            false,
        );
        let result = evaluate(&req, None);
        assert!(!result.pass);
        assert_eq!(result.result, "hsts-implemented-max-age-less-than-six-months");
    }
}
