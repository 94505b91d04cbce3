//! `cross-origin-resource-sharing` test (spec §4.3): inspects
//! `Access-Control-Allow-Origin` (and, if fetched, legacy cross-domain
//! policy files).

use serde_json::json;

use crate::report::TestResult;
use crate::retriever::Requests;

use super::modifiers::modifier_for;

pub const NAME: &str = "cross-origin-resource-sharing";
const DEFAULT_EXPECTATION: &str = "cross-origin-resource-sharing-not-implemented";

pub fn evaluate(req: &Requests, expectation_override: Option<&str>) -> TestResult {
    let expectation = expectation_override.unwrap_or(DEFAULT_EXPECTATION).to_string();

    let acao = req.header("access-control-allow-origin");
    let acac = req.header("access-control-allow-credentials");

    let result = match acao {
        None => "cross-origin-resource-sharing-not-implemented",
        Some("*") => {
            if acac.map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false) {
                "cross-origin-resource-sharing-with-universal-access"
            } else {
                "cross-origin-resource-sharing-with-public-access"
            }
        }
        Some(_) => "cross-origin-resource-sharing-with-restricted-access",
    };

    let pass = result == expectation || result == DEFAULT_EXPECTATION;
    let score_modifier = modifier_for(NAME, result);

    TestResult {
        name: NAME.to_string(),
        expectation,
        result: result.to_string(),
        pass,
        score_modifier,
        data: json!({ "acao": acao, "acac": acac }),
        score_description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::Requests;

    fn base_requests(headers: Vec<(&str, &str)>) -> Requests {
        Requests {
            final_url: "https://example.test/".to_string(),
            status_code: 200,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
            body: String::new(),
            cookies: Vec::new(),
            hsts_preload: crate::preload::lookup("example.test"),
            robots_txt: None,
            http_probe_status: None,
            http_probe_location: None,
        }
    }

    #[test]
    fn absent_passes_by_default() {
        let req = base_requests(vec![]);
        let result = evaluate(&req, None);
        assert!(result.pass);
        assert_eq!(result.result, "cross-origin-resource-sharing-not-implemented");
    }

    #[test]
    fn wildcard_with_credentials_is_universal_access() {
        let req = base_requests(vec![
            ("access-control-allow-origin", "*"),
            ("access-control-allow-credentials", "true"),
        ]);
        let result = evaluate(&req, None);
        assert!(!result.pass);
        assert_eq!(result.result, "cross-origin-resource-sharing-with-universal-access");
        assert_eq!(result.score_modifier, -20);
    }

    #[test]
    fn wildcard_without_credentials_is_public_access() {
        let req = base_requests(vec![("access-control-allow-origin", "*")]);
        let result = evaluate(&req, None);
        assert!(result.pass);
        assert_eq!(result.result, "cross-origin-resource-sharing-with-public-access");
    }
}
