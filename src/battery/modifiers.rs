//! Single frozen score-modifier table (spec §4.3 design note: "Score
//! modifiers are per-result and are declared in a single table in the
//! implementation"; §9: "the table must be frozen in one place and tested
//! against golden reports").
//!
//! Every test evaluator in `battery/` looks up its own modifier here instead
//! of hard-coding one inline, so the whole scoring surface can be audited
//! (and adjusted) from one file. Bonuses are intentionally rare: per the
//! Data Model invariant, a pass on a well-configured default case carries
//! modifier 0; the sole exception implemented here is a strong CSP (§9's
//! explicit example), consistent with the golden scenarios of spec §8.

/// Look up the modifier for `(test_name, result)`. Panics if the pair is not
/// a declared result for that test — this is a programmer error (every
/// evaluator must only ever produce results it declares here), not a
/// runtime condition.
pub fn modifier_for(test_name: &str, result: &str) -> i32 {
    match (test_name, result) {
        ("content-security-policy", "csp-implemented-with-no-unsafe") => 5,
        ("content-security-policy", "csp-implemented-with-unsafe-inline-in-style-src-only") => -5,
        ("content-security-policy", "csp-implemented-with-insecure-scheme-in-passive-content-only") => -5,
        ("content-security-policy", "csp-implemented-but-no-default-src-or-script-src") => -20,
        ("content-security-policy", "csp-implemented-with-insecure-scheme") => -20,
        ("content-security-policy", "csp-implemented-with-unsafe-inline") => -20,
        ("content-security-policy", "csp-implemented-with-unsafe-eval") => -20,
        ("content-security-policy", "csp-not-implemented") => -25,
        ("content-security-policy", "csp-header-invalid") => -25,

        ("cookies", "cookies-secure-with-httponly-sessions") => 0,
        ("cookies", "cookies-not-found") => 0,
        ("cookies", "cookies-without-samesite-flag") => -5,
        ("cookies", "cookies-without-secure-flag") => -10,
        ("cookies", "cookies-session-without-httponly-flag") => -20,

        ("cross-origin-resource-sharing", "cross-origin-resource-sharing-not-implemented") => 0,
        ("cross-origin-resource-sharing", "cross-origin-resource-sharing-with-restricted-access") => 0,
        ("cross-origin-resource-sharing", "cross-origin-resource-sharing-with-public-access") => 0,
        ("cross-origin-resource-sharing", "cross-origin-resource-sharing-with-universal-access") => -20,
        ("cross-origin-resource-sharing", "cross-origin-resource-sharing-header-invalid") => -20,

        ("referrer-policy", "referrer-policy-private") => 0,
        ("referrer-policy", "referrer-policy-same-origin") => 0,
        ("referrer-policy", "referrer-policy-strict-origin") => 0,
        ("referrer-policy", "referrer-policy-strict-origin-when-cross-origin") => 0,
        ("referrer-policy", "referrer-policy-no-referrer-when-downgrade") => -5,
        ("referrer-policy", "referrer-policy-origin") => -5,
        ("referrer-policy", "referrer-policy-origin-when-cross-origin") => -5,
        ("referrer-policy", "referrer-policy-not-implemented") => -5,
        ("referrer-policy", "referrer-policy-unsafe-url") => -20,
        ("referrer-policy", "referrer-policy-header-invalid") => -10,

        ("strict-transport-security", "hsts-implemented-max-age-at-least-six-months") => 0,
        ("strict-transport-security", "hsts-implemented-max-age-at-least-six-months-including-subdomains-preload") => 0,
        ("strict-transport-security", "hsts-implemented-max-age-less-than-six-months") => -10,
        ("strict-transport-security", "hsts-not-implemented") => -20,
        ("strict-transport-security", "hsts-not-implemented-no-https") => -20,
        ("strict-transport-security", "hsts-header-invalid") => -20,

        ("subresource-integrity", "sri-implemented-and-external-scripts-loaded-securely") => 0,
        ("subresource-integrity", "sri-not-implemented-response-not-html") => 0,
        ("subresource-integrity", "sri-not-implemented-no-script-tags-loaded") => 0,
        ("subresource-integrity", "sri-not-implemented-but-all-scripts-loaded-from-secure-origin") => -5,
        ("subresource-integrity", "sri-implemented-but-not-all-scripts-loaded-securely") => -20,
        ("subresource-integrity", "sri-not-implemented-and-external-scripts-not-loaded-securely") => -20,

        ("x-content-type-options", "x-content-type-options-nosniff") => 0,
        ("x-content-type-options", "x-content-type-options-not-implemented") => -5,
        ("x-content-type-options", "x-content-type-options-header-invalid") => -5,

        ("x-frame-options", "x-frame-options-sameorigin-or-deny") => 0,
        ("x-frame-options", "x-frame-options-implemented-via-csp") => 0,
        ("x-frame-options", "x-frame-options-allow-from-origin") => -10,
        ("x-frame-options", "x-frame-options-not-implemented") => -20,
        ("x-frame-options", "x-frame-options-header-invalid") => -20,

        ("redirection", "redirection-to-https") => 0,
        ("redirection", "redirection-not-needed-no-http") => 0,
        ("redirection", "redirection-not-to-https") => -20,
        ("redirection", "redirection-missing") => -20,

        ("cross-origin-resource-policy", "cross-origin-resource-policy-not-implemented") => 0,
        ("cross-origin-resource-policy", "cross-origin-resource-policy-implemented-with-cross-origin") => 0,
        ("cross-origin-resource-policy", "cross-origin-resource-policy-implemented-with-same-site") => 0,
        ("cross-origin-resource-policy", "cross-origin-resource-policy-implemented-with-same-origin") => 0,
        ("cross-origin-resource-policy", "cross-origin-resource-policy-header-invalid") => -5,

        _ => panic!("no frozen modifier declared for ({test_name}, {result})"),
    }
}
