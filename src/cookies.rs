//! Cookie attribute model shared by the retriever and the `cookies` test
//! (spec §3 `Requests.session cookies`, §4.3 cookies test, §9 design note:
//! "model as a list of `(name, attributes, setOnScheme, setOnHost)` tuples,
//! not a keyed map").

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// `SameSite` as declared by a `Set-Cookie` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// One `Set-Cookie` observation, captured at a specific hop of the redirect chain.
#[derive(Debug, Clone, Serialize)]
pub struct ObservedCookie {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub expires: Option<String>,
    pub max_age: Option<i64>,
    /// Scheme (`http` or `https`) of the hop that emitted this cookie.
    pub set_on_scheme: String,
    /// Host of the hop that emitted this cookie.
    pub set_on_host: String,
}

/// Names matching any of these (case-insensitive substring) are treated as
/// session-identifying cookies and graded more strictly.
static SESSION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(sessionid|sess|session|phpsessid|jsessionid|asp\.net_sessionid|connect\.sid|_session|sid)$")
        .unwrap()
});

impl ObservedCookie {
    pub fn looks_like_session_cookie(&self) -> bool {
        SESSION_NAME_RE.is_match(&self.name)
    }

    /// Parse a single `Set-Cookie` header value into an `ObservedCookie`,
    /// recording which scheme/host hop emitted it.
    pub fn parse(raw: &str, set_on_scheme: &str, set_on_host: &str) -> Option<Self> {
        let parsed = cookie::Cookie::parse(raw.to_string()).ok()?;

        let same_site = parsed.same_site().map(|s| match s {
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::None => SameSite::None,
        });

        Some(ObservedCookie {
            name: parsed.name().to_string(),
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            same_site,
            path: parsed.path().map(|s| s.to_string()),
            domain: parsed.domain().map(|s| s.to_string()),
            expires: parsed.expires_datetime().map(|d| d.to_string()),
            max_age: parsed.max_age().map(|d| d.whole_seconds()),
            set_on_scheme: set_on_scheme.to_string(),
            set_on_host: set_on_host.to_string(),
        })
    }
}
