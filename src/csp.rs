//! Content-Security-Policy model and classifier (spec §4.3).
//!
//! A policy is a map from normalized (lower-cased) directive name to an
//! ordered list of source expressions, each tagged with the provenance
//! (header vs. `<meta http-equiv>`) that contributed it. The classifier is a
//! prioritized sequence of predicates over this map; the first matching
//! predicate assigns the result, ordered most-severe to least-severe.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicySource {
    Header,
    Meta,
}

#[derive(Debug, Clone, Serialize)]
pub struct Directive {
    pub sources: Vec<String>,
    pub provenance: PolicySource,
}

/// A merged, normalized CSP, as delivered by the header and/or a `<meta>` tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Policy {
    pub directives: BTreeMap<String, Directive>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CspResult {
    CspImplementedWithNoUnsafe,
    CspImplementedWithUnsafeInline,
    CspImplementedWithUnsafeEval,
    CspImplementedWithUnsafeInlineInStyleSrcOnly,
    CspImplementedWithInsecureScheme,
    CspImplementedButNoDefaultSrcOrScriptSrc,
    CspImplementedWithInsecureSchemeInPassiveContentOnly,
    CspNotImplemented,
    CspHeaderInvalid,
}

const PASSIVE_DIRECTIVES: &[&str] = &["img-src", "media-src", "font-src", "object-src"];

/// Parse one `Content-Security-Policy` header value into directive entries.
/// Returns `None` if the header is present but syntactically empty/invalid
/// (e.g. contains no usable directives at all).
pub fn parse_header(value: &str, into: &mut Policy) -> bool {
    let mut saw_any = false;
    for directive_src in value.split(';') {
        let directive_src = directive_src.trim();
        if directive_src.is_empty() {
            continue;
        }
        let mut parts = directive_src.split_whitespace();
        let Some(name) = parts.next() else { continue };
        let name = name.to_lowercase();
        let sources: Vec<String> = parts.map(|s| s.to_lowercase()).collect();
        saw_any = true;
        into.directives
            .entry(name)
            .or_insert_with(|| Directive { sources: Vec::new(), provenance: PolicySource::Header })
            .sources
            .extend(sources);
    }
    saw_any
}

/// Parse a `<meta http-equiv="Content-Security-Policy" content="...">` value.
pub fn parse_meta(value: &str, into: &mut Policy) -> bool {
    let mut saw_any = false;
    for directive_src in value.split(';') {
        let directive_src = directive_src.trim();
        if directive_src.is_empty() {
            continue;
        }
        let mut parts = directive_src.split_whitespace();
        let Some(name) = parts.next() else { continue };
        let name = name.to_lowercase();
        let sources: Vec<String> = parts.map(|s| s.to_lowercase()).collect();
        saw_any = true;
        into.directives
            .entry(name)
            .or_insert_with(|| Directive { sources: Vec::new(), provenance: PolicySource::Meta })
            .sources
            .extend(sources);
    }
    saw_any
}

impl Policy {
    /// Effective source list for `directive`, falling back to `default-src`
    /// when the directive is not explicitly specified (CSP fallback rule).
    fn effective(&self, directive: &str) -> Option<&[String]> {
        self.directives
            .get(directive)
            .or_else(|| self.directives.get("default-src"))
            .map(|d| d.sources.as_slice())
    }

    fn contains_token(sources: &[String], token: &str) -> bool {
        sources.iter().any(|s| s == token)
    }

    fn contains_insecure_scheme(sources: &[String]) -> bool {
        sources.iter().any(|s| {
            s == "http:" || s == "*" || s.starts_with("http://") || s == "ftp:" || s == "ws:"
        })
    }

    /// Classify this merged policy per the prioritized rule set of §4.3.
    /// `had_header` / `had_meta` distinguish "no policy at all" from "policy
    /// present but header-invalid" when the caller observed an unparseable header.
    pub fn classify(&self, header_seen_but_invalid: bool) -> CspResult {
        if header_seen_but_invalid {
            return CspResult::CspHeaderInvalid;
        }
        if self.directives.is_empty() {
            return CspResult::CspNotImplemented;
        }

        let script_src = self.effective("script-src");
        let style_src = self.effective("style-src");

        if let Some(sources) = script_src {
            if Self::contains_token(sources, "'unsafe-eval'") {
                return CspResult::CspImplementedWithUnsafeEval;
            }
        }

        let script_unsafe_inline = script_src
            .map(|s| Self::contains_token(s, "'unsafe-inline'"))
            .unwrap_or(false);
        if script_unsafe_inline {
            return CspResult::CspImplementedWithUnsafeInline;
        }

        let script_insecure = script_src.map(Self::contains_insecure_scheme).unwrap_or(false);
        if script_insecure {
            return CspResult::CspImplementedWithInsecureScheme;
        }

        if !self.directives.contains_key("default-src") && !self.directives.contains_key("script-src") {
            return CspResult::CspImplementedButNoDefaultSrcOrScriptSrc;
        }

        let style_unsafe_inline = style_src
            .map(|s| Self::contains_token(s, "'unsafe-inline'"))
            .unwrap_or(false);
        if style_unsafe_inline {
            return CspResult::CspImplementedWithUnsafeInlineInStyleSrcOnly;
        }

        let passive_insecure = PASSIVE_DIRECTIVES.iter().any(|directive| {
            self.effective(directive)
                .map(Self::contains_insecure_scheme)
                .unwrap_or(false)
        });
        if passive_insecure {
            return CspResult::CspImplementedWithInsecureSchemeInPassiveContentOnly;
        }

        CspResult::CspImplementedWithNoUnsafe
    }
}
