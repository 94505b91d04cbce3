//! Bounded HTML parsing for SRI and meta-CSP/meta-referrer (spec §4.3, §5:
//! "HTML parsing for SRI and meta-CSP operates on the bounded body only").

use scraper::{Html, Selector};

/// One `<script src>` element observed in the delivered HTML.
#[derive(Debug, Clone)]
pub struct ScriptSrc {
    pub src: String,
    pub integrity: Option<String>,
    pub crossorigin: Option<String>,
}

/// Parse every `<meta http-equiv="Content-Security-Policy" content="...">`
/// tag's `content` value, in document order.
pub fn meta_csp_contents(body: &str) -> Vec<String> {
    let doc = Html::parse_document(body);
    let selector = Selector::parse(r#"meta[http-equiv]"#).unwrap();
    doc.select(&selector)
        .filter(|el| {
            el.value()
                .attr("http-equiv")
                .map(|v| v.eq_ignore_ascii_case("Content-Security-Policy"))
                .unwrap_or(false)
        })
        .filter_map(|el| el.value().attr("content").map(|s| s.to_string()))
        .collect()
}

/// Parse `<meta name="referrer" content="...">`, returning the last one
/// present (later tags override earlier ones per the HTML spec's processing
/// model for repeated meta referrer tags).
pub fn meta_referrer(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    let selector = Selector::parse(r#"meta[name]"#).unwrap();
    doc.select(&selector)
        .filter(|el| {
            el.value()
                .attr("name")
                .map(|v| v.eq_ignore_ascii_case("referrer"))
                .unwrap_or(false)
        })
        .filter_map(|el| el.value().attr("content").map(|s| s.to_string()))
        .last()
}

/// Every `<script src="...">` element, with its `integrity`/`crossorigin`
/// attributes if present. Inline scripts (no `src`) are not SRI-relevant and
/// are skipped.
pub fn script_sources(body: &str) -> Vec<ScriptSrc> {
    let doc = Html::parse_document(body);
    let selector = Selector::parse("script[src]").unwrap();
    doc.select(&selector)
        .filter_map(|el| {
            el.value().attr("src").map(|src| ScriptSrc {
                src: src.to_string(),
                integrity: el.value().attr("integrity").map(|s| s.to_string()),
                crossorigin: el.value().attr("crossorigin").map(|s| s.to_string()),
            })
        })
        .collect()
}
