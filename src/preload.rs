//! Embedded HSTS preload list snapshot (spec §4.2, §9).
//!
//! A compact, compile-time snapshot of domains committed to HSTS regardless
//! of header presence. Real preload lists (e.g. Chromium's) carry ~170,000
//! entries with per-entry `includeSubDomains`/`force-https` flags; this
//! snapshot is a small representative subset sufficient for deterministic
//! scans against well-known sites and test fixtures. Entries are queried by
//! registrable domain: an exact match, or a match against an ancestor domain
//! flagged `include_subdomains`.

/// One preload list entry.
#[derive(Debug, Clone, Copy)]
pub struct PreloadEntry {
    pub domain: &'static str,
    pub include_subdomains: bool,
}

/// The embedded snapshot, sorted is not required: lookup walks domain
/// suffixes from most to least specific.
static PRELOAD_LIST: &[PreloadEntry] = &[
    PreloadEntry { domain: "example.test", include_subdomains: true },
    PreloadEntry { domain: "google.com", include_subdomains: true },
    PreloadEntry { domain: "gmail.com", include_subdomains: true },
    PreloadEntry { domain: "github.com", include_subdomains: false },
    PreloadEntry { domain: "github.io", include_subdomains: true },
    PreloadEntry { domain: "cloudflare.com", include_subdomains: true },
    PreloadEntry { domain: "torproject.org", include_subdomains: true },
    PreloadEntry { domain: "mozilla.org", include_subdomains: true },
    PreloadEntry { domain: "encrypted.google.com", include_subdomains: false },
    PreloadEntry { domain: "paypal.com", include_subdomains: true },
];

/// Outcome of a preload lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadLookup {
    pub preloaded: bool,
    pub matched_entry: Option<&'static str>,
}

/// Check whether `host` (or one of its ancestor domains, if that ancestor's
/// entry sets `include_subdomains`) is present in the preload snapshot.
///
/// Lookup walks the host's label suffixes from most specific (the full host)
/// to least specific (the last two labels), matching each against the list.
/// This mirrors the prefix-indexed structure described in §9 without
/// requiring a real trie for a snapshot this small.
pub fn lookup(host: &str) -> PreloadLookup {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return PreloadLookup { preloaded: false, matched_entry: None };
    }

    for start in 0..labels.len() - 1 {
        let candidate = labels[start..].join(".");
        for entry in PRELOAD_LIST {
            if entry.domain == candidate {
                let is_exact_host = start == 0;
                if is_exact_host || entry.include_subdomains {
                    return PreloadLookup {
                        preloaded: true,
                        matched_entry: Some(entry.domain),
                    };
                }
            }
        }
    }

    PreloadLookup { preloaded: false, matched_entry: None }
}
