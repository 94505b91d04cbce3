//! Site canonicalization (spec §4.1).
//!
//! A `Site` is the canonical `host[:port][/path]` key derived from an
//! arbitrary user-supplied string. It is the sole handle passed between the
//! retriever, the test battery, and the grader.

use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScanError;

/// RFC-1035 label: letters/digits/hyphens, not starting or ending with a hyphen.
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    host: String,
    port: Option<u16>,
    path: Option<String>,
}

impl Site {
    /// Parse and canonicalize an arbitrary user string into a `Site`.
    ///
    /// Strips any `http://`/`https://` scheme, credentials, query, and
    /// fragment; lower-cases the host; preserves a non-empty path verbatim;
    /// parses an optional port. Rejects empty input, whitespace, hostnames
    /// failing the grammar, out-of-range ports, bare IP literals, and hosts
    /// that are not at least `localhost` or dotted.
    pub fn from_str(input: &str, allow_private_hosts: bool) -> Result<Self, ScanError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace()) {
            return Err(ScanError::InvalidHostname);
        }

        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);

        // Drop credentials (`user:pass@`), query, and fragment.
        let without_creds = match without_scheme.rsplit_once('@') {
            Some((_, rest)) => rest,
            None => without_scheme,
        };
        let without_fragment = without_creds.split('#').next().unwrap_or("");
        let without_query = without_fragment.split('?').next().unwrap_or("");

        // Split into authority and path at the first `/`.
        let (authority, path) = match without_query.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (without_query, None),
        };

        if authority.is_empty() {
            return Err(ScanError::InvalidHostname);
        }

        let (host_part, port) = match authority.rsplit_once(':') {
            Some((h, p)) => {
                let port: u16 = p.parse().map_err(|_| ScanError::InvalidPort)?;
                if port == 0 {
                    return Err(ScanError::InvalidPort);
                }
                (h, Some(port))
            }
            None => (authority, None),
        };

        let host = host_part.to_lowercase();
        validate_hostname(&host, allow_private_hosts)?;

        let path = path
            .map(|p| p.trim_end_matches('/'))
            .filter(|p| !p.is_empty())
            .map(|p| format!("/{p}"));

        Ok(Site { host, port, path })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Canonical `host[:port][/path]` string; the `siteKey` of §3.
    pub fn site_key(&self) -> String {
        self.to_string()
    }

    /// The site's base origin as an absolute URL, `scheme://host[:port]/path`.
    pub fn base_url(&self, scheme: &str) -> String {
        let mut out = format!("{scheme}://{}", self.host);
        if let Some(port) = self.port {
            out.push(':');
            out.push_str(&port.to_string());
        }
        out.push('/');
        if let Some(path) = &self.path {
            out.push_str(path.trim_start_matches('/'));
        }
        out
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        if let Some(path) = &self.path {
            write!(f, "{path}")?;
        }
        Ok(())
    }
}

fn validate_hostname(host: &str, allow_private_hosts: bool) -> Result<(), ScanError> {
    if host == "localhost" {
        return Ok(());
    }

    // Reject bare IP literals unless private hosts are explicitly allowed.
    if let Ok(ip) = host.parse::<IpAddr>() {
        if !allow_private_hosts && is_private_or_loopback(&ip) {
            return Err(ScanError::InvalidHostname);
        }
        if allow_private_hosts {
            return Ok(());
        }
        return Err(ScanError::InvalidHostname);
    }

    if !host.contains('.') {
        return Err(ScanError::InvalidHostname);
    }

    for label in host.split('.') {
        if label.is_empty() || !LABEL_RE.is_match(label) {
            return Err(ScanError::InvalidHostname);
        }
    }

    if !allow_private_hosts && is_private_hostname_suffix(host) {
        return Err(ScanError::InvalidHostname);
    }

    Ok(())
}

fn is_private_or_loopback(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    }
}

fn is_private_hostname_suffix(host: &str) -> bool {
    host.ends_with(".local") || host.ends_with(".internal") || host.ends_with(".test")
}
