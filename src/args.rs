//! Command-line interface definition (clap derive, spec §6 "Command-line form").
//!
//! A single positional host string plus a handful of flags that generalize
//! the scanner's retrieval policy. No wordlist, no extensions: this scanner
//! reads headers, it does not enumerate paths.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "HTTP response-header security scanner")]
pub struct Args {
    /// Host to scan, e.g. `example.com`, `example.com:8443`, or a full URL.
    /// Required unless `--serve` is given.
    pub host: Option<String>,

    /// Optional path to a TOML configuration file (overridden by `HTTPOBS_CONFIG`).
    #[arg(long, env = "HTTPOBS_CONFIG")]
    pub config: Option<String>,

    /// Pretty-print the JSON report instead of emitting a single compact line.
    #[arg(long, default_value_t = false)]
    pub json_pretty: bool,

    /// Maximum redirects to follow on the HTTPS probe before failing with
    /// `redirection-loop`.
    #[arg(long)]
    pub max_redirects: Option<u32>,

    /// Overall scan wall-clock cap, in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Allow scanning loopback/private/reserved hosts (for local testing).
    #[arg(long, default_value_t = false)]
    pub allow_private: bool,

    /// Run the HTTP API server (spec §6) instead of a one-shot scan. `host`
    /// is ignored in this mode; the bind address comes from configuration.
    #[arg(long, default_value_t = false)]
    pub serve: bool,
}

impl Args {
    /// Apply CLI overrides on top of a loaded `ScannerConfig`.
    pub fn apply_overrides(&self, config: &mut crate::config::ScannerConfig) {
        if let Some(max_redirects) = self.max_redirects {
            config.max_redirects = max_redirects;
        }
        if let Some(timeout) = self.timeout {
            config.scan_timeout_secs = timeout;
        }
        if self.allow_private {
            config.allow_private_hosts = true;
        }
    }
}
