//! Entry point for the `httpobs` binary.
//!
//! Responsibilities:
//!   1) Install a `tracing` subscriber (`RUST_LOG`-driven, default `info`).
//!   2) Parse CLI flags and load the optional configuration file.
//!   3) Either serve the HTTP API (`--serve`) or run a one-shot scan:
//!      canonicalize the host, run the retriever + grader, and print the
//!      `ScanReport` envelope as a single JSON object on stdout.
//!   4) Exit with the code demanded by spec §6: 0 on success (including a
//!      report whose `error` is set), 1 on invalid host, 2 on any other
//!      retrieval failure.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use httpobs::api::{self, AppState};
use httpobs::args::Args;
use httpobs::config::ScannerConfig;
use httpobs::error::ScanError;
use httpobs::grader;
use httpobs::report::{ScanEnvelope, ScanReport};
use httpobs::retriever;
use httpobs::site::Site;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut config = match ScannerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let host = args.host.clone().unwrap_or_default();
            return report_and_exit_code(ScanReport::failure(host, e.kind()), &args);
        }
    };
    args.apply_overrides(&mut config);

    if args.serve {
        return serve(config).await;
    }

    let Some(host) = args.host.clone() else {
        eprintln!("error: HOST is required unless --serve is given");
        return ExitCode::from(1);
    };

    let site = match Site::from_str(&host, config.allow_private_hosts) {
        Ok(site) => site,
        Err(e) => return report_and_exit_code(ScanReport::failure(host, e.kind()), &args),
    };

    match run(&site, &config).await {
        Ok(report) => report_and_exit_code(report, &args),
        Err(e) => {
            let report = ScanReport::failure(site.site_key(), e.kind());
            report_and_exit_code(report, &args)
        }
    }
}

async fn run(site: &Site, config: &ScannerConfig) -> Result<ScanReport, ScanError> {
    let requests = retriever::fetch(site, config).await?;
    Ok(grader::grade(&site.site_key(), &requests, &Default::default()))
}

async fn serve(config: ScannerConfig) -> ExitCode {
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);
    let router = api::router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("error: failed to bind {bind_addr}: {e}");
            return ExitCode::from(2);
        }
    };

    info!(bind_addr = %bind_addr, "httpobs API listening");
    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("error: server exited: {e}");
        return ExitCode::from(2);
    }

    ExitCode::from(0)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Print the report's `ScanEnvelope` to stdout and translate its error kind
/// (if any) into the exit code spec §6 demands. A report with `error: None`
/// (a successful grading, any grade) and a retrieval-failure report both
/// exit 0; only a validation failure produces exit 1, and any other
/// retrieval failure exits 2.
fn report_and_exit_code(report: ScanReport, args: &Args) -> ExitCode {
    let envelope = ScanEnvelope::from(&report);
    let write_result = if args.json_pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &envelope)
    } else {
        serde_json::to_writer(std::io::stdout().lock(), &envelope)
    };
    if write_result.is_ok() {
        println!();
    }

    match report.error.as_deref() {
        None => ExitCode::from(0),
        Some("invalid-hostname") | Some("invalid-hostname-lookup") | Some("invalid-port") => {
            ExitCode::from(1)
        }
        Some(_) => ExitCode::from(2),
    }
}
