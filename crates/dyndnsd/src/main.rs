// # dyndnsd - Dynamic DNS Update Daemon
//
// Thin integration layer: reads configuration from the environment, wires
// a config source and a DNS backend into the core `RequestProcessor`, and
// serves the HTTP surface until SIGTERM/SIGINT.
//
// All authentication and reconciliation logic lives in dyndns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Server
// - `DYNDNS_LISTEN_ADDR`: Address to bind (default `0.0.0.0:8080`)
// - `DYNDNS_TRUST_FORWARDED_FOR`: Take the caller IP from `X-Forwarded-For`
//   (default `false`; enable only behind a trusted proxy)
// - `DYNDNS_SCRIPT_FILE`: Client script served on `GET /script` (optional)
//
// ### Hostname Configuration
// - `DYNDNS_CONFIG_SOURCE`: Where the JSON document lives (s3, file)
// - `DYNDNS_CONFIG_FILE`: Path of the document (for file)
// - `CONFIG_S3_REGION`, `CONFIG_S3_BUCKET`, `CONFIG_S3_KEY`: Object location (for s3)
//
// ### DNS Backend
// - `DYNDNS_DNS_BACKEND`: Backend type (route53, memory)
//
// ### AWS
// Credentials come from the SDK default chain: `AWS_ACCESS_KEY_ID` /
// `AWS_SECRET_ACCESS_KEY`, `AWS_PROFILE`, web identity, ECS or EC2 roles.
//
// ### Logging
// - `DYNDNS_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// ## Example
//
// ```bash
// export CONFIG_S3_REGION=eu-central-1
// export CONFIG_S3_BUCKET=my-dyndns-config
// export CONFIG_S3_KEY=config.json
// export AWS_PROFILE=dyndns
//
// dyndnsd
// ```

mod config;
mod http;

use anyhow::{Context, Result};
use config::Config;
use dyndns_core::{
    ConfigSource, DnsBackend, FileConfigSource, MemoryDnsBackend, RequestProcessor,
};
use dyndns_provider_aws::{DEFAULT_REGION, Route53Backend, S3ConfigSource, load_sdk_config};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DyndnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    info!("Starting dyndnsd {}", env!("CARGO_PKG_VERSION"));

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DyndnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let (config_source, dns_backend) = match build_backends(&config).await {
            Ok(backends) => backends,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return DyndnsExitCode::ConfigError;
            }
        };

        if let Err(e) = run_daemon(config, config_source, dns_backend).await {
            error!("Daemon error: {:#}", e);
            DyndnsExitCode::RuntimeError
        } else {
            DyndnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Construct the configured config source and DNS backend
async fn build_backends(
    config: &Config,
) -> Result<(Arc<dyn ConfigSource>, Arc<dyn DnsBackend>)> {
    let sdk_config = if config.uses_aws() {
        let region = config
            .s3_location
            .as_ref()
            .map_or(DEFAULT_REGION, |location| location.region.as_str());
        Some(load_sdk_config(region).await)
    } else {
        None
    };

    let config_source: Arc<dyn ConfigSource> = match config.config_source.as_str() {
        "file" => {
            let path = config
                .config_file
                .as_deref()
                .context("DYNDNS_CONFIG_FILE is not set")?;
            Arc::new(FileConfigSource::new(path))
        }
        _ => {
            let sdk_config = sdk_config.as_ref().context("AWS SDK is not configured")?;
            let location = config
                .s3_location
                .clone()
                .context("S3 configuration location is not set")?;
            Arc::new(S3ConfigSource::new(sdk_config, location))
        }
    };

    let dns_backend: Arc<dyn DnsBackend> = match config.dns_backend.as_str() {
        "memory" => {
            warn!("Using the in-memory DNS backend; records are lost on restart");
            Arc::new(MemoryDnsBackend::new())
        }
        _ => {
            let sdk_config = sdk_config.as_ref().context("AWS SDK is not configured")?;
            Arc::new(Route53Backend::new(sdk_config, config_source.clone()))
        }
    };

    info!(
        "Config source: {}, DNS backend: {}",
        config_source.source_name(),
        dns_backend.backend_name()
    );

    Ok((config_source, dns_backend))
}

/// Run the daemon
async fn run_daemon(
    config: Config,
    config_source: Arc<dyn ConfigSource>,
    dns_backend: Arc<dyn DnsBackend>,
) -> Result<()> {
    // Surface a broken document at startup; requests reload it anyway
    if let Err(e) = config_source.load().await {
        warn!("Initial configuration load failed: {}", e);
    }

    let trust_forwarded_for = config.trust_forwarded_for().unwrap_or(false);
    if trust_forwarded_for {
        info!("Taking source IP addresses from X-Forwarded-For");
    }

    let processor = Arc::new(RequestProcessor::new(config_source, dns_backend));
    let mut state = http::AppState::new(processor, trust_forwarded_for);
    if let Some(script_file) = &config.script_file {
        info!("Serving client script from {}", script_file);
        state = state.with_script_file(script_file);
    }
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on {}", config.listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolve on the first shutdown signal
async fn shutdown_signal() {
    match wait_for_shutdown().await {
        Ok(signal) => info!("Received shutdown signal: {}", signal),
        Err(e) => error!("Shutdown error: {}", e),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
