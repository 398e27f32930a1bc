// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Wallet Auth Node
//!
//! Entry point for the `wallet-auth-node` binary. Parses CLI arguments,
//! initializes logging, and dispatches to a subcommand:
//!
//! - `serve`   - run the bearer-token protected HTTP API and metrics endpoint
//! - `keygen`  - generate a wallet keypair
//! - `token`   - build a bearer token from a local key file
//! - `verify`  - check a bearer token against a wallet address
//! - `version` - print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use wallet_auth::config::AuthPolicy;
use wallet_auth::crypto::WalletKeypair;
use wallet_auth::identity::Address;
use wallet_auth::transaction::LocalSigner;
use wallet_auth::{TokenBuilder, TokenVerifier};

use cli::{Commands, PolicyArgs, WalletAuthCli};
use logging::LogFormat;
use metrics::AuthMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = WalletAuthCli::parse();
    let log_format = LogFormat::from_str_lossy(&cli.log_format);

    match cli.command {
        Commands::Serve(args) => {
            logging::init_logging(
                "wallet_auth_node=info,wallet_auth=info,tower_http=debug",
                log_format,
            );
            serve(args).await
        }
        Commands::Keygen(args) => {
            logging::init_logging("warn", log_format);
            keygen(args)
        }
        Commands::Token(args) => {
            logging::init_logging("warn", log_format);
            token(args).await
        }
        Commands::Verify(args) => {
            logging::init_logging("warn", log_format);
            verify(args)
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Loads the policy file if one was given, otherwise the built-in default.
fn load_policy(args: &PolicyArgs) -> Result<AuthPolicy> {
    match &args.policy {
        Some(path) => {
            let policy = AuthPolicy::from_file(path)
                .with_context(|| format!("failed to load policy from {}", path.display()))?;
            tracing::info!(path = %path.display(), issuer = %policy.issuer, "policy loaded");
            Ok(policy)
        }
        None => Ok(AuthPolicy::default()),
    }
}

/// Runs the dashboard API and the metrics endpoint until a shutdown signal.
async fn serve(args: cli::ServeArgs) -> Result<()> {
    let policy = load_policy(&args.policy)?;

    tracing::info!(
        bind = %args.bind,
        port = args.port,
        metrics_port = args.metrics_port,
        issuer = %policy.issuer,
        genesis_id = %policy.genesis_id,
        expiry_ms = policy.expiry_duration_ms(),
        "starting wallet-auth-node"
    );

    // --- Metrics ---
    let auth_metrics = Arc::new(AuthMetrics::new());

    // --- Application state ---
    let app_state = api::AppState {
        verifier: Arc::new(TokenVerifier::new(policy)),
        metrics: Arc::clone(&auth_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("{}:{}", args.bind, args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(auth_metrics);
    let metrics_addr = format!("{}:{}", args.bind, args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("wallet-auth-node stopped");
    Ok(())
}

/// Generates a wallet keypair and prints its address.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let keypair = WalletKeypair::generate();
    let address = Address::from_public_key(&keypair.public_key());

    match &args.out {
        Some(path) => {
            write_secret_key(path, &keypair)?;
            tracing::info!(%address, key_path = %path.display(), "wallet keypair generated");
            println!("Address    : {}", address);
            println!("Secret key : {}", path.display());
        }
        None => {
            println!("Address    : {}", address);
            println!("Secret key : {}", keypair.secret_key_hex());
        }
    }
    Ok(())
}

/// Writes the hex secret key to `path`, owner-readable only on Unix.
fn write_secret_key(path: &Path, keypair: &WalletKeypair) -> Result<()> {
    std::fs::write(path, keypair.secret_key_hex())
        .with_context(|| format!("failed to write secret key to {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to restrict permissions on {}", path.display()))?;
    }
    Ok(())
}

/// Reads a hex secret key written by `keygen`.
fn read_secret_key(path: &Path) -> Result<WalletKeypair> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read secret key from {}", path.display()))?;
    WalletKeypair::from_hex(&text)
        .with_context(|| format!("{} does not hold a valid secret key", path.display()))
}

/// Builds a token with a local key and prints it to stdout.
async fn token(args: cli::TokenArgs) -> Result<()> {
    let policy = load_policy(&args.policy)?;
    let signer = LocalSigner::new(read_secret_key(&args.key_file)?);
    let identity = signer.address().to_string();

    let token = TokenBuilder::new(policy)
        .with_signing_timeout(Duration::from_secs(args.timeout_secs))
        .build_token(&identity, &signer)
        .await
        .context("failed to build token")?;

    tracing::info!(%identity, "token built");
    println!("{}", token);
    Ok(())
}

/// Verifies a token and reports the outcome. Exits non-zero on rejection.
fn verify(args: cli::VerifyArgs) -> Result<()> {
    let policy = load_policy(&args.policy)?;
    let verifier = TokenVerifier::new(policy);

    match verifier.verify(&args.wallet, &args.token) {
        Ok(verified) => {
            println!("Verified   : {}", verified.address);
            println!("Expires at : {} ms", verified.expires_at_ms);
            Ok(())
        }
        Err(e) => bail!("token rejected ({}): {}", e.kind(), e),
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("wallet-auth-node {}", env!("CARGO_PKG_VERSION"));
    println!("rustc            {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
