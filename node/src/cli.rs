//! # CLI Interface
//!
//! Defines the command-line argument structure for `wallet-auth-node` using
//! `clap` derive. Subcommands: `serve`, `keygen`, `token`, `verify`, and
//! `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use wallet_auth::config::DEFAULT_HTTP_PORT;

/// Stateless wallet authentication node.
///
/// Serves a bearer-token protected API where every token is a self-signed,
/// zero-value wallet transaction, and offers the client-side tooling to mint
/// and check such tokens from a shell.
#[derive(Parser, Debug)]
#[command(
    name = "wallet-auth-node",
    about = "Stateless wallet authentication node",
    version,
    propagate_version = true
)]
pub struct WalletAuthCli {
    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "WALLET_AUTH_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server.
    Serve(ServeArgs),
    /// Generate a fresh wallet keypair.
    Keygen(KeygenArgs),
    /// Build a bearer token with a local key file.
    Token(TokenArgs),
    /// Verify a bearer token for a wallet address.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

/// Where to load the auth policy from.
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Path to an auth policy JSON file.
    ///
    /// When omitted, the built-in mainnet policy is used.
    #[arg(long, env = "WALLET_AUTH_POLICY")]
    pub policy: Option<PathBuf>,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Address to bind the HTTP listeners on.
    #[arg(long, env = "WALLET_AUTH_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port for the dashboard API.
    #[arg(long, env = "WALLET_AUTH_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "WALLET_AUTH_METRICS_PORT", default_value_t = 9090)]
    pub metrics_port: u16,
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// File to write the hex-encoded secret key to (mode 0600 on Unix).
    ///
    /// When omitted, the secret key is printed to stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `token` subcommand.
#[derive(Parser, Debug)]
pub struct TokenArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// File holding the hex-encoded secret key, as written by `keygen`.
    #[arg(long, short = 'k', env = "WALLET_AUTH_KEY_FILE")]
    pub key_file: PathBuf,

    /// Give up if signing takes longer than this many seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Wallet address the token claims to authenticate.
    #[arg(long, short = 'w')]
    pub wallet: String,

    /// The base64 bearer token.
    #[arg(long, short = 't')]
    pub token: String,
}
