//! Terminal walkthrough of the wallet authentication round trip.
//!
//! Creates two wallets, mints a bearer token for one of them, and replays it
//! against the verifier in a handful of honest and dishonest ways. Output
//! uses ANSI escape codes for colored rendering.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use wallet_auth::config::{now_ms, AuthPolicy};
use wallet_auth::token::AuthNote;
use wallet_auth::transaction::{LocalSigner, SignedAuthTransaction};
use wallet_auth::{AuthError, TokenBuilder, TokenVerifier};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const RED: &str = "\x1b[31m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    WALLET AUTH  --  Stateless Bearer Token Demo                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!(
        "{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=============================================================={RESET}"
    );
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!(
        "{CYAN}------------------------------------------------------------------------{RESET}"
    );
}

fn subsection(text: &str) {
    println!("{DIM}{CYAN}  >> {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.3} ms]{RESET}");
}

fn address_display(name: &str, addr: &str, color: &str) {
    let prefix = &addr[..6];
    let suffix = &addr[addr.len().saturating_sub(6)..];
    println!(
        "  {color}{BOLD}{name}{RESET}  {DIM}{prefix}...{suffix}{RESET}  {DIM}({} chars){RESET}",
        addr.len()
    );
}

fn outcome(label: &str, result: &Result<(), AuthError>) {
    match result {
        Ok(()) => println!("{GREEN}  [ACCEPTED] {label}{RESET}"),
        Err(e) => println!("{RED}  [REJECTED] {label}{RESET} {DIM}({}){RESET}", e.kind()),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    banner();

    let policy = AuthPolicy::default();
    let verifier = TokenVerifier::new(policy.clone());
    let now = now_ms();

    // -----------------------------------------------------------------------
    // Step 1: Wallets
    // -----------------------------------------------------------------------

    section(1, "Wallet Identities");
    subsection("Generating Ed25519 keypairs and encoding checksummed addresses...");

    let alice = LocalSigner::generate();
    let mallory = LocalSigner::generate();
    let alice_addr = alice.address().to_string();
    let mallory_addr = mallory.address().to_string();

    println!();
    address_display("Alice   ", &alice_addr, BLUE);
    address_display("Mallory ", &mallory_addr, RED);

    // -----------------------------------------------------------------------
    // Step 2: Token construction
    // -----------------------------------------------------------------------

    section(2, "Token Construction");
    subsection("Alice signs a zero-value payment to herself...");

    let t = Instant::now();
    let token = match TokenBuilder::new(policy.clone())
        .build_token_at(&alice_addr, &alice, now)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            eprintln!("{RED}token construction failed: {e}{RESET}");
            return;
        }
    };
    timing("build", t.elapsed());

    if let Ok(signed) = SignedAuthTransaction::from_token(&token) {
        if let Ok(note) = AuthNote::from_bytes(&signed.txn.note) {
            info("Issuer", &note.issuer);
            info("Expires at (ms)", &note.expires_at_ms.to_string());
        }
    }
    info("Token length", &format!("{} chars", token.len()));

    // -----------------------------------------------------------------------
    // Step 3: Verification
    // -----------------------------------------------------------------------

    section(3, "Verification");

    let t = Instant::now();
    let honest = verifier.authenticate_at(&alice_addr, &token, now);
    timing("verify", t.elapsed());
    outcome("Alice presents her own token", &honest);

    outcome(
        "Mallory presents Alice's token on her own route",
        &verifier.authenticate_at(&mallory_addr, &token, now),
    );

    let mallory_token = TokenBuilder::new(policy.clone())
        .build_token_at(&mallory_addr, &mallory, now)
        .await;
    if let Ok(mallory_token) = mallory_token {
        outcome(
            "Mallory presents her own valid token on Alice's route",
            &verifier.authenticate_at(&alice_addr, &mallory_token, now),
        );
    }

    outcome(
        "Alice's token, two days later",
        &verifier.authenticate_at(&alice_addr, &token, now + 2 * 86_400_000),
    );

    let mut truncated = token.clone();
    truncated.truncate(token.len() / 2);
    outcome("Half a token", &verifier.authenticate_at(&alice_addr, &truncated, now));

    println!();
}
