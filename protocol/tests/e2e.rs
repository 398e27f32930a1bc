//! End-to-end integration tests for wallet authentication.
//!
//! These go through the public API only: a signer produces a token, the
//! token travels as an opaque string, and a verifier built from the same
//! policy judges it. Each test owns its keys and clock.

use std::io::Write;
use std::time::Duration;

use wallet_auth::config::{now_ms, AuthPolicy};
use wallet_auth::crypto::WalletKeypair;
use wallet_auth::identity::Address;
use wallet_auth::transaction::{LocalSigner, SignedAuthTransaction};
use wallet_auth::{authenticate, build_token, AuthError, TokenBuilder, TokenVerifier};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const NOW: u64 = 1_700_000_000_000;

fn signer(seed: u8) -> LocalSigner {
    LocalSigner::new(WalletKeypair::from_seed(&[seed; 32]))
}

async fn token_at(policy: &AuthPolicy, signer: &LocalSigner, now_ms: u64) -> String {
    TokenBuilder::new(policy.clone())
        .build_token_at(&signer.address().to_string(), signer, now_ms)
        .await
        .expect("token construction")
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn construct_then_authenticate() {
    let policy = AuthPolicy::default();
    let alice = signer(1);
    let identity = alice.address().to_string();

    let token = build_token(&identity, &alice, &policy).await.unwrap();
    authenticate(&identity, &token, &policy).unwrap();
}

#[tokio::test]
async fn token_stays_valid_for_its_lifetime() {
    let policy = AuthPolicy::default();
    let alice = signer(1);
    let identity = alice.address().to_string();
    let token = token_at(&policy, &alice, NOW).await;
    let verifier = TokenVerifier::new(policy.clone());

    let lifetime = policy.expiry_duration_ms();
    for offset in [0, 1, lifetime / 2, lifetime] {
        assert!(
            verifier.authenticate_at(&identity, &token, NOW + offset).is_ok(),
            "offset {offset}"
        );
    }
    assert!(matches!(
        verifier.authenticate_at(&identity, &token, NOW + lifetime + 1),
        Err(AuthError::TokenExpired { .. })
    ));
}

#[tokio::test]
async fn verifier_and_constructor_agree_on_custom_policy() {
    let policy = AuthPolicy {
        issuer: "https://app.example/".into(),
        first_round: 1000,
        last_round: 2000,
        genesis_id: "testnet-v1.0".into(),
        genesis_hash: [0x5a; 32],
        expiry_duration: Duration::from_secs(300),
        max_skew_tolerance: Duration::from_secs(5),
    };
    policy.validate().unwrap();

    let bob = signer(2);
    let token = token_at(&policy, &bob, NOW).await;

    let identity = bob.address().to_string();
    assert!(TokenVerifier::new(policy)
        .authenticate_at(&identity, &token, NOW)
        .is_ok());

    // The default deployment does not accept it.
    assert_eq!(
        TokenVerifier::new(AuthPolicy::default()).authenticate_at(&identity, &token, NOW),
        Err(AuthError::InvalidAuthentication)
    );
}

// ---------------------------------------------------------------------------
// Cross-identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_for_one_wallet_rejected_for_another() {
    let policy = AuthPolicy::default();
    let alice = signer(1);
    let mallory = signer(66);
    let token = token_at(&policy, &mallory, NOW).await;

    let verifier = TokenVerifier::new(policy);
    assert_eq!(
        verifier.authenticate_at(&alice.address().to_string(), &token, NOW),
        Err(AuthError::InvalidAuthentication)
    );
}

#[tokio::test]
async fn every_wallet_only_opens_its_own_door() {
    let policy = AuthPolicy::default();
    let verifier = TokenVerifier::new(policy.clone());
    let signers: Vec<LocalSigner> = (1..=4).map(signer).collect();

    let mut tokens = Vec::new();
    for s in &signers {
        tokens.push(token_at(&policy, s, NOW).await);
    }

    for (i, holder) in signers.iter().enumerate() {
        for (j, token) in tokens.iter().enumerate() {
            let result = verifier.authenticate_at(&holder.address().to_string(), token, NOW);
            assert_eq!(result.is_ok(), i == j, "holder {i} with token {j}");
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_decodes_to_expected_transaction() {
    let policy = AuthPolicy::default();
    let alice = signer(1);
    let token = token_at(&policy, &alice, NOW).await;

    let signed = SignedAuthTransaction::from_token(&token).unwrap();
    let txn = &signed.txn;
    assert_eq!(txn.sender, alice.address());
    assert_eq!(txn.receiver, alice.address());
    assert_eq!(txn.amount, 0);
    assert_eq!(txn.fee, 0);
    assert_eq!(txn.first_valid, 10);
    assert_eq!(txn.last_valid, 10);
    assert_eq!(txn.genesis_id, "mainnet-v1.0");
    assert_eq!(
        txn.note_str().unwrap(),
        format!("https://stateless-auth.vercel.app/ {}", NOW + 86_400_000)
    );

    assert_eq!(SignedAuthTransaction::from_token(&signed.to_token().unwrap()).unwrap(), signed);
}

#[tokio::test]
async fn whitespace_around_token_is_malformed() {
    let policy = AuthPolicy::default();
    let alice = signer(1);
    let token = token_at(&policy, &alice, NOW).await;
    let padded = format!(" {token}");

    assert!(matches!(
        TokenVerifier::new(policy).authenticate_at(&alice.address().to_string(), &padded, NOW),
        Err(AuthError::MalformedToken { .. })
    ));
}

#[test]
fn address_survives_string_roundtrip() {
    let kp = WalletKeypair::generate();
    let address = Address::from_public_key(&kp.public_key());
    let parsed: Address = address.to_string().parse().unwrap();
    assert_eq!(parsed, address);
    assert_eq!(parsed.public_key(), kp.public_key());
}

// ---------------------------------------------------------------------------
// Policy files
// ---------------------------------------------------------------------------

#[tokio::test]
async fn policy_loaded_from_file_verifies_tokens() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "issuer": "https://stateless-auth.vercel.app/",
            "first_round": 10,
            "last_round": 10,
            "genesis_id": "mainnet-v1.0",
            "genesis_hash": "wGHE2Pwdvd7S12BL5FaOP20EGYesN73ktiC1qzkkit8=",
            "expiry_duration_ms": 86400000,
            "max_skew_tolerance_ms": 1800000
        }}"#
    )
    .unwrap();

    let policy = AuthPolicy::from_file(file.path()).unwrap();
    assert_eq!(policy, AuthPolicy::default());

    let alice = signer(1);
    let token = token_at(&policy, &alice, now_ms()).await;
    assert!(TokenVerifier::new(policy)
        .authenticate(&alice.address().to_string(), &token)
        .is_ok());
}

#[test]
fn missing_policy_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AuthPolicy::from_file(dir.path().join("absent.json")).is_err());
}
