// Token construction & verification benchmarks.
//
// Covers address encoding, signing-bytes derivation, token construction with
// an in-process signer, and the full verification pipeline for accepted and
// rejected tokens.

use criterion::{criterion_group, criterion_main, Criterion};

use wallet_auth::config::AuthPolicy;
use wallet_auth::crypto::WalletKeypair;
use wallet_auth::identity::Address;
use wallet_auth::transaction::{AuthTransactionBuilder, LocalSigner};
use wallet_auth::{TokenBuilder, TokenVerifier};

const NOW: u64 = 1_700_000_000_000;

fn bench_address(c: &mut Criterion) {
    let address = Address::from_public_key(&WalletKeypair::generate().public_key());
    let text = address.to_string();

    c.bench_function("address/encode", |b| b.iter(|| address.to_string()));
    c.bench_function("address/decode", |b| b.iter(|| text.parse::<Address>()));
}

fn bench_bytes_to_sign(c: &mut Criterion) {
    let policy = AuthPolicy::default();
    let txn = AuthTransactionBuilder::new(Address::from_bytes([7; 32]), &policy)
        .note(format!("{} {}", policy.issuer, NOW))
        .build();

    c.bench_function("transaction/bytes_to_sign", |b| b.iter(|| txn.bytes_to_sign()));
}

fn bench_build_token(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let signer = LocalSigner::generate();
    let identity = signer.address().to_string();
    let builder = TokenBuilder::new(AuthPolicy::default());

    c.bench_function("token/build", |b| {
        b.iter(|| rt.block_on(builder.build_token_at(&identity, &signer, NOW)));
    });
}

fn bench_verify(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let signer = LocalSigner::generate();
    let identity = signer.address().to_string();
    let token = rt
        .block_on(TokenBuilder::new(AuthPolicy::default()).build_token_at(&identity, &signer, NOW))
        .expect("token");
    let other = LocalSigner::generate().address().to_string();
    let verifier = TokenVerifier::new(AuthPolicy::default());

    let mut group = c.benchmark_group("token/verify");
    group.bench_function("accepted", |b| {
        b.iter(|| verifier.authenticate_at(&identity, &token, NOW))
    });
    // Rejected at the binding stage, before the signature check.
    group.bench_function("wrong_identity", |b| {
        b.iter(|| verifier.authenticate_at(&other, &token, NOW))
    });
    group.bench_function("garbage", |b| {
        b.iter(|| verifier.authenticate_at(&identity, "AAAA", NOW))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_address,
    bench_bytes_to_sign,
    bench_build_token,
    bench_verify
);
criterion_main!(benches);
