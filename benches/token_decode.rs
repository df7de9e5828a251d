//! Benchmarks for token subject extraction and cookie parsing.
//!
//! These run on every screen mount that falls through to the token or cookie
//! strategies.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vendor_portal::identity::{decode_subject, CookieJar};

fn sample_token() -> String {
    format!(
        "{}.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(r#"{"sub":"64f1c2a9e4b0a1d2c3e4f5a6","email":"vendor@example.com","iat":1760000000,"exp":1760086400}"#)
    )
}

fn bench_decode_valid(c: &mut Criterion) {
    let token = sample_token();
    c.bench_function("decode_subject_valid", |b| {
        b.iter(|| decode_subject(black_box(&token)))
    });
}

fn bench_decode_malformed(c: &mut Criterion) {
    c.bench_function("decode_subject_malformed", |b| {
        b.iter(|| decode_subject(black_box("header.@@not-base64@@.sig")))
    });
}

fn bench_cookie_parse(c: &mut Criterion) {
    let header = format!(
        "theme=dark; locale=en-US; vendor_access_token={}; vendor_session={}",
        sample_token(),
        sample_token()
    );
    c.bench_function("cookie_jar_parse", |b| {
        b.iter(|| CookieJar::parse(black_box(&header)))
    });
}

criterion_group!(
    benches,
    bench_decode_valid,
    bench_decode_malformed,
    bench_cookie_parse
);
criterion_main!(benches);
