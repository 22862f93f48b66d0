// Benchmarks over the public trait API, one criterion group per parameter
// set. Decapsulation is measured against both an honest ciphertext and a
// tampered one: the rejection path re-encrypts and substitutes z either
// way, so the two timings are expected to coincide (see dudect/ for the
// statistical version of that check). The deserialization benches cost out
// the modulus check on an encaps key and the embedded-key/hash check on a
// decaps key.

use criterion::{criterion_group, criterion_main, Criterion};
use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
use kyber_kem::{kyber1024, kyber512, kyber768};
use rand_chacha::rand_core::SeedableRng;


macro_rules! bench_param_set {
    ($c:expr, $name:literal, $module:ident) => {{
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1234);
        let (ek, dk) = $module::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (_ssk, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();

        let ek_bytes = ek.clone().into_bytes();
        let dk_bytes = dk.clone().into_bytes();

        let mut bad_ct_bytes = ct.clone().into_bytes();
        bad_ct_bytes[0] ^= 0x01;
        let bad_ct = $module::CipherText::try_from_bytes(bad_ct_bytes).unwrap();

        let mut group = $c.benchmark_group($name);
        group.bench_function("keygen", |b| {
            b.iter(|| $module::KG::try_keygen_with_rng(&mut rng))
        });
        group.bench_function("encaps", |b| b.iter(|| ek.try_encaps_with_rng(&mut rng)));
        group.bench_function("decaps accept", |b| b.iter(|| dk.try_decaps(&ct)));
        group.bench_function("decaps reject", |b| b.iter(|| dk.try_decaps(&bad_ct)));
        group.bench_function("ek deserialize", |b| {
            b.iter(|| $module::EncapsKey::try_from_bytes(ek_bytes))
        });
        group.bench_function("dk deserialize", |b| {
            b.iter(|| $module::DecapsKey::try_from_bytes(dk_bytes))
        });
        group.finish();
    }};
}


pub fn criterion_benchmark(c: &mut Criterion) {
    bench_param_set!(c, "kyber512", kyber512);
    bench_param_set!(c, "kyber768", kyber768);
    bench_param_set!(c, "kyber1024", kyber1024);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
