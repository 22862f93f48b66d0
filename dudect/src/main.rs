// Measures decapsulation timing variance between valid ciphertexts and
// tampered ones that take the implicit-rejection path. The two classes must
// be statistically indistinguishable: the re-encryption comparison and the
// key substitution are masked word operations with no secret-dependent
// branch or index.

use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use kyber_kem::kyber512; // Could also be kyber768 or kyber1024.
use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
use rand_core::{CryptoRng, RngCore};


// Simplistic RNG to regurgitate incremented values when 'asked'
#[derive(Clone)]
struct TestRng {
    value: u32,
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        out.iter_mut().for_each(|b| *b = 0);
        out[0..4].copy_from_slice(&self.value.to_be_bytes());
        self.value = self.value.wrapping_add(1);
        Ok(())
    }
}

impl CryptoRng for TestRng {}


fn decaps_rejection(runner: &mut CtRunner, mut _rng: &mut BenchRng) {
    const ITERATIONS_INNER: usize = 5;
    const ITERATIONS_OUTER: usize = 200_000;

    let mut rng = TestRng { value: 111 };
    let (ek, dk) = kyber512::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (_ssk, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();

    // Left: the honest ciphertext. Right: one bit flipped, so every
    // decapsulation lands on the substituted rejection secret.
    let good_ct = ct.clone();
    let mut bad_ct_bytes = ct.into_bytes();
    bad_ct_bytes[0] ^= 0x01;
    let bad_ct = kyber512::CipherText::try_from_bytes(bad_ct_bytes).unwrap();

    let mut classes = [Class::Right; ITERATIONS_OUTER];
    let mut ct_refs = [&bad_ct; ITERATIONS_OUTER];

    // Interleave left and right
    for i in (0..ITERATIONS_OUTER).step_by(2) {
        classes[i] = Class::Left;
        ct_refs[i] = &good_ct;
    }

    for (class, &ct_r) in classes.into_iter().zip(ct_refs.iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ssk = dk.try_decaps(ct_r).unwrap();
            }
        })
    }
}

ctbench_main!(decaps_rejection);
