#![no_main]

use kyber_kem::kyber512;
use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
use libfuzzer_sys::fuzz_target;
use rand_core::{CryptoRng, RngCore};

const RND_SIZE: usize = 32;

// A 'fake' random number generator that regurgitates fuzz input
struct TestRng {
    data: Vec<Vec<u8>>,
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        let x = self.data.pop().expect("TestRng problem");
        out.copy_from_slice(&x);
        Ok(())
    }
}

impl CryptoRng for TestRng {}

impl TestRng {
    fn new() -> Self { TestRng { data: Vec::new() } }

    fn push(&mut self, new_data: &[u8]) {
        let x = new_data.to_vec();
        self.data.push(x);
    }
}


// 3 rng draws + EK + 1 rng draw + DK + CT
fuzz_target!(|data: [u8; 3328]| {
    let mut rng = TestRng::new();
    let mut start = 0; // Bump this forward as we pull out fuzz input

    // Load up the rng for keygen (2 draws) and encaps (1 draw)
    for _ in 0..3 {
        rng.push(&data[start..start + RND_SIZE]);
        start += RND_SIZE;
    }

    // Fuzz input -> keygen and encaps randomness
    let (ek1, dk1) = kyber512::KG::try_keygen_with_rng(&mut rng).unwrap();
    let ct1 = ek1.try_encaps_with_rng(&mut rng).unwrap().1;
    let ek1_bytes = ek1.into_bytes();
    let dk1_bytes = dk1.clone().into_bytes();
    let ct1_bytes = ct1.into_bytes();

    // Candidate ek bytes xored onto a valid key, so roughly half the runs
    // pass the modulus check and proceed into encaps
    let mut ek2_bytes = [0u8; kyber512::EK_LEN];
    ek2_bytes.copy_from_slice(&data[start..start + kyber512::EK_LEN]);
    start += kyber512::EK_LEN;
    for (b, v) in ek2_bytes.iter_mut().zip(ek1_bytes.iter()) {
        *b ^= v;
    }
    let ek2 = kyber512::EncapsKey::try_from_bytes(ek2_bytes);

    rng.push(&data[start..start + RND_SIZE]);
    start += RND_SIZE;
    if let Ok(ek2) = ek2 {
        let _res = ek2.try_encaps_with_rng(&mut rng);
    }

    // Candidate dk bytes, same treatment
    let mut dk2_bytes = [0u8; kyber512::DK_LEN];
    dk2_bytes.copy_from_slice(&data[start..start + kyber512::DK_LEN]);
    start += kyber512::DK_LEN;
    for (b, v) in dk2_bytes.iter_mut().zip(dk1_bytes.iter()) {
        *b ^= v;
    }
    let dk2 = kyber512::DecapsKey::try_from_bytes(dk2_bytes);

    let _ok = kyber512::KG::validate_keypair_vartime(&ek2_bytes, &dk2_bytes);

    // Candidate ct bytes decapsulate under both the valid and candidate keys;
    // every bit pattern is accepted and must take the implicit-rejection path
    // rather than panic
    let mut ct2_bytes = [0u8; kyber512::CT_LEN];
    ct2_bytes.copy_from_slice(&data[start..start + kyber512::CT_LEN]);
    start += kyber512::CT_LEN;
    for (b, v) in ct2_bytes.iter_mut().zip(ct1_bytes.iter()) {
        *b ^= v;
    }
    let ct2 = kyber512::CipherText::try_from_bytes(ct2_bytes).unwrap(); // always good

    let _res = dk1.try_decaps(&ct2);
    if let Ok(dk2) = dk2 {
        let _res = dk2.try_decaps(&ct2);
    }

    assert_eq!(start, data.len());
});
