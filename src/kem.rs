use crate::helpers::{g, h, kdf};
use crate::indcpa::{indcpa_decrypt, indcpa_encrypt, indcpa_key_gen};
use crate::SharedSecretKey;
use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};


/// KEM key generation: runs the IND-CPA keygen and appends the encryption
/// key, its hash and the 32-byte implicit-rejection value z to the
/// decapsulation key.
///
/// Output: encapsulation key `ek`, 384K + 32 bytes <br>
/// Output: decapsulation key `dk`, 768K + 96 bytes
pub(crate) fn kem_key_gen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, ek: &mut [u8], dk: &mut [u8],
) -> Result<(), &'static str> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "ek length mismatch");
    debug_assert_eq!(dk.len(), 768 * K + 96, "dk length mismatch");

    let p1 = 384 * K;
    indcpa_key_gen::<K, ETA1_64>(rng, ek, &mut dk[..p1])?;

    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut z)
        .map_err(|_| "Random number generator failed")?;

    // dk = dk_pke || ek || H(ek) || z
    let h_ek = h(ek);
    let p2 = p1 + ek.len();
    let p3 = p2 + h_ek.len();
    dk[p1..p2].copy_from_slice(ek);
    dk[p2..p3].copy_from_slice(&h_ek);
    dk[p3..].copy_from_slice(&z);
    Ok(())
}


/// Encapsulation: hashes fresh randomness into the message (so a biased
/// caller RNG never reaches the scheme directly), derives the key and coins
/// from the message and key hash, and binds the shared secret to the
/// ciphertext hash.
///
/// Output: shared secret, with the ciphertext written through `ct`
pub(crate) fn kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore, du: u32, dv: u32, ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, &'static str> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "ek length mismatch");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "ciphertext length mismatch"
    );

    let mut m = [0u8; 32];
    rng.try_fill_bytes(&mut m)
        .map_err(|_| "Random number generator failed")?;
    let m = h(&m);

    let h_ek = h(ek);
    let (k_bar, coins) = g(&[&m, &h_ek]);
    indcpa_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek, &m, &coins, ct)?;

    Ok(SharedSecretKey(kdf(&k_bar, &h(ct))))
}


/// Decapsulation: decrypts, re-encrypts under the re-derived coins, and on
/// any mismatch substitutes the rejection value z for the derived key —
/// selected with masked word operations, never a data-dependent branch.
/// Failure is deliberately unobservable to the caller.
#[allow(clippy::similar_names)]
pub(crate) fn kem_decaps<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    du: u32, dv: u32, dk: &[u8], ct: &[u8],
) -> Result<SharedSecretKey, &'static str> {
    debug_assert_eq!(dk.len(), 768 * K + 96, "dk length mismatch");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "ciphertext length mismatch"
    );

    let dk_pke = &dk[0..384 * K];
    let ek_pke = &dk[384 * K..768 * K + 32];
    let h_ek = &dk[768 * K + 32..768 * K + 64];
    let z: &[u8; 32] = dk[768 * K + 64..768 * K + 96].try_into().expect("z fail");

    let m_prime = indcpa_decrypt::<K>(du, dv, dk_pke, ct)?;
    let (mut k_bar, coins_prime) = g(&[&m_prime, h_ek]);

    let mut ct_prime = [0u8; CT_LEN];
    indcpa_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek_pke, &m_prime, &coins_prime, &mut ct_prime)?;

    k_bar.conditional_assign(z, ct.ct_ne(&ct_prime[..]));
    Ok(SharedSecretKey(kdf(&k_bar, &h(ct))))
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    const K: usize = 2;
    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 1632;
    const CT_LEN: usize = 768;

    #[test]
    fn keygen_embeds_ek_hash_and_z() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        kem_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        assert_eq!(&dk[384 * K..384 * K + EK_LEN], &ek);
        assert_eq!(&dk[768 * K + 32..768 * K + 64], &h(&ek));
    }

    #[test]
    fn encaps_decaps_agree() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(6);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];
        kem_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        let ssk1 =
            kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, DU, DV, &ek, &mut ct).unwrap();
        let ssk2 = kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &dk, &ct).unwrap();
        assert_eq!(ssk1, ssk2);
    }
}
