use crate::codec::{
    poly_compress, poly_decompress, poly_from_msg, poly_to_msg, polyvec_compress,
    polyvec_decompress, polyvec_from_bytes, polyvec_to_bytes, POLY_BYTES,
};
use crate::helpers::{g, prf, xof};
use crate::ntt::ntt_inv;
use crate::poly::Poly;
use crate::polyvec::{add_vecs, ntt_inv_vec, ntt_vec, pointwise_acc, reduce_vec, PolyVec};
use crate::sampling::{sample_cbd, sample_uniform};
use rand_core::CryptoRngCore;


/// Expands the 32-byte seed rho into the K x K public matrix, directly in
/// the NTT domain. Key generation uses the plain orientation (seed, j, i);
/// encryption asks for the transpose, which simply swaps the index bytes
/// absorbed into the XOF rather than materializing both matrices.
pub(crate) fn gen_matrix<const K: usize>(rho: &[u8; 32], transposed: bool) -> [PolyVec<K>; K] {
    let mut a_hat = [[Poly::zero(); K]; K];
    for (i, row) in a_hat.iter_mut().enumerate() {
        for (j, entry) in row.iter_mut().enumerate() {
            let (b1, b2) = if transposed { (i, j) } else { (j, i) };
            *entry = sample_uniform(xof(rho, b1.to_le_bytes()[0], b2.to_le_bytes()[0]));
        }
    }
    a_hat
}


/// IND-CPA key generation.
///
/// Output: encryption key `ek_pke`, 384K + 32 bytes (packed t_hat with the
/// matrix seed appended) <br>
/// Output: decryption key `dk_pke`, 384K bytes (packed s_hat)
#[allow(clippy::similar_names)]
pub(crate) fn indcpa_key_gen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, ek_pke: &mut [u8], dk_pke: &mut [u8],
) -> Result<(), &'static str> {
    debug_assert_eq!(ek_pke.len(), POLY_BYTES * K + 32, "ek_pke length mismatch");
    debug_assert_eq!(dk_pke.len(), POLY_BYTES * K, "dk_pke length mismatch");

    let mut d = [0u8; 32];
    rng.try_fill_bytes(&mut d)
        .map_err(|_| "Random number generator failed")?;
    let (rho, sigma) = g(&[&d]);

    let a_hat = gen_matrix::<K>(&rho, false);

    let mut nonce = 0u8;
    let mut s: PolyVec<K> = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA1_64>(&sigma, nonce));
        nonce += 1;
        p
    });
    let mut e: PolyVec<K> = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA1_64>(&sigma, nonce));
        nonce += 1;
        p
    });

    ntt_vec(&mut s);
    reduce_vec(&mut s);
    ntt_vec(&mut e);

    // t_hat = A_hat o s_hat + e_hat; the accumulated base products carry a
    // stray R^-1 which to_mont cancels before the error vector is added
    let mut t_hat: PolyVec<K> = core::array::from_fn(|i| {
        let mut p = pointwise_acc(&a_hat[i], &s);
        p.to_mont();
        p
    });
    t_hat = add_vecs(&t_hat, &e);
    reduce_vec(&mut t_hat);

    polyvec_to_bytes(&t_hat, &mut ek_pke[..POLY_BYTES * K]);
    ek_pke[POLY_BYTES * K..].copy_from_slice(&rho);
    polyvec_to_bytes(&s, dk_pke);
    Ok(())
}


/// IND-CPA encryption of a 32-byte message under the derived randomness.
///
/// Input: encryption key `ek_pke`, message `msg`, coins `coins` <br>
/// Output: ciphertext `ct`, 32(du K + dv) bytes
#[allow(clippy::similar_names)]
pub(crate) fn indcpa_encrypt<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, ek_pke: &[u8], msg: &[u8; 32], coins: &[u8; 32], ct: &mut [u8],
) -> Result<(), &'static str> {
    debug_assert_eq!(ek_pke.len(), POLY_BYTES * K + 32, "ek_pke length mismatch");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "ciphertext length mismatch"
    );

    let t_hat = polyvec_from_bytes::<K>(&ek_pke[..POLY_BYTES * K])?;
    let rho: &[u8; 32] = ek_pke[POLY_BYTES * K..].try_into().expect("rho fail");
    let at_hat = gen_matrix::<K>(rho, true);

    let mut nonce = 0u8;
    let mut r: PolyVec<K> = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA1_64>(coins, nonce));
        nonce += 1;
        p
    });
    let e1: PolyVec<K> = core::array::from_fn(|_| {
        let p = sample_cbd(&prf::<ETA2_64>(coins, nonce));
        nonce += 1;
        p
    });
    let e2 = sample_cbd(&prf::<ETA2_64>(coins, nonce));

    ntt_vec(&mut r);
    reduce_vec(&mut r);

    // u = invntt(A_hat^T o r_hat) + e1; the inverse transform's closing
    // multiplication absorbs the R^-1 from the pointwise accumulation
    let mut u: PolyVec<K> = core::array::from_fn(|i| pointwise_acc(&at_hat[i], &r));
    ntt_inv_vec(&mut u);
    u = add_vecs(&u, &e1);
    reduce_vec(&mut u);

    // v = invntt(t_hat . r_hat) + e2 + decompressed message
    let mut v = pointwise_acc(&t_hat, &r);
    ntt_inv(&mut v);
    v = v.add(&e2).add(&poly_from_msg(msg));
    v.reduce();

    let step = 32 * du as usize;
    polyvec_compress(&u, du, &mut ct[..K * step]);
    poly_compress(&v, dv, &mut ct[K * step..]);
    Ok(())
}


/// IND-CPA decryption: recovers the 32-byte message from a ciphertext.
pub(crate) fn indcpa_decrypt<const K: usize>(
    du: u32, dv: u32, dk_pke: &[u8], ct: &[u8],
) -> Result<[u8; 32], &'static str> {
    debug_assert_eq!(dk_pke.len(), POLY_BYTES * K, "dk_pke length mismatch");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "ciphertext length mismatch"
    );

    let step = 32 * du as usize;
    let mut u = polyvec_decompress::<K>(&ct[..K * step], du);
    let v = poly_decompress(&ct[K * step..], dv);
    let s_hat = polyvec_from_bytes::<K>(dk_pke)?;

    ntt_vec(&mut u);
    let mut mp = pointwise_acc(&s_hat, &u);
    ntt_inv(&mut mp);
    mp = v.sub(&mp);
    mp.reduce();
    Ok(poly_to_msg(&mp))
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const ETA1_64: usize = ETA1 as usize * 64;
    const ETA2_64: usize = ETA2 as usize * 64;
    const EK_LEN: usize = 800;
    const CT_LEN: usize = 768;

    #[test]
    fn encrypt_decrypt_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; POLY_BYTES * K];
        let mut ct = [0u8; CT_LEN];
        let msg = *b"this msg is exactly 32 bytes ok!";
        let coins = [7u8; 32];

        indcpa_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        indcpa_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ek, &msg, &coins, &mut ct).unwrap();
        let recovered = indcpa_decrypt::<K>(DU, DV, &dk, &ct).unwrap();
        assert_eq!(recovered, msg);
    }

    #[test]
    fn oversized_key_material_is_rejected() {
        let mut ct = [0u8; CT_LEN];
        let ff_ek = [0xFFu8; EK_LEN]; // 12-bit fields all above q
        let res = indcpa_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ff_ek, &[0u8; 32], &[0u8; 32], &mut ct);
        assert!(res.is_err());
    }

    #[test]
    fn matrix_orientation_is_transposed_consistently() {
        let rho = [3u8; 32];
        let a = gen_matrix::<3>(&rho, false);
        let at = gen_matrix::<3>(&rho, true);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(a[i][j].coeffs, at[j][i].coeffs);
            }
        }
    }
}
