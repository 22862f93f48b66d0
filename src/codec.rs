use crate::helpers::ensure;
use crate::poly::Poly;
use crate::polyvec::PolyVec;
use crate::reduce::cond_sub_q;
use crate::{N, Q};


/// Serialized length of one uncompressed polynomial (256 x 12 bits).
pub(crate) const POLY_BYTES: usize = 384;


/// Packs 256 coefficients as little-endian 12-bit pairs into 384 bytes.
/// Callers reduce first; the canonical `[0, q)` representative is taken here.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub(crate) fn poly_to_bytes(p: &Poly, bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), POLY_BYTES, "poly byte length mismatch");
    for i in 0..N / 2 {
        let t0 = cond_sub_q(p.coeffs[2 * i]) as u16;
        let t1 = cond_sub_q(p.coeffs[2 * i + 1]) as u16;
        bytes[3 * i] = t0 as u8;
        bytes[3 * i + 1] = ((t0 >> 8) | (t1 << 4)) as u8;
        bytes[3 * i + 2] = (t1 >> 4) as u8;
    }
}


/// Unpacks 384 bytes into 256 coefficients, rejecting any 12-bit value at or
/// above the modulus. This check is what `try_from_bytes` relies on for key
/// validation.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn poly_from_bytes(bytes: &[u8]) -> Result<Poly, &'static str> {
    debug_assert_eq!(bytes.len(), POLY_BYTES, "poly byte length mismatch");
    let mut p = Poly::zero();
    for i in 0..N / 2 {
        let b0 = u16::from(bytes[3 * i]);
        let b1 = u16::from(bytes[3 * i + 1]);
        let b2 = u16::from(bytes[3 * i + 2]);
        p.coeffs[2 * i] = ((b0 | (b1 << 8)) & 0xFFF) as i16;
        p.coeffs[2 * i + 1] = (((b1 >> 4) | (b2 << 4)) & 0xFFF) as i16;
    }
    ensure!(p.coeffs.iter().all(|&c| c < Q), "Coefficient exceeds modulus");
    Ok(p)
}


/// Serializes a vector of polynomials coordinate by coordinate.
pub(crate) fn polyvec_to_bytes<const K: usize>(v: &PolyVec<K>, bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), K * POLY_BYTES, "polyvec byte length mismatch");
    for (i, p) in v.iter().enumerate() {
        poly_to_bytes(p, &mut bytes[i * POLY_BYTES..(i + 1) * POLY_BYTES]);
    }
}


/// Deserializes a vector of polynomials, validating each coordinate.
pub(crate) fn polyvec_from_bytes<const K: usize>(bytes: &[u8]) -> Result<PolyVec<K>, &'static str> {
    debug_assert_eq!(bytes.len(), K * POLY_BYTES, "polyvec byte length mismatch");
    let mut v = [Poly::zero(); K];
    for (i, p) in v.iter_mut().enumerate() {
        *p = poly_from_bytes(&bytes[i * POLY_BYTES..(i + 1) * POLY_BYTES])?;
    }
    Ok(v)
}


/// Rate-d compression of one canonical coefficient:
/// x -> round(x * 2^d / q) mod 2^d. The multiplier 2^36 / q makes the
/// division exact for every x below q and d up to 11. The conditional
/// subtraction folds the export invariant into the codec.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn compress_d(x: i16, d: u32) -> u16 {
    const M: u64 = ((1u64 << 36) + Q as u64 - 1) / Q as u64;
    let y = ((cond_sub_q(x) as u32) << d) + (Q as u32 >> 1);
    (((u64::from(y) * M) >> 36) as u16) & ((1u16 << d) - 1)
}


/// Rate-d decompression: y -> round(y * q / 2^d).
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn decompress_d(y: u16, d: u32) -> i16 {
    ((u32::from(y) * Q as u32 + (1u32 << (d - 1))) >> d) as i16
}


/// Maps each coefficient to its most significant "half of q" bit, producing
/// the 32-byte message a ciphertext encrypts.
pub(crate) fn poly_to_msg(p: &Poly) -> [u8; 32] {
    let mut msg = [0u8; 32];
    for (i, byte) in msg.iter_mut().enumerate() {
        for j in 0..8 {
            let bit = compress_d(p.coeffs[8 * i + j], 1);
            *byte |= u8::try_from(bit).expect("one-bit value") << j;
        }
    }
    msg
}


/// Lifts each message bit to 0 or (q+1)/2 using an arithmetic all-ones mask,
/// with no data-dependent branch.
pub(crate) fn poly_from_msg(msg: &[u8; 32]) -> Poly {
    let mut p = Poly::zero();
    for (i, byte) in msg.iter().enumerate() {
        for j in 0..8 {
            let mask = ((i16::from(*byte) >> j) & 1).wrapping_neg();
            p.coeffs[8 * i + j] = mask & ((Q + 1) / 2);
        }
    }
    p
}


/// Lossy serialization of the ciphertext polynomial v at rate dv: 8
/// coefficients pack into 4 bytes (dv = 4) or 5 bytes (dv = 5).
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn poly_compress(p: &Poly, d: u32, bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "compressed poly length mismatch");
    let mut t = [0u16; 8];
    if d == 4 {
        for i in 0..N / 8 {
            for (k, tk) in t.iter_mut().enumerate() {
                *tk = compress_d(p.coeffs[8 * i + k], 4);
            }
            bytes[4 * i] = (t[0] | (t[1] << 4)) as u8;
            bytes[4 * i + 1] = (t[2] | (t[3] << 4)) as u8;
            bytes[4 * i + 2] = (t[4] | (t[5] << 4)) as u8;
            bytes[4 * i + 3] = (t[6] | (t[7] << 4)) as u8;
        }
    } else {
        for i in 0..N / 8 {
            for (k, tk) in t.iter_mut().enumerate() {
                *tk = compress_d(p.coeffs[8 * i + k], 5);
            }
            bytes[5 * i] = (t[0] | (t[1] << 5)) as u8;
            bytes[5 * i + 1] = ((t[1] >> 3) | (t[2] << 2) | (t[3] << 7)) as u8;
            bytes[5 * i + 2] = ((t[3] >> 1) | (t[4] << 4)) as u8;
            bytes[5 * i + 3] = ((t[4] >> 4) | (t[5] << 1) | (t[6] << 6)) as u8;
            bytes[5 * i + 4] = ((t[6] >> 2) | (t[7] << 3)) as u8;
        }
    }
}


/// Inverse of `poly_compress`; infallible, every bit pattern decodes.
pub(crate) fn poly_decompress(bytes: &[u8], d: u32) -> Poly {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "compressed poly length mismatch");
    let mut p = Poly::zero();
    if d == 4 {
        for i in 0..N / 2 {
            p.coeffs[2 * i] = decompress_d(u16::from(bytes[i]) & 15, 4);
            p.coeffs[2 * i + 1] = decompress_d(u16::from(bytes[i]) >> 4, 4);
        }
    } else {
        for i in 0..N / 8 {
            let b: [u16; 5] = core::array::from_fn(|k| u16::from(bytes[5 * i + k]));
            let t = [
                b[0] & 31,
                ((b[0] >> 5) | (b[1] << 3)) & 31,
                (b[1] >> 2) & 31,
                ((b[1] >> 7) | (b[2] << 1)) & 31,
                ((b[2] >> 4) | (b[3] << 4)) & 31,
                (b[3] >> 1) & 31,
                ((b[3] >> 6) | (b[4] << 2)) & 31,
                (b[4] >> 3) & 31,
            ];
            for (k, tk) in t.iter().enumerate() {
                p.coeffs[8 * i + k] = decompress_d(*tk, 5);
            }
        }
    }
    p
}


/// Lossy serialization of the ciphertext vector u at rate du: 4 coefficients
/// pack into 5 bytes (du = 10) or 8 coefficients into 11 bytes (du = 11).
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn polyvec_compress<const K: usize>(v: &PolyVec<K>, d: u32, bytes: &mut [u8]) {
    let step = 32 * d as usize;
    debug_assert_eq!(bytes.len(), K * step, "compressed polyvec length mismatch");
    if d == 10 {
        for (n, p) in v.iter().enumerate() {
            let out = &mut bytes[n * step..(n + 1) * step];
            let mut t = [0u16; 4];
            for i in 0..N / 4 {
                for (k, tk) in t.iter_mut().enumerate() {
                    *tk = compress_d(p.coeffs[4 * i + k], 10);
                }
                out[5 * i] = t[0] as u8;
                out[5 * i + 1] = ((t[0] >> 8) | (t[1] << 2)) as u8;
                out[5 * i + 2] = ((t[1] >> 6) | (t[2] << 4)) as u8;
                out[5 * i + 3] = ((t[2] >> 4) | (t[3] << 6)) as u8;
                out[5 * i + 4] = (t[3] >> 2) as u8;
            }
        }
    } else {
        for (n, p) in v.iter().enumerate() {
            let out = &mut bytes[n * step..(n + 1) * step];
            let mut t = [0u16; 8];
            for i in 0..N / 8 {
                for (k, tk) in t.iter_mut().enumerate() {
                    *tk = compress_d(p.coeffs[8 * i + k], 11);
                }
                out[11 * i] = t[0] as u8;
                out[11 * i + 1] = ((t[0] >> 8) | (t[1] << 3)) as u8;
                out[11 * i + 2] = ((t[1] >> 5) | (t[2] << 6)) as u8;
                out[11 * i + 3] = (t[2] >> 2) as u8;
                out[11 * i + 4] = ((t[2] >> 10) | (t[3] << 1)) as u8;
                out[11 * i + 5] = ((t[3] >> 7) | (t[4] << 4)) as u8;
                out[11 * i + 6] = ((t[4] >> 4) | (t[5] << 7)) as u8;
                out[11 * i + 7] = (t[5] >> 1) as u8;
                out[11 * i + 8] = ((t[5] >> 9) | (t[6] << 2)) as u8;
                out[11 * i + 9] = ((t[6] >> 6) | (t[7] << 5)) as u8;
                out[11 * i + 10] = (t[7] >> 3) as u8;
            }
        }
    }
}


/// Inverse of `polyvec_compress`; infallible.
pub(crate) fn polyvec_decompress<const K: usize>(bytes: &[u8], d: u32) -> PolyVec<K> {
    let step = 32 * d as usize;
    debug_assert_eq!(bytes.len(), K * step, "compressed polyvec length mismatch");
    let mut v = [Poly::zero(); K];
    if d == 10 {
        for (n, p) in v.iter_mut().enumerate() {
            let chunk = &bytes[n * step..(n + 1) * step];
            for i in 0..N / 4 {
                let b: [u16; 5] = core::array::from_fn(|k| u16::from(chunk[5 * i + k]));
                let t = [
                    (b[0] | (b[1] << 8)) & 0x3FF,
                    ((b[1] >> 2) | (b[2] << 6)) & 0x3FF,
                    ((b[2] >> 4) | (b[3] << 4)) & 0x3FF,
                    ((b[3] >> 6) | (b[4] << 2)) & 0x3FF,
                ];
                for (k, tk) in t.iter().enumerate() {
                    p.coeffs[4 * i + k] = decompress_d(*tk, 10);
                }
            }
        }
    } else {
        for (n, p) in v.iter_mut().enumerate() {
            let chunk = &bytes[n * step..(n + 1) * step];
            for i in 0..N / 8 {
                let b: [u16; 11] = core::array::from_fn(|k| u16::from(chunk[11 * i + k]));
                let t = [
                    (b[0] | (b[1] << 8)) & 0x7FF,
                    ((b[1] >> 3) | (b[2] << 5)) & 0x7FF,
                    ((b[2] >> 6) | (b[3] << 2) | (b[4] << 10)) & 0x7FF,
                    ((b[4] >> 1) | (b[5] << 7)) & 0x7FF,
                    ((b[5] >> 4) | (b[6] << 4)) & 0x7FF,
                    ((b[6] >> 7) | (b[7] << 1) | (b[8] << 9)) & 0x7FF,
                    ((b[8] >> 2) | (b[9] << 6)) & 0x7FF,
                    ((b[9] >> 5) | (b[10] << 3)) & 0x7FF,
                ];
                for (k, tk) in t.iter().enumerate() {
                    p.coeffs[8 * i + k] = decompress_d(*tk, 11);
                }
            }
        }
    }
    v
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn poly_bytes_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut bytes = [0u8; POLY_BYTES];
        for _ in 0..50 {
            let p = Poly { coeffs: core::array::from_fn(|_| rng.gen_range(0..Q)) };
            poly_to_bytes(&p, &mut bytes);
            let q = poly_from_bytes(&bytes).unwrap();
            assert_eq!(p.coeffs, q.coeffs);
        }
    }

    #[test]
    fn poly_bytes_boundary_values() {
        // q - 1 survives the round trip ...
        let p = Poly { coeffs: [Q - 1; 256] };
        let mut bytes = [0u8; POLY_BYTES];
        poly_to_bytes(&p, &mut bytes);
        assert_eq!(poly_from_bytes(&bytes).unwrap().coeffs, p.coeffs);

        // ... but q itself is first folded to zero on export
        let p = Poly { coeffs: [Q; 256] };
        poly_to_bytes(&p, &mut bytes);
        assert_eq!(poly_from_bytes(&bytes).unwrap().coeffs, [0i16; 256]);

        // and raw 12-bit values at or above q are rejected on import
        let bad = [0xFFu8; POLY_BYTES];
        assert!(poly_from_bytes(&bad).is_err());
    }

    #[test]
    fn msg_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        for _ in 0..50 {
            let msg: [u8; 32] = rng.gen();
            assert_eq!(poly_to_msg(&poly_from_msg(&msg)), msg);
        }
    }

    #[test]
    fn compressed_codecs_are_stable_on_their_image() {
        // compress . decompress . compress must equal compress at every rate
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(789);
        for _ in 0..20 {
            let p = Poly { coeffs: core::array::from_fn(|_| rng.gen_range(0..Q)) };
            let v: PolyVec<2> = [p, Poly { coeffs: core::array::from_fn(|_| rng.gen_range(0..Q)) }];

            for d in [4u32, 5] {
                let mut first = [0u8; 32 * 5];
                let mut second = [0u8; 32 * 5];
                let len = 32 * d as usize;
                poly_compress(&p, d, &mut first[..len]);
                let back = poly_decompress(&first[..len], d);
                poly_compress(&back, d, &mut second[..len]);
                assert_eq!(first[..len], second[..len]);
            }

            for d in [10u32, 11] {
                let mut first = [0u8; 2 * 32 * 11];
                let mut second = [0u8; 2 * 32 * 11];
                let len = 2 * 32 * d as usize;
                polyvec_compress(&v, d, &mut first[..len]);
                let back = polyvec_decompress::<2>(&first[..len], d);
                polyvec_compress(&back, d, &mut second[..len]);
                assert_eq!(first[..len], second[..len]);
            }
        }
    }

    #[test]
    fn decompress_inverts_compress_within_tolerance() {
        // |decompress(compress(x)) - x| mod q is bounded by round(q / 2^(d+1))
        for d in [4u32, 5, 10, 11] {
            let bound = (i32::from(Q) + (1 << (d + 1)) - 1) / (1 << (d + 1));
            for x in 0..Q {
                let y = decompress_d(compress_d(x, d), d);
                let diff = (i32::from(y) - i32::from(x)).rem_euclid(i32::from(Q));
                let dist = diff.min(i32::from(Q) - diff);
                assert!(dist <= bound, "rate {d}: x={x} y={y} dist={dist}");
            }
        }
    }
}
