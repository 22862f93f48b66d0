use crate::poly::Poly;
use crate::reduce::{barrett_reduce, fqmul};


// Powers of the 256-th root of unity 17, in bit-reversed order and premultiplied
// by 2^16 mod q, so the butterfly multiplication doubles as the Montgomery
// domain correction. Entry 0 is the Montgomery representation of 1 and is
// never consumed by the forward transform.
pub(crate) static ZETAS: [i16; 128] = [
    2285, 2571, 2970, 1812, 1493, 1422, 287, 202, 3158, 622, 1577, 182, 962,
    2127, 1855, 1468, 573, 2004, 264, 383, 2500, 1458, 1727, 3199, 2648, 1017,
    732, 608, 1787, 411, 3124, 1758, 1223, 652, 2777, 1015, 2036, 1491, 3047,
    1785, 516, 3321, 3009, 2663, 1711, 2167, 126, 1469, 2476, 3239, 3058, 830,
    107, 1908, 3082, 2378, 2931, 961, 1821, 2604, 448, 2264, 677, 2054, 2226,
    430, 555, 843, 2078, 871, 1550, 105, 422, 587, 177, 3094, 3038, 2869,
    1574, 1653, 3083, 778, 1159, 3182, 2552, 1483, 2727, 1119, 1739, 644, 2457,
    349, 418, 329, 3173, 3254, 817, 1097, 603, 610, 1322, 2044, 1864, 384,
    2114, 3193, 1218, 1994, 2455, 220, 2142, 1670, 2144, 1799, 2051, 794, 1819,
    2475, 2459, 478, 3221, 3021, 996, 991, 958, 1869, 1522, 1628,
];

// Inverse-transform roots: ZETAS_INV[j] = -ZETAS[127 - j] mod q for j < 127.
// The final entry 1441 = 2^16 * 2^16 * 128^-1 mod q folds the transform
// scaling and one Montgomery factor into the closing multiplication.
pub(crate) static ZETAS_INV: [i16; 128] = [
    1701, 1807, 1460, 2371, 2338, 2333, 308, 108, 2851, 870, 854, 1510, 2535,
    1278, 1530, 1185, 1659, 1187, 3109, 874, 1335, 2111, 136, 1215, 2945, 1465,
    1285, 2007, 2719, 2726, 2232, 2512, 75, 156, 3000, 2911, 2980, 872, 2685,
    1590, 2210, 602, 1846, 777, 147, 2170, 2551, 246, 1676, 1755, 460, 291,
    235, 3152, 2742, 2907, 3224, 1779, 2458, 1251, 2486, 2774, 2899, 1103, 1275,
    2652, 1065, 2881, 725, 1508, 2368, 398, 951, 247, 1421, 3222, 2499, 271,
    90, 853, 1860, 3203, 1162, 1618, 666, 320, 8, 2813, 1544, 282, 1838,
    1293, 2314, 552, 2677, 2106, 1571, 205, 2918, 1542, 2721, 2597, 2312, 681,
    130, 1602, 1871, 829, 2946, 3065, 1325, 2756, 1861, 1474, 1202, 2367, 3147,
    1752, 2707, 171, 3127, 3042, 1907, 1836, 1517, 359, 758, 1441,
];


/// In-place Cooley-Tukey transform into the NTT domain. Input in standard
/// coefficient order, output in bit-reversed order with coefficients bounded
/// by 8q in absolute value; callers reduce before using the result.
pub(crate) fn ntt(p: &mut Poly) {
    let mut k = 1;
    for len in [128, 64, 32, 16, 8, 4, 2] {
        for start in (0..256).step_by(2 * len) {
            let zeta = ZETAS[k];
            k += 1;
            for j in start..(start + len) {
                let t = fqmul(zeta, p.coeffs[j + len]);
                p.coeffs[j + len] = p.coeffs[j] - t;
                p.coeffs[j] += t;
            }
        }
    }
}


/// In-place Gentleman-Sande transform out of the NTT domain. The closing
/// multiplication by `ZETAS_INV[127]` cancels the Montgomery factor that a
/// preceding `base_mul` introduced, so a pointwise product comes out in the
/// standard domain with coefficients in `(-q, q)`.
pub(crate) fn ntt_inv(p: &mut Poly) {
    let mut k = 0;
    for len in [2, 4, 8, 16, 32, 64, 128] {
        for start in (0..256).step_by(2 * len) {
            let zeta = ZETAS_INV[k];
            k += 1;
            for j in start..(start + len) {
                let t = p.coeffs[j];
                p.coeffs[j] = barrett_reduce(t + p.coeffs[j + len]);
                p.coeffs[j + len] = fqmul(zeta, t - p.coeffs[j + len]);
            }
        }
    }
    for coeff in &mut p.coeffs {
        *coeff = fqmul(ZETAS_INV[127], *coeff);
    }
}


/// Product of two degree-one polynomials modulo `X^2 - gamma`; all cross
/// terms pass through a Montgomery reduction.
fn base_case_multiply(a0: i16, a1: i16, b0: i16, b1: i16, gamma: i16) -> (i16, i16) {
    let c0 = fqmul(a0, b0) + fqmul(gamma, fqmul(a1, b1));
    let c1 = fqmul(a0, b1) + fqmul(a1, b0);
    (c0, c1)
}


/// Multiplication in the NTT domain: 128 independent degree-one products,
/// pairing the modulus `X^2 - zeta` with `X^2 + zeta`. The sums are
/// deliberately left unreduced; accumulating callers apply a single Barrett
/// pass at the end.
pub(crate) fn base_mul(a: &Poly, b: &Poly) -> Poly {
    let mut r = Poly::zero();
    for i in 0..64 {
        let zeta = ZETAS[64 + i];
        let (r0, r1) = base_case_multiply(
            a.coeffs[4 * i],
            a.coeffs[4 * i + 1],
            b.coeffs[4 * i],
            b.coeffs[4 * i + 1],
            zeta,
        );
        let (r2, r3) = base_case_multiply(
            a.coeffs[4 * i + 2],
            a.coeffs[4 * i + 3],
            b.coeffs[4 * i + 2],
            b.coeffs[4 * i + 3],
            -zeta,
        );
        r.coeffs[4 * i] = r0;
        r.coeffs[4 * i + 1] = r1;
        r.coeffs[4 * i + 2] = r2;
        r.coeffs[4 * i + 3] = r3;
    }
    r
}
