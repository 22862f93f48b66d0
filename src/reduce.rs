use crate::Q;


/// q^-1 mod 2^16; the Montgomery reduction step multiplies by this to clear
/// the low 16 bits of the product.
pub(crate) const QINV: i32 = 62209;

/// R^2 mod q with R = 2^16; `fqmul` by this constant moves a coefficient
/// into the Montgomery domain.
pub(crate) const MONT_R2: i16 = 1353;

/// Rounded quotient approximation of 2^26 / q.
const BARRETT_V: i32 = 20159;


/// Barrett reduction: maps an arbitrary 16-bit value to a representative of
/// the same residue class in `[0, 2q)`. Branch-free; the arithmetic shift
/// gives floor semantics for negative inputs.
#[inline(always)]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn barrett_reduce(a: i16) -> i16 {
    let quotient = ((BARRETT_V * i32::from(a)) >> 26) as i16;
    a.wrapping_sub(quotient.wrapping_mul(Q))
}


/// Montgomery reduction of a 32-bit product: returns `a * 2^-16 mod q` as a
/// value in `(-q, q)`. Requires `|a| < 2^15 * q`.
#[inline(always)]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn montgomery_reduce(a: i32) -> i16 {
    let u = a.wrapping_mul(QINV) as i16;
    let t = a - i32::from(u) * i32::from(Q);
    (t >> 16) as i16
}


/// Multiplication followed by Montgomery reduction.
#[inline(always)]
pub(crate) fn fqmul(a: i16, b: i16) -> i16 {
    montgomery_reduce(i32::from(a) * i32::from(b))
}


/// Conditionally subtracts q, mapping `[0, 2q)` to `[0, q)` without a
/// branch. Every coefficient exported to bytes passes through here.
#[inline(always)]
pub(crate) fn cond_sub_q(a: i16) -> i16 {
    let a = a.wrapping_sub(Q);
    a.wrapping_add((a >> 15) & Q)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn naive_mod_q(a: i32) -> i32 { a.rem_euclid(i32::from(Q)) }

    #[test]
    fn barrett_matches_naive_over_full_i16_range() {
        for a in i16::MIN..=i16::MAX {
            let r = barrett_reduce(a);
            assert!((0..2 * Q).contains(&r), "barrett({a}) = {r} out of range");
            assert_eq!(naive_mod_q(i32::from(r)), naive_mod_q(i32::from(a)));
        }
    }

    #[test]
    fn cond_sub_q_lands_in_canonical_range() {
        for a in 0..2 * Q {
            let r = cond_sub_q(a);
            assert!((0..Q).contains(&r));
            assert_eq!(naive_mod_q(i32::from(r)), naive_mod_q(i32::from(a)));
        }
    }

    #[test]
    fn montgomery_reduce_strips_one_r_factor() {
        // m(a * R) must be congruent to a, so m(a * b) * R ≡ a * b
        // (a bounded by q/2 keeps the shifted product inside the 2^15 * q precondition)
        for a in (-1_664i32..1_664).step_by(7) {
            let r = montgomery_reduce(a << 16);
            assert!(r > -Q && r < Q);
            assert_eq!(naive_mod_q(i32::from(r)), naive_mod_q(a));
        }
    }

    #[test]
    fn fqmul_is_modular_multiplication_up_to_r() {
        for a in (-3_328i16..3_329).step_by(97) {
            for b in (-3_328i16..3_329).step_by(89) {
                let r = fqmul(a, b);
                // r * 2^16 ≡ a * b (mod q)
                assert_eq!(
                    naive_mod_q(i32::from(r) << 16),
                    naive_mod_q(i32::from(a) * i32::from(b))
                );
            }
        }
    }

    #[test]
    fn to_montgomery_constant_moves_into_mont_domain() {
        // fqmul(1, MONT_R2) = R^2 * R^-1 = R mod q
        assert_eq!(naive_mod_q(i32::from(fqmul(1, MONT_R2))), 2285);
    }
}
