use crate::reduce::{barrett_reduce, fqmul, MONT_R2};
use crate::N;


/// An element of `R_q = Z_q[X]/(X^256 + 1)`: 256 signed 16-bit coefficients.
/// Whether the coefficients are in the standard or NTT domain, and whether
/// they carry a Montgomery factor, is tracked by the call site; the type
/// itself is a plain by-value aggregate.
#[derive(Clone, Copy)]
pub(crate) struct Poly {
    pub(crate) coeffs: [i16; N],
}


impl Poly {
    pub(crate) const fn zero() -> Self {
        Self { coeffs: [0i16; N] }
    }

    /// Coefficient-wise sum without reduction; callers reduce before export.
    #[must_use]
    pub(crate) fn add(&self, other: &Self) -> Self {
        Self { coeffs: core::array::from_fn(|i| self.coeffs[i] + other.coeffs[i]) }
    }

    /// Coefficient-wise difference without reduction.
    #[must_use]
    pub(crate) fn sub(&self, other: &Self) -> Self {
        Self { coeffs: core::array::from_fn(|i| self.coeffs[i] - other.coeffs[i]) }
    }

    /// Barrett-reduces every coefficient into `[0, 2q)`.
    pub(crate) fn reduce(&mut self) {
        for coeff in &mut self.coeffs {
            *coeff = barrett_reduce(*coeff);
        }
    }

    /// Multiplies every coefficient by `R^2 mod q` via a Montgomery
    /// reduction, i.e. moves the polynomial into the Montgomery domain.
    /// Applied to a pointwise-accumulated product this instead cancels the
    /// `R^-1` the accumulation introduced.
    pub(crate) fn to_mont(&mut self) {
        for coeff in &mut self.coeffs {
            *coeff = fqmul(*coeff, MONT_R2);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::cond_sub_q;

    #[test]
    fn add_sub_round_trip() {
        let a = Poly { coeffs: core::array::from_fn(|i| i16::try_from(i).unwrap()) };
        let b = Poly { coeffs: [17i16; N] };
        let r = a.add(&b).sub(&b);
        assert_eq!(r.coeffs, a.coeffs);
    }

    #[test]
    fn to_mont_multiplies_by_r() {
        let mut p = Poly { coeffs: [1i16; N] };
        p.to_mont();
        p.reduce();
        for c in p.coeffs {
            assert_eq!(cond_sub_q(c), 2285); // 2^16 mod q
        }
    }
}
