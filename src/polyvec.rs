use crate::ntt::{base_mul, ntt, ntt_inv};
use crate::poly::Poly;


/// A fixed-length vector of K polynomials, K in {2, 3, 4}.
pub(crate) type PolyVec<const K: usize> = [Poly; K];


/// Vector addition, coefficient-wise and unreduced.
#[must_use]
pub(crate) fn add_vecs<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| a[i].add(&b[i]))
}


/// Forward transform applied to each coordinate.
pub(crate) fn ntt_vec<const K: usize>(v: &mut PolyVec<K>) {
    for p in v {
        ntt(p);
    }
}


/// Inverse transform applied to each coordinate.
pub(crate) fn ntt_inv_vec<const K: usize>(v: &mut PolyVec<K>) {
    for p in v {
        ntt_inv(p);
    }
}


/// Barrett reduction applied to each coordinate.
pub(crate) fn reduce_vec<const K: usize>(v: &mut PolyVec<K>) {
    for p in v {
        p.reduce();
    }
}


/// Inner product in the NTT domain: the base products are accumulated
/// unreduced (bounded by 2q each, so at most 8q for K = 4) and a single
/// Barrett pass reduces the sum.
#[must_use]
pub(crate) fn pointwise_acc<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> Poly {
    let mut r = base_mul(&a[0], &b[0]);
    for i in 1..K {
        let t = base_mul(&a[i], &b[i]);
        for (rc, tc) in r.coeffs.iter_mut().zip(t.coeffs.iter()) {
            *rc += *tc;
        }
    }
    r.reduce();
    r
}
