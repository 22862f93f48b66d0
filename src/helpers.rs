use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};


/// If the condition is not met, return an error message. Borrowed from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($msg);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// The noise PRF: SHAKE-256 over seed and a one-byte nonce, squeezing the
/// 64 * eta bytes the binomial sampler consumes.
#[must_use]
pub(crate) fn prf<const ETA_64: usize>(seed: &[u8; 32], nonce: u8) -> [u8; ETA_64] {
    let mut hasher = Shake256::default();
    hasher.update(seed);
    hasher.update(&[nonce]);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; ETA_64];
    reader.read(&mut result);
    result
}


/// The matrix XOF: SHAKE-128 over the 32-byte seed rho and two index bytes,
/// returned as an incremental reader since rejection sampling consumes a
/// data-dependent number of bytes.
#[must_use]
pub(crate) fn xof(rho: &[u8; 32], b1: u8, b2: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(rho);
    hasher.update(&[b1]);
    hasher.update(&[b2]);
    hasher.finalize_xof()
}


/// SHA3-512 split into two 32-byte halves. Used over a seed (keygen), over
/// m and H(ek) (encaps), and over m' and the stored key hash (decaps), so
/// the signature takes a list of operands to avoid prior concatenation.
pub(crate) fn g(bytes: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    bytes.iter().for_each(|b| Digest::update(&mut hasher, b));
    let digest = hasher.finalize();
    let a = digest[0..32].try_into().expect("g_a fail");
    let b = digest[32..64].try_into().expect("g_b fail");
    (a, b)
}


/// SHA3-256; used on the variable-length ek and ct, so the signature is a slice.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    let digest = hasher.finalize();
    digest.into()
}


/// The shared-secret KDF: SHAKE-256 over the (possibly substituted) derived
/// key and the ciphertext hash, squeezed to 32 bytes.
#[must_use]
pub(crate) fn kdf(k_bar: &[u8; 32], ct_hash: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    hasher.update(k_bar);
    hasher.update(ct_hash);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; 32];
    reader.read(&mut result);
    result
}
