use zeroize::{Zeroize, ZeroizeOnDrop};


/// The key a remote party encapsulates under: the packed NTT-domain vector
/// t_hat with the 32-byte matrix seed rho appended, sized per parameter set.
/// Construction goes through `try_from_bytes`, which insists every packed
/// 12-bit coefficient decodes below the modulus.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
#[repr(align(8))]
pub struct EncapsKey<const EK_LEN: usize>(pub(crate) [u8; EK_LEN]);


/// The decapsulation secret: the packed NTT-domain secret vector s_hat,
/// followed by the material the re-encryption check needs without touching
/// the wire format — the full encapsulation key, its SHA3-256 hash, and the
/// 32-byte value z that stands in for the derived key on rejection.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
#[repr(align(8))]
pub struct DecapsKey<const DK_LEN: usize>(pub(crate) [u8; DK_LEN]);


/// A ciphertext: the rate-du compressed vector u followed by the rate-dv
/// compressed polynomial v. Any byte pattern of the right length is
/// accepted; tampering surfaces only as a different shared secret out of
/// decapsulation, never as an error.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
#[repr(align(8))]
pub struct CipherText<const CT_LEN: usize>(pub(crate) [u8; CT_LEN]);
