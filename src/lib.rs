#![no_std]
#![deny(clippy::pedantic, missing_docs, unsafe_code)]
// Most of the 'allow' category...
#![deny(absolute_paths_not_starting_with_crate, keyword_idents, let_underscore_drop)]
#![deny(macro_use_extern_crate, missing_abi, non_ascii_idents)]
#![deny(rust_2021_incompatible_closure_captures, rust_2021_incompatible_or_patterns)]
#![deny(rust_2021_prefixes_incompatible_syntax, rust_2021_prelude_collisions)]
#![deny(single_use_lifetimes, trivial_casts, trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn, unused_extern_crates, unused_import_braces, unused_lifetimes)]
//
#![doc = include_str!("../README.md")]

// Implements the CRYSTALS-Kyber round 3 KEM; see
// <https://pq-crystals.org/kyber/data/kyber-specification-round3-20210804.pdf>

// Functionality map per the round 3 specification
//
// Barrett / Montgomery reduction                 --> reduce.rs
// NTT, inverse NTT, base multiplication          --> ntt.rs
// Polynomials and vectors of polynomials         --> poly.rs, polyvec.rs
// Encode/Decode, Compress/Decompress, msg codec  --> codec.rs
// Uniform rejection sampling and CBD             --> sampling.rs
// PRF, XOF, G, H, KDF                            --> helpers.rs
// Kyber.CPAPKE KeyGen/Enc/Dec                    --> indcpa.rs
// Kyber.CCAKEM KeyGen/Encaps/Decaps              --> kem.rs
//
// The three parameter sets are modules in this file with injected macro code
// that connects them into the functionality in kem.rs. The coefficient
// domain (standard, NTT, Montgomery factors) is tracked by function
// position rather than by type; the comments on indcpa.rs mark the spots
// where a Montgomery factor is introduced or cancelled.


/// The `rand_core` types are re-exported so that users of this crate do not
/// have to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

use crate::traits::SerDes;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

mod codec;
mod helpers;
mod indcpa;
mod kem;
mod ntt;
mod poly;
mod polyvec;
mod reduce;
mod sampling;
mod types;

/// All functionality is covered by traits, such that consumers can utilize trait objects if desired.
pub mod traits;

// Relevant to all parameter sets
const N: usize = 256;
const Q: i16 = 3329;


/// Shared Secret Key length for all Kyber variants (in bytes)
pub const SSK_LEN: usize = 32;

/// The (opaque) shared secret key that can be de/serialized by each party.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);


impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, &'static str> {
        // There is no opportunity for validation (yet); a Result is used for
        // symmetry with the other containers and future possibility.
        Ok(SharedSecretKey(ssk))
    }
}


// Conservative (constant-time) support...
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool { bool::from(self.0.ct_eq(&other.0)) }
}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        use crate::codec::poly_from_bytes;
        use crate::helpers::{ensure, h};
        use crate::kem::{kem_decaps, kem_encaps, kem_key_gen};
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;
        use rand_core::CryptoRngCore;


        /// Correctly sized encapsulation key specific to the target security parameter set.
        pub type EncapsKey = crate::types::EncapsKey<EK_LEN>;

        /// Correctly sized decapsulation key specific to the target security parameter set.
        pub type DecapsKey = crate::types::DecapsKey<DK_LEN>;

        /// Correctly sized ciphertext specific to the target security parameter set.
        pub type CipherText = crate::types::CipherText<CT_LEN>;

        /// Supports the `KeyGen` trait, allowing for keypair generation
        pub struct KG();


        impl KeyGen for KG {
            type DecapsByteArray = [u8; DK_LEN];
            type DecapsKey = DecapsKey;
            type EncapsByteArray = [u8; EK_LEN];
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), &'static str> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                kem_key_gen::<K, { ETA1 as usize * 64 }>(rng, &mut ek, &mut dk)?;
                Ok((crate::types::EncapsKey(ek), crate::types::DecapsKey(dk)))
            }

            fn validate_keypair_vartime(
                ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray,
            ) -> bool {
                // Note that size is checked by only accepting refs to correctly sized byte arrays
                let p1 = 384 * K;
                let p2 = p1 + EK_LEN;
                // 1. dk must embed ek
                if !(*ek == dk[p1..p2]) {
                    return false;
                };
                // 2. dk must embed the hash of ek
                if !(h(ek) == dk[p2..(p2 + 32)]) {
                    return false;
                };
                // 3. both must deserialize (which runs the modulus check on ek)
                EncapsKey::try_from_bytes(*ek).is_ok() & DecapsKey::try_from_bytes(*dk).is_ok()
            }
        }


        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
                let mut ct = [0u8; CT_LEN];
                let ssk = kem_encaps::<K, { ETA1 as usize * 64 }, { ETA2 as usize * 64 }>(
                    rng, DU, DV, &self.0, &mut ct,
                )?;
                Ok((ssk, crate::types::CipherText(ct)))
            }
        }


        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, &'static str> {
                kem_decaps::<K, { ETA1 as usize * 64 }, { ETA2 as usize * 64 }, CT_LEN>(
                    DU, DV, &self.0, &ct.0,
                )
            }
        }


        impl SerDes for EncapsKey {
            type ByteArray = [u8; EK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, &'static str> {
                // An encaps key is only accepted if every packed 12-bit
                // coefficient decodes below the modulus; accepting a byte
                // array of fixed size addresses the length check.
                for i in 0..K {
                    let _p = poly_from_bytes(&ek[384 * i..384 * (i + 1)])?;
                }
                Ok(crate::types::EncapsKey(ek))
            }
        }


        impl SerDes for DecapsKey {
            type ByteArray = [u8; DK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, &'static str> {
                // The embedded encaps key must pass its own validation and
                // match the stored hash; the rejection value z admits no
                // validation.
                let p1 = 384 * K;
                let p2 = p1 + EK_LEN;
                let ek = &dk[p1..p2];
                let _res = EncapsKey::try_from_bytes(
                    ek.try_into().map_err(|_| "Malformed encaps key")?,
                )?;
                ensure!(h(ek) == dk[p2..(p2 + 32)], "Encaps hash wrong");
                Ok(crate::types::DecapsKey(dk))
            }
        }


        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, &'static str> {
                // Only size constraints apply to a ciphertext, and those are
                // carried by the type; a Result is used in case future
                // opportunities for further validation arise.
                Ok(crate::types::CipherText(ct))
            }
        }


        #[cfg(test)]
        mod tests {
            use super::*;
            use rand_chacha::rand_core::SeedableRng;

            #[test]
            fn smoke_test() {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
                for _i in 0..10 {
                    let (ek, dk) = KG::try_keygen_with_rng(&mut rng).unwrap();
                    let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
                    let ssk2 = dk.try_decaps(&ct).unwrap();
                    assert_eq!(ssk1, ssk2);
                    assert!(KG::validate_keypair_vartime(
                        &ek.clone().into_bytes(),
                        &dk.clone().into_bytes()
                    ));
                    assert_eq!(ek.clone().0, EncapsKey::try_from_bytes(ek.into_bytes()).unwrap().0);
                    assert_eq!(dk.clone().0, DecapsKey::try_from_bytes(dk.into_bytes()).unwrap().0);
                }
            }
        }
    };
}


/// Functionality for the Kyber512 security parameter set, claimed to be in security category 1.
#[cfg(feature = "kyber-512")]
pub mod kyber512 {
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `try_keygen()` to get an encaps key `encapsKey` and decaps key `decapsKey`.
    //! 2. The originator serializes the encaps key via `encapsKey.into_bytes()` and sends to the remote party.
    //! 3. The remote party deserializes the bytes via `try_from_bytes(<bytes>)` and runs `try_encaps()` to get the
    //!    shared secret key `ssk` and ciphertext `cipherText`.
    //! 4. The remote party serializes the ciphertext via `cipherText.into_bytes()` and sends to the originator.
    //! 5. The originator deserializes the ciphertext via `try_from_bytes(<bytes>)` then
    //!    runs `decapsKey.try_decaps(cipherText)` to get the shared secret key `ssk`.
    //! 6. Both the originator and remote party now have the same shared secret key `ssk`.
    //!
    //! **--> See [`crate::traits`] for the keygen, encapsulation, decapsulation, and serialization functionality.**

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 800;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 1632;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// Functionality for the Kyber768 security parameter set, claimed to be in security category 3.
#[cfg(feature = "kyber-768")]
pub mod kyber768 {
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `try_keygen()` to get an encaps key `encapsKey` and decaps key `decapsKey`.
    //! 2. The originator serializes the encaps key via `encapsKey.into_bytes()` and sends to the remote party.
    //! 3. The remote party deserializes the bytes via `try_from_bytes(<bytes>)` and runs `try_encaps()` to get the
    //!    shared secret key `ssk` and ciphertext `cipherText`.
    //! 4. The remote party serializes the ciphertext via `cipherText.into_bytes()` and sends to the originator.
    //! 5. The originator deserializes the ciphertext via `try_from_bytes(<bytes>)` then
    //!    runs `decapsKey.try_decaps(cipherText)` to get the shared secret key `ssk`.
    //! 6. Both the originator and remote party now have the same shared secret key `ssk`.
    //!
    //! **--> See [`crate::traits`] for the keygen, encapsulation, decapsulation, and serialization functionality.**

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 1184;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 2400;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// Functionality for the Kyber1024 security parameter set, claimed to be in security category 5.
#[cfg(feature = "kyber-1024")]
pub mod kyber1024 {
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `try_keygen()` to get an encaps key `encapsKey` and decaps key `decapsKey`.
    //! 2. The originator serializes the encaps key via `encapsKey.into_bytes()` and sends to the remote party.
    //! 3. The remote party deserializes the bytes via `try_from_bytes(<bytes>)` and runs `try_encaps()` to get the
    //!    shared secret key `ssk` and ciphertext `cipherText`.
    //! 4. The remote party serializes the ciphertext via `cipherText.into_bytes()` and sends to the originator.
    //! 5. The originator deserializes the ciphertext via `try_from_bytes(<bytes>)` then
    //!    runs `decapsKey.try_decaps(cipherText)` to get the shared secret key `ssk`.
    //! 6. Both the originator and remote party now have the same shared secret key `ssk`.
    //!
    //! **--> See [`crate::traits`] for the keygen, encapsulation, decapsulation, and serialization functionality.**

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 1568;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 3168;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 1568;

    functionality!();
}
