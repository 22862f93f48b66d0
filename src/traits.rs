use rand_core::CryptoRngCore;


#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is defined to allow trait objects.
pub trait KeyGen {
    /// The (public) encapsulation key sent from the originator to the remote party.
    type EncapsKey;
    /// The (private) decapsulation key used by the originator to generate the shared secret.
    type DecapsKey;
    /// A serialized (public) encapsulation key byte array of the correct length.
    type EncapsByteArray;
    /// A serialized (private) decapsulation key byte array of the correct length.
    type DecapsByteArray;


    /// Generates an encapsulation and decapsulation key pair specific to this security
    /// parameter set, using the OS default random number generator. Operates in constant
    /// time outside of the public matrix seed `rho`, which crosses the trust boundary in
    /// the clear.
    /// # Errors
    /// Returns an error when the random number generator fails.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber768; // Could also be kyber512 or kyber1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (ek, dk) = kyber768::KG::try_keygen()?;            // Originator keypair
    /// let ek_bytes = ek.into_bytes();                        // Serialize, send to remote
    ///
    /// let remote_ek = kyber768::EncapsKey::try_from_bytes(ek_bytes)?;
    /// let (remote_ssk, ct) = remote_ek.try_encaps()?;        // Remote party encapsulates
    /// let ct_bytes = ct.into_bytes();                        // Serialize, send back
    ///
    /// let ct = kyber768::CipherText::try_from_bytes(ct_bytes)?;
    /// let local_ssk = dk.try_decaps(&ct)?;                   // Originator decapsulates
    /// assert_eq!(remote_ssk, local_ssk);                     // Both hold the same secret
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::EncapsKey, Self::DecapsKey), &'static str> {
        Self::try_keygen_with_rng(&mut OsRng)
    }


    /// Generates an encapsulation and decapsulation key pair specific to this security
    /// parameter set, using the provided random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), &'static str>;


    /// Checks the correspondence of a serialized keypair, e.g. after both halves have
    /// been stored to disk and retrieved: the decapsulation key must embed the
    /// encapsulation key along with its hash, and both must deserialize. This function
    /// is NOT intended to operate in constant time.
    fn validate_keypair_vartime(ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray) -> bool;
}


/// The `Encaps` trait uses the encapsulation key to generate the ciphertext and shared secret.
pub trait Encaps {
    /// The common shared secret.
    type SharedSecretKey;
    /// The ciphertext transmitted from the remote party to the originator.
    type CipherText;


    /// Generates a shared secret and ciphertext using the OS default random number
    /// generator. Operates in constant time.
    /// # Errors
    /// Returns an error when the random number generator fails.
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
        self.try_encaps_with_rng(&mut OsRng)
    }


    /// Generates a shared secret and ciphertext using the provided random number
    /// generator. Operates in constant time.
    /// # Errors
    /// Returns an error when the random number generator fails.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str>;
}


/// The `Decaps` trait uses the decapsulation key and ciphertext to generate the shared secret.
pub trait Decaps {
    /// Ciphertext struct
    type CipherText;
    /// Shared secret struct
    type SharedSecretKey;


    /// Generates a shared secret from a decapsulation key and ciphertext. Operates in
    /// constant time; a malformed ciphertext yields the implicit-rejection secret
    /// rather than an error.
    /// # Errors
    /// Reserved for internal error conditions; decapsulation failure is never reported.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, &'static str>;
}


/// Serialization and deserialization of structs.
pub trait SerDes {
    /// Correctly sized byte array for struct.
    type ByteArray;


    /// Produces a byte array of fixed size specific to the struct being serialized.
    fn into_bytes(self) -> Self::ByteArray;


    /// Consumes a byte array of fixed size specific to the struct being deserialized;
    /// performs validation.
    /// # Errors
    /// Returns an error on malformed input.
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}
