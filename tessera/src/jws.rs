//! The signing engine seam
//!
//! Token orchestration never touches cryptographic primitives directly.
//! Instead it hands the signing input and the caller's key material to a
//! [`SigningStrategy`], which is resolved by name from a
//! [`Registry`][crate::jwa::Registry].
//!
//! What the key bytes mean is up to each strategy. The built-in HMAC
//! strategies use them as the shared secret, while the RSA and ECDSA
//! strategies expect DER-encoded private keys for signing and public keys for
//! verification.

use std::{fmt, sync::Arc};

use crate::error;

/// A signing algorithm implementation
///
/// Implementations must be usable from many threads at once.
pub trait SigningStrategy: fmt::Debug + Send + Sync {
    /// Produces a signature over `data` using `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be used with this algorithm or the
    /// engine fails to produce a signature.
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError>;

    /// Checks that `signature` was produced over `data` by the holder of `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the signature does not match.
    fn verify(&self, key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError>;
}

impl<T> SigningStrategy for &'static T
where
    T: SigningStrategy + ?Sized,
{
    #[inline]
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        T::sign(self, key, data)
    }

    #[inline]
    fn verify(&self, key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError> {
        T::verify(self, key, data, signature)
    }
}

impl<T> SigningStrategy for Box<T>
where
    T: SigningStrategy + ?Sized,
{
    #[inline]
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        T::sign(self, key, data)
    }

    #[inline]
    fn verify(&self, key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError> {
        T::verify(self, key, data, signature)
    }
}

impl<T> SigningStrategy for Arc<T>
where
    T: SigningStrategy + ?Sized,
{
    #[inline]
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        T::sign(self, key, data)
    }

    #[inline]
    fn verify(&self, key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError> {
        T::verify(self, key, data, signature)
    }
}
