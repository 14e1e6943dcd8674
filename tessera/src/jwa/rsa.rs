//! RSA signing strategies
//!
//! Signing keys are DER-encoded RSA private keys, either wrapped in PKCS#8
//! or as a bare PKCS#1 `RSAPrivateKey`. Verification keys are DER-encoded
//! PKCS#1 `RSAPublicKey`s, which is what [`public_key_der()`] produces from a
//! private key.

use std::fmt;

use ring::signature::{KeyPair, RsaKeyPair, UnparsedPublicKey};

use crate::{error, jwa, jws};

/// RSA public/private key signing algorithms
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
#[non_exhaustive]
pub enum SigningAlgorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// RSASSA-PSS using SHA-256
    PS256,
    /// RSASSA-PSS using SHA-384
    PS384,
    /// RSASSA-PSS using SHA-512
    PS512,
}

impl SigningAlgorithm {
    /// Whether the algorithm uses PSS padding
    #[must_use]
    pub const fn is_pss(self) -> bool {
        matches!(self, Self::PS256 | Self::PS384 | Self::PS512)
    }

    fn into_verification_params(self) -> &'static ring::signature::RsaParameters {
        match self {
            SigningAlgorithm::RS256 => &ring::signature::RSA_PKCS1_2048_8192_SHA256,
            SigningAlgorithm::RS384 => &ring::signature::RSA_PKCS1_2048_8192_SHA384,
            SigningAlgorithm::RS512 => &ring::signature::RSA_PKCS1_2048_8192_SHA512,
            SigningAlgorithm::PS256 => &ring::signature::RSA_PSS_2048_8192_SHA256,
            SigningAlgorithm::PS384 => &ring::signature::RSA_PSS_2048_8192_SHA384,
            SigningAlgorithm::PS512 => &ring::signature::RSA_PSS_2048_8192_SHA512,
        }
    }

    fn into_signing_params(self) -> &'static dyn ring::signature::RsaEncoding {
        match self {
            SigningAlgorithm::RS256 => &ring::signature::RSA_PKCS1_SHA256,
            SigningAlgorithm::RS384 => &ring::signature::RSA_PKCS1_SHA384,
            SigningAlgorithm::RS512 => &ring::signature::RSA_PKCS1_SHA512,
            SigningAlgorithm::PS256 => &ring::signature::RSA_PSS_SHA256,
            SigningAlgorithm::PS384 => &ring::signature::RSA_PSS_SHA384,
            SigningAlgorithm::PS512 => &ring::signature::RSA_PSS_SHA512,
        }
    }
}

fn parse_private_key(der: &[u8]) -> Result<RsaKeyPair, error::KeyRejected> {
    RsaKeyPair::from_pkcs8(der)
        .or_else(|_| RsaKeyPair::from_der(der))
        .map_err(|e| error::key_rejected(e.to_string()))
}

/// Extracts the DER-encoded `RSAPublicKey` from a DER-encoded private key
///
/// # Errors
///
/// The provided bytes are not a valid RSA private key.
pub fn public_key_der(private_der: &[u8]) -> Result<Vec<u8>, error::KeyRejected> {
    let key_pair = parse_private_key(private_der)?;
    Ok(key_pair.public_key().as_ref().to_owned())
}

impl jws::SigningStrategy for SigningAlgorithm {
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        let key_pair = parse_private_key(key)?;

        let mut buf = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(
                self.into_signing_params(),
                &ring::rand::SystemRandom::new(),
                data,
                &mut buf,
            )
            .map_err(|e| error::unexpected(e.to_string()))?;

        Ok(buf)
    }

    fn verify(&self, key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError> {
        UnparsedPublicKey::new(self.into_verification_params(), key)
            .verify(data, signature)
            .map_err(|_| error::signature_mismatch().into())
    }
}

impl From<SigningAlgorithm> for jwa::Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::RS256 => Self::RS256,
            SigningAlgorithm::RS384 => Self::RS384,
            SigningAlgorithm::RS512 => Self::RS512,
            SigningAlgorithm::PS256 => Self::PS256,
            SigningAlgorithm::PS384 => Self::PS384,
            SigningAlgorithm::PS512 => Self::PS512,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
        };

        f.write_str(s)
    }
}
