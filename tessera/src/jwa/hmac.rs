//! HMAC signing strategies
//!
//! The key is the raw shared secret. The same bytes sign and verify.

use std::fmt;

use crate::{error, jwa, jws};

/// HMAC signing algorithms
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
#[non_exhaustive]
pub enum SigningAlgorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
}

impl SigningAlgorithm {
    /// Recommended key size in bytes for an HMAC secret
    #[must_use]
    pub fn recommended_key_size(self) -> usize {
        self.signature_size()
    }

    /// The size in bytes of an HMAC signature
    #[must_use]
    pub fn signature_size(self) -> usize {
        match self {
            Self::HS256 => 256 / 8,
            Self::HS384 => 384 / 8,
            Self::HS512 => 512 / 8,
        }
    }

    fn into_ring_algorithm(self) -> ring::hmac::Algorithm {
        match self {
            SigningAlgorithm::HS256 => ring::hmac::HMAC_SHA256,
            SigningAlgorithm::HS384 => ring::hmac::HMAC_SHA384,
            SigningAlgorithm::HS512 => ring::hmac::HMAC_SHA512,
        }
    }

    fn key(self, secret: &[u8]) -> ring::hmac::Key {
        ring::hmac::Key::new(self.into_ring_algorithm(), secret)
    }
}

impl jws::SigningStrategy for SigningAlgorithm {
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        let digest = ring::hmac::sign(&self.key(key), data);
        Ok(digest.as_ref().to_owned())
    }

    fn verify(&self, key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError> {
        ring::hmac::verify(&self.key(key), data, signature)
            .map_err(|_| error::signature_mismatch().into())
    }
}

impl From<SigningAlgorithm> for jwa::Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::HS256 => Self::HS256,
            SigningAlgorithm::HS384 => Self::HS384,
            SigningAlgorithm::HS512 => Self::HS512,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        };

        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jws::SigningStrategy;

    #[test]
    fn signatures_have_expected_size() {
        for alg in [
            SigningAlgorithm::HS256,
            SigningAlgorithm::HS384,
            SigningAlgorithm::HS512,
        ] {
            let sig = alg.sign(b"your_secret", b"header.claims").unwrap();
            assert_eq!(sig.len(), alg.signature_size());
            alg.verify(b"your_secret", b"header.claims", &sig).unwrap();
        }
    }

    #[test]
    fn wrong_secret_is_a_mismatch() {
        let alg = SigningAlgorithm::HS256;
        let sig = alg.sign(b"secretA", b"header.claims").unwrap();

        let err = alg.verify(b"secretB", b"header.claims", &sig).unwrap_err();
        assert!(err.is_signature_mismatch());
    }

    #[test]
    fn matches_rfc4231_test_case_2() {
        // Key = "Jefe", Data = "what do ya want for nothing?"
        let sig = SigningAlgorithm::HS256
            .sign(b"Jefe", b"what do ya want for nothing?")
            .unwrap();

        let expected: [u8; 32] = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
            0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
            0x64, 0xec, 0x38, 0x43,
        ];
        assert_eq!(sig, expected);
    }
}
