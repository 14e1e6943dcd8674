//! ECDSA signing strategies
//!
//! Signing keys are PKCS#8 DER-encoded private keys. Verification keys are
//! uncompressed public points (`0x04 || x || y`). Signatures use the
//! fixed-width `r || s` encoding required for tokens.
//!
//! P-256 and P-384 are always available. P-521 (`ES512`) needs the `openssl`
//! feature; without it, `ES512` is still a known name but every attempt to
//! sign or verify with it fails with
//! [`UnsupportedAlgorithm`][crate::error::UnsupportedAlgorithm].

use std::fmt;

use ring::signature::{EcdsaKeyPair, KeyPair, UnparsedPublicKey};

use crate::{error, jwa, jws};

/// Elliptic curve cryptography signing algorithms
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
#[non_exhaustive]
pub enum SigningAlgorithm {
    /// ECDSA using the P-256 curve and SHA-256
    ES256,
    /// ECDSA using the P-384 curve and SHA-384
    ES384,
    /// ECDSA using the P-521 curve and SHA-512
    ES512,
}

impl SigningAlgorithm {
    /// Size in bytes of a fixed-width ECDSA signature
    #[must_use]
    pub const fn signature_size(self) -> usize {
        match self {
            Self::ES256 => 64,
            Self::ES384 => 96,
            Self::ES512 => 132,
        }
    }

    fn ring_algorithms(
        self,
    ) -> Option<(
        &'static ring::signature::EcdsaSigningAlgorithm,
        &'static ring::signature::EcdsaVerificationAlgorithm,
    )> {
        match self {
            Self::ES256 => Some((
                &ring::signature::ECDSA_P256_SHA256_FIXED_SIGNING,
                &ring::signature::ECDSA_P256_SHA256_FIXED,
            )),
            Self::ES384 => Some((
                &ring::signature::ECDSA_P384_SHA384_FIXED_SIGNING,
                &ring::signature::ECDSA_P384_SHA384_FIXED,
            )),
            Self::ES512 => None,
        }
    }
}

/// Extracts the uncompressed public point from a PKCS#8 DER-encoded private key
///
/// # Errors
///
/// The provided bytes are not a valid private key for the algorithm's curve.
pub fn public_key_bytes(alg: SigningAlgorithm, pkcs8: &[u8]) -> Result<Vec<u8>, error::SigningError> {
    match alg.ring_algorithms() {
        Some((signing, _)) => {
            let key_pair = EcdsaKeyPair::from_pkcs8(signing, pkcs8, &ring::rand::SystemRandom::new())
                .map_err(|e| error::key_rejected(e.to_string()))?;
            Ok(key_pair.public_key().as_ref().to_owned())
        }
        None => p521::public_key_bytes(pkcs8),
    }
}

impl jws::SigningStrategy for SigningAlgorithm {
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        let Some((signing, _)) = self.ring_algorithms() else {
            return p521::sign(key, data);
        };

        let rng = ring::rand::SystemRandom::new();
        let key_pair = EcdsaKeyPair::from_pkcs8(signing, key, &rng)
            .map_err(|e| error::key_rejected(e.to_string()))?;

        let signature = key_pair
            .sign(&rng, data)
            .map_err(|e| error::unexpected(e.to_string()))?;

        Ok(signature.as_ref().to_owned())
    }

    fn verify(&self, key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError> {
        let Some((_, verification)) = self.ring_algorithms() else {
            return p521::verify(key, data, signature);
        };

        UnparsedPublicKey::new(verification, key)
            .verify(data, signature)
            .map_err(|_| error::signature_mismatch().into())
    }
}

#[cfg(feature = "openssl")]
mod p521 {
    use openssl::{
        bn::{BigNum, BigNumContext},
        ec::{EcGroup, EcKey, EcPoint, PointConversionForm},
        ecdsa::EcdsaSig,
        nid::Nid,
        pkey::PKey,
    };

    use crate::error;

    const COORDINATE_LEN: usize = 66;

    fn group() -> Result<EcGroup, error::Unexpected> {
        EcGroup::from_curve_name(Nid::SECP521R1).map_err(error::unexpected)
    }

    fn private_key(pkcs8: &[u8]) -> Result<EcKey<openssl::pkey::Private>, error::KeyRejected> {
        let key = PKey::private_key_from_pkcs8(pkcs8)
            .and_then(|k| k.ec_key())
            .map_err(error::key_rejected)?;

        if key.group().curve_name() != Some(Nid::SECP521R1) {
            return Err(error::key_rejected("key is not on the P-521 curve"));
        }

        Ok(key)
    }

    pub(super) fn public_key_bytes(pkcs8: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        let key = private_key(pkcs8)?;
        let mut ctx = BigNumContext::new().map_err(error::unexpected)?;
        let bytes = key
            .public_key()
            .to_bytes(key.group(), PointConversionForm::UNCOMPRESSED, &mut ctx)
            .map_err(error::unexpected)?;
        Ok(bytes)
    }

    pub(super) fn sign(key: &[u8], data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        let key = private_key(key)?;
        let digest = openssl::sha::sha512(data);

        let sig = EcdsaSig::sign(&digest, &key).map_err(error::unexpected)?;

        let mut out = sig
            .r()
            .to_vec_padded(COORDINATE_LEN as i32)
            .map_err(error::unexpected)?;
        out.extend(
            sig.s()
                .to_vec_padded(COORDINATE_LEN as i32)
                .map_err(error::unexpected)?,
        );

        Ok(out)
    }

    pub(super) fn verify(key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), error::VerifyError> {
        if signature.len() != 2 * COORDINATE_LEN {
            return Err(error::signature_mismatch().into());
        }

        let group = group()?;
        let mut ctx = BigNumContext::new().map_err(error::unexpected)?;

        let public_key = EcPoint::from_bytes(&group, key, &mut ctx)
            .and_then(|point| EcKey::from_public_key(&group, &point))
            .map_err(|_| error::signature_mismatch())?;

        let (r, s) = signature.split_at(COORDINATE_LEN);
        let sig = BigNum::from_slice(r)
            .and_then(|r| Ok((r, BigNum::from_slice(s)?)))
            .and_then(|(r, s)| EcdsaSig::from_private_components(r, s))
            .map_err(error::unexpected)?;

        let digest = openssl::sha::sha512(data);
        match sig.verify(&digest, &public_key) {
            Ok(true) => Ok(()),
            _ => Err(error::signature_mismatch().into()),
        }
    }
}

#[cfg(not(feature = "openssl"))]
mod p521 {
    use crate::{error, jwa::Algorithm};

    pub(super) fn public_key_bytes(_pkcs8: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        Err(error::unsupported_algorithm(Algorithm::ES512).into())
    }

    pub(super) fn sign(_key: &[u8], _data: &[u8]) -> Result<Vec<u8>, error::SigningError> {
        Err(error::unsupported_algorithm(Algorithm::ES512).into())
    }

    pub(super) fn verify(
        _key: &[u8],
        _data: &[u8],
        _signature: &[u8],
    ) -> Result<(), error::VerifyError> {
        Err(error::unsupported_algorithm(Algorithm::ES512).into())
    }
}

impl From<SigningAlgorithm> for jwa::Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::ES256 => Self::ES256,
            SigningAlgorithm::ES384 => Self::ES384,
            SigningAlgorithm::ES512 => Self::ES512,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
        };

        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;

    use super::*;
    use crate::{jws::SigningStrategy, test};

    #[test]
    fn round_trip_es256() -> Result<()> {
        round_trip(SigningAlgorithm::ES256)
    }

    #[test]
    fn round_trip_es384() -> Result<()> {
        round_trip(SigningAlgorithm::ES384)
    }

    #[test]
    #[cfg(feature = "openssl")]
    fn round_trip_es512() -> Result<()> {
        round_trip(SigningAlgorithm::ES512)
    }

    #[test]
    #[cfg(not(feature = "openssl"))]
    fn es512_reports_unsupported() {
        let err = SigningAlgorithm::ES512.sign(b"key", b"data").unwrap_err();
        assert!(matches!(err, error::SigningError::UnsupportedAlgorithm(_)));

        let err = SigningAlgorithm::ES512
            .verify(b"key", b"data", &[0; 132])
            .unwrap_err();
        assert!(matches!(err, error::VerifyError::UnsupportedAlgorithm(_)));
    }

    fn round_trip(alg: SigningAlgorithm) -> Result<()> {
        let private = test::ec::generate_pkcs8(alg)?;
        let public = public_key_bytes(alg, &private)?;

        let sig = alg.sign(&private, b"header.claims")?;
        assert_eq!(sig.len(), alg.signature_size());

        alg.verify(&public, b"header.claims", &sig)?;

        let err = alg.verify(&public, b"header.claimz", &sig).unwrap_err();
        assert!(err.is_signature_mismatch());

        Ok(())
    }

    #[test]
    fn key_for_other_curve_is_rejected() -> Result<()> {
        let p384 = test::ec::generate_pkcs8(SigningAlgorithm::ES384)?;
        let err = SigningAlgorithm::ES256
            .sign(&p384, b"header.claims")
            .unwrap_err();
        assert!(matches!(err, error::SigningError::KeyRejected(_)));
        Ok(())
    }
}
