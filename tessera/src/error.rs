//! Common errors

#![allow(missing_copy_implementations)]

use std::error::Error as StdError;

use thiserror::Error;

use crate::jwa::Algorithm;

/// The provided name could not be matched with a registered algorithm
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("'{alg}' does not match any registered algorithm")]
pub struct UnknownAlgorithm {
    alg: Algorithm,
}

impl UnknownAlgorithm {
    /// The algorithm name that could not be resolved
    #[must_use]
    pub fn algorithm(&self) -> &Algorithm {
        &self.alg
    }
}

#[inline]
pub(crate) fn unknown_algorithm(alg: impl Into<Algorithm>) -> UnknownAlgorithm {
    UnknownAlgorithm { alg: alg.into() }
}

/// The signing engine has no implementation for the algorithm in this build
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("algorithm '{alg}' is not supported by this build")]
pub struct UnsupportedAlgorithm {
    alg: Algorithm,
}

#[inline]
#[cfg_attr(any(feature = "openssl", not(feature = "ec")), allow(dead_code))]
pub(crate) fn unsupported_algorithm(alg: impl Into<Algorithm>) -> UnsupportedAlgorithm {
    UnsupportedAlgorithm { alg: alg.into() }
}

/// The token declares an algorithm the verifier does not accept
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("algorithm '{alg}' is not allowed")]
pub struct AlgorithmNotAllowed {
    alg: Algorithm,
}

impl AlgorithmNotAllowed {
    /// The algorithm declared by the rejected token
    #[must_use]
    pub fn algorithm(&self) -> &Algorithm {
        &self.alg
    }
}

#[inline]
pub(crate) fn algorithm_not_allowed(alg: Algorithm) -> AlgorithmNotAllowed {
    AlgorithmNotAllowed { alg }
}

/// The token is malformed and cannot be split into header, claims, and signature sections
#[derive(Clone, Copy, Debug, Error)]
#[error("malformed token")]
pub struct MalformedJwt {
    _p: (),
}

pub(crate) const fn malformed_jwt() -> MalformedJwt {
    MalformedJwt { _p: () }
}

/// The token header section is malformed
#[derive(Debug, Error)]
#[error("malformed token header")]
pub struct MalformedJwtHeader {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_header(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtHeader {
    MalformedJwtHeader {
        source: source.into(),
    }
}

/// The token claims section is malformed or does not match the expected payload type
#[derive(Debug, Error)]
#[error("malformed token claims")]
pub struct MalformedJwtPayload {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_payload(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtPayload {
    MalformedJwtPayload {
        source: source.into(),
    }
}

/// The token signature section is malformed
#[derive(Debug, Error)]
#[error("malformed token signature")]
pub struct MalformedJwtSignature {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_signature(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtSignature {
    MalformedJwtSignature {
        source: source.into(),
    }
}

/// The signature did not match
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("signature mismatch")]
pub struct SignatureMismatch {
    _p: (),
}

pub(crate) const fn signature_mismatch() -> SignatureMismatch {
    SignatureMismatch { _p: () }
}

/// The key was rejected by the signing engine
#[derive(Debug, Error)]
#[error("key rejected")]
pub struct KeyRejected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn key_rejected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> KeyRejected {
    KeyRejected {
        source: source.into(),
    }
}

/// Unexpected error (possibly a bug)
#[derive(Debug, Error)]
#[error("unexpected error")]
pub struct Unexpected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn unexpected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> Unexpected {
    Unexpected {
        source: source.into(),
    }
}

/// A deployment or programming defect
///
/// These are never caused by the contents of a presented token.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The requested algorithm has not been registered
    #[error(transparent)]
    UnknownAlgorithm(#[from] UnknownAlgorithm),

    /// The secret or key material is empty
    #[error("secret must not be empty")]
    EmptySecret,
}

/// An error raised by a signing strategy while creating a signature
#[derive(Debug, Error)]
pub enum SigningError {
    /// The key could not be used for signing with this algorithm
    #[error(transparent)]
    KeyRejected(#[from] KeyRejected),

    /// The algorithm has no implementation in this build
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    /// An unexpected error
    #[error(transparent)]
    Unexpected(#[from] Unexpected),
}

/// An error raised by a signing strategy while checking a signature
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Signature is invalid
    #[error(transparent)]
    SignatureMismatch(#[from] SignatureMismatch),

    /// The algorithm has no implementation in this build
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    /// An unexpected error
    #[error(transparent)]
    Unexpected(#[from] Unexpected),
}

impl VerifyError {
    /// Whether the error is due to a signature mismatch
    #[must_use]
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, Self::SignatureMismatch(_))
    }
}

/// An error occurring while producing a token
#[derive(Debug, Error)]
pub enum JwtSigningError {
    /// The signer is misconfigured
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The signing engine could not produce a signature
    #[error(transparent)]
    SigningError(#[from] SigningError),

    /// The token header could not be serialized
    #[error(transparent)]
    MalformedJwtHeader(#[from] MalformedJwtHeader),

    /// The token claims could not be serialized
    #[error(transparent)]
    MalformedJwtPayload(#[from] MalformedJwtPayload),
}

impl From<UnknownAlgorithm> for JwtSigningError {
    fn from(err: UnknownAlgorithm) -> Self {
        Self::Configuration(err.into())
    }
}

impl JwtSigningError {
    /// Whether the error is due to a misconfiguration
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// An error occurring while verifying a token
#[derive(Debug, Error)]
pub enum JwtVerifyError {
    /// The verifier is misconfigured
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The token is malformed, without a discernible header, claims, and signature
    #[error(transparent)]
    MalformedToken(#[from] MalformedJwt),

    /// The token header is malformed
    #[error(transparent)]
    MalformedTokenHeader(#[from] MalformedJwtHeader),

    /// The token signature is malformed
    #[error(transparent)]
    MalformedTokenSignature(#[from] MalformedJwtSignature),

    /// The token declares an algorithm outside of the allow-list
    #[error(transparent)]
    AlgorithmNotAllowed(#[from] AlgorithmNotAllowed),

    /// The signature was rejected by the signing engine
    #[error("token signature rejected")]
    SignatureInvalid(#[from] VerifyError),

    /// The claims could not be decoded into the requested payload type
    #[error(transparent)]
    PayloadDecode(#[from] MalformedJwtPayload),

    /// The token was rejected by the validity checker
    #[error("token rejected by validity checker")]
    ClaimsRejected(#[from] ClaimsRejected),
}

impl From<UnknownAlgorithm> for JwtVerifyError {
    fn from(err: UnknownAlgorithm) -> Self {
        Self::Configuration(err.into())
    }
}

impl JwtVerifyError {
    /// Whether the error is due to a misconfiguration
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether the token could not be split or decoded
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken(_) | Self::MalformedTokenHeader(_) | Self::MalformedTokenSignature(_)
        )
    }

    /// Whether the token's algorithm was outside of the allow-list
    #[must_use]
    pub fn is_algorithm_not_allowed(&self) -> bool {
        matches!(self, Self::AlgorithmNotAllowed(_))
    }

    /// Whether the signature did not verify
    #[must_use]
    pub fn is_signature_invalid(&self) -> bool {
        matches!(self, Self::SignatureInvalid(_))
    }

    /// Whether the payload could not be decoded into the requested type
    #[must_use]
    pub fn is_payload_decode(&self) -> bool {
        matches!(self, Self::PayloadDecode(_))
    }

    /// The validity failure, if the token was authentic but outside its validity window
    #[must_use]
    pub fn claims_rejected(&self) -> Option<&ClaimsRejected> {
        match self {
            Self::ClaimsRejected(c) => Some(c),
            _ => None,
        }
    }
}

/// An error occurring when checking the temporal claims of a token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ClaimsRejected {
    /// The token is expired according to the `exp` claim
    #[error("token expired")]
    TokenExpired,

    /// The token is not yet valid according to the `nbf` claim
    #[error("token not yet valid")]
    TokenNotYetValid,

    /// The token claims to have been issued in the future according to the `iat` claim
    #[error("token issued in the future")]
    IssuedInFuture,
}

impl ClaimsRejected {
    /// Whether the token has expired
    #[must_use]
    pub fn is_expired(self) -> bool {
        self == Self::TokenExpired
    }

    /// Whether the token is not yet valid
    #[must_use]
    pub fn is_not_yet_valid(self) -> bool {
        self == Self::TokenNotYetValid
    }

    /// Whether the token was issued in the future
    #[must_use]
    pub fn is_issued_in_future(self) -> bool {
        self == Self::IssuedInFuture
    }
}
