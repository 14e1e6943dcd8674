//! Signing algorithms and the registry that resolves them
//!
//! Every token names the algorithm used to sign it. Names are plain strings
//! ([`Algorithm`]); the [`Registry`] maps each name to a
//! [`SigningStrategy`][crate::jws::SigningStrategy] that performs the actual
//! cryptographic work.
//!
//! The built-in strategies cover the algorithms defined in [RFC7518][]:
//!
//! * HMAC: `HS256`, `HS384`, `HS512`
//! * RSA PKCS#1 v1.5: `RS256`, `RS384`, `RS512`
//! * RSA-PSS: `PS256`, `PS384`, `PS512`
//! * ECDSA: `ES256`, `ES384`, `ES512`
//!
//! [RFC7518]: https://tools.ietf.org/html/rfc7518

#[cfg(feature = "ec")]
#[cfg_attr(docsrs, doc(cfg(feature = "ec")))]
pub mod ec;
#[cfg(feature = "hmac")]
#[cfg_attr(docsrs, doc(cfg(feature = "hmac")))]
pub mod hmac;
#[cfg(feature = "rsa")]
#[cfg_attr(docsrs, doc(cfg(feature = "rsa")))]
pub mod rsa;

mod algorithm;
mod registry;

pub use algorithm::Algorithm;
pub use registry::{register_algorithm, Registry};
