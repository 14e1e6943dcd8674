//! Compact signed tokens with temporal claims
//!
//! A token carries a caller-supplied payload alongside three optional
//! temporal claims (`iat`, `nbf`, `exp`), and is signed with a named
//! algorithm. Verification only accepts algorithms the verifier has been told
//! to trust, never whatever the token itself asks for.
//!
//! * [`TokenBuilder`] assembles the temporal claims
//! * [`Signer`] turns [`Claims`] into a compact [`Jwt`]
//! * [`Verifier`] checks the algorithm allow-list and signature, then decodes
//!   the claims
//! * [`ValidityChecker`] checks the temporal claims against a [`Clock`]
//! * [`jwa::Registry`] maps algorithm names to the
//!   [`SigningStrategy`][jws::SigningStrategy] that implements them
//!
//! The built-in HMAC, RSA, RSA-PSS, and ECDSA algorithms are registered in
//! the process-wide registry. Each family sits behind a cargo feature
//! (`hmac`, `rsa`, `ec`), all enabled by default. `ES512` needs the
//! `openssl` feature.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! let token = tessera::new_token()
//!     .with_issued_at_now()
//!     .with_expires_after(Duration::from_secs(300))
//!     .make_token("data", "your_secret")?;
//!
//! let claims: tessera::Claims<String> = tessera::parse_and_validate(&token, "your_secret")?;
//! assert_eq!(claims.payload(), "data");
//!
//! let err = tessera::parse_and_validate::<String>(&token, "another_secret").unwrap_err();
//! assert!(err.is_signature_invalid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A token that is authentic but outside its validity window can be told
//! apart from a forged one:
//!
//! ```
//! use std::time::Duration;
//! use tessera::{TestClock, Verifier};
//!
//! let clock = TestClock::frozen_now();
//! let token = tessera::new_token()
//!     .with_clock(clock)
//!     .with_valid_after(Duration::from_secs(3_600))
//!     .make_token("data", "your_secret")?;
//!
//! let err = Verifier::new()
//!     .with_clock(clock)
//!     .parse_and_validate::<String>(&token, "your_secret")
//!     .unwrap_err();
//! assert!(err.claims_rejected().unwrap().is_not_yet_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_copy_implementations,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

pub mod claims;
pub mod error;
pub mod jwa;
pub mod jws;
pub mod jwt;
pub mod token;
pub mod validity;

#[cfg(test)]
pub(crate) mod test;

#[doc(inline)]
pub use claims::{Claims, TokenBuilder};
#[doc(inline)]
pub use jwa::{register_algorithm, Algorithm, Registry};
#[doc(inline)]
pub use jwt::Jwt;
#[doc(inline)]
pub use token::{
    make_token, make_token_with, new_token, parse_and_validate, parse_and_validate_with,
    parse_token, parse_token_with, Signer, Verifier,
};
#[doc(inline)]
pub use validity::{check_validity, ValidityChecker};

pub use tessera_clock::{Clock, System, TestClock, UnixTime};
