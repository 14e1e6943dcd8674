//! Token claims and the builder that assembles them
//!
//! Every token carries three optional temporal claims alongside a
//! caller-supplied payload:
//!
//! * `iat`: when the token was issued
//! * `nbf`: the token must be rejected before this time
//! * `exp`: the token must be rejected at or after this time
//!
//! An unset claim places no constraint on the token. On the wire an unset
//! claim is omitted, and a `null` or `0` value is read back as unset.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tessera_clock::{Clock, System, UnixTime};

use crate::{
    error,
    jwa::Algorithm,
    jwt::Jwt,
    token::Signer,
    validity::{self, ValidityChecker},
};

/// The claims carried by a token
///
/// ```
/// use tessera::{Claims, UnixTime};
///
/// let claims: Claims<String> = serde_json::from_str(r#"{"exp":0,"iat":12,"payload":"data"}"#)?;
/// assert_eq!(claims.expires_at(), None);
/// assert_eq!(claims.issued_at(), Some(UnixTime(12)));
/// assert_eq!(claims.payload(), "data");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims<P> {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "unset_if_zero"
    )]
    exp: Option<UnixTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "unset_if_zero"
    )]
    nbf: Option<UnixTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "unset_if_zero"
    )]
    iat: Option<UnixTime>,
    payload: P,
}

fn unset_if_zero<'de, D>(deserializer: D) -> Result<Option<UnixTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<UnixTime>::deserialize(deserializer)?.filter(|t| *t != UnixTime::EPOCH))
}

/// Keeps a set claim distinguishable from the wire sentinel for an unset one
///
/// Times that saturate at the epoch are moved one second later, so they stay
/// in the past and still constrain the token.
#[inline]
fn after_epoch(time: UnixTime) -> Option<UnixTime> {
    Some(time.max(UnixTime(1)))
}

impl<P> Claims<P> {
    /// Claims carrying `payload` and no temporal constraints
    pub const fn new(payload: P) -> Self {
        Self {
            exp: None,
            nbf: None,
            iat: None,
            payload,
        }
    }

    /// Expiration time
    #[must_use]
    pub fn expires_at(&self) -> Option<UnixTime> {
        self.exp
    }

    /// Not-before time
    #[must_use]
    pub fn not_before(&self) -> Option<UnixTime> {
        self.nbf
    }

    /// Issued-at time
    #[must_use]
    pub fn issued_at(&self) -> Option<UnixTime> {
        self.iat
    }

    /// The payload
    #[must_use]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Unwraps the payload, discarding the temporal claims
    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Replaces the payload, keeping the temporal claims
    pub fn with_payload<Q>(self, payload: Q) -> Claims<Q> {
        Claims {
            exp: self.exp,
            nbf: self.nbf,
            iat: self.iat,
            payload,
        }
    }

    /// Checks the temporal claims against `now`, with no leeway
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in the order: expired, issued in the
    /// future, not yet valid.
    pub fn check_validity(&self, now: UnixTime) -> Result<(), error::ClaimsRejected> {
        validity::check_validity(self, now)
    }

    /// Checks the temporal claims against the system clock, with no leeway
    ///
    /// # Errors
    ///
    /// See [`check_validity()`][Self::check_validity].
    pub fn validate(&self) -> Result<(), error::ClaimsRejected> {
        ValidityChecker::new().check(self)
    }
}

/// Fluent configuration of the temporal claims of a new token
///
/// Each setter overwrites the claim it names; setting a claim twice keeps
/// the last value. The builder does not check that the claims are
/// chronologically consistent with each other. That happens only when a
/// token is validated.
///
/// Relative setters read the builder's clock when they are called.
///
/// ```
/// use std::time::Duration;
/// use tessera::{TestClock, TokenBuilder, UnixTime};
///
/// let claims = TokenBuilder::new()
///     .with_clock(TestClock::new(UnixTime(1_000)))
///     .with_issued_at_now()
///     .with_valid_after(Duration::from_secs(60))
///     .with_expires_after_secs(3_600)
///     .into_claims("data");
///
/// assert_eq!(claims.issued_at(), Some(UnixTime(1_000)));
/// assert_eq!(claims.not_before(), Some(UnixTime(1_060)));
/// assert_eq!(claims.expires_at(), Some(UnixTime(4_600)));
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct TokenBuilder<C = System> {
    clock: C,
    iat: Option<UnixTime>,
    nbf: Option<UnixTime>,
    exp: Option<UnixTime>,
}

impl TokenBuilder {
    /// A builder with no claims set, reading time from the system clock
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> TokenBuilder<C> {
    /// Reads time for relative setters from `clock`
    ///
    /// Claims already set are kept.
    pub fn with_clock<D: Clock>(self, clock: D) -> TokenBuilder<D> {
        TokenBuilder {
            clock,
            iat: self.iat,
            nbf: self.nbf,
            exp: self.exp,
        }
    }

    /// Sets the issued-at claim to the current time
    pub fn with_issued_at_now(self) -> Self {
        let now = self.clock.now();
        self.with_issued_at(now)
    }

    /// Sets the issued-at claim
    pub fn with_issued_at(self, time: UnixTime) -> Self {
        Self {
            iat: after_epoch(time),
            ..self
        }
    }

    /// Sets the not-before claim to `delay` from now
    pub fn with_valid_after(self, delay: Duration) -> Self {
        let nbf = self.clock.now() + delay;
        self.with_not_before(nbf)
    }

    /// Sets the not-before claim to `secs` seconds from now
    ///
    /// A negative value sets the claim in the past.
    pub fn with_valid_after_secs(self, secs: i64) -> Self {
        let nbf = self.clock.now().offset_secs(secs);
        self.with_not_before(nbf)
    }

    /// Sets the not-before claim
    pub fn with_not_before(self, time: UnixTime) -> Self {
        Self {
            nbf: after_epoch(time),
            ..self
        }
    }

    /// Sets the expiration claim to `lifetime` from now
    pub fn with_expires_after(self, lifetime: Duration) -> Self {
        let exp = self.clock.now() + lifetime;
        self.with_expiration(exp)
    }

    /// Sets the expiration claim to `secs` seconds from now
    ///
    /// A negative value produces a token that is already expired.
    pub fn with_expires_after_secs(self, secs: i64) -> Self {
        let exp = self.clock.now().offset_secs(secs);
        self.with_expiration(exp)
    }

    /// Sets the expiration claim
    pub fn with_expiration(self, time: UnixTime) -> Self {
        Self {
            exp: after_epoch(time),
            ..self
        }
    }

    /// Finishes the builder, placing `payload` into the claims
    pub fn into_claims<P>(self, payload: P) -> Claims<P> {
        Claims {
            exp: self.exp,
            nbf: self.nbf,
            iat: self.iat,
            payload,
        }
    }

    /// Signs a token carrying `payload` with the default algorithm
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty, the payload cannot be
    /// serialized, or the signing engine rejects the secret.
    pub fn make_token<P: Serialize>(
        self,
        payload: P,
        secret: impl AsRef<[u8]>,
    ) -> Result<Jwt, error::JwtSigningError> {
        Signer::new().sign(&self.into_claims(payload), secret)
    }

    /// Signs a token carrying `payload` with `alg`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `alg` is not registered. Otherwise
    /// fails as [`make_token()`][Self::make_token] does.
    pub fn make_token_with<P: Serialize>(
        self,
        payload: P,
        secret: impl AsRef<[u8]>,
        alg: impl Into<Algorithm>,
    ) -> Result<Jwt, error::JwtSigningError> {
        Signer::new()
            .with_algorithm(alg)
            .sign(&self.into_claims(payload), secret)
    }
}
