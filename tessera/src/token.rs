//! Signing and verifying tokens
//!
//! A [`Signer`] turns [`Claims`] into a compact [`Jwt`]. A [`Verifier`] does
//! the reverse, only after confirming the token was signed by an algorithm on
//! its allow-list and that the signature matches the caller's key.
//!
//! Verification proceeds in a fixed order, stopping at the first failure:
//!
//! 1. Every allow-listed algorithm must be registered (configuration error)
//! 2. The token must split into three decodable segments
//! 3. The header's algorithm must be on the allow-list
//! 4. The signature must verify under that algorithm
//! 5. The claims must decode into the requested payload type
//! 6. For [`parse_and_validate()`][Verifier::parse_and_validate] only, the
//!    temporal claims must be valid now
//!
//! An allow-list is never taken from the token. A verifier that has not been
//! told which algorithms to accept only accepts [`Algorithm::DEFAULT`].

use std::{sync::Arc, time::Duration};

use serde::{de::DeserializeOwned, Serialize};
use tessera_clock::{Clock, System};

use crate::{
    claims::{Claims, TokenBuilder},
    error,
    jwa::{Algorithm, Registry},
    jws::SigningStrategy,
    jwt::{self, Headers, Jwt},
    validity::ValidityChecker,
};

static DEFAULT_ALLOWED: [Algorithm; 1] = [Algorithm::DEFAULT];

fn require_secret(secret: &[u8]) -> Result<(), error::ConfigurationError> {
    if secret.is_empty() {
        Err(error::ConfigurationError::EmptySecret)
    } else {
        Ok(())
    }
}

/// Produces signed tokens with a single algorithm
///
/// ```
/// use tessera::{Algorithm, Signer, TokenBuilder};
///
/// let claims = TokenBuilder::new().with_expires_after_secs(300).into_claims("data");
/// let token = Signer::new().with_algorithm(Algorithm::HS512).sign(&claims, "your_secret")?;
///
/// assert_eq!(token.as_str().split('.').count(), 3);
/// # Ok::<(), tessera::error::JwtSigningError>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct Signer<'r> {
    registry: &'r Registry,
    alg: Algorithm,
}

impl Signer<'static> {
    /// A signer using [`Algorithm::DEFAULT`] from the process-wide registry
    #[inline]
    pub fn new() -> Self {
        Self {
            registry: Registry::global(),
            alg: Algorithm::DEFAULT,
        }
    }
}

impl Default for Signer<'static> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Signer<'r> {
    /// Signs with `alg` instead of the default
    #[inline]
    pub fn with_algorithm(self, alg: impl Into<Algorithm>) -> Self {
        Self {
            alg: alg.into(),
            ..self
        }
    }

    /// Resolves algorithms from `registry` instead of the process-wide registry
    #[inline]
    pub fn with_registry<'s>(self, registry: &'s Registry) -> Signer<'s> {
        Signer {
            registry,
            alg: self.alg,
        }
    }

    /// The algorithm tokens will be signed with
    #[must_use]
    pub fn algorithm(&self) -> &Algorithm {
        &self.alg
    }

    /// Confirms that the signer's algorithm is registered
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm cannot be resolved.
    pub fn check_configuration(&self) -> Result<(), error::ConfigurationError> {
        self.strategy().map(drop)
    }

    fn strategy(&self) -> Result<Arc<dyn SigningStrategy>, error::ConfigurationError> {
        Ok(self.registry.resolve(&self.alg)?)
    }

    /// Signs `claims` with `secret`
    ///
    /// # Errors
    ///
    /// * If the algorithm is not registered or the secret is empty
    /// * If the claims cannot be serialized
    /// * If the signing engine rejects the secret
    pub fn sign<P: Serialize>(
        &self,
        claims: &Claims<P>,
        secret: impl AsRef<[u8]>,
    ) -> Result<Jwt, error::JwtSigningError> {
        let secret = secret.as_ref();
        let strategy = self.strategy()?;
        require_secret(secret)?;

        let token = Jwt::try_from_parts_with_signature(
            &Headers::new(self.alg.clone()),
            claims,
            &*strategy,
            secret,
        )?;

        tracing::trace!(alg = %self.alg, "token signed");
        Ok(token)
    }
}

/// Checks tokens against an algorithm allow-list and a key
///
/// ```
/// use tessera::{Algorithm, TokenBuilder, Verifier};
///
/// let token = TokenBuilder::new().make_token_with("data", "your_secret", Algorithm::HS384)?;
///
/// let default_only = Verifier::new();
/// let err = default_only.parse::<String>(&token, "your_secret").unwrap_err();
/// assert!(err.is_algorithm_not_allowed());
///
/// let verifier = Verifier::new().allow_algorithm(Algorithm::HS384);
/// let claims = verifier.parse_and_validate::<String>(&token, "your_secret")?;
/// assert_eq!(claims.payload(), "data");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct Verifier<'r, C = System> {
    registry: &'r Registry,
    allowed: Vec<Algorithm>,
    validity: ValidityChecker<C>,
}

impl Verifier<'static> {
    /// A verifier using the process-wide registry and the system clock
    ///
    /// Until an algorithm is allowed explicitly, only [`Algorithm::DEFAULT`]
    /// is accepted.
    #[inline]
    pub fn new() -> Self {
        Self {
            registry: Registry::global(),
            allowed: Vec::new(),
            validity: ValidityChecker::new(),
        }
    }
}

impl Default for Verifier<'static> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'r, C: Clock> Verifier<'r, C> {
    /// Adds a single algorithm to the allow-list
    ///
    /// Once any algorithm has been allowed, the implicit default no longer is.
    /// An unregistered name is reported by
    /// [`check_configuration()`][Self::check_configuration] and by every
    /// parse; use [`try_allow_algorithm()`][Self::try_allow_algorithm] to fail
    /// immediately instead.
    #[inline]
    pub fn allow_algorithm(self, alg: impl Into<Algorithm>) -> Self {
        let mut this = self;
        this.allowed.push(alg.into());
        this
    }

    /// Adds multiple algorithms to the allow-list
    #[inline]
    pub fn extend_allowed_algorithms<I>(self, algs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Algorithm>,
    {
        let mut this = self;
        this.allowed.extend(algs.into_iter().map(Into::into));
        this
    }

    /// Adds a single algorithm to the allow-list, failing if it is not registered
    ///
    /// # Errors
    ///
    /// Returns an error if `alg` cannot be resolved in the verifier's registry.
    pub fn try_allow_algorithm(
        self,
        alg: impl Into<Algorithm>,
    ) -> Result<Self, error::ConfigurationError> {
        let alg = alg.into();
        self.registry.resolve(&alg)?;
        Ok(self.allow_algorithm(alg))
    }

    /// Adds multiple algorithms to the allow-list, failing if any is not registered
    ///
    /// # Errors
    ///
    /// Returns an error naming the first algorithm that cannot be resolved in
    /// the verifier's registry.
    pub fn try_extend_allowed_algorithms<I>(self, algs: I) -> Result<Self, error::ConfigurationError>
    where
        I: IntoIterator,
        I::Item: Into<Algorithm>,
    {
        algs.into_iter()
            .try_fold(self, |this, alg| this.try_allow_algorithm(alg))
    }

    /// Resolves algorithms from `registry` instead of the process-wide registry
    #[inline]
    pub fn with_registry<'s>(self, registry: &'s Registry) -> Verifier<'s, C> {
        Verifier {
            registry,
            allowed: self.allowed,
            validity: self.validity,
        }
    }

    /// Reads the current time from `clock` when validating
    #[inline]
    pub fn with_clock<D: Clock>(self, clock: D) -> Verifier<'r, D> {
        Verifier {
            registry: self.registry,
            allowed: self.allowed,
            validity: self.validity.with_clock(clock),
        }
    }

    /// Allows a grace period for clock skew when validating
    #[inline]
    pub fn with_leeway(self, leeway: Duration) -> Self {
        Self {
            validity: self.validity.with_leeway(leeway),
            ..self
        }
    }

    /// Allows a grace period (in seconds) for clock skew when validating
    #[inline]
    pub fn with_leeway_secs(self, leeway: u64) -> Self {
        Self {
            validity: self.validity.with_leeway_secs(leeway),
            ..self
        }
    }

    /// The algorithms this verifier accepts
    #[must_use]
    pub fn allowed_algorithms(&self) -> &[Algorithm] {
        if self.allowed.is_empty() {
            &DEFAULT_ALLOWED
        } else {
            &self.allowed
        }
    }

    /// The checker applied by [`parse_and_validate()`][Self::parse_and_validate]
    pub fn validity_checker(&self) -> &ValidityChecker<C> {
        &self.validity
    }

    /// Confirms that every allowed algorithm is registered
    ///
    /// # Errors
    ///
    /// Returns an error naming the first allowed algorithm that cannot be
    /// resolved.
    pub fn check_configuration(&self) -> Result<(), error::ConfigurationError> {
        for alg in self.allowed_algorithms() {
            self.registry.resolve(alg)?;
        }
        Ok(())
    }

    /// Verifies `token` with `secret` and decodes its claims
    ///
    /// No time-based checks are made.
    ///
    /// # Errors
    ///
    /// Returns the first failure in the order described in the
    /// [module documentation][self].
    pub fn parse<P>(
        &self,
        token: impl AsRef<str>,
        secret: impl AsRef<[u8]>,
    ) -> Result<Claims<P>, error::JwtVerifyError>
    where
        P: DeserializeOwned,
    {
        let secret = secret.as_ref();
        self.check_configuration()?;
        require_secret(secret)?;

        let decomposed = jwt::decompose(token.as_ref()).map_err(|err| {
            tracing::debug!(error = %err, "token rejected: malformed");
            err
        })?;

        let alg = decomposed.untrusted_header().alg();
        if !self.allowed_algorithms().contains(alg) {
            tracing::debug!(alg = %alg, "token rejected: algorithm not allowed");
            return Err(error::algorithm_not_allowed(alg.clone()).into());
        }

        let strategy = self.registry.resolve(alg)?;

        decomposed
            .verify_signature(&*strategy, secret)
            .map_err(|err| {
                tracing::debug!(alg = %alg, error = %err, "token rejected: signature invalid");
                err
            })?;

        let claims = decomposed.decode_claims().map_err(|err| {
            tracing::debug!(alg = %alg, error = %err, "token rejected: claims not decodable");
            err
        })?;

        tracing::trace!(alg = %alg, "token signature verified");
        Ok(claims)
    }

    /// Verifies `token` with `secret`, decodes its claims, and checks them
    /// against the current time
    ///
    /// # Errors
    ///
    /// Fails as [`parse()`][Self::parse] does, or with
    /// [`ClaimsRejected`][error::JwtVerifyError::ClaimsRejected] if the token
    /// is outside its validity window.
    pub fn parse_and_validate<P>(
        &self,
        token: impl AsRef<str>,
        secret: impl AsRef<[u8]>,
    ) -> Result<Claims<P>, error::JwtVerifyError>
    where
        P: DeserializeOwned,
    {
        let claims = self.parse(token, secret)?;

        self.validity.check(&claims).map_err(|err| {
            tracing::debug!(reason = %err, "token rejected: outside validity window");
            err
        })?;

        Ok(claims)
    }
}

/// Starts building a new token
#[inline]
pub fn new_token() -> TokenBuilder {
    TokenBuilder::new()
}

/// Signs `payload` with `secret` using the default algorithm and no temporal claims
///
/// # Errors
///
/// See [`Signer::sign()`].
pub fn make_token<P: Serialize>(
    payload: P,
    secret: impl AsRef<[u8]>,
) -> Result<Jwt, error::JwtSigningError> {
    new_token().make_token(payload, secret)
}

/// Signs `payload` with `secret` using `alg` and no temporal claims
///
/// # Errors
///
/// See [`Signer::sign()`].
pub fn make_token_with<P: Serialize>(
    payload: P,
    secret: impl AsRef<[u8]>,
    alg: impl Into<Algorithm>,
) -> Result<Jwt, error::JwtSigningError> {
    new_token().make_token_with(payload, secret, alg)
}

/// Verifies a token signed with the default algorithm, without time-based checks
///
/// # Errors
///
/// See [`Verifier::parse()`].
pub fn parse_token<P: DeserializeOwned>(
    token: impl AsRef<str>,
    secret: impl AsRef<[u8]>,
) -> Result<Claims<P>, error::JwtVerifyError> {
    Verifier::new().parse(token, secret)
}

/// Verifies a token signed with any of `allowed`, without time-based checks
///
/// # Errors
///
/// See [`Verifier::parse()`].
pub fn parse_token_with<P, I>(
    token: impl AsRef<str>,
    secret: impl AsRef<[u8]>,
    allowed: I,
) -> Result<Claims<P>, error::JwtVerifyError>
where
    P: DeserializeOwned,
    I: IntoIterator,
    I::Item: Into<Algorithm>,
{
    Verifier::new()
        .try_extend_allowed_algorithms(allowed)?
        .parse(token, secret)
}

/// Verifies and validates a token signed with the default algorithm
///
/// # Errors
///
/// See [`Verifier::parse_and_validate()`].
pub fn parse_and_validate<P: DeserializeOwned>(
    token: impl AsRef<str>,
    secret: impl AsRef<[u8]>,
) -> Result<Claims<P>, error::JwtVerifyError> {
    Verifier::new().parse_and_validate(token, secret)
}

/// Verifies and validates a token signed with any of `allowed`
///
/// # Errors
///
/// See [`Verifier::parse_and_validate()`].
pub fn parse_and_validate_with<P, I>(
    token: impl AsRef<str>,
    secret: impl AsRef<[u8]>,
    allowed: I,
) -> Result<Claims<P>, error::JwtVerifyError>
where
    P: DeserializeOwned,
    I: IntoIterator,
    I::Item: Into<Algorithm>,
{
    Verifier::new()
        .try_extend_allowed_algorithms(allowed)?
        .parse_and_validate(token, secret)
}
