//! Time-based validity of token claims
//!
//! A token is checked against three rules, and the first failure is reported:
//!
//! 1. Expired: `exp` is set and `exp + leeway <= now`
//! 2. Issued in the future: `iat` is set and `iat > now + leeway`
//! 3. Not yet valid: `nbf` is set and `nbf > now + leeway`
//!
//! Unset claims never cause a failure. The leeway defaults to zero.

use std::time::Duration;

use tessera_clock::{Clock, System, UnixTime};

use crate::{claims::Claims, error};

/// Checks the temporal claims of a token against a clock
///
/// ```
/// use tessera::{TestClock, TokenBuilder, UnixTime, ValidityChecker};
///
/// let claims = TokenBuilder::new()
///     .with_expiration(UnixTime(1_000))
///     .into_claims(());
///
/// let at_expiry = ValidityChecker::new().with_clock(TestClock::new(UnixTime(1_000)));
/// assert!(at_expiry.check(&claims).unwrap_err().is_expired());
///
/// let lenient = at_expiry.with_leeway_secs(5);
/// assert!(lenient.check(&claims).is_ok());
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct ValidityChecker<C = System> {
    clock: C,
    leeway: Duration,
}

impl ValidityChecker {
    /// A checker using the system clock and no leeway
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> ValidityChecker<C> {
    /// Reads the current time from `clock`
    #[inline]
    pub fn with_clock<D: Clock>(self, clock: D) -> ValidityChecker<D> {
        ValidityChecker {
            clock,
            leeway: self.leeway,
        }
    }

    /// Allows a grace period for clock skew
    ///
    /// Applies to all three temporal claims. Only whole seconds are used.
    #[inline]
    pub fn with_leeway(self, leeway: Duration) -> Self {
        Self { leeway, ..self }
    }

    /// Allows a grace period (in seconds) for clock skew
    #[inline]
    pub fn with_leeway_secs(self, leeway: u64) -> Self {
        Self {
            leeway: Duration::from_secs(leeway),
            ..self
        }
    }

    /// The configured leeway
    #[must_use]
    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// The clock used to read the current time
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Checks `claims` against the clock's current time
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn check<P>(&self, claims: &Claims<P>) -> Result<(), error::ClaimsRejected> {
        self.check_at(claims, self.clock.now())
    }

    /// Checks `claims` against `now`, ignoring the clock
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn check_at<P>(&self, claims: &Claims<P>, now: UnixTime) -> Result<(), error::ClaimsRejected> {
        let leeway = self.leeway.as_secs();
        let latest_acceptable = now.0.saturating_add(leeway);

        if let Some(exp) = claims.expires_at() {
            if exp.0.saturating_add(leeway) <= now.0 {
                return Err(error::ClaimsRejected::TokenExpired);
            }
        }

        if let Some(iat) = claims.issued_at() {
            if iat.0 > latest_acceptable {
                return Err(error::ClaimsRejected::IssuedInFuture);
            }
        }

        if let Some(nbf) = claims.not_before() {
            if nbf.0 > latest_acceptable {
                return Err(error::ClaimsRejected::TokenNotYetValid);
            }
        }

        Ok(())
    }
}

/// Checks `claims` against `now` with no leeway
///
/// # Errors
///
/// Returns the first failing rule.
pub fn check_validity<P>(claims: &Claims<P>, now: UnixTime) -> Result<(), error::ClaimsRejected> {
    ValidityChecker::new().check_at(claims, now)
}

#[cfg(test)]
mod tests {
    use tessera_clock::TestClock;

    use super::*;
    use crate::claims::TokenBuilder;

    fn claims(iat: u64, nbf: u64, exp: u64) -> Claims<()> {
        TokenBuilder::new()
            .with_issued_at(UnixTime(iat))
            .with_not_before(UnixTime(nbf))
            .with_expiration(UnixTime(exp))
            .into_claims(())
    }

    #[test]
    fn unset_claims_never_fail() {
        let unconstrained = Claims::new(());
        check_validity(&unconstrained, UnixTime(1)).unwrap();
        check_validity(&unconstrained, UnixTime(u64::MAX)).unwrap();
    }

    #[test]
    fn window_boundaries() {
        let c = claims(100, 100, 200);

        assert_eq!(
            check_validity(&c, UnixTime(99)),
            Err(error::ClaimsRejected::IssuedInFuture)
        );
        check_validity(&c, UnixTime(100)).unwrap();
        check_validity(&c, UnixTime(199)).unwrap();
        assert_eq!(
            check_validity(&c, UnixTime(200)),
            Err(error::ClaimsRejected::TokenExpired)
        );
    }

    #[test]
    fn not_before_checked_independently_of_issued_at() {
        let c = claims(100, 150, 200);
        assert_eq!(
            check_validity(&c, UnixTime(120)),
            Err(error::ClaimsRejected::TokenNotYetValid)
        );
    }

    #[test]
    fn expiry_is_reported_first() {
        // all three rules fail here
        let c = claims(500, 500, 50);
        assert_eq!(
            check_validity(&c, UnixTime(100)),
            Err(error::ClaimsRejected::TokenExpired)
        );
    }

    #[test]
    fn issued_in_future_precedes_not_yet_valid() {
        let c = claims(500, 500, 1_000);
        assert_eq!(
            check_validity(&c, UnixTime(100)),
            Err(error::ClaimsRejected::IssuedInFuture)
        );
    }

    #[test]
    fn leeway_widens_every_bound() {
        let c = claims(110, 110, 200);
        let mut clock = TestClock::new(UnixTime(100));
        let checker = ValidityChecker::new().with_leeway_secs(10);

        checker.clone().with_clock(clock).check(&c).unwrap();

        clock.set(UnixTime(99));
        assert_eq!(
            checker.clone().with_clock(clock).check(&c),
            Err(error::ClaimsRejected::IssuedInFuture)
        );

        clock.set(UnixTime(209));
        checker.clone().with_clock(clock).check(&c).unwrap();

        clock.set(UnixTime(210));
        assert_eq!(
            checker.with_clock(clock).check(&c),
            Err(error::ClaimsRejected::TokenExpired)
        );
    }

    #[test]
    fn clock_is_read_on_every_check() {
        let c = claims(100, 100, 200);
        let mut clock = TestClock::new(UnixTime(150));

        ValidityChecker::new().with_clock(&clock).check(&c).unwrap();

        clock.advance(Duration::from_secs(100));
        let checker = ValidityChecker::new().with_clock(&clock);
        assert!(checker.check(&c).unwrap_err().is_expired());
        assert_eq!(checker.leeway(), Duration::ZERO);
    }
}
