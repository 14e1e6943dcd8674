//! Timestamps and clocks for token lifetimes
//!
//! Token claims carry times as whole seconds since the Unix epoch. This crate
//! provides that representation as [`UnixTime`], along with a [`Clock`]
//! abstraction so that code which asks "what time is it?" can be driven by a
//! [`TestClock`] in tests instead of the [`System`] clock.
//!
//! Arithmetic on [`UnixTime`] saturates: moving before the epoch yields the
//! epoch, and moving past `u64::MAX` seconds yields `u64::MAX`.
//!
//! ```
//! use std::time::Duration;
//! use tessera_clock::{Clock, TestClock, UnixTime};
//!
//! let mut clock = TestClock::new(UnixTime(1_000));
//! clock.advance(Duration::from_secs(30));
//! assert_eq!(clock.now(), UnixTime(1_030));
//! assert_eq!(clock.now().offset_secs(-1_031), UnixTime::EPOCH);
//! ```

#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_must_use
)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::{
    fmt,
    ops::{Add, Sub},
    sync::Arc,
    time::{Duration, SystemTime},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unix time
///
/// The number of whole seconds elapsed since 1970/01/01 00:00:00 UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct UnixTime(pub u64);

impl UnixTime {
    /// The beginning of the Unix epoch
    pub const EPOCH: UnixTime = UnixTime(0);

    /// The current time according to the system clock
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        System.now()
    }

    /// Moves this time by a signed number of seconds
    #[inline]
    #[must_use]
    pub const fn offset_secs(self, secs: i64) -> Self {
        if secs >= 0 {
            Self(self.0.saturating_add(secs.unsigned_abs()))
        } else {
            Self(self.0.saturating_sub(secs.unsigned_abs()))
        }
    }

    /// Moves this time forward by `secs` seconds
    #[inline]
    #[must_use]
    pub const fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Moves this time backward by `secs` seconds
    #[inline]
    #[must_use]
    pub const fn saturating_sub_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_sub(secs))
    }

    /// The time elapsed between `earlier` and this time, if `earlier` is not later
    #[inline]
    #[must_use]
    pub fn duration_since(self, earlier: UnixTime) -> Option<Duration> {
        self.0.checked_sub(earlier.0).map(Duration::from_secs)
    }
}

impl From<SystemTime> for UnixTime {
    /// Converts a system time, truncating to whole seconds
    ///
    /// Times before the Unix epoch are clamped to the epoch.
    #[inline]
    fn from(t: SystemTime) -> Self {
        let secs = t
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        UnixTime(secs)
    }
}

impl From<UnixTime> for SystemTime {
    #[inline]
    fn from(t: UnixTime) -> Self {
        SystemTime::UNIX_EPOCH + Duration::from_secs(t.0)
    }
}

impl Add<Duration> for UnixTime {
    type Output = UnixTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add_secs(rhs.as_secs())
    }
}

impl Sub<Duration> for UnixTime {
    type Output = UnixTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub_secs(rhs.as_secs())
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for UnixTime {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for UnixTime {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self)
    }
}

/// Represents a clock, which can tell the current time
pub trait Clock {
    /// Gets the current time according to this clock
    fn now(&self) -> UnixTime;
}

impl<C: Clock + ?Sized> Clock for &'_ C {
    #[inline]
    fn now(&self) -> UnixTime {
        C::now(*self)
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    #[inline]
    fn now(&self) -> UnixTime {
        C::now(self)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now(&self) -> UnixTime {
        C::now(self)
    }
}

/// The system clock as provided by `std::time::SystemTime`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

impl Clock for System {
    #[inline]
    fn now(&self) -> UnixTime {
        UnixTime::from(SystemTime::now())
    }
}

/// A clock which reports whatever time it was last told
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestClock(UnixTime);

impl Clock for TestClock {
    #[inline]
    fn now(&self) -> UnixTime {
        self.0
    }
}

impl TestClock {
    /// Creates a new test clock with the specified time
    #[inline]
    pub const fn new(time: UnixTime) -> Self {
        Self(time)
    }

    /// Creates a test clock frozen at the current system time
    #[inline]
    #[must_use]
    pub fn frozen_now() -> Self {
        Self(System.now())
    }

    /// Updates the clock's current time to `val`
    pub fn set(&mut self, val: UnixTime) {
        self.0 = val;
    }

    /// Increments the clock's current time by `inc` seconds
    pub fn inc(&mut self, inc: u64) {
        self.0 = self.0.saturating_add_secs(inc);
    }

    /// Moves the clock forward by `by`, truncated to whole seconds
    pub fn advance(&mut self, by: Duration) {
        self.0 = self.0 + by;
    }

    /// Moves the clock backward by `by`, truncated to whole seconds
    pub fn rewind(&mut self, by: Duration) {
        self.0 = self.0 - by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_saturate_at_the_edges() {
        assert_eq!(UnixTime(5).offset_secs(-10), UnixTime::EPOCH);
        assert_eq!(UnixTime(u64::MAX - 1).offset_secs(10), UnixTime(u64::MAX));
        assert_eq!(UnixTime(5).offset_secs(i64::MIN), UnixTime::EPOCH);
        assert_eq!(UnixTime(100).offset_secs(-1), UnixTime(99));
    }

    #[test]
    fn duration_arithmetic_truncates_to_seconds() {
        let t = UnixTime(10) + Duration::from_millis(2_900);
        assert_eq!(t, UnixTime(12));
        assert_eq!(t - Duration::from_secs(20), UnixTime::EPOCH);
        assert_eq!(t.duration_since(UnixTime(2)), Some(Duration::from_secs(10)));
        assert_eq!(UnixTime(2).duration_since(t), None);
    }

    #[test]
    fn test_clock_moves_only_when_told() {
        let mut clock = TestClock::new(UnixTime(7));
        assert_eq!(clock.now(), UnixTime(7));

        clock.inc(3);
        assert_eq!(clock.now(), UnixTime(10));

        clock.rewind(Duration::from_secs(4));
        assert_eq!((&clock).now(), UnixTime(6));

        clock.set(UnixTime(1));
        assert_eq!(Arc::new(clock).now(), UnixTime(1));
    }

    #[test]
    fn system_time_before_epoch_clamps() {
        let before = SystemTime::UNIX_EPOCH - Duration::from_secs(60);
        assert_eq!(UnixTime::from(before), UnixTime::EPOCH);
        assert_eq!(
            SystemTime::from(UnixTime(60)),
            SystemTime::UNIX_EPOCH + Duration::from_secs(60)
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&UnixTime(1_579_478_400)).unwrap();
        assert_eq!(json, "1579478400");

        let back: UnixTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UnixTime(1_579_478_400));
    }
}
