//! Resolution of algorithm names to signing strategies

use std::{collections::HashMap, fmt, sync::Arc};

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;

use super::Algorithm;
use crate::{error, jws::SigningStrategy};

type Strategies = HashMap<Algorithm, Arc<dyn SigningStrategy>>;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::with_builtins);

/// A mapping from algorithm names to the strategies that implement them
///
/// Lookups read an immutable snapshot and never block. Registration copies
/// the current snapshot, adds the new entry, and swaps the copy in, so
/// concurrent registrations never lose each other's entries. Registering a
/// name that already exists replaces the prior strategy.
///
/// ```
/// use tessera::jwa::{Algorithm, Registry};
///
/// let registry = Registry::with_builtins();
/// assert!(registry.contains(&Algorithm::HS256));
/// assert!(registry.resolve(&Algorithm::new("none")).is_err());
/// ```
pub struct Registry {
    strategies: ArcSwap<Strategies>,
}

impl Registry {
    /// A registry with no algorithms
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// A registry holding every built-in algorithm enabled in this build
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut strategies: Strategies = HashMap::with_capacity(Algorithm::BUILT_IN.len());

        #[cfg(feature = "hmac")]
        {
            use super::hmac::SigningAlgorithm as Hmac;
            strategies.insert(Algorithm::HS256, Arc::new(Hmac::HS256));
            strategies.insert(Algorithm::HS384, Arc::new(Hmac::HS384));
            strategies.insert(Algorithm::HS512, Arc::new(Hmac::HS512));
        }

        #[cfg(feature = "rsa")]
        {
            use super::rsa::SigningAlgorithm as Rsa;
            strategies.insert(Algorithm::RS256, Arc::new(Rsa::RS256));
            strategies.insert(Algorithm::RS384, Arc::new(Rsa::RS384));
            strategies.insert(Algorithm::RS512, Arc::new(Rsa::RS512));
            strategies.insert(Algorithm::PS256, Arc::new(Rsa::PS256));
            strategies.insert(Algorithm::PS384, Arc::new(Rsa::PS384));
            strategies.insert(Algorithm::PS512, Arc::new(Rsa::PS512));
        }

        #[cfg(feature = "ec")]
        {
            use super::ec::SigningAlgorithm as Ec;
            strategies.insert(Algorithm::ES256, Arc::new(Ec::ES256));
            strategies.insert(Algorithm::ES384, Arc::new(Ec::ES384));
            strategies.insert(Algorithm::ES512, Arc::new(Ec::ES512));
        }

        Self {
            strategies: ArcSwap::from_pointee(strategies),
        }
    }

    /// The process-wide registry
    ///
    /// Initialized with the built-in algorithms on first use and never torn down.
    #[must_use]
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Looks up the strategy registered under `alg`
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been registered under that name.
    pub fn resolve(&self, alg: &Algorithm) -> Result<Arc<dyn SigningStrategy>, error::UnknownAlgorithm> {
        self.strategies
            .load()
            .get(alg)
            .cloned()
            .ok_or_else(|| error::unknown_algorithm(alg))
    }

    /// Registers `strategy` under `alg`, replacing any existing strategy of that name
    pub fn register<S>(&self, alg: impl Into<Algorithm>, strategy: S)
    where
        S: SigningStrategy + 'static,
    {
        self.register_shared(alg, Arc::new(strategy));
    }

    /// Registers an already shared strategy under `alg`
    pub fn register_shared(&self, alg: impl Into<Algorithm>, strategy: Arc<dyn SigningStrategy>) {
        let alg = alg.into();

        let prior = self.strategies.rcu(|current| {
            let mut next = Strategies::clone(current);
            next.insert(alg.clone(), Arc::clone(&strategy));
            next
        });

        let replaced = prior.contains_key(&alg);
        tracing::debug!(alg = %alg, replaced, "registered signing algorithm");
    }

    /// Whether a strategy is registered under `alg`
    #[must_use]
    pub fn contains(&self, alg: &Algorithm) -> bool {
        self.strategies.load().contains_key(alg)
    }

    /// The names of all registered algorithms, in sorted order
    #[must_use]
    pub fn algorithms(&self) -> Vec<Algorithm> {
        let mut algs: Vec<_> = self.strategies.load().keys().cloned().collect();
        algs.sort();
        algs
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry")
            .field("algorithms", &self.algorithms())
            .finish()
    }
}

/// Registers `strategy` under `alg` in the process-wide registry
///
/// Any existing strategy registered under the same name is replaced.
pub fn register_algorithm<S>(alg: impl Into<Algorithm>, strategy: S)
where
    S: SigningStrategy + 'static,
{
    Registry::global().register(alg, strategy);
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tracing_test::traced_test;

    use super::*;
    use crate::error::{SigningError, VerifyError};

    #[derive(Debug)]
    struct Constant(&'static [u8]);

    impl SigningStrategy for Constant {
        fn sign(&self, _key: &[u8], _data: &[u8]) -> Result<Vec<u8>, SigningError> {
            Ok(self.0.to_vec())
        }

        fn verify(&self, _key: &[u8], _data: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
            if signature == self.0 {
                Ok(())
            } else {
                Err(error::signature_mismatch().into())
            }
        }
    }

    #[test]
    #[cfg(all(feature = "hmac", feature = "rsa", feature = "ec"))]
    fn builtins_cover_every_family() {
        let registry = Registry::with_builtins();
        let mut expected = Algorithm::BUILT_IN.to_vec();
        expected.sort();
        assert_eq!(registry.algorithms(), expected);
    }

    #[test]
    fn unknown_name_is_reported() {
        let registry = Registry::empty();
        let err = registry.resolve(&Algorithm::HS256).unwrap_err();
        assert_eq!(err.algorithm(), &Algorithm::HS256);
    }

    #[test]
    #[traced_test]
    fn last_registration_wins() {
        let registry = Registry::empty();
        registry.register("X-CONST", Constant(b"first"));
        registry.register("X-CONST", Constant(b"second"));

        let strategy = registry.resolve(&Algorithm::new("X-CONST")).unwrap();
        assert_eq!(strategy.sign(b"k", b"data").unwrap(), b"second");
        assert!(logs_contain("replaced=true"));
    }

    #[test]
    fn concurrent_registration_keeps_every_entry() {
        let registry = Arc::new(Registry::empty());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry.register(format!("X-{}", i), Constant(b"sig"));
                    assert!(registry.contains(&Algorithm::new(format!("X-{}", i))));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.algorithms().len(), 8);
    }

    #[test]
    fn global_registry_accepts_custom_algorithms() {
        register_algorithm("X-GLOBAL-TEST", Constant(b"sig"));
        assert!(Registry::global().contains(&Algorithm::from_static("X-GLOBAL-TEST")));
    }
}
