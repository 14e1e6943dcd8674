use std::{borrow::Borrow, borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The name of a signing algorithm
///
/// Names are compared exactly, so `hs256` and `HS256` are different
/// algorithms. Any name may be used, as long as a strategy has been
/// registered for it in the [`Registry`][super::Registry] that is used to
/// sign or verify.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use]
pub struct Algorithm(Cow<'static, str>);

impl Algorithm {
    /// HMAC using SHA-256
    pub const HS256: Algorithm = Algorithm::from_static("HS256");
    /// HMAC using SHA-384
    pub const HS384: Algorithm = Algorithm::from_static("HS384");
    /// HMAC using SHA-512
    pub const HS512: Algorithm = Algorithm::from_static("HS512");

    /// RSASSA-PKCS1-v1_5 using SHA-256
    pub const RS256: Algorithm = Algorithm::from_static("RS256");
    /// RSASSA-PKCS1-v1_5 using SHA-384
    pub const RS384: Algorithm = Algorithm::from_static("RS384");
    /// RSASSA-PKCS1-v1_5 using SHA-512
    pub const RS512: Algorithm = Algorithm::from_static("RS512");

    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    pub const PS256: Algorithm = Algorithm::from_static("PS256");
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    pub const PS384: Algorithm = Algorithm::from_static("PS384");
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    pub const PS512: Algorithm = Algorithm::from_static("PS512");

    /// ECDSA using P-256 and SHA-256
    pub const ES256: Algorithm = Algorithm::from_static("ES256");
    /// ECDSA using P-384 and SHA-384
    pub const ES384: Algorithm = Algorithm::from_static("ES384");
    /// ECDSA using P-521 and SHA-512
    pub const ES512: Algorithm = Algorithm::from_static("ES512");

    /// The algorithm used when a caller does not name one
    pub const DEFAULT: Algorithm = Self::HS256;

    /// Every algorithm name with a built-in strategy
    pub const BUILT_IN: [Algorithm; 12] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
    ];

    /// An algorithm name
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// An algorithm name from a static string
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The algorithm name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Algorithm {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Algorithm {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Algorithm {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&'_ Algorithm> for Algorithm {
    fn from(alg: &'_ Algorithm) -> Self {
        alg.clone()
    }
}

impl FromStr for Algorithm {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Cow::Owned(s.to_owned())))
    }
}

impl PartialEq<str> for Algorithm {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&'_ str> for Algorithm {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use color_eyre::Result;

    use super::*;

    #[test]
    fn borrowed_and_owned_names_are_interchangeable() {
        let owned = Algorithm::from(String::from("HS256"));
        assert_eq!(owned, Algorithm::HS256);

        let mut map = HashMap::new();
        map.insert(owned, 1);
        assert_eq!(map.get("HS256"), Some(&1));
        assert_eq!(map.get(&Algorithm::HS256), Some(&1));
    }

    #[test]
    fn serializes_as_bare_string() -> Result<()> {
        assert_eq!(serde_json::to_string(&Algorithm::PS384)?, r#""PS384""#);

        let alg: Algorithm = serde_json::from_str(r#""X-CUSTOM""#)?;
        assert_eq!(alg, "X-CUSTOM");
        Ok(())
    }

    #[test]
    fn default_is_hs256() {
        assert_eq!(Algorithm::default(), Algorithm::HS256);
        assert_eq!(Algorithm::DEFAULT.to_string(), "HS256");
    }
}
