#![allow(dead_code)]

#[cfg(feature = "rsa")]
pub mod rsa {
    /// 2048-bit RSA private key, PKCS#8 DER
    pub const PRIVATE_KEY: &[u8] = include_bytes!("../data/rsa/private.pk8.der");
    /// The matching PKCS#1 `RSAPublicKey`, DER
    pub const PUBLIC_KEY: &[u8] = include_bytes!("../data/rsa/public.pkcs1.der");
}

#[cfg(feature = "ec")]
pub mod ec {
    use color_eyre::{eyre::eyre, Result};

    use crate::jwa::ec::SigningAlgorithm;

    /// Generates a fresh PKCS#8 DER private key on the curve used by `alg`
    pub fn generate_pkcs8(alg: SigningAlgorithm) -> Result<Vec<u8>> {
        let curve = match alg {
            SigningAlgorithm::ES256 => &ring::signature::ECDSA_P256_SHA256_FIXED_SIGNING,
            SigningAlgorithm::ES384 => &ring::signature::ECDSA_P384_SHA384_FIXED_SIGNING,
            SigningAlgorithm::ES512 => return generate_p521(),
        };

        let doc = ring::signature::EcdsaKeyPair::generate_pkcs8(
            curve,
            &ring::rand::SystemRandom::new(),
        )
        .map_err(|_| eyre!("unable to generate {} key", alg))?;

        Ok(doc.as_ref().to_owned())
    }

    #[cfg(feature = "openssl")]
    fn generate_p521() -> Result<Vec<u8>> {
        use openssl::{
            ec::{EcGroup, EcKey},
            nid::Nid,
            pkey::PKey,
        };

        let group = EcGroup::from_curve_name(Nid::SECP521R1)?;
        let key = PKey::from_ec_key(EcKey::generate(&group)?)?;
        Ok(key.private_key_to_pkcs8()?)
    }

    #[cfg(not(feature = "openssl"))]
    fn generate_p521() -> Result<Vec<u8>> {
        Err(eyre!("P-521 keys require the `openssl` feature"))
    }
}
