use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use jsonwebtoken::crypto;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::KeyError;

const PAIR_PROBE: &[u8] = b"key-material-pair-probe";

/// Where a PEM encoded key is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Path to a PEM file on disk
    File(PathBuf),
    /// PEM content already in memory
    Pem(Vec<u8>),
}

impl KeySource {
    fn read(&self) -> Result<Cow<'_, [u8]>, KeyError> {
        match self {
            KeySource::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| KeyError::Unreadable {
                    path: path.clone(),
                    source,
                }),
            KeySource::Pem(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

impl From<PathBuf> for KeySource {
    fn from(path: PathBuf) -> Self {
        KeySource::File(path)
    }
}

/// RSA key pair used to sign and verify tokens.
///
/// Built once at startup and never mutated afterwards; share it behind an
/// `Arc`. Every token issued and verified by one deployment must go through
/// the same instance.
pub struct KeyMaterial {
    signing_key: EncodingKey,
    verification_key: DecodingKey,
}

impl KeyMaterial {
    /// Signature algorithm used for every token.
    pub const ALGORITHM: Algorithm = Algorithm::RS256;

    /// Load and check an RSA key pair.
    ///
    /// # Arguments
    /// * `private_key` - PKCS#1 or PKCS#8 PEM private key
    /// * `public_key` - SPKI or PKCS#1 PEM public key
    ///
    /// # Returns
    /// Loaded key material
    ///
    /// # Errors
    /// * `Unreadable` - A key file could not be read
    /// * `InvalidPrivateKey` - Private key is not a usable RSA key
    /// * `InvalidPublicKey` - Public key is not a usable RSA key
    /// * `Mismatch` - Public key does not verify signatures of the private key
    pub fn load(private_key: &KeySource, public_key: &KeySource) -> Result<Self, KeyError> {
        let private_pem = private_key.read()?;
        let public_pem = public_key.read()?;

        let signing_key = EncodingKey::from_rsa_pem(&private_pem)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;
        let verification_key = DecodingKey::from_rsa_pem(&public_pem)
            .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;

        let signature = crypto::sign(PAIR_PROBE, &signing_key, Self::ALGORITHM)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        match crypto::verify(&signature, PAIR_PROBE, &verification_key, Self::ALGORITHM) {
            Ok(true) => Ok(Self {
                signing_key,
                verification_key,
            }),
            Ok(false) => Err(KeyError::Mismatch),
            Err(e) => Err(KeyError::InvalidPublicKey(e.to_string())),
        }
    }

    pub fn signing_key(&self) -> &EncodingKey {
        &self.signing_key
    }

    pub fn verification_key(&self) -> &DecodingKey {
        &self.verification_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("algorithm", &Self::ALGORITHM)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../fixtures/keys")
            .join(name)
    }

    #[test]
    fn test_load_from_pem() {
        let result = KeyMaterial::load(
            &KeySource::Pem(PRIVATE_KEY.to_vec()),
            &KeySource::Pem(PUBLIC_KEY.to_vec()),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_files() {
        let result = KeyMaterial::load(
            &KeySource::File(fixture_path("test.rsa")),
            &KeySource::File(fixture_path("test.rsa.pub")),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = KeyMaterial::load(
            &KeySource::File(fixture_path("does-not-exist.rsa")),
            &KeySource::File(fixture_path("test.rsa.pub")),
        );
        assert!(matches!(result, Err(KeyError::Unreadable { .. })));
    }

    #[test]
    fn test_load_garbage_private_key() {
        let result = KeyMaterial::load(
            &KeySource::Pem(b"not a pem key".to_vec()),
            &KeySource::Pem(PUBLIC_KEY.to_vec()),
        );
        assert!(matches!(result, Err(KeyError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_load_public_key_as_private_key() {
        let result = KeyMaterial::load(
            &KeySource::Pem(PUBLIC_KEY.to_vec()),
            &KeySource::Pem(PUBLIC_KEY.to_vec()),
        );
        assert!(matches!(result, Err(KeyError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_load_garbage_public_key() {
        let result = KeyMaterial::load(
            &KeySource::Pem(PRIVATE_KEY.to_vec()),
            &KeySource::Pem(b"not a pem key".to_vec()),
        );
        assert!(matches!(result, Err(KeyError::InvalidPublicKey(_))));
    }

    #[test]
    fn test_load_mismatched_pair() {
        let result = KeyMaterial::load(
            &KeySource::Pem(PRIVATE_KEY.to_vec()),
            &KeySource::Pem(OTHER_PUBLIC_KEY.to_vec()),
        );
        assert!(matches!(result, Err(KeyError::Mismatch)));
    }

    #[test]
    fn test_debug_does_not_expose_keys() {
        let output = format!("{:?}", key_material());
        assert!(output.contains("RS256"));
        assert!(!output.contains("PRIVATE"));
    }
}
