//! Ed25519 signer accounts derived from a hex-encoded private key.
//!
//! The secret is accepted as plain hex, `0x`-prefixed hex, or the AIP-80
//! form `ed25519-priv-0x…`. The account address is the single-key
//! authentication key: `sha3_256(public_key || 0x00)`.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use sha3::{Digest, Sha3_256};

use crate::domain::{AccountAddress, ConfigError};

/// Environment variable holding the signer's private key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Value shipped in `.env` templates; never a usable key.
pub const PRIVATE_KEY_PLACEHOLDER: &str = "to_fill";

const AIP80_ED25519_PREFIX: &str = "ed25519-priv-";
const ED25519_SCHEME: u8 = 0x00;

/// Decode a hex private key into a SigningKey. Used only within local scope.
fn signing_key_from_secret(secret: &SecretString) -> Result<SigningKey, ConfigError> {
    let raw = secret.expose_secret().trim();
    let raw = raw.strip_prefix(AIP80_ED25519_PREFIX).unwrap_or(raw);
    let digits = raw.strip_prefix("0x").unwrap_or(raw);

    let mut key_bytes = [0u8; 32];
    hex::decode_to_slice(digits, &mut key_bytes).map_err(|e| ConfigError::InvalidValue {
        key: PRIVATE_KEY_ENV.to_string(),
        message: format!("expected 32-byte hex Ed25519 key: {e}"),
    })?;

    Ok(SigningKey::from_bytes(&key_bytes))
}

/// Authentication key for a single Ed25519 public key.
fn authentication_key(public_key: &VerifyingKey) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key.as_bytes());
    hasher.update([ED25519_SCHEME]);
    let digest = hasher.finalize();

    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

/// A signing identity: Ed25519 key pair plus its derived address.
pub struct Account {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl Account {
    /// Build an account from a hex-encoded 32-byte private key.
    pub fn from_private_key(secret: &SecretString) -> Result<Self, ConfigError> {
        let signing_key = signing_key_from_secret(secret)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Fresh random account, for local testing.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = AccountAddress::new(authentication_key(&signing_key.verifying_key()));
        Self {
            signing_key,
            address,
        }
    }

    #[must_use]
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    #[must_use]
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Public key as `0x`-prefixed hex
    #[must_use]
    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.public_key().as_bytes()))
    }

    /// Sign arbitrary bytes.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
