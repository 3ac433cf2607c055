use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use bech32::{ToBase32, Variant};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

use crate::error::KeygenError;

type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag Sui prepends before hashing a public key
pub const ED25519_FLAG: u8 = 0x00;

/// Human-readable part of a bech32 encoded Sui private key
pub const PRIVATE_KEY_HRP: &str = "suiprivkey";

pub const SECRET_KEY_LEN: usize = 32;

/// Length of an address in hex digits, without the `0x`
pub const ADDRESS_HEX_LEN: usize = 64;

/// A generated keypair: the public address and the secret seed behind it.
///
/// The secret lives in a zeroizing buffer and never shows up in `Debug`
/// output.
#[derive(Clone)]
pub struct KeyPair {
    address: String,
    secret_key: Zeroizing<[u8; SECRET_KEY_LEN]>,
}

impl KeyPair {
    /// Derive the Sui keypair for an Ed25519 seed
    pub fn from_seed(seed: &[u8; SECRET_KEY_LEN]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let public_key = signing_key.verifying_key().to_bytes();

        Self {
            address: public_key_to_sui_address(&public_key),
            secret_key: Zeroizing::new(*seed),
        }
    }

    /// Assemble a keypair from an address and secret produced elsewhere.
    ///
    /// Intended for custom [`KeyGenerator`] implementations; the search core
    /// never builds keypairs itself.
    pub fn from_parts(address: String, secret_key: [u8; SECRET_KEY_LEN]) -> Self {
        Self {
            address,
            secret_key: Zeroizing::new(secret_key),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn secret_key(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.secret_key
    }

    /// Render the secret as a `suiprivkey1...` string, the format Sui
    /// wallets import.
    pub fn encoded_secret(&self) -> Result<Zeroizing<String>, KeygenError> {
        let mut payload = Zeroizing::new([0u8; SECRET_KEY_LEN + 1]);
        payload[0] = ED25519_FLAG;
        payload[1..].copy_from_slice(&self.secret_key[..]);

        bech32::encode(PRIVATE_KEY_HRP, payload.as_slice().to_base32(), Variant::Bech32)
            .map(Zeroizing::new)
            .map_err(|e| KeygenError::Backend(format!("bech32 encoding failed: {}", e)))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Source of fresh keypairs for the search loop.
///
/// Implementations must be shareable across worker threads. Errors are
/// treated as fatal by the search: a broken primitive is never retried.
pub trait KeyGenerator: Send + Sync {
    fn generate_keypair(&self) -> Result<KeyPair, KeygenError>;
}

/// Random Ed25519 keypairs with Sui addresses, seeded from the OS RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Generator;

impl KeyGenerator for Ed25519Generator {
    #[inline]
    fn generate_keypair(&self) -> Result<KeyPair, KeygenError> {
        let mut seed = Zeroizing::new([0u8; SECRET_KEY_LEN]);
        OsRng.try_fill_bytes(&mut seed[..])?;
        Ok(KeyPair::from_seed(&seed))
    }
}

/// Convert an Ed25519 public key to a Sui address
///
/// The process:
/// 1. Prepend the Ed25519 scheme flag (0x00) to the 32-byte public key
/// 2. BLAKE2b-256 hash the 33 bytes
/// 3. Hex encode (lowercase) and prepend `0x`
pub fn public_key_to_sui_address(public_key: &[u8; 32]) -> String {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    let digest = hasher.finalize();

    format!("0x{}", hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bech32::FromBase32;

    #[test]
    fn test_address_format() {
        let pair = Ed25519Generator.generate_keypair().unwrap();
        let address = pair.address();

        assert_eq!(address.len(), 2 + ADDRESS_HEX_LEN);
        assert!(address.starts_with("0x"));
        assert!(address[2..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_from_seed_is_deterministic() {
        let seed = [7u8; SECRET_KEY_LEN];
        let a = KeyPair::from_seed(&seed);
        let b = KeyPair::from_seed(&seed);
        assert_eq!(a.address(), b.address());
        assert_eq!(a.secret_key(), &seed);

        let other = KeyPair::from_seed(&[8u8; SECRET_KEY_LEN]);
        assert_ne!(a.address(), other.address());
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = Ed25519Generator.generate_keypair().unwrap();
        let b = Ed25519Generator.generate_keypair().unwrap();
        assert_ne!(a.address(), b.address());
        assert_ne!(a.secret_key(), b.secret_key());
    }

    #[test]
    fn test_encoded_secret_round_trip() {
        let seed = [42u8; SECRET_KEY_LEN];
        let pair = KeyPair::from_seed(&seed);
        let encoded = pair.encoded_secret().unwrap();
        assert!(encoded.starts_with("suiprivkey1"));

        let (hrp, data, variant) = bech32::decode(&encoded).unwrap();
        let bytes = Vec::<u8>::from_base32(&data).unwrap();
        assert_eq!(hrp, PRIVATE_KEY_HRP);
        assert_eq!(variant, Variant::Bech32);
        assert_eq!(bytes[0], ED25519_FLAG);
        assert_eq!(&bytes[1..], &seed);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let pair = KeyPair::from_parts("0xabc".to_string(), [0xee; SECRET_KEY_LEN]);
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("0xabc"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("238"));
        assert!(!rendered.contains("ee"));
    }
}

