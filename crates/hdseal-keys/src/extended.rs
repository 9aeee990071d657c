//! BIP32 extended keys.
//!
//! An extended key is a secp256k1 key plus a chain code and the path it sits
//! at. Private keys derive both hardened and normal children; public keys
//! derive normal children only, which lets a sender compute a receiver's key
//! at a path without holding any secret.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::trace;
use zeroize::Zeroizing;

use hdseal_crypto::{CryptoError, PrivateKey, PublicKey, TWEAK_SIZE};

use crate::limits::{CHAIN_CODE_SIZE, MASTER_KEY_DOMAIN, MAX_SEED_LEN, MIN_SEED_LEN};
use crate::path::{DerivationPath, PathSegment};
use crate::{KeyError, Result};

type HmacSha512 = Hmac<Sha512>;

/// Left and right halves of an HMAC-SHA512 output.
struct Split {
    tweak: Zeroizing<[u8; TWEAK_SIZE]>,
    chain_code: Zeroizing<[u8; CHAIN_CODE_SIZE]>,
}

fn hmac_split(key: &[u8], parts: &[&[u8]]) -> Result<Split> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
        expected: CHAIN_CODE_SIZE,
        actual: key.len(),
    })?;
    for part in parts {
        mac.update(part);
    }
    let output = mac.finalize().into_bytes();

    let mut tweak = Zeroizing::new([0u8; TWEAK_SIZE]);
    let mut chain_code = Zeroizing::new([0u8; CHAIN_CODE_SIZE]);
    tweak.copy_from_slice(&output[..TWEAK_SIZE]);
    chain_code.copy_from_slice(&output[TWEAK_SIZE..]);
    Ok(Split { tweak, chain_code })
}

/// Source of private keys addressed by derivation path.
///
/// The decrypter only needs this capability from the receiver's key store.
pub trait KeyTree {
    /// Derive the private key at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `KeyError` if the path cannot be reached from this tree.
    fn derive_private_key(&self, path: &DerivationPath) -> Result<PrivateKey>;

    /// Derive the public key at `path`.
    fn derive_public_key(&self, path: &DerivationPath) -> Result<PublicKey> {
        self.derive_private_key(path).map(|key| key.public_key())
    }
}

/// A private key with its chain code and position in the tree.
pub struct ExtendedPrivateKey {
    key: PrivateKey,
    chain_code: Zeroizing<[u8; CHAIN_CODE_SIZE]>,
    path: DerivationPath,
}

impl ExtendedPrivateKey {
    /// Derive the master key from a seed.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidSeed` if the seed is not 16 to 64 bytes long
    /// or hashes to an invalid scalar.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let len = seed.len();
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&len) {
            return Err(KeyError::InvalidSeed { len });
        }

        let split = hmac_split(MASTER_KEY_DOMAIN, &[seed])?;
        let key = PrivateKey::from_bytes(split.tweak.as_slice())
            .map_err(|_| KeyError::InvalidSeed { len })?;

        Ok(Self {
            key,
            chain_code: split.chain_code,
            path: DerivationPath::master(),
        })
    }

    /// Assemble an extended key from its parts.
    pub fn new(key: PrivateKey, chain_code: [u8; CHAIN_CODE_SIZE], path: DerivationPath) -> Self {
        Self {
            key,
            chain_code: Zeroizing::new(chain_code),
            path,
        }
    }

    /// The private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    /// Consume the extended key and return the bare private key.
    pub fn into_private_key(self) -> PrivateKey {
        self.key
    }

    /// The public key.
    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    /// The chain code.
    pub fn chain_code(&self) -> &[u8; CHAIN_CODE_SIZE] {
        &self.chain_code
    }

    /// Where this key sits in the tree.
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// The public half, able to derive normal children.
    pub fn to_extended_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            key: self.key.public_key(),
            chain_code: *self.chain_code,
            path: self.path.clone(),
        }
    }

    /// Derive the direct child for `segment`.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidChild` in the (negligible) case that the
    /// child scalar is invalid, and `KeyError::DepthExceeded` at maximum depth.
    pub fn derive_child(&self, segment: &PathSegment) -> Result<Self> {
        let path = self.path.child(segment.clone())?;
        let number = segment.child_number();

        let split = if segment.is_hardened() {
            let secret = self.key.to_bytes();
            hmac_split(
                self.chain_code.as_slice(),
                &[&[0u8][..], secret.as_slice(), &number.to_be_bytes()[..]],
            )?
        } else {
            let public = self.key.public_key().to_compressed();
            hmac_split(self.chain_code.as_slice(), &[&public[..], &number.to_be_bytes()[..]])?
        };

        let key = self
            .key
            .add_tweak(&split.tweak)
            .map_err(|_| KeyError::InvalidChild { index: number })?;

        Ok(Self {
            key,
            chain_code: split.chain_code,
            path,
        })
    }

    /// Derive the key at `target`, which must be this key's path or below it.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NotAPrefix` if `target` is not reachable from this
    /// key, or any error from [`Self::derive_child`].
    pub fn derive_to(&self, target: &DerivationPath) -> Result<Self> {
        let suffix = self
            .path
            .suffix_of(target)
            .ok_or_else(|| KeyError::NotAPrefix {
                key_path: self.path.to_string(),
                target: target.to_string(),
            })?;

        let mut current: Option<Self> = None;
        for segment in suffix {
            let next = current.as_ref().unwrap_or(self).derive_child(segment)?;
            current = Some(next);
        }

        trace!(depth = target.depth(), steps = suffix.len(), "Derived private key");

        match current {
            Some(key) => Ok(key),
            None => Ok(Self {
                key: PrivateKey::from_bytes(self.key.to_bytes().as_slice())?,
                chain_code: self.chain_code.clone(),
                path: self.path.clone(),
            }),
        }
    }
}

impl KeyTree for ExtendedPrivateKey {
    fn derive_private_key(&self, path: &DerivationPath) -> Result<PrivateKey> {
        self.derive_to(path).map(Self::into_private_key)
    }
}

impl std::fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("path", &self.path.to_string())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// A public key with its chain code and position in the tree.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    key: PublicKey,
    chain_code: [u8; CHAIN_CODE_SIZE],
    path: DerivationPath,
}

impl ExtendedPublicKey {
    /// Assemble an extended public key from its parts.
    pub fn new(key: PublicKey, chain_code: [u8; CHAIN_CODE_SIZE], path: DerivationPath) -> Self {
        Self {
            key,
            chain_code,
            path,
        }
    }

    /// The public key.
    pub fn public_key(&self) -> PublicKey {
        self.key
    }

    /// The chain code.
    pub fn chain_code(&self) -> &[u8; CHAIN_CODE_SIZE] {
        &self.chain_code
    }

    /// Where this key sits in the tree.
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Derive the direct normal child for `segment`.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::HardenedFromPublic` for hardened segments.
    pub fn derive_child(&self, segment: &PathSegment) -> Result<Self> {
        let path = self.path.child(segment.clone())?;
        if segment.is_hardened() {
            return Err(KeyError::HardenedFromPublic {
                path: path.to_string(),
            });
        }

        let number = segment.child_number();
        let split = hmac_split(
            &self.chain_code,
            &[&self.key.to_compressed()[..], &number.to_be_bytes()[..]],
        )?;
        let key = self
            .key
            .add_tweak(&split.tweak)
            .map_err(|_| KeyError::InvalidChild { index: number })?;

        Ok(Self {
            key,
            chain_code: *split.chain_code,
            path,
        })
    }

    /// Derive the key at `target`, which must be this key's path or below it
    /// through normal segments only.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NotAPrefix` if `target` is not reachable and
    /// `KeyError::HardenedFromPublic` if the remaining steps include a
    /// hardened segment.
    pub fn derive_to(&self, target: &DerivationPath) -> Result<Self> {
        let suffix = self
            .path
            .suffix_of(target)
            .ok_or_else(|| KeyError::NotAPrefix {
                key_path: self.path.to_string(),
                target: target.to_string(),
            })?;

        if suffix.iter().any(PathSegment::is_hardened) {
            return Err(KeyError::HardenedFromPublic {
                path: target.to_string(),
            });
        }

        suffix
            .iter()
            .try_fold(self.clone(), |key, segment| key.derive_child(segment))
    }
}

impl std::fmt::Debug for ExtendedPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedPublicKey")
            .field("path", &self.path.to_string())
            .field("key", &self.key)
            .finish()
    }
}
