//! secp256k1 keys and recoverable compact signatures.
//!
//! ## Security Notes
//!
//! - Private keys are zeroized on drop and are intentionally not `Clone`
//! - Signatures are deterministic (RFC 6979) and low-S normalized
//! - Public keys always hold a valid, non-identity curve point

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{NonZeroScalar, ProjectivePoint, Scalar, SecretKey};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::{CryptoError, Hash256, Result};

/// Size of a compressed SEC1 public key in bytes.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Size of an uncompressed SEC1 public key in bytes.
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Size of a private scalar in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of a scalar tweak used by additive key derivation.
pub const TWEAK_SIZE: usize = 32;

/// Size of a compact recoverable signature: header byte, `r`, `s`.
pub const COMPACT_SIGNATURE_SIZE: usize = 65;

/// Header byte of a compact signature for recovery id 0 with an
/// uncompressed-key flag.
const COMPACT_HEADER_BASE: u8 = 27;

/// Header flag set when the signer asked for a compressed key on recovery.
const COMPACT_HEADER_COMPRESSED_FLAG: u8 = 4;

/// A secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    /// Parse a SEC1 encoded point (compressed or uncompressed).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidPublicKey` if the bytes are not a valid
    /// point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        k256::PublicKey::from_sec1_bytes(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| CryptoError::InvalidPublicKey(format!("{} bytes", bytes.len())))
    }

    /// Compressed SEC1 encoding (33 bytes).
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        let encoded = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Uncompressed SEC1 encoding (65 bytes).
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        let encoded = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Hex of the compressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Compute `self + tweak·G`.
    ///
    /// # Errors
    ///
    /// Returns an error if `tweak` is not below the curve order or the sum is
    /// the point at infinity.
    pub fn add_tweak(&self, tweak: &[u8; TWEAK_SIZE]) -> Result<Self> {
        let tweak = parse_tweak(tweak)?;
        let point = ProjectivePoint::GENERATOR * tweak + self.inner.to_projective();
        k256::PublicKey::from_affine(point.to_affine())
            .map(|inner| Self { inner })
            .map_err(|_| CryptoError::InvalidPublicKey("tweak produced the identity".into()))
    }

    pub(crate) fn as_k256(&self) -> &k256::PublicKey {
        &self.inner
    }
}

impl From<k256::PublicKey> for PublicKey {
    fn from(inner: k256::PublicKey) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_compressed();
        write!(
            f,
            "PublicKey({:02x}{:02x}{:02x}..)",
            bytes[0], bytes[1], bytes[2]
        )
    }
}

/// A secp256k1 private key.
///
/// The scalar is zeroized when dropped.
pub struct PrivateKey {
    inner: SecretKey,
}

impl PrivateKey {
    /// Generate a new random private key.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self {
            inner: SecretKey::random(rng),
        }
    }

    /// Create from a 32-byte big-endian scalar.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not 32 bytes, is zero, or is not
    /// below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        SecretKey::from_slice(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| CryptoError::InvalidPrivateKey)
    }

    /// Big-endian scalar bytes.
    ///
    /// # Security
    ///
    /// Handle with care - this exposes the private key.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Get the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.public_key(),
        }
    }

    /// Compute `(self + tweak) mod n`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidPrivateKey` if `tweak` is not below the
    /// curve order or the sum is zero.
    pub fn add_tweak(&self, tweak: &[u8; TWEAK_SIZE]) -> Result<Self> {
        let sum = parse_tweak(tweak)? + *self.inner.to_nonzero_scalar();
        let scalar = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))
            .ok_or(CryptoError::InvalidPrivateKey)?;
        Ok(Self {
            inner: SecretKey::from(scalar),
        })
    }

    pub(crate) fn scalar(&self) -> NonZeroScalar {
        self.inner.to_nonzero_scalar()
    }
}

impl From<SecretKey> for PrivateKey {
    fn from(inner: SecretKey) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

fn parse_tweak(tweak: &[u8; TWEAK_SIZE]) -> Result<Scalar> {
    Option::<Scalar>::from(Scalar::from_repr((*tweak).into()))
        .ok_or(CryptoError::InvalidPrivateKey)
}

/// A 65-byte recoverable compact signature: `header ‖ r ‖ s`.
#[derive(Clone, PartialEq, Eq)]
pub struct CompactSignature {
    bytes: [u8; COMPACT_SIGNATURE_SIZE],
}

impl CompactSignature {
    /// Get the signature bytes.
    pub fn as_bytes(&self) -> &[u8; COMPACT_SIGNATURE_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CompactSignature({:02x}:{:02x}{:02x}..)",
            self.bytes[0], self.bytes[1], self.bytes[2]
        )
    }
}

/// Sign a 32-byte prehash, producing a signature the public key can be
/// recovered from.
pub fn sign_compact(key: &PrivateKey, hash: &Hash256) -> Result<CompactSignature> {
    let signing_key = SigningKey::from(&key.inner);
    let (signature, recovery_id) = signing_key
        .sign_prehash_recoverable(hash.as_bytes())
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    let mut bytes = [0u8; COMPACT_SIGNATURE_SIZE];
    bytes[0] = COMPACT_HEADER_BASE + recovery_id.to_byte();
    bytes[1..].copy_from_slice(&signature.to_bytes());
    Ok(CompactSignature { bytes })
}

/// Recover the signer's public key from a compact signature and the prehash
/// it was made over.
///
/// Accepts headers for both the uncompressed and compressed key flags.
///
/// # Errors
///
/// Returns `CryptoError::SignatureRecovery` if the signature is malformed or
/// no valid key can be recovered.
pub fn recover_compact(signature: &[u8], hash: &Hash256) -> Result<PublicKey> {
    if signature.len() != COMPACT_SIGNATURE_SIZE {
        return Err(CryptoError::SignatureRecovery(format!(
            "expected {} bytes, got {}",
            COMPACT_SIGNATURE_SIZE,
            signature.len()
        )));
    }

    let header = signature[0];
    let max_header = COMPACT_HEADER_BASE + COMPACT_HEADER_COMPRESSED_FLAG + 3;
    if !(COMPACT_HEADER_BASE..=max_header).contains(&header) {
        return Err(CryptoError::SignatureRecovery(format!(
            "invalid header byte {header}"
        )));
    }
    let recovery_byte = (header - COMPACT_HEADER_BASE) & !COMPACT_HEADER_COMPRESSED_FLAG;
    let recovery_id = RecoveryId::from_byte(recovery_byte)
        .ok_or_else(|| CryptoError::SignatureRecovery("invalid recovery id".into()))?;

    let rs = Signature::from_slice(&signature[1..])
        .map_err(|_| CryptoError::SignatureRecovery("invalid r or s".into()))?;

    let verifying_key = VerifyingKey::recover_from_prehash(hash.as_bytes(), &rs, recovery_id)
        .map_err(|_| CryptoError::SignatureRecovery("no key recoverable".into()))?;

    Ok(PublicKey {
        inner: k256::PublicKey::from(&verifying_key),
    })
}
