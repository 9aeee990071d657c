//! Elliptic-curve Diffie-Hellman key agreement on secp256k1.
//!
//! Two key flavors come out of the same raw shared secret:
//!
//! - [`RawSharedSecret::aead_key`] hashes the zero-padded x-coordinate with
//!   SHA-256 and is used by the authenticated scheme.
//! - [`RawSharedSecret::legacy_key`] uses the zero-padded x-coordinate as the
//!   cipher key directly. It only exists to decrypt data produced by the
//!   legacy cipher path.
//!
//! ## Security Notes
//!
//! - Ephemeral key pairs are consumed by `diffie_hellman` and cannot be reused
//! - Raw secrets and derived keys are zeroized on drop

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::aead::AeadKey;
use crate::cbc::CbcKey;
use crate::random::{minimal_big_int, padded_serialize_big_int};
use crate::{Hash256, PrivateKey, PublicKey, Result};

/// Width the shared secret integer is padded to before use. Matches the
/// AES-256 key size.
pub const SHARED_SECRET_WIDTH: usize = 32;

/// A single-use key pair for one key agreement.
pub struct EphemeralKeyPair {
    secret: PrivateKey,
    public: PublicKey,
}

impl EphemeralKeyPair {
    /// Generate a new ephemeral key pair.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let secret = PrivateKey::generate(rng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Perform Diffie-Hellman and consume the ephemeral key.
    pub fn diffie_hellman(self, peer_public: &PublicKey) -> RawSharedSecret {
        RawSharedSecret::derive(&self.secret, peer_public)
    }
}

impl std::fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EphemeralKeyPair {{ public: {:?} }}", self.public)
    }
}

/// The x-coordinate of the ECDH point as a minimal big-endian integer.
///
/// Its byte length varies (leading zeros are stripped), so it is always
/// padded to [`SHARED_SECRET_WIDTH`] before being used as key material.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RawSharedSecret {
    magnitude: Vec<u8>,
}

impl RawSharedSecret {
    /// Scalar-multiply `peer_public` by `private` and keep the x-coordinate.
    pub fn derive(private: &PrivateKey, peer_public: &PublicKey) -> Self {
        let shared =
            k256::ecdh::diffie_hellman(private.scalar(), peer_public.as_k256().as_affine());
        Self {
            magnitude: minimal_big_int(shared.raw_secret_bytes().as_slice()).to_vec(),
        }
    }

    /// The secret as a minimal big-endian integer.
    pub fn as_big_int_bytes(&self) -> &[u8] {
        &self.magnitude
    }

    /// The secret zero-padded to [`SHARED_SECRET_WIDTH`] bytes.
    pub fn padded(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(padded_serialize_big_int(SHARED_SECRET_WIDTH, &self.magnitude))
    }

    /// `SHA256(padded secret)`, the key for the authenticated scheme.
    pub fn aead_key(&self) -> AeadKey {
        let mut digest = Hash256::hash(&self.padded());
        let key = AeadKey::from_array(digest.to_bytes());
        digest.zeroize();
        key
    }

    /// The padded secret used directly as a cipher key (legacy path only).
    pub fn legacy_key(&self) -> Result<CbcKey> {
        CbcKey::from_bytes(&self.padded())
    }
}

impl std::fmt::Debug for RawSharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawSharedSecret([REDACTED])")
    }
}

/// Run ECDH against `counterparty` with a fresh ephemeral key.
///
/// Returns the ephemeral public key to transmit and the raw secret.
pub fn generate_shared_secret<R: CryptoRng + RngCore>(
    counterparty: &PublicKey,
    rng: &mut R,
) -> (PublicKey, RawSharedSecret) {
    let ephemeral = EphemeralKeyPair::generate(rng);
    let public = *ephemeral.public_key();
    (public, ephemeral.diffie_hellman(counterparty))
}

/// Run ECDH against `counterparty` with a fresh ephemeral key and derive the
/// AEAD key.
pub fn generate_shared_secret_for_aead<R: CryptoRng + RngCore>(
    counterparty: &PublicKey,
    rng: &mut R,
) -> (PublicKey, AeadKey) {
    let (public, secret) = generate_shared_secret(counterparty, rng);
    (public, secret.aead_key())
}

/// Reconstruct the raw secret from our private key and the peer's encoded
/// ephemeral public key.
///
/// # Errors
///
/// Returns `CryptoError::InvalidPublicKey` if `raw_ephemeral` is not a valid point.
pub fn recover_shared_secret(
    my_private: &PrivateKey,
    raw_ephemeral: &[u8],
) -> Result<RawSharedSecret> {
    let ephemeral = PublicKey::from_bytes(raw_ephemeral)?;
    Ok(RawSharedSecret::derive(my_private, &ephemeral))
}

/// Reconstruct the AEAD key from our private key and the peer's encoded
/// ephemeral public key.
pub fn recover_shared_secret_for_aead(
    my_private: &PrivateKey,
    raw_ephemeral: &[u8],
) -> Result<AeadKey> {
    Ok(recover_shared_secret(my_private, raw_ephemeral)?.aead_key())
}
