//! Authenticated blob layout.
//!
//! ```text
//! version (1) ‖ ephemeral public key (33)
//!   ‖ path length (2) ‖ path (≤ 1000, UTF-8)
//!   ‖ nonce length (2) ‖ nonce (≥ 12)
//!   ‖ AEAD ciphertext (tag included)
//! ```
//!
//! Everything from the version byte through the nonce length is the AEAD
//! associated data, so the header cannot be altered without the ciphertext
//! failing to open. The whole blob travels as base58 text.

use hdseal_crypto::COMPRESSED_PUBLIC_KEY_SIZE;

use crate::limits::{
    LENGTH_PREFIX_SIZE, MAX_DERIVATION_PATH_LEN, MIN_CIPHERTEXT_LEN, MIN_NONCE_LEN,
    PROTOCOL_VERSION,
};
use crate::wire::{write_variable_bytes, Reader};
use crate::{ProtocolError, Result};

/// Decode base58 transport text.
///
/// # Errors
///
/// Returns `ProtocolError::InvalidBase58` for characters outside the alphabet.
pub fn decode_text(text: &str) -> Result<Vec<u8>> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| ProtocolError::InvalidBase58(e.to_string()))
}

/// Encode bytes as base58 transport text.
pub fn encode_text(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Build the associated data for a blob: every header byte up to and
/// including the nonce length.
///
/// # Errors
///
/// Returns `ProtocolError::FieldTooLong` if `path` exceeds 1000 bytes or the
/// nonce length does not fit the prefix.
pub fn associated_data(
    ephemeral_public: &[u8; COMPRESSED_PUBLIC_KEY_SIZE],
    path: &str,
    nonce_len: usize,
) -> Result<Vec<u8>> {
    if path.len() > MAX_DERIVATION_PATH_LEN {
        return Err(ProtocolError::FieldTooLong {
            field: "derivation path",
            len: path.len(),
            max: MAX_DERIVATION_PATH_LEN,
        });
    }
    let nonce_len = u16::try_from(nonce_len).map_err(|_| ProtocolError::FieldTooLong {
        field: "nonce",
        len: nonce_len,
        max: usize::from(u16::MAX),
    })?;

    let mut aad = Vec::with_capacity(
        1 + COMPRESSED_PUBLIC_KEY_SIZE + LENGTH_PREFIX_SIZE * 2 + path.len(),
    );
    aad.push(PROTOCOL_VERSION);
    aad.extend_from_slice(ephemeral_public);
    write_variable_bytes(&mut aad, path.as_bytes())?;
    aad.extend_from_slice(&nonce_len.to_be_bytes());
    Ok(aad)
}

/// A parsed blob, borrowing every field from the decoded bytes.
///
/// Parsing only checks structure. The ephemeral key, path grammar and
/// ciphertext are validated by the steps that use them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBlob<'a> {
    ephemeral_public: &'a [u8],
    path: &'a str,
    nonce: &'a [u8],
    ciphertext: &'a [u8],
    associated_data: &'a [u8],
}

impl<'a> EncryptedBlob<'a> {
    /// Split decoded blob bytes into their fields.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnsupportedVersion` for any version other than 1
    /// - `ProtocolError::Truncated` or `ProtocolError::LengthExceedsLimit`
    ///   for lengths that overrun the input or their ceiling
    /// - `ProtocolError::InvalidPathEncoding` for a non UTF-8 path
    /// - `ProtocolError::NonceTooShort` for nonces under 12 bytes
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);

        let version = reader.read_u8()?;
        if version != PROTOCOL_VERSION {
            return Err(ProtocolError::UnsupportedVersion {
                expected: PROTOCOL_VERSION,
                actual: version,
            });
        }

        let ephemeral_public = reader.read_exact(COMPRESSED_PUBLIC_KEY_SIZE)?;
        let path = reader.read_variable_bytes(MAX_DERIVATION_PATH_LEN)?;
        let path = std::str::from_utf8(path).map_err(|_| ProtocolError::InvalidPathEncoding)?;

        let aad_len = reader.position() + LENGTH_PREFIX_SIZE;

        // Measured before the nonce length prefix is consumed.
        let nonce_limit = reader.remaining().saturating_sub(MIN_CIPHERTEXT_LEN);
        let nonce = reader.read_variable_bytes(nonce_limit)?;
        if nonce.len() < MIN_NONCE_LEN {
            return Err(ProtocolError::NonceTooShort {
                min: MIN_NONCE_LEN,
                actual: nonce.len(),
            });
        }

        let ciphertext = reader.rest();

        Ok(Self {
            ephemeral_public,
            path,
            nonce,
            ciphertext,
            associated_data: &bytes[..aad_len],
        })
    }

    /// Encoded ephemeral public key, not yet validated as a curve point.
    pub fn ephemeral_public(&self) -> &'a [u8] {
        self.ephemeral_public
    }

    /// Receiver derivation path, not yet validated against the path grammar.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// AEAD nonce.
    pub fn nonce(&self) -> &'a [u8] {
        self.nonce
    }

    /// AEAD ciphertext including the tag.
    pub fn ciphertext(&self) -> &'a [u8] {
        self.ciphertext
    }

    /// The header bytes the AEAD authenticates.
    pub fn associated_data(&self) -> &'a [u8] {
        self.associated_data
    }
}
