//! Signed plaintext: what the AEAD actually seals.
//!
//! ```text
//! signature length (2) ‖ signature (≤ 200) ‖ payload length (2) ‖ payload
//! ```
//!
//! The signature is a recoverable compact signature over
//! `SHA256(payload ‖ compressed receiver public key)`. Binding the receiver
//! key stops a relay from re-encrypting a signed payload to someone else.

use hdseal_crypto::{Hash256, PublicKey};
use zeroize::Zeroizing;

use crate::limits::{LENGTH_PREFIX_SIZE, MAX_SIGNATURE_LEN};
use crate::wire::{write_variable_bytes, Reader};
use crate::{ProtocolError, Result};

/// Hash signed by the sender for `payload` addressed to `receiver`.
pub fn signature_hash(payload: &[u8], receiver: &PublicKey) -> Hash256 {
    Hash256::hash_concat(&[payload, &receiver.to_compressed()])
}

/// A parsed signed plaintext, borrowing from the opened AEAD output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedPlaintext<'a> {
    signature: &'a [u8],
    payload: &'a [u8],
}

impl<'a> SignedPlaintext<'a> {
    /// Serialize a signature and payload.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::FieldTooLong` if either part does not fit its
    /// length prefix.
    pub fn encode(signature: &[u8], payload: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if signature.len() > MAX_SIGNATURE_LEN {
            return Err(ProtocolError::FieldTooLong {
                field: "signature",
                len: signature.len(),
                max: MAX_SIGNATURE_LEN,
            });
        }
        let mut out = Zeroizing::new(Vec::with_capacity(
            LENGTH_PREFIX_SIZE * 2 + signature.len() + payload.len(),
        ));
        write_variable_bytes(&mut out, signature)?;
        write_variable_bytes(&mut out, payload)?;
        Ok(out)
    }

    /// Split opened plaintext into signature and payload.
    ///
    /// Bytes after the payload are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::LengthExceedsLimit` for a signature longer
    /// than 200 bytes and `ProtocolError::Truncated` for lengths that overrun
    /// the input.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let signature = reader.read_variable_bytes(MAX_SIGNATURE_LEN)?;
        let payload = reader.read_variable_bytes(reader.remaining())?;
        Ok(Self { signature, payload })
    }

    /// The embedded signature bytes.
    pub fn signature(&self) -> &'a [u8] {
        self.signature
    }

    /// The payload bytes.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}
