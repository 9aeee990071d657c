//! Randomness and fixed-width integer helpers.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Return `count` bytes from the operating system CSPRNG.
///
/// A failing OS random source is not recoverable; `OsRng` panics in that
/// case, which aborts the operation rather than producing weak output.
pub fn random_bytes(count: usize) -> Vec<u8> {
    let mut buf = vec![0u8; count];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Return `count` bytes from the given CSPRNG.
pub fn random_bytes_from<R: CryptoRng + RngCore>(rng: &mut R, count: usize) -> Vec<u8> {
    let mut buf = vec![0u8; count];
    fill_random(rng, &mut buf);
    buf
}

/// Overwrite `buf` with bytes from the given CSPRNG.
pub fn fill_random<R: CryptoRng + RngCore>(rng: &mut R, buf: &mut [u8]) {
    rng.fill_bytes(buf);
}

/// Serialize a big-endian unsigned integer left-padded with zeros to `width` bytes.
///
/// Leading zero bytes of `magnitude` are ignored, so `[0, 0, 1]` and `[1]`
/// serialize identically. A value wider than `width` is returned unpadded.
pub fn padded_serialize_big_int(width: usize, magnitude: &[u8]) -> Vec<u8> {
    let first_nonzero = magnitude
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(magnitude.len());
    let significant = &magnitude[first_nonzero..];

    let mut out = Vec::with_capacity(width.max(significant.len()));
    out.resize(width.saturating_sub(significant.len()), 0);
    out.extend_from_slice(significant);
    out
}

/// Strip leading zero bytes, yielding the minimal big-endian encoding.
pub fn minimal_big_int(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first_nonzero..]
}
