//! Limits for the key tree.

/// Maximum number of segments in a derivation path.
///
/// The serialized BIP32 depth is a single byte.
pub const MAX_PATH_DEPTH: usize = 255;

/// Smallest accepted master seed in bytes (128 bits).
pub const MIN_SEED_LEN: usize = 16;

/// Largest accepted master seed in bytes (512 bits).
pub const MAX_SEED_LEN: usize = 64;

/// Child indices at or above this value are hardened.
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// HMAC key used to derive the master key from a seed.
pub const MASTER_KEY_DOMAIN: &[u8] = b"Bitcoin seed";

/// Size of a chain code in bytes.
pub const CHAIN_CODE_SIZE: usize = 32;
