//! Property-based tests for the key tree.
//!
//! These tests verify key tree invariants:
//!
//! - Path parsing accepts every well-formed path and prints it back unchanged
//! - Path parsing never panics on arbitrary input
//! - Public and private derivation agree on normal segments
//! - Derivation is deterministic and path labels do not affect keys

use proptest::prelude::*;

use crate::{DerivationPath, ExtendedPrivateKey, KeyTree, HARDENED_OFFSET};

fn segment() -> impl Strategy<Value = (Option<String>, u32, bool)> {
    (
        prop::option::of("[a-z][a-z0-9_-]{0,8}"),
        0u32..HARDENED_OFFSET,
        any::<bool>(),
    )
}

fn render(segments: &[(Option<String>, u32, bool)]) -> String {
    let mut path = String::from("m");
    for (name, index, hardened) in segments {
        path.push('/');
        if let Some(name) = name {
            path.push_str(name);
            path.push(':');
        }
        path.push_str(&index.to_string());
        if *hardened {
            path.push('\'');
        }
    }
    path
}

// ==================== Path Parsing Property Tests ====================

proptest! {
    /// Well-formed paths parse and print back identically.
    #[test]
    fn path_display_roundtrip(segments in prop::collection::vec(segment(), 0..12)) {
        let text = render(&segments);
        let path = DerivationPath::parse(&text).unwrap();
        prop_assert_eq!(path.depth(), segments.len());
        prop_assert_eq!(path.to_string(), text);
    }

    /// Parsing arbitrary strings never panics.
    #[test]
    fn path_parse_never_panics(s in "\\PC{0,64}") {
        let _ = DerivationPath::parse(&s);
    }

    /// Every path is a prefix of its extensions and of itself.
    #[test]
    fn path_prefix_of_extension(
        base in prop::collection::vec(segment(), 0..6),
        extra in prop::collection::vec(segment(), 0..6),
    ) {
        let short = DerivationPath::parse(&render(&base)).unwrap();
        let long = DerivationPath::parse(&render(&[base.clone(), extra.clone()].concat())).unwrap();
        prop_assert!(short.is_prefix_of(&long));
        prop_assert_eq!(short.suffix_of(&long).map(|s| s.len()), Some(extra.len()));
    }
}

// ==================== Derivation Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Public derivation reaches the same keys as private derivation.
    #[test]
    fn public_derivation_agrees(
        seed in prop::collection::vec(any::<u8>(), 16..=64),
        indices in prop::collection::vec(0u32..HARDENED_OFFSET, 0..4),
    ) {
        let master = ExtendedPrivateKey::from_seed(&seed).unwrap();
        let segments: Vec<_> = indices.iter().map(|&i| (None, i, false)).collect();
        let path = DerivationPath::parse(&render(&segments)).unwrap();

        let from_public = master.to_extended_public().derive_to(&path).unwrap();
        prop_assert_eq!(from_public.public_key(), master.derive_public_key(&path).unwrap());
    }

    /// Labels never change the derived key.
    #[test]
    fn labels_ignored(
        seed in prop::collection::vec(any::<u8>(), 16..=64),
        segments in prop::collection::vec(segment(), 1..4),
    ) {
        let master = ExtendedPrivateKey::from_seed(&seed).unwrap();
        let unlabeled: Vec<_> = segments.iter().map(|(_, i, h)| (None, *i, *h)).collect();

        let labeled = DerivationPath::parse(&render(&segments)).unwrap();
        let plain = DerivationPath::parse(&render(&unlabeled)).unwrap();
        prop_assert_eq!(
            master.derive_public_key(&labeled).unwrap(),
            master.derive_public_key(&plain).unwrap()
        );
    }
}
