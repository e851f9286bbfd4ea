// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::codec::{decode_leaf, encode_leaf, PLAIN_MARKER, REFERENCE_MARKER};
use crate::error::CodecError;
use crate::types::Entry;

#[test]
fn test_plain_leaf_layout() {
    let leaf = encode_leaf(&Entry::plain(b"key".to_vec(), b"value".to_vec())).unwrap();

    let mut expected = vec![PLAIN_MARKER];
    expected.extend_from_slice(&3u32.to_le_bytes());
    expected.extend_from_slice(b"key");
    expected.extend_from_slice(b"value");

    assert_eq!(leaf, expected);
}

#[test]
fn test_reference_leaf_layout() {
    let leaf = encode_leaf(&Entry::reference(b"ref".to_vec(), b"target".to_vec(), 42)).unwrap();

    let mut expected = vec![REFERENCE_MARKER];
    expected.extend_from_slice(&3u32.to_le_bytes());
    expected.extend_from_slice(b"ref");
    expected.extend_from_slice(&42u64.to_le_bytes());
    expected.extend_from_slice(b"target");

    assert_eq!(leaf, expected);
}

#[test]
fn test_key_value_boundary_is_unambiguous() {
    // Same concatenation, different split.
    let a = encode_leaf(&Entry::plain(b"ab".to_vec(), b"c".to_vec())).unwrap();
    let b = encode_leaf(&Entry::plain(b"a".to_vec(), b"bc".to_vec())).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_plain_and_reference_never_collide() {
    let plain = encode_leaf(&Entry::plain(b"k".to_vec(), 7u64.to_le_bytes().to_vec())).unwrap();
    let reference = encode_leaf(&Entry::reference(b"k".to_vec(), Vec::new(), 7)).unwrap();
    assert_ne!(plain, reference);
}

#[test]
fn test_decode_leaf() {
    let entries = [
        Entry::plain(b"".to_vec(), b"".to_vec()),
        Entry::plain(b"user:1".to_vec(), b"{\"name\":\"ada\"}".to_vec()),
        Entry::reference(b"latest".to_vec(), b"user:1".to_vec(), 0),
    ];
    for entry in entries {
        let leaf = encode_leaf(&entry).unwrap();
        assert_eq!(decode_leaf(&leaf).unwrap(), entry);
    }
}

#[test]
fn test_decode_rejects_bad_input() {
    assert_eq!(decode_leaf(&[]), Err(CodecError::Truncated));
    assert_eq!(decode_leaf(&[0x07, 0, 0, 0, 0]), Err(CodecError::UnknownMarker(0x07)));

    // Claims a 10 byte key, carries 2.
    let mut short = vec![PLAIN_MARKER];
    short.extend_from_slice(&10u32.to_le_bytes());
    short.extend_from_slice(b"ab");
    assert_eq!(decode_leaf(&short), Err(CodecError::Truncated));

    // Reference without its tx id.
    let mut no_tx = vec![REFERENCE_MARKER];
    no_tx.extend_from_slice(&1u32.to_le_bytes());
    no_tx.push(b'r');
    assert_eq!(decode_leaf(&no_tx), Err(CodecError::Truncated));
}
