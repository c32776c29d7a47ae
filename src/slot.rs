// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! The slot address algebra (spec Component B): deterministic derivation of
//! a 256-bit slot address from a root key and a navigation step. Every
//! function here is total and pure — it never touches a [`Host`](crate::Host).

use alloy_primitives::{B256, U256};

use crate::host::Host;

/// `keyToHash`: left-pad a key to 32 bytes if it already fits, else hash it.
///
/// This is the entry point for every root key in the datastore (§4.2) and
/// for every mapping key (§4.7) — a mapping key is first run through this
/// before being combined with the mapping's base slot.
pub fn key_to_hash<H: Host>(host: &H, key: &[u8]) -> U256 {
    if key.len() <= 32 {
        let mut buf = [0u8; 32];
        buf[32 - key.len()..].copy_from_slice(key);
        U256::from_be_bytes(buf)
    } else {
        U256::from_be_bytes(host.native_keccak256(key).0)
    }
}

/// `H(x1, x2)` from §4.2: keccak256 of two left-padded 32-byte words,
/// concatenated `x1 || x2`. Used for both the Mapping step and the Dynamic
/// Array item-slot step, which share this formula.
pub fn hash2<H: Host>(host: &H, x1: U256, x2: U256) -> U256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(&x1.to_be_bytes::<32>());
    buf[32..].copy_from_slice(&x2.to_be_bytes::<32>());
    U256::from_be_bytes(host.native_keccak256(&buf).0)
}

/// `H(slot)` from §4.2: the overflow pointer for a variable-length bytes
/// root, and the base slot for a fixed Slot Array's or Storage Vec's items.
pub fn data_pointer<H: Host>(host: &H, slot: U256) -> U256 {
    U256::from_be_bytes(host.native_keccak256(&slot.to_be_bytes::<32>()).0)
}

/// The row-major flattening formula from §4.2/§4.5:
/// `base + Σ i_j · Π_{m>j} dims[m]`, in 256-bit wraparound arithmetic.
///
/// `indices` may be shorter than `dims` (a partial index, as used by
/// `sub_array`); the trailing `dims` entries are simply left unindexed.
/// This function never bounds-checks `indices` against `dims` — unlike the
/// original source's `indexSlot`, which checks each index and returns a nil
/// slot out of range, [`crate::array::SlotArray`] checks bounds itself
/// before calling here, returning `None` rather than computing a bogus
/// address (see `SPEC_FULL.md` §10.6).
pub fn row_major_offset(base: U256, dims: &[usize], indices: &[usize]) -> U256 {
    let mut flat = U256::ZERO;
    for (j, &i) in indices.iter().enumerate() {
        let stride: u64 = dims[j + 1..].iter().product::<usize>() as u64;
        flat = flat.wrapping_add(U256::from(i).wrapping_mul(U256::from(stride)));
    }
    base.wrapping_add(flat)
}

/// Encodes an index as a big-endian 256-bit word, the key shape used by the
/// Dynamic Array item-slot derivation (§4.2) and by `nested_value` on both
/// mappings and dynamic arrays.
pub fn encode_index(index: u64) -> B256 {
    B256::from(U256::from(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHost;

    #[test]
    fn key_to_hash_short_is_left_padded() {
        let host = TestHost::new();
        let got = key_to_hash(&host, &[0x01]);
        assert_eq!(got, U256::from(1));
    }

    #[test]
    fn key_to_hash_long_is_hashed() {
        let host = TestHost::new();
        let key = vec![0xab; 33];
        let got = key_to_hash(&host, &key);
        let want = U256::from_be_bytes(host.native_keccak256(&key).0);
        assert_eq!(got, want);
    }

    #[test]
    fn row_major_offset_matches_formula() {
        // dims = [2, 3, 4]; index (1, 2, 3) -> 1*12 + 2*4 + 3*1 = 23
        let base = U256::from(100);
        let got = row_major_offset(base, &[2, 3, 4], &[1, 2, 3]);
        assert_eq!(got, U256::from(123));
    }

    #[test]
    fn row_major_offset_partial_index() {
        let base = U256::from(0);
        let got = row_major_offset(base, &[2, 3, 4], &[1]);
        assert_eq!(got, U256::from(12));
    }

    #[test]
    fn row_major_offset_wraps_on_overflow() {
        let base = U256::MAX;
        let got = row_major_offset(base, &[2], &[1]);
        assert_eq!(got, U256::ZERO);
    }
}
