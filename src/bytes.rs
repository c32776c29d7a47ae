// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! The variable-length bytes codec (spec Component D): Solidity's short/long
//! string layout, shared by [`Value::get_bytes`](crate::datastore::Value::get_bytes)
//! and by [`Record`](crate::record::Record)'s byte-slice fields.
//!
//! Grounded on the teacher SDK's `storage::bytes::StorageBytes`, adapted from
//! its process-global `StorageCache` to the crate's own [`Host`]/[`WordStore`]
//! capability, and stripped of the teacher's incremental `push`/`extend`
//! API — the spec only calls for whole-value `get`/`set`.
//!
//! Layout, exactly as in `datastore.go`'s `getBytes`/`setBytes`:
//! - If the root slot's last byte is even, the value is "short": its length
//!   is `last_byte / 2` bytes, stored left-aligned in the same root word.
//! - If the root slot's last byte is odd, the value is "long": the root word
//!   holds `2*len + 1`, and the payload lives at `keccak256(slot)`, spanning
//!   as many consecutive words as needed, each left-aligned in its word
//!   except the remainder in the last one.

use alloy_primitives::U256;
use std::marker::PhantomData;

use crate::host::{Host, WordStore};
use crate::slot;

/// A root slot can hold at most this many bytes "short" — one byte is spent
/// on the length/discriminator.
const SHORT_CAPACITY: usize = 31;

/// Reads a variable-length byte string rooted at `slot`.
pub fn get_bytes<H: Host, S: WordStore<H>>(host: &H, root: U256) -> Vec<u8> {
    let word = S::get_word(host, root);
    let last = word[31];
    if last & 1 == 0 {
        let len = (last / 2) as usize;
        word[..len].to_vec()
    } else {
        let len = ((U256::from_be_bytes(word.0) - U256::from(1)) / U256::from(2)).to::<usize>();
        let base = slot::data_pointer(host, root);
        let mut out = Vec::with_capacity(len);
        let mut remaining = len;
        let mut offset = U256::ZERO;
        while remaining > 0 {
            let chunk = S::get_word(host, base.wrapping_add(offset));
            let take = remaining.min(32);
            out.extend_from_slice(&chunk[..take]);
            remaining -= take;
            offset = offset.wrapping_add(U256::from(1));
        }
        out
    }
}

/// Writes a variable-length byte string rooted at `slot`, choosing the short
/// or long layout based on `value`'s length.
///
/// If a previously long value is overwritten with a shorter long value (or a
/// short value), the now-unused trailing payload words are left as they are
/// — exactly as `setBytes` leaves them in the original source, and matching
/// the spec's Non-goal of not chasing down and clearing every stale slot a
/// shrink could orphan.
pub fn set_bytes<H: Host, S: WordStore<H>>(host: &H, root: U256, value: &[u8]) {
    if value.len() <= SHORT_CAPACITY {
        let mut word = [0u8; 32];
        word[..value.len()].copy_from_slice(value);
        word[31] = (value.len() as u8) * 2;
        S::set_word(host, root, word.into());
    } else {
        let encoded_len = U256::from(value.len())
            .wrapping_mul(U256::from(2))
            .wrapping_add(U256::from(1));
        S::set_word(host, root, encoded_len.to_be_bytes::<32>().into());

        let base = slot::data_pointer(host, root);
        let mut offset = U256::ZERO;
        for chunk in value.chunks(32) {
            let mut word = [0u8; 32];
            word[..chunk.len()].copy_from_slice(chunk);
            S::set_word(host, base.wrapping_add(offset), word.into());
            offset = offset.wrapping_add(U256::from(1));
        }
    }
}

/// Returns the byte length of the variable-length string rooted at `slot`,
/// without materializing its payload.
pub fn len_bytes<H: Host, S: WordStore<H>>(host: &H, root: U256) -> usize {
    let word = S::get_word(host, root);
    let last = word[31];
    if last & 1 == 0 {
        (last / 2) as usize
    } else {
        ((U256::from_be_bytes(word.0) - U256::from(1)) / U256::from(2)).to::<usize>()
    }
}

/// A thin, slot-addressed handle over a variable-length byte string, mirroring
/// the shape of [`crate::datastore::Value`] for callers that want a reusable
/// handle rather than one-shot `get_bytes`/`set_bytes` calls.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct BytesValue<H, S> {
    root: U256,
    _host: PhantomData<H>,
    _store: PhantomData<S>,
}

impl<H: Host, S: WordStore<H>> BytesValue<H, S> {
    pub(crate) fn new(root: U256) -> Self {
        Self {
            root,
            _host: PhantomData,
            _store: PhantomData,
        }
    }

    /// The slot this handle's length/short-payload word lives at.
    pub fn slot(&self) -> U256 {
        self.root
    }

    pub fn get(&self, host: &H) -> Vec<u8> {
        get_bytes::<H, S>(host, self.root)
    }

    pub fn set(&self, host: &H, value: &[u8]) {
        set_bytes::<H, S>(host, self.root, value)
    }

    pub fn len(&self, host: &H) -> usize {
        len_bytes::<H, S>(host, self.root)
    }

    pub fn is_empty(&self, host: &H) -> bool {
        self.len(host) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Persistent;
    use crate::testing::TestHost;

    #[test]
    fn short_round_trip() {
        let host = TestHost::new();
        let root = U256::from(5);
        let value = b"hello world";
        set_bytes::<_, Persistent>(&host, root, value);
        assert_eq!(get_bytes::<_, Persistent>(&host, root), value);
        assert_eq!(len_bytes::<_, Persistent>(&host, root), value.len());
        let word = Persistent::get_word(&host, root);
        assert_eq!(word[31], (value.len() as u8) * 2);
    }

    #[test]
    fn empty_is_short() {
        let host = TestHost::new();
        let root = U256::from(9);
        set_bytes::<_, Persistent>(&host, root, b"");
        assert_eq!(get_bytes::<_, Persistent>(&host, root), Vec::<u8>::new());
        assert_eq!(Persistent::get_word(&host, root)[31], 0);
    }

    #[test]
    fn long_round_trip_exact_boundary() {
        let host = TestHost::new();
        let root = U256::from(7);
        let value = vec![0x42u8; SHORT_CAPACITY + 1];
        set_bytes::<_, Persistent>(&host, root, &value);
        let word = Persistent::get_word(&host, root);
        assert_eq!(word[31] & 1, 1);
        assert_eq!(get_bytes::<_, Persistent>(&host, root), value);
        assert_eq!(len_bytes::<_, Persistent>(&host, root), value.len());
    }

    #[test]
    fn long_round_trip_multi_word() {
        let host = TestHost::new();
        let root = U256::from(11);
        let value: Vec<u8> = (0u16..100).map(|i| (i % 256) as u8).collect();
        set_bytes::<_, Persistent>(&host, root, &value);
        assert_eq!(get_bytes::<_, Persistent>(&host, root), value);
    }

    #[test]
    fn long_payload_lives_at_hashed_pointer() {
        let host = TestHost::new();
        let root = U256::from(3);
        let value = vec![0xAAu8; 64];
        set_bytes::<_, Persistent>(&host, root, &value);
        let base = slot::data_pointer(&host, root);
        let first = Persistent::get_word(&host, base);
        assert_eq!(&first[..32], &value[..32]);
    }

    #[test]
    fn bytes_value_handle_round_trips() {
        let host = TestHost::new();
        let handle = BytesValue::<TestHost, Persistent>::new(U256::from(20));
        handle.set(&host, b"abc");
        assert_eq!(handle.get(&host), b"abc");
        assert!(!handle.is_empty(&host));
    }
}
