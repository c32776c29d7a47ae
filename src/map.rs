// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! Arbitrarily-nested, hash-keyed mappings (spec Component G).
//!
//! Grounded on the teacher SDK's `storage::map::StorageMap`/`StorageKey`, but
//! generalized from a fixed key type to arbitrary byte-string keys — the
//! spec's mappings nest to arbitrary depth with heterogeneous key shapes, so
//! there is no single `StorageKey` type to dispatch on; every key is first
//! run through [`slot::key_to_hash`] exactly as a root datastore key is.

use std::marker::PhantomData;

use alloy_primitives::U256;

use crate::datastore::Value;
use crate::host::{Host, WordStore};
use crate::slot;

/// A hash-keyed mapping rooted at `slot`: `value(k)` lives at
/// `H(keyToHash(k), slot)` (§4.7), and nests to arbitrary depth via
/// `sub_mapping`/`nested_value`.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Mapping<H, S> {
    slot: U256,
    _host: PhantomData<H>,
    _store: PhantomData<S>,
}

impl<H: Host, S: WordStore<H>> Mapping<H, S> {
    pub(crate) fn new(slot: U256) -> Self {
        Self {
            slot,
            _host: PhantomData,
            _store: PhantomData,
        }
    }

    /// This mapping's own base slot.
    pub fn slot(&self) -> U256 {
        self.slot
    }

    fn key_slot(&self, host: &H, key: &[u8]) -> U256 {
        let hashed_key = slot::key_to_hash(host, key);
        slot::hash2(host, hashed_key, self.slot)
    }

    /// The scalar [`Value`] stored at `key`.
    pub fn value(&self, host: &H, key: &[u8]) -> Value<H, S> {
        Value::new(self.key_slot(host, key))
    }

    /// A mapping nested one level deeper at `key`, rooted at the same slot
    /// `value(key)` would use.
    pub fn sub_mapping(&self, host: &H, key: &[u8]) -> Mapping<H, S> {
        Mapping::new(self.key_slot(host, key))
    }

    /// Walks a chain of keys through successively nested mappings, returning
    /// the scalar [`Value`] at the end of the chain, or `None` if `keys` is
    /// empty.
    pub fn nested_value(&self, host: &H, keys: &[&[u8]]) -> Option<Value<H, S>> {
        let (last, prefix) = keys.split_last()?;
        let mut current = *self;
        for key in prefix {
            current = current.sub_mapping(host, key);
        }
        Some(current.value(host, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Persistent;
    use crate::testing::TestHost;

    fn mapping() -> Mapping<TestHost, Persistent> {
        Mapping::new(U256::from(42))
    }

    #[test]
    fn distinct_keys_map_to_distinct_slots() {
        let host = TestHost::new();
        let m = mapping();
        assert_ne!(
            m.value(&host, b"alice").slot(),
            m.value(&host, b"bob").slot()
        );
    }

    #[test]
    fn value_round_trips() {
        let host = TestHost::new();
        let m = mapping();
        let v = m.value(&host, b"alice");
        v.set_big_uint(&host, U256::from(100));
        assert_eq!(m.value(&host, b"alice").get_big_uint(&host), U256::from(100));
    }

    #[test]
    fn nested_mapping_matches_manual_chain() {
        let host = TestHost::new();
        let m = mapping();
        let via_nested = m.nested_value(&host, &[b"alice", b"bob"]).unwrap();
        let via_manual = m.sub_mapping(&host, b"alice").value(&host, b"bob");
        assert_eq!(via_nested.slot(), via_manual.slot());
    }

    #[test]
    fn nested_value_rejects_empty_key_chain() {
        let host = TestHost::new();
        let m = mapping();
        assert!(m.nested_value(&host, &[]).is_none());
    }

    #[test]
    fn sub_mapping_is_independent_of_parent_slot() {
        let host = TestHost::new();
        let m = mapping();
        let sub = m.sub_mapping(&host, b"alice");
        assert_ne!(sub.slot(), m.slot());
    }
}
