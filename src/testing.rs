// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! A mock [`Host`] for unit testing datastore-backed code, in the style of
//! `stylus-test`'s `TestVM`: a cheaply-cloneable handle around shared,
//! interior-mutable state, with independent persistent and ephemeral word
//! stores.

use alloy_primitives::{B256, U256};
use fnv::FnvHashMap as HashMap;
use rclite::Rc;
use std::cell::RefCell;

use crate::host::Host;

#[derive(Default)]
struct TestHostState {
    persistent: HashMap<U256, B256>,
    ephemeral: HashMap<U256, B256>,
}

/// An in-memory [`Host`] backed by two hash maps, one per word store.
/// Never-written slots read as [`B256::ZERO`], matching the real EVM's
/// SLOAD semantics and the invariant in §3 of the datastore spec.
#[derive(Clone, Default)]
pub struct TestHost {
    state: Rc<RefCell<TestHostState>>,
}

impl TestHost {
    /// Creates a fresh host with empty persistent and ephemeral storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directly reads a word from persistent storage, bypassing any
    /// datastore-level navigation. Useful for asserting on raw slot layout
    /// in tests.
    pub fn get_persistent(&self, key: U256) -> B256 {
        self.state
            .borrow()
            .persistent
            .get(&key)
            .copied()
            .unwrap_or_default()
    }

    /// Directly writes a word to persistent storage.
    pub fn set_persistent(&self, key: U256, value: B256) {
        self.state.borrow_mut().persistent.insert(key, value);
    }

    /// Directly reads a word from ephemeral storage.
    pub fn get_ephemeral(&self, key: U256) -> B256 {
        self.state
            .borrow()
            .ephemeral
            .get(&key)
            .copied()
            .unwrap_or_default()
    }
}

impl Host for TestHost {
    fn native_keccak256(&self, input: &[u8]) -> B256 {
        alloy_primitives::keccak256(input)
    }

    fn persistent_load(&self, key: U256) -> B256 {
        self.get_persistent(key)
    }

    fn persistent_store(&self, key: U256, value: B256) {
        self.set_persistent(key, value)
    }

    fn ephemeral_load(&self, key: U256) -> B256 {
        self.get_ephemeral(key)
    }

    fn ephemeral_store(&self, key: U256, value: B256) {
        self.state.borrow_mut().ephemeral.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_slots_read_zero() {
        let host = TestHost::new();
        assert_eq!(host.persistent_load(U256::from(42)), B256::ZERO);
        assert_eq!(host.ephemeral_load(U256::from(42)), B256::ZERO);
    }

    #[test]
    fn persistent_and_ephemeral_are_independent() {
        let host = TestHost::new();
        host.persistent_store(U256::from(1), B256::repeat_byte(0xaa));
        assert_eq!(host.ephemeral_load(U256::from(1)), B256::ZERO);
        host.ephemeral_store(U256::from(1), B256::repeat_byte(0xbb));
        assert_eq!(host.persistent_load(U256::from(1)), B256::repeat_byte(0xaa));
        assert_eq!(host.ephemeral_load(U256::from(1)), B256::repeat_byte(0xbb));
    }

    #[test]
    fn clones_share_state() {
        let host = TestHost::new();
        let clone = host.clone();
        clone.persistent_store(U256::from(7), B256::repeat_byte(0x11));
        assert_eq!(host.persistent_load(U256::from(7)), B256::repeat_byte(0x11));
    }
}
