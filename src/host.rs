// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! Defines the capability a [`Datastore`](crate::Datastore) needs from its
//! host environment, and the two [`WordStore`] variants — persistent and
//! ephemeral — that bind a [`Datastore`](crate::Datastore) to one half of it.

use alloy_primitives::{B256, U256};

/// The tiny capability the core consumes from an EVM-like host.
///
/// Unlike the full `Host` trait a real VM integration would implement (gas
/// metering, block/tx/call accessors, …), the datastore core only ever
/// needs two keyed word stores and a hash function. Those concerns are the
/// host's, not ours — see the crate's Non-goals.
pub trait Host {
    /// Computes the keccak256 hash of an arbitrary byte string.
    fn native_keccak256(&self, input: &[u8]) -> B256;

    /// Loads a word from committed, persistent storage. Never-written slots
    /// read as the zero word.
    fn persistent_load(&self, key: U256) -> B256;

    /// Stores a word to committed, persistent storage.
    fn persistent_store(&self, key: U256, value: B256);

    /// Loads a word from ephemeral storage, discarded at the end of the
    /// host's call. Never-written slots read as the zero word.
    fn ephemeral_load(&self, key: U256) -> B256;

    /// Stores a word to ephemeral storage.
    fn ephemeral_store(&self, key: U256, value: B256);
}

/// Selects which half of the [`Host`] capability a [`Datastore`](crate::Datastore)
/// is bound to. Implemented by the zero-sized marker types [`Persistent`] and
/// [`Ephemeral`]; never implemented by users directly.
///
/// This plays the role `GlobalStorage` plays for `StorageCache`/`EagerStorage`
/// in the teacher SDK, minus the process-global cache: every [`Datastore`](crate::Datastore)
/// reads and writes through to the host on every operation, since caching is
/// explicitly the host's concern, not the core's.
pub trait WordStore<H: Host> {
    /// Reads the word at `key`.
    fn get_word(host: &H, key: U256) -> B256;

    /// Writes `value` to the word at `key`.
    fn set_word(host: &H, key: U256, value: B256);
}

/// Marker selecting the host's committed, persistent word store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Persistent;

impl<H: Host> WordStore<H> for Persistent {
    fn get_word(host: &H, key: U256) -> B256 {
        host.persistent_load(key)
    }

    fn set_word(host: &H, key: U256, value: B256) {
        host.persistent_store(key, value)
    }
}

/// Marker selecting the host's ephemeral, call-scoped word store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ephemeral;

impl<H: Host> WordStore<H> for Ephemeral {
    fn get_word(host: &H, key: U256) -> B256 {
        host.ephemeral_load(key)
    }

    fn set_word(host: &H, key: U256, value: B256) {
        host.ephemeral_store(key, value)
    }
}
