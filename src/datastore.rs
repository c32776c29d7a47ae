// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! The datastore entry point (spec Component A) and the scalar [`Value`]
//! handle (spec Component C).
//!
//! [`Datastore`] binds a [`Host`] and hands out handles — [`Value`],
//! [`Mapping`](crate::map::Mapping), [`SlotArray`](crate::array::SlotArray),
//! [`BytesArray`](crate::packed::BytesArray), [`DynamicArray`](crate::vec::DynamicArray),
//! [`Record`](crate::record::Record) — whose slot addresses are computed
//! from a root key and never stored beyond the handle itself. Handles are
//! cheap, `Copy`-able values, the same role `StorageGuard`/the concrete
//! `Storage*` accessor types play in the teacher SDK, minus any lifetime
//! borrow on the host — callers pass `&H` to each accessor method instead,
//! since a [`Datastore`] may be cloned and handed to independent components.

use std::marker::PhantomData;

use alloy_primitives::{Address, FixedBytes, B256, I256, U256};
use rclite::Rc;

use crate::array::SlotArray;
use crate::bytes;
use crate::host::{Ephemeral, Host, Persistent, WordStore};
use crate::map::Mapping;
use crate::packed::BytesArray;
use crate::record::Record;
use crate::scalar;
use crate::slot;
use crate::vec::DynamicArray;

/// A typed, hierarchical key/value datastore bound to a host `H`, backed by
/// the word store selected by `S` (see [`Persistent`]/[`Ephemeral`]).
///
/// Cloning a `Datastore` is cheap: it shares the same host handle via an
/// [`Rc`], the way `TestVM`/`StylusVM` share their inner state in the
/// teacher SDK's test harness.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""))]
pub struct Datastore<H, S = Persistent> {
    host: Rc<H>,
    _store: PhantomData<S>,
}

/// A [`Datastore`] bound to the host's committed, persistent word store.
pub type PersistentDatastore<H> = Datastore<H, Persistent>;

/// A [`Datastore`] bound to the host's ephemeral, call-scoped word store.
pub type EphemeralDatastore<H> = Datastore<H, Ephemeral>;

impl<H: Host, S: WordStore<H>> Datastore<H, S> {
    /// Wraps a host in a new datastore.
    pub fn new(host: H) -> Self {
        Self::from_rc(Rc::new(host))
    }

    /// Builds a datastore sharing an already-shared host handle.
    pub fn from_rc(host: Rc<H>) -> Self {
        Self {
            host,
            _store: PhantomData,
        }
    }

    /// Borrows the underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Derives the root slot for `key`: `keyToHash` from §4.2.
    fn root_slot(&self, key: &[u8]) -> U256 {
        slot::key_to_hash(&*self.host, key)
    }

    /// A scalar [`Value`] rooted at `key`.
    pub fn value(&self, key: &[u8]) -> Value<H, S> {
        Value::new(self.root_slot(key))
    }

    /// A [`Mapping`] rooted at `key`.
    pub fn mapping(&self, key: &[u8]) -> Mapping<H, S> {
        Mapping::new(self.root_slot(key))
    }

    /// A fixed-size, row-major [`SlotArray`] rooted at `key` with the given
    /// dimensions.
    pub fn array(&self, key: &[u8], dims: Vec<usize>) -> SlotArray<H, S> {
        SlotArray::new(self.root_slot(key), dims)
    }

    /// A packed, fixed-item-size [`BytesArray`] rooted at `key` (§4.6).
    pub fn bytes_array(&self, key: &[u8], dims: Vec<usize>, item_size: usize) -> BytesArray<H, S> {
        BytesArray::new(self.root_slot(key), dims, item_size)
    }

    /// A [`DynamicArray`] rooted at `key`.
    pub fn dynamic_array(&self, key: &[u8]) -> DynamicArray<H, S> {
        DynamicArray::new(self.root_slot(key))
    }

    /// A packed [`Record`] rooted at `key`, with one entry per field giving
    /// that field's byte width (§4.9).
    pub fn record(&self, key: &[u8], field_sizes: Vec<usize>) -> Record<H, S> {
        Record::new(self.root_slot(key), field_sizes)
    }
}

/// A single scalar storage slot (spec Component C): a 32-byte word with
/// typed accessors for every scalar type the spec supports, plus the
/// variable-length bytes codec rooted at the same slot.
///
/// Like the teacher SDK's concrete `Storage*` types, a `Value` carries no
/// data of its own beyond its slot address — every accessor takes `&H` and
/// reads or writes through to the host immediately.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
pub struct Value<H, S> {
    slot: U256,
    _host: PhantomData<H>,
    _store: PhantomData<S>,
}

impl<H: Host, S: WordStore<H>> Value<H, S> {
    pub(crate) fn new(slot: U256) -> Self {
        Self {
            slot,
            _host: PhantomData,
            _store: PhantomData,
        }
    }

    /// The slot this value occupies.
    pub fn slot(&self) -> U256 {
        self.slot
    }

    /// Reads the raw 32-byte word, uninterpreted.
    pub fn get_bytes32(&self, host: &H) -> B256 {
        S::get_word(host, self.slot)
    }

    /// Writes the raw 32-byte word, uninterpreted.
    pub fn set_bytes32(&self, host: &H, value: B256) {
        S::set_word(host, self.slot, value)
    }

    pub fn get_bool(&self, host: &H) -> bool {
        scalar::decode_bool(self.get_bytes32(host))
    }

    pub fn set_bool(&self, host: &H, value: bool) {
        self.set_bytes32(host, scalar::encode_bool(value))
    }

    pub fn get_address(&self, host: &H) -> Address {
        scalar::decode_address(self.get_bytes32(host))
    }

    pub fn set_address(&self, host: &H, value: Address) {
        self.set_bytes32(host, scalar::encode_address(value))
    }

    pub fn get_big_uint(&self, host: &H) -> U256 {
        scalar::decode_big_uint(self.get_bytes32(host))
    }

    pub fn set_big_uint(&self, host: &H, value: U256) {
        self.set_bytes32(host, scalar::encode_big_uint(value))
    }

    pub fn get_big_int(&self, host: &H) -> I256 {
        scalar::decode_big_int(self.get_bytes32(host))
    }

    pub fn set_big_int(&self, host: &H, value: I256) {
        self.set_bytes32(host, scalar::encode_big_int(value))
    }

    pub fn get_u64(&self, host: &H) -> u64 {
        scalar::decode_u64(self.get_bytes32(host))
    }

    pub fn set_u64(&self, host: &H, value: u64) {
        self.set_bytes32(host, scalar::encode_u64(value))
    }

    pub fn get_i64(&self, host: &H) -> i64 {
        scalar::decode_i64(self.get_bytes32(host))
    }

    pub fn set_i64(&self, host: &H, value: i64) {
        self.set_bytes32(host, scalar::encode_i64(value))
    }

    /// Reads a left-aligned, pad-right fixed-size byte string of width `N`.
    pub fn get_fixed_bytes<const N: usize>(&self, host: &H) -> FixedBytes<N> {
        scalar::decode_fixed_bytes::<N>(self.get_bytes32(host))
    }

    /// Writes a left-aligned, pad-right fixed-size byte string of width `N`.
    pub fn set_fixed_bytes<const N: usize>(&self, host: &H, value: FixedBytes<N>) {
        self.set_bytes32(host, scalar::encode_fixed_bytes::<N>(value))
    }

    /// Reads the variable-length byte string rooted at this value's slot
    /// (§4.4's short/long layout).
    pub fn get_bytes(&self, host: &H) -> Vec<u8> {
        bytes::get_bytes::<H, S>(host, self.slot)
    }

    /// Writes a variable-length byte string rooted at this value's slot.
    pub fn set_bytes(&self, host: &H, value: &[u8]) {
        bytes::set_bytes::<H, S>(host, self.slot, value)
    }
}
