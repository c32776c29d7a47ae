// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! Dynamic arrays (spec Component H): a length word at the root slot, with
//! item slots derived the same way a [`Mapping`] derives its entries rather
//! than Solidity's contiguous `keccak256(slot) + index` layout.
//!
//! This departs from the teacher SDK's `storage::vec::StorageVec`, whose
//! item slots are densely packed right after `keccak256(slot)`. The spec
//! deliberately does not follow Solidity's dynamic array convention here:
//! the original source's `dynamicArray.value` is implemented in terms of
//! `storeValue.mapping().value(indexKey)` — an item's slot is whatever a
//! [`Mapping`] keyed by the big-endian-encoded index would use. We keep
//! `StorageVec`'s API shape (`length`, `push`, `pop`, indexed `value`) but
//! ground the address derivation in `datastore.go`, not in `vec.rs`.

use std::marker::PhantomData;

use alloy_primitives::U256;

use crate::datastore::Value;
use crate::host::{Host, WordStore};
use crate::map::Mapping;
use crate::slot;

/// A dynamic array rooted at `slot`: the root word holds the current
/// length, and each item lives at the slot a [`Mapping`] rooted at the same
/// `slot` would assign to the big-endian-encoded index (§4.8).
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct DynamicArray<H, S> {
    slot: U256,
    _host: PhantomData<H>,
    _store: PhantomData<S>,
}

impl<H: Host, S: WordStore<H>> DynamicArray<H, S> {
    pub(crate) fn new(slot: U256) -> Self {
        Self {
            slot,
            _host: PhantomData,
            _store: PhantomData,
        }
    }

    /// The slot this array's length word lives at.
    pub fn slot(&self) -> U256 {
        self.slot
    }

    fn length_value(&self) -> Value<H, S> {
        Value::new(self.slot)
    }

    fn backing_mapping(&self) -> Mapping<H, S> {
        Mapping::new(self.slot)
    }

    fn item_slot(&self, host: &H, index: u64) -> U256 {
        let key = slot::encode_index(index);
        self.backing_mapping().value(host, key.as_slice()).slot()
    }

    /// The number of elements currently in the array.
    pub fn length(&self, host: &H) -> u64 {
        self.length_value().get_u64(host)
    }

    fn set_length(&self, host: &H, len: u64) {
        self.length_value().set_u64(host, len)
    }

    /// The scalar [`Value`] at `index`, or `None` if `index` is out of
    /// range.
    pub fn value(&self, host: &H, index: u64) -> Option<Value<H, S>> {
        if index >= self.length(host) {
            return None;
        }
        Some(Value::new(self.item_slot(host, index)))
    }

    /// A nested [`DynamicArray`] at `index` (an array of arrays), or `None`
    /// if `index` is out of range.
    pub fn sub_array(&self, host: &H, index: u64) -> Option<DynamicArray<H, S>> {
        if index >= self.length(host) {
            return None;
        }
        Some(DynamicArray::new(self.item_slot(host, index)))
    }

    /// A [`Mapping`] rooted at `index` (an array of mappings), or `None` if
    /// `index` is out of range.
    pub fn sub_mapping(&self, host: &H, index: u64) -> Option<Mapping<H, S>> {
        if index >= self.length(host) {
            return None;
        }
        Some(Mapping::new(self.item_slot(host, index)))
    }

    /// Walks a chain of indices through successively nested dynamic arrays,
    /// returning the scalar [`Value`] at the end of the chain. Returns
    /// `None` if `indices` is empty or any index along the way is out of
    /// range.
    pub fn nested_value(&self, host: &H, indices: &[u64]) -> Option<Value<H, S>> {
        let (&last, prefix) = indices.split_last()?;
        let mut current = *self;
        for &index in prefix {
            current = current.sub_array(host, index)?;
        }
        current.value(host, last)
    }

    /// Appends a new, zero-valued slot and returns a handle to it,
    /// incrementing the length.
    pub fn push(&self, host: &H) -> Value<H, S> {
        let index = self.length(host);
        let item = Value::new(self.item_slot(host, index));
        self.set_length(host, index + 1);
        item
    }

    /// Removes and returns a handle to the last element, decrementing the
    /// length. The removed slot's contents are left untouched in storage —
    /// matching `datastore.go`'s `Pop`, which does not clear the old slot —
    /// so a subsequent `push` will read back whatever was last written
    /// there until the caller overwrites it.
    pub fn pop(&self, host: &H) -> Option<Value<H, S>> {
        let len = self.length(host);
        let index = len.checked_sub(1)?;
        let item = Value::new(self.item_slot(host, index));
        self.set_length(host, index);
        Some(item)
    }
}
