// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! Packed, fixed-item-size byte arrays (spec Component F): a row-major array
//! whose items are raw byte strings of a fixed width, densely packed several
//! to a slot when they are small, or spanning several slots when they are
//! large — §4.6.
//!
//! Grounded on `datastore.go`'s `bytesArray`, generalizing `SlotArray`'s
//! row-major indexing to items that are not whole 32-byte words: several
//! small items share a slot (`itemsPerSlot`), or one large item spans
//! several slots (`slotsPerItem`), matching the original's split on whether
//! `item_size` is at most 32 bytes.

use std::marker::PhantomData;

use alloy_primitives::U256;

use crate::host::{Host, WordStore};

/// A packed array of `item_size`-byte items, laid out row-major over `dims`.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct BytesArray<H, S> {
    base: U256,
    dims: Vec<usize>,
    item_size: usize,
    _host: PhantomData<H>,
    _store: PhantomData<S>,
}

impl<H: Host, S: WordStore<H>> BytesArray<H, S> {
    pub(crate) fn new(base: U256, dims: Vec<usize>, item_size: usize) -> Self {
        debug_assert!(!dims.is_empty(), "a Bytes Array must have at least one dimension");
        debug_assert!(item_size > 0, "an item must occupy at least one byte");
        Self {
            base,
            dims,
            item_size,
            _host: PhantomData,
            _store: PhantomData,
        }
    }

    /// This array's dimensions, outermost first.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// The byte width of a single item.
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// The total element count: the product of all dimensions.
    pub fn length(&self) -> usize {
        self.dims.iter().product()
    }

    fn flat_index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.dims.len() {
            return None;
        }
        if !indices.iter().zip(&self.dims).all(|(&i, &dim)| i < dim) {
            return None;
        }
        let mut flat = 0usize;
        for (j, &i) in indices.iter().enumerate() {
            let stride: usize = self.dims[j + 1..].iter().product();
            flat += i * stride;
        }
        Some(flat)
    }

    /// Reads the item at `indices`, or `None` if `indices` is out of range.
    pub fn get(&self, host: &H, indices: &[usize]) -> Option<Vec<u8>> {
        let flat = self.flat_index(indices)?;
        Some(self.read_item(host, flat))
    }

    /// Writes the item at `indices`. `value` must be exactly `item_size`
    /// bytes. Returns `None` if `indices` is out of range.
    pub fn set(&self, host: &H, indices: &[usize], value: &[u8]) -> Option<()> {
        let flat = self.flat_index(indices)?;
        debug_assert_eq!(value.len(), self.item_size, "item value must match the array's item_size");
        self.write_item(host, flat, value);
        Some(())
    }

    fn read_item(&self, host: &H, flat_index: usize) -> Vec<u8> {
        if self.item_size <= 32 {
            let items_per_slot = 32 / self.item_size;
            let slot_index = flat_index / items_per_slot;
            let offset = (flat_index % items_per_slot) * self.item_size;
            let word = S::get_word(host, self.base.wrapping_add(U256::from(slot_index)));
            word[offset..offset + self.item_size].to_vec()
        } else {
            let slots_per_item = self.item_size.div_ceil(32);
            let slot_index = flat_index * slots_per_item;
            let mut out = Vec::with_capacity(self.item_size);
            let mut remaining = self.item_size;
            for s in 0..slots_per_item {
                let word = S::get_word(host, self.base.wrapping_add(U256::from(slot_index + s)));
                let take = remaining.min(32);
                out.extend_from_slice(&word[..take]);
                remaining -= take;
            }
            out
        }
    }

    fn write_item(&self, host: &H, flat_index: usize, value: &[u8]) {
        if self.item_size <= 32 {
            let items_per_slot = 32 / self.item_size;
            let slot_index = flat_index / items_per_slot;
            let offset = (flat_index % items_per_slot) * self.item_size;
            let addr = self.base.wrapping_add(U256::from(slot_index));
            let mut word = S::get_word(host, addr).0;
            word[offset..offset + self.item_size].copy_from_slice(&value[..self.item_size]);
            S::set_word(host, addr, word.into());
        } else {
            let slots_per_item = self.item_size.div_ceil(32);
            let slot_index = flat_index * slots_per_item;
            let mut remaining = self.item_size;
            let mut written = 0usize;
            for s in 0..slots_per_item {
                let take = remaining.min(32);
                let mut word = [0u8; 32];
                word[..take].copy_from_slice(&value[written..written + take]);
                S::set_word(host, self.base.wrapping_add(U256::from(slot_index + s)), word.into());
                written += take;
                remaining -= take;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Persistent;
    use crate::testing::TestHost;

    #[test]
    fn small_items_share_a_slot() {
        let host = TestHost::new();
        let a = BytesArray::<TestHost, Persistent>::new(U256::from(200), vec![8], 4);
        a.set(&host, &[0], b"aaaa").unwrap();
        a.set(&host, &[1], b"bbbb").unwrap();
        assert_eq!(a.get(&host, &[0]).unwrap(), b"aaaa");
        assert_eq!(a.get(&host, &[1]).unwrap(), b"bbbb");
        // both items fit in the one base slot
        let word = Persistent::get_word(&host, U256::from(200));
        assert_eq!(&word[0..4], b"aaaa");
        assert_eq!(&word[4..8], b"bbbb");
    }

    #[test]
    fn large_items_span_slots() {
        let host = TestHost::new();
        let a = BytesArray::<TestHost, Persistent>::new(U256::from(300), vec![2], 40);
        let item0 = vec![0x11u8; 40];
        let item1 = vec![0x22u8; 40];
        a.set(&host, &[0], &item0).unwrap();
        a.set(&host, &[1], &item1).unwrap();
        assert_eq!(a.get(&host, &[0]).unwrap(), item0);
        assert_eq!(a.get(&host, &[1]).unwrap(), item1);
        // item0 occupies slots 300,301; item1 occupies slots 302,303
        assert_eq!(Persistent::get_word(&host, U256::from(300))[..8], [0x11u8; 8]);
        assert_eq!(Persistent::get_word(&host, U256::from(302))[..8], [0x22u8; 8]);
    }

    #[test]
    fn out_of_range_returns_none() {
        let host = TestHost::new();
        let a = BytesArray::<TestHost, Persistent>::new(U256::from(1), vec![2], 4);
        assert!(a.get(&host, &[2]).is_none());
        assert!(a.set(&host, &[2], b"aaaa").is_none());
    }

    #[test]
    fn length_is_product_of_dims() {
        let a = BytesArray::<TestHost, Persistent>::new(U256::from(1), vec![2, 3], 4);
        assert_eq!(a.length(), 6);
    }
}
