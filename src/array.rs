// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! The fixed-size, row-major Slot Array (spec Component E): a multi-
//! dimensional array of scalar [`Value`](crate::datastore::Value) slots laid
//! out contiguously from a base slot, matching Solidity's layout for a
//! fixed-size array.
//!
//! Grounded on the teacher SDK's `storage::array::StorageArray`, generalized
//! from a single compile-time length to an arbitrary, runtime-supplied
//! dimension list, since the spec's arrays may be multi-dimensional (§4.5).

use std::marker::PhantomData;

use alloy_primitives::U256;

use crate::datastore::Value;
use crate::host::{Host, WordStore};
use crate::slot;

/// A multi-dimensional, fixed-size array of scalar slots rooted at `base`,
/// laid out row-major: the last dimension varies fastest.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct SlotArray<H, S> {
    base: U256,
    dims: Vec<usize>,
    _host: PhantomData<H>,
    _store: PhantomData<S>,
}

impl<H: Host, S: WordStore<H>> SlotArray<H, S> {
    pub(crate) fn new(base: U256, dims: Vec<usize>) -> Self {
        debug_assert!(!dims.is_empty(), "a Slot Array must have at least one dimension");
        Self {
            base,
            dims,
            _host: PhantomData,
            _store: PhantomData,
        }
    }

    /// The slot the array's first element (or, for a `sub_array`, this
    /// sub-array's first element) occupies.
    pub fn base_slot(&self) -> U256 {
        self.base
    }

    /// This array's dimensions, outermost first.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// The total element count: the product of all dimensions.
    pub fn length(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the scalar [`Value`] at `indices`, a full index (one
    /// coordinate per dimension), or `None` if `indices` has the wrong arity
    /// or any coordinate is out of range.
    ///
    /// The original source's `valueArray.indexSlot` performs the same
    /// bounds check and returns a nil slot on failure; this returns `None`
    /// for the same reason rather than silently computing an address
    /// outside the array (see `SPEC_FULL.md` §10.6).
    pub fn value(&self, indices: &[usize]) -> Option<Value<H, S>> {
        if indices.len() != self.dims.len() {
            return None;
        }
        if !self.in_bounds(indices) {
            return None;
        }
        let addr = slot::row_major_offset(self.base, &self.dims, indices);
        Some(Value::new(addr))
    }

    /// Returns the sub-array obtained by fixing a strict prefix of this
    /// array's dimensions, or `None` if `indices` is empty, covers every
    /// dimension (leaving no sub-array), or any coordinate is out of range.
    pub fn sub_array(&self, indices: &[usize]) -> Option<SlotArray<H, S>> {
        if indices.is_empty() || indices.len() >= self.dims.len() {
            return None;
        }
        if !self.in_bounds(indices) {
            return None;
        }
        let addr = slot::row_major_offset(self.base, &self.dims, indices);
        let remaining = self.dims[indices.len()..].to_vec();
        Some(SlotArray::new(addr, remaining))
    }

    fn in_bounds(&self, indices: &[usize]) -> bool {
        indices.iter().zip(&self.dims).all(|(&i, &dim)| i < dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Persistent;
    use crate::testing::TestHost;

    fn array() -> SlotArray<TestHost, Persistent> {
        SlotArray::new(U256::from(1000), vec![2, 3])
    }

    #[test]
    fn length_is_product_of_dims() {
        assert_eq!(array().length(), 6);
    }

    #[test]
    fn value_addresses_row_major() {
        let a = array();
        let v00 = a.value(&[0, 0]).unwrap();
        let v01 = a.value(&[0, 1]).unwrap();
        let v10 = a.value(&[1, 0]).unwrap();
        assert_eq!(v00.slot(), U256::from(1000));
        assert_eq!(v01.slot(), U256::from(1001));
        assert_eq!(v10.slot(), U256::from(1003));
    }

    #[test]
    fn value_rejects_out_of_range() {
        let a = array();
        assert!(a.value(&[2, 0]).is_none());
        assert!(a.value(&[0, 3]).is_none());
    }

    #[test]
    fn value_rejects_wrong_arity() {
        let a = array();
        assert!(a.value(&[0]).is_none());
        assert!(a.value(&[0, 0, 0]).is_none());
    }

    #[test]
    fn sub_array_fixes_outer_dimension() {
        let a = array();
        let row1 = a.sub_array(&[1]).unwrap();
        assert_eq!(row1.dims(), &[3]);
        assert_eq!(row1.base_slot(), U256::from(1003));
        assert_eq!(row1.value(&[2]).unwrap().slot(), U256::from(1005));
    }

    #[test]
    fn sub_array_rejects_full_or_empty_index() {
        let a = array();
        assert!(a.sub_array(&[]).is_none());
        assert!(a.sub_array(&[0, 0]).is_none());
    }

    #[test]
    fn round_trips_through_host() {
        let host = TestHost::new();
        let a = array();
        let v = a.value(&[1, 2]).unwrap();
        v.set_big_uint(&host, U256::from(77));
        assert_eq!(a.value(&[1, 2]).unwrap().get_big_uint(&host), U256::from(77));
    }
}
