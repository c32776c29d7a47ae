// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! A typed, hierarchical key/value datastore layered over a flat 32-byte-word
//! store of the kind exposed by an EVM-like host environment.
//!
//! [`Datastore`] binds a [`host::Host`] capability and hands out navigable
//! handles — [`Value`], [`Mapping`], [`DynamicArray`] — whose slot addresses
//! are pure functions of a root key and a navigation path. See the module
//! docs on [`slot`] for the address algebra and [`bytes`] for the
//! variable-length encoding shared by scalars, arrays, and record fields.

pub use alloy_primitives;

pub mod array;
pub mod bytes;
pub mod datastore;
pub mod host;
pub mod map;
pub mod packed;
pub mod record;
pub mod registry;
pub mod scalar;
pub mod slot;
pub mod vec;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use array::SlotArray;
pub use datastore::{Datastore, EphemeralDatastore, PersistentDatastore, Value};
pub use host::{Ephemeral, Host, Persistent, WordStore};
pub use map::Mapping;
pub use packed::BytesArray;
pub use record::Record;
pub use registry::{PrecompileRegistry, RegistryError};
pub use vec::DynamicArray;
