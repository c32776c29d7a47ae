// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! The block-indexed precompile registry (spec Component J): a set of rules,
//! each a `(block_number, full_map)` pair, with the active rule at a given
//! block being whichever has the greatest `block_number` not exceeding it.
//!
//! Has no direct analogue in the original source — `precompile_registry.go`
//! is an ABI-dispatch table for a single precompile, a different layer this
//! crate's Non-goals explicitly exclude. Implemented directly from the spec
//! algorithm with a [`BTreeMap`], whose `range` gives the "greatest key not
//! exceeding" lookup for free, the idiomatic replacement for the linear scan
//! a hand-rolled version would otherwise need.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use fnv::FnvHashMap as HashMap;
use thiserror::Error;

/// An attempt to register a rule or entry that already exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a precompile rule already exists at block {0}")]
    DuplicateRule(u64),
    #[error("a precompile entry for {0} already exists at block {1}")]
    DuplicateEntry(String, u64),
}

/// A registry of precompiles keyed by address, versioned by the block at
/// which each version's full address-to-precompile map took effect.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = "Addr: Clone, P: Clone"), Debug(bound = "Addr: Debug, P: Debug"), Default(bound = ""))]
pub struct PrecompileRegistry<Addr, P> {
    rules: BTreeMap<u64, HashMap<Addr, P>>,
}

impl<Addr, P> PrecompileRegistry<Addr, P>
where
    Addr: Eq + Hash + Clone,
    P: Clone,
{
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Registers a full rule effective from `block_number`. Fails if a rule
    /// already exists at that exact block — rules do not merge.
    pub fn try_add_rule(&mut self, block_number: u64, entries: HashMap<Addr, P>) -> Result<(), RegistryError> {
        if self.rules.contains_key(&block_number) {
            return Err(RegistryError::DuplicateRule(block_number));
        }
        self.rules.insert(block_number, entries);
        log::debug!("registered precompile rule at block {block_number}");
        Ok(())
    }

    /// Registers a full rule effective from `block_number`, panicking if one
    /// already exists at that block. This is the spec's stated behavior
    /// (§4.10): a duplicate rule is a programmer error, not a recoverable
    /// runtime condition, so the infallible entry point panics rather than
    /// returning a `Result` callers are likely to ignore.
    pub fn add_rule(&mut self, block_number: u64, entries: HashMap<Addr, P>) {
        self.try_add_rule(block_number, entries)
            .unwrap_or_else(|err| panic!("{err}"));
    }

    /// Registers a single address within the rule at `block_number`. If no
    /// rule exists yet at that exact block, one is created first by cloning
    /// the full map currently active at `block_number` (§4.10: a
    /// single-address insert is a rule whose `full_map` is the *prior active
    /// map* with `address` added, not an empty one). Fails if that address
    /// already has an entry in the rule at that exact block.
    pub fn try_add_entry(&mut self, block_number: u64, address: Addr, precompile: P) -> Result<(), RegistryError>
    where
        Addr: Debug,
    {
        if !self.rules.contains_key(&block_number) {
            let seed = self.active_precompiles(block_number).cloned().unwrap_or_default();
            self.rules.insert(block_number, seed);
        }
        let rule = self.rules.get_mut(&block_number).expect("just inserted above if absent");
        if rule.contains_key(&address) {
            return Err(RegistryError::DuplicateEntry(format!("{address:?}"), block_number));
        }
        rule.insert(address, precompile);
        log::debug!("registered precompile entry at block {block_number}");
        Ok(())
    }

    /// Registers a single address within the rule at `block_number`,
    /// panicking if that address is already registered there.
    pub fn add_entry(&mut self, block_number: u64, address: Addr, precompile: P)
    where
        Addr: Debug,
    {
        self.try_add_entry(block_number, address, precompile)
            .unwrap_or_else(|err| panic!("{err}"));
    }

    /// The full address-to-precompile map active at `block_number`: the
    /// rule with the greatest `block_number` not exceeding the query, or
    /// `None` if no rule applies yet.
    pub fn active_precompiles(&self, block_number: u64) -> Option<&HashMap<Addr, P>> {
        self.rules.range(..=block_number).next_back().map(|(_, rule)| rule)
    }

    /// Looks up a single precompile at `address`, under the rule active at
    /// `block_number`.
    pub fn precompile(&self, address: &Addr, block_number: u64) -> Option<&P> {
        self.active_precompiles(block_number)?.get(address)
    }
}
