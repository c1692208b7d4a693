//! Adapter for Promises/A+-style conformance suites.
//!
//! A conformance harness needs exactly three factories: an already-fulfilled
//! future, an already-rejected future, and a pending future with its
//! resolving functions exposed.

use crate::future::Future;
use crate::reaction::Capability;
use crate::species::Species;
use core_types::Value;

/// Factories backed by one species.
#[derive(Debug, Clone)]
pub struct Adapter {
    species: Species,
}

impl Adapter {
    /// Creates an adapter producing futures of `species`.
    pub fn new(species: Species) -> Self {
        Self { species }
    }

    /// Returns the species futures are created with.
    pub fn species(&self) -> &Species {
        &self.species
    }

    /// A future fulfilled with `value` (thenables are unwrapped first).
    pub fn resolved(&self, value: Value) -> Future {
        self.species.resolve(value)
    }

    /// A future rejected with `reason`.
    pub fn rejected(&self, reason: Value) -> Future {
        self.species.reject(reason)
    }

    /// A pending future together with its resolve and reject functions.
    pub fn deferred(&self) -> Capability {
        self.species.capability()
    }
}
