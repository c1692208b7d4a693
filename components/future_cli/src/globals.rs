//! Global scope for the demonstration runtime.
//!
//! The default `Future` species is installed on request only, and only when
//! the scope does not already provide one.

use future_runtime::Species;
use tracing::{debug, info};

/// The bindings scenarios resolve their default species from.
#[derive(Debug, Default)]
pub struct GlobalScope {
    future: Option<Species>,
}

impl GlobalScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope that already provides a native species.
    pub fn with_native(species: Species) -> Self {
        Self {
            future: Some(species),
        }
    }

    /// Installs the species built by `factory` as the default `Future`, unless
    /// one is already present. Returns whichever species ends up installed.
    ///
    /// The factory is not called when a native species exists.
    pub fn install_future<F>(&mut self, factory: F) -> &Species
    where
        F: FnOnce() -> Species,
    {
        if let Some(native) = &self.future {
            debug!(species = native.name(), "keeping native Future");
        }
        self.future.get_or_insert_with(|| {
            let species = factory();
            info!(species = species.name(), "installed default Future");
            species
        })
    }

    /// Returns the installed default species, if any.
    pub fn future(&self) -> Option<&Species> {
        self.future.as_ref()
    }
}
