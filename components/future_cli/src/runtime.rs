//! Runtime orchestration for the demonstration scenarios
//!
//! The Runtime struct owns the event loop, installs the default `Future`
//! species into its global scope, and replays scenarios against it.

use crate::error::{CliError, CliResult};
use crate::globals::GlobalScope;
use crate::scenarios::{self, Console, Scenario, Stage};
use future_runtime::{EventLoop, JobQueue, Species};
use std::rc::Rc;
use tracing::debug;

/// Main runtime that replays scenarios on one event loop
#[derive(Debug)]
pub struct Runtime {
    /// Event loop driving timers and job queue flushes
    event_loop: Rc<EventLoop>,
    /// Global bindings, holding the default species
    globals: GlobalScope,
    /// The species resolved from `globals` at startup
    species: Species,
}

impl Runtime {
    /// Create a new runtime with the default `Future` species installed
    ///
    /// # Example
    /// ```
    /// use future_cli::Runtime;
    ///
    /// let runtime = Runtime::new();
    /// assert_eq!(runtime.species().name(), "Future");
    /// ```
    pub fn new() -> Self {
        let event_loop = Rc::new(EventLoop::new());
        let mut globals = GlobalScope::new();
        let host = Rc::clone(&event_loop);
        let species = globals
            .install_future(move || Species::new("Future", JobQueue::new(host)))
            .clone();
        Self {
            event_loop,
            globals,
            species,
        }
    }

    /// Returns the default species scenarios create futures with
    pub fn species(&self) -> &Species {
        &self.species
    }

    /// Returns the global scope
    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    /// Returns the event loop
    pub fn event_loop(&self) -> &Rc<EventLoop> {
        &self.event_loop
    }

    /// Replay a scenario and return the lines it printed
    ///
    /// Scenarios are set up synchronously, then a `Results:` line is printed
    /// before the event loop runs until no task or timer remains. The name
    /// [`scenarios::DEMO`] replays every scenario together.
    ///
    /// # Errors
    /// Returns `CliError::UnknownScenario` for an unknown name, or
    /// `CliError::Runtime` if a host task fails.
    pub fn run_scenario(&self, name: &str) -> CliResult<Vec<String>> {
        let selected: Vec<&Scenario> = if name == scenarios::DEMO {
            scenarios::SCENARIOS.iter().collect()
        } else {
            let scenario =
                scenarios::find(name).ok_or_else(|| CliError::UnknownScenario(name.to_string()))?;
            vec![scenario]
        };

        let stage = Stage {
            species: self.species.clone(),
            event_loop: Rc::clone(&self.event_loop),
            console: Console::new(),
        };
        for scenario in selected {
            debug!(scenario = scenario.name, "setting up scenario");
            (scenario.setup)(&stage);
        }
        stage.console.log("Results:");

        self.event_loop.run_until_done()?;
        debug!(now = self.event_loop.now(), "event loop drained");
        Ok(stage.console.take())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
