//! Demonstration scenarios.
//!
//! Each scenario sets up futures and timers against a [`Stage`] without
//! running anything; the runtime drives the event loop afterwards and
//! collects what the handlers printed.

use core_types::{Function, JsError, Value};
use future_runtime::{EventLoop, Future, Species, Task};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Name that runs every scenario on one event loop.
pub const DEMO: &str = "demo";

/// Collected output lines.
#[derive(Debug, Clone, Default)]
pub struct Console {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Console {
    /// Creates an empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line.
    pub fn log(&self, line: impl fmt::Display) {
        self.lines.borrow_mut().push(line.to_string());
    }

    /// Removes and returns every line logged so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }

    /// A handler logging `prefix` followed by its argument.
    pub fn printer(&self, prefix: &'static str) -> Function {
        let console = self.clone();
        Function::unary(move |value| {
            console.log(format_args!("{}{}", prefix, value));
            Ok(Value::Undefined)
        })
    }

    /// A handler logging `prefix` followed by its argument's `message`.
    pub fn message_printer(&self, prefix: &'static str) -> Function {
        let console = self.clone();
        Function::unary(move |error| {
            console.log(format_args!("{}{}", prefix, error.get("message")?));
            Ok(Value::Undefined)
        })
    }

    /// A handler for outcomes the scenario never expects.
    pub fn unexpected(&self) -> Function {
        self.printer("Should have been ignored: ")
    }
}

/// What a scenario builds on.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Species every future is created with
    pub species: Species,
    /// Loop that owns the timers
    pub event_loop: Rc<EventLoop>,
    /// Where handlers print
    pub console: Console,
}

impl Stage {
    /// A future settled by a timer after `delay_ms` virtual milliseconds.
    pub fn settle_after(&self, delay_ms: u64, outcome: Result<Value, Value>) -> Future {
        self.species.create(|resolve, reject| {
            self.event_loop.set_timeout(
                delay_ms,
                Task::new(move || {
                    match outcome {
                        Ok(value) => resolve.call(value),
                        Err(reason) => reject.call(reason),
                    }
                    Ok(())
                }),
            );
            Ok(())
        })
    }
}

/// A named demonstration.
pub struct Scenario {
    /// Name accepted by `--scenario`
    pub name: &'static str,
    /// One-line summary for `--list`
    pub description: &'static str,
    /// Registers the scenario's futures on a stage
    pub setup: fn(&Stage),
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .finish()
    }
}

/// Every scenario, in the order the demo registers them.
pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "chain",
        description: "value, nested future and thrown error flowing down a then chain",
        setup: chain,
    },
    Scenario {
        name: "resolve",
        description: "handler on an already-fulfilled future",
        setup: resolved,
    },
    Scenario {
        name: "reject",
        description: "handler on an already-rejected future",
        setup: rejected,
    },
    Scenario {
        name: "all",
        description: "all over a fulfilled future and a timer",
        setup: all,
    },
    Scenario {
        name: "race",
        description: "race between a timer and a fulfilled future",
        setup: race,
    },
    Scenario {
        name: "race-timers",
        description: "race between a slow rejection and a fast fulfillment",
        setup: race_timers,
    },
    Scenario {
        name: "finally-resolve",
        description: "finally on a fulfilled future",
        setup: finally_resolve,
    },
    Scenario {
        name: "finally-reject",
        description: "finally on a rejected future",
        setup: finally_reject,
    },
    Scenario {
        name: "all-settled",
        description: "allSettled over a slow rejection and a fast fulfillment",
        setup: all_settled,
    },
];

/// Looks a scenario up by name.
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

fn chain(stage: &Stage) {
    let Stage {
        species, console, ..
    } = stage.clone();
    let add_one = Function::unary(|value| match value {
        Value::Smi(n) => Ok(Value::Smi(n + 1)),
        other => Err(JsError::type_error(format!("cannot add to {}", other)).into()),
    });
    let print_then_nest = {
        let console = console.clone();
        Function::unary(move |value| {
            console.log(value);
            Ok(species
                .create(|resolve, _reject| {
                    resolve.call(Value::Smi(137));
                    Ok(())
                })
                .into())
        })
    };
    let print_then_throw = {
        let console = console.clone();
        Function::unary(move |value| {
            console.log(value);
            Err(JsError::error("").into())
        })
    };
    let recover = Function::unary(|_| Ok(Value::from("error handled")));

    stage
        .species
        .create(|resolve, _reject| {
            resolve.call(Value::Smi(41));
            Ok(())
        })
        .then(Some(add_one), None)
        .then(Some(print_then_nest), None)
        .then(Some(print_then_throw), None)
        .then(Some(console.unexpected()), Some(recover))
        .then(Some(console.printer("")), None);
}

fn resolved(stage: &Stage) {
    let console = &stage.console;
    stage
        .species
        .resolve(Value::Smi(42))
        .then(Some(console.printer("Value: ")), Some(console.unexpected()));
}

fn rejected(stage: &Stage) {
    let console = &stage.console;
    stage
        .species
        .reject(JsError::error("Failure").into())
        .then(
            Some(console.unexpected()),
            Some(console.message_printer("")),
        );
}

fn all(stage: &Stage) {
    let console = &stage.console;
    let inputs = Value::array(vec![
        stage.species.resolve(Value::Smi(42)).into(),
        stage.settle_after(100, Ok(Value::Smi(21))).into(),
    ]);
    stage
        .species
        .all(&inputs)
        .then(Some(console.printer("")), Some(console.unexpected()));
}

fn race(stage: &Stage) {
    let console = &stage.console;
    let inputs = Value::array(vec![
        stage.settle_after(100, Ok(Value::Smi(21))).into(),
        stage.species.resolve(Value::Smi(42)).into(),
    ]);
    stage
        .species
        .race(&inputs)
        .then(Some(console.printer("Race: ")), Some(console.unexpected()));
}

fn race_timers(stage: &Stage) {
    let console = &stage.console;
    let inputs = Value::array(vec![
        stage.settle_after(100, Err(Value::Smi(21))).into(),
        stage.settle_after(10, Ok(Value::Smi(15))).into(),
    ]);
    stage
        .species
        .race(&inputs)
        .then(Some(console.printer("Race: ")), Some(console.unexpected()));
}

fn finally_resolve(stage: &Stage) {
    let console = stage.console.clone();
    let on_settle = {
        let console = console.clone();
        Function::nullary(move || {
            console.log("In finally after resolve");
            Ok(Value::Undefined)
        })
    };
    stage
        .species
        .resolve(Value::Smi(42))
        .finally(Some(on_settle))
        .then(
            Some(console.printer("Resolve after finally: ")),
            Some(console.unexpected()),
        );
}

fn finally_reject(stage: &Stage) {
    let console = stage.console.clone();
    let on_settle = {
        let console = console.clone();
        Function::nullary(move || {
            console.log("In finally after reject");
            Ok(Value::Undefined)
        })
    };
    stage
        .species
        .reject(JsError::error("Failure").into())
        .finally(Some(on_settle))
        .then(
            Some(console.unexpected()),
            Some(console.message_printer("Reject after finally: ")),
        );
}

fn all_settled(stage: &Stage) {
    let console = &stage.console;
    let inputs = Value::array(vec![
        stage.settle_after(100, Err(Value::Smi(21))).into(),
        stage.settle_after(10, Ok(Value::Smi(15))).into(),
    ]);
    stage
        .species
        .all_settled(&inputs)
        .then(Some(console.printer("")), Some(console.unexpected()));
}
