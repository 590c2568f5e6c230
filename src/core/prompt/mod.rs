//! Resolution of configuration values from the environment or the operator.
//!
//! A key set in the environment is taken as-is. Anything else is asked for on
//! the controlling terminal, never on stdin, so the tool still prompts when
//! its input is a pipe. Empty answers are refused and asked again, and so
//! are answers spanning several lines.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::encode;
use crate::core::types::{ConfigKey, ResolvedValues};
use crate::error::{PreconditionError, Result};

mod tty;

pub use tty::TtyPrompter;

/// Source of pre-supplied values.
pub trait EnvLookup {
    /// Value for `key`, or `None` if unset. Empty values count as unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Asks the operator for a single value.
pub trait Prompter {
    /// Read one line for `key`. May return an empty string; the resolver
    /// decides what to do with it.
    fn read_value(&mut self, key: &ConfigKey) -> Result<Zeroizing<String>>;
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn read_value(&mut self, key: &ConfigKey) -> Result<Zeroizing<String>> {
        (**self).read_value(key)
    }
}

/// Prompter for runs without a terminal. Always fails with the missing key.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTerminal;

impl Prompter for NoTerminal {
    fn read_value(&mut self, key: &ConfigKey) -> Result<Zeroizing<String>> {
        Err(PreconditionError::NoTerminal(key.name().to_string()).into())
    }
}

/// The terminal prompter if `/dev/tty` can be opened, [`NoTerminal`] otherwise.
pub fn controlling_terminal() -> Box<dyn Prompter> {
    match TtyPrompter::open() {
        Ok(tty) => Box::new(tty),
        Err(e) => {
            debug!(error = %e, "no controlling terminal");
            Box::new(NoTerminal)
        }
    }
}

/// Resolves keys from an environment lookup, falling back to a prompter.
pub struct Resolver<E, P> {
    env: E,
    prompter: P,
}

impl<E: EnvLookup, P: Prompter> Resolver<E, P> {
    pub fn new(env: E, prompter: P) -> Self {
        Self { env, prompter }
    }

    /// Value for `key`, prompting until a usable answer is given.
    ///
    /// One trailing line terminator is tolerated; any other line break makes
    /// a value unusable.
    ///
    /// # Errors
    ///
    /// `PreconditionError::MultilineValue` if the environment supplies a
    /// value spanning several lines. Prompter errors are passed through.
    pub fn resolve(&mut self, key: &ConfigKey) -> Result<Zeroizing<String>> {
        if let Some(value) = self.env.get(key.name()) {
            let value = Zeroizing::new(value);
            if encode::is_multiline(&value) {
                return Err(PreconditionError::MultilineValue(key.name().to_string()).into());
            }
            debug!(key = %key, "taken from environment");
            return Ok(value);
        }

        loop {
            let value = self.prompter.read_value(key)?;
            if value.is_empty() {
                debug!(key = %key, "empty answer, asking again");
            } else if encode::is_multiline(&value) {
                warn!(key = %key, "answer spans several lines, asking again");
            } else {
                info!(key = %key, "value entered");
                return Ok(value);
            }
        }
    }

    /// Resolve every key, in the order given.
    pub fn resolve_all(&mut self, keys: &[ConfigKey]) -> Result<ResolvedValues> {
        let mut values = ResolvedValues::new();
        for key in keys {
            let value = self.resolve(key)?;
            values.insert(*key, value.as_str());
        }
        Ok(values)
    }
}
