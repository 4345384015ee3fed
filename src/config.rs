use std::{env, fs, num::NonZeroU64};

use serde::Deserialize;

use crate::error::{PiErr, Result};

/// Largest request accepted by default, the input range of the original calculator.
pub const DEFAULT_MAX_DIGITS: NonZeroU64 = match NonZeroU64::new(9_000_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Blocks between two `info!` progress lines of a background session.
pub const DEFAULT_LOG_EVERY: NonZeroU64 = match NonZeroU64::new(1_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Bounds and reporting knobs for a [`Calculator`](crate::session::Calculator).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalcConfig {
    pub max_digits: NonZeroU64,
    pub log_every: NonZeroU64,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            max_digits: DEFAULT_MAX_DIGITS,
            log_every: DEFAULT_LOG_EVERY,
        }
    }
}

impl CalcConfig {
    /// Creates a new calculator configuration.
    ///
    /// # Args
    /// * `max_digits` - Largest digit count a request may ask for.
    /// * `log_every` - Blocks between two progress log lines.
    ///
    /// # Returns
    /// A `CalcConfig` instance.
    pub fn new(max_digits: NonZeroU64, log_every: NonZeroU64) -> Self {
        Self {
            max_digits,
            log_every,
        }
    }

    /// Loads a `CalcConfig` from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `PiErr::Io` if the file cannot be read and `PiErr::Config` if it
    /// is not a valid configuration.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            PiErr::Config(msg) => PiErr::Config(format!("'{path}': {msg}")),
            other => other,
        })
    }

    /// Parses a `CalcConfig` from a JSON document. Zero bounds are rejected.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PiErr::Config(format!("invalid JSON: {e}")))
    }

    /// Applies `PI_MAX_DIGITS` and `PI_LOG_EVERY` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// # Args
    /// * `lookup` - Returns the raw value of a variable, if set.
    ///
    /// # Returns
    /// The updated configuration.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| -> Result<Option<NonZeroU64>> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<NonZeroU64>()
                        .map_err(|e| PiErr::Config(format!("{key}: cannot parse '{raw}': {e}")))
                })
                .transpose()
        };

        if let Some(max_digits) = parse("PI_MAX_DIGITS")? {
            self.max_digits = max_digits;
        }
        if let Some(log_every) = parse("PI_LOG_EVERY")? {
            self.log_every = log_every;
        }

        Ok(self)
    }

    /// Checks a requested digit count against `1..=max_digits`.
    pub fn check_digits(&self, digits: u64) -> Result<()> {
        if digits == 0 || digits > self.max_digits.get() {
            return Err(PiErr::DigitsOutOfRange {
                got: digits,
                max: self.max_digits.get(),
            });
        }
        Ok(())
    }
}
