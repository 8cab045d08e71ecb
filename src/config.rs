// SPDX-License-Identifier: MIT

//! Compiler configuration
//!
//! Values come from defaults, then `MARKFLOW_*` environment variables (a
//! `.env` file is honoured by the binary), then command-line flags.

use crate::error::{MarkflowError, Result};
use crate::workflow::condition::{LineBreaker, EXPRESSION_BREAK_THRESHOLD, MAX_EXPRESSION_LINE_LENGTH};
use std::env;

pub const ENV_MAX_LINE_LENGTH: &str = "MARKFLOW_MAX_LINE_LENGTH";
pub const ENV_BREAK_THRESHOLD: &str = "MARKFLOW_BREAK_THRESHOLD";
pub const ENV_RUNS_ON: &str = "MARKFLOW_RUNS_ON";

pub const DEFAULT_RUNS_ON: &str = "ubuntu-latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Longest `if:` line the emitter aims for
    pub max_line_length: usize,
    /// Length after which `if:` lines break at the next operator
    pub break_threshold: usize,
    /// Runner label used when the frontmatter has no `runs-on`
    pub runs_on: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_line_length: MAX_EXPRESSION_LINE_LENGTH,
            break_threshold: EXPRESSION_BREAK_THRESHOLD,
            runs_on: DEFAULT_RUNS_ON.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Defaults overridden by `MARKFLOW_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_MAX_LINE_LENGTH) {
            config.max_line_length = parse_length(ENV_MAX_LINE_LENGTH, &value)?;
        }
        if let Some(value) = lookup(ENV_BREAK_THRESHOLD) {
            config.break_threshold = parse_length(ENV_BREAK_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(ENV_RUNS_ON) {
            config.runs_on = value;
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply optional command-line overrides
    pub fn with_overrides(
        mut self,
        max_line_length: Option<usize>,
        break_threshold: Option<usize>,
    ) -> Result<Self> {
        if let Some(max) = max_line_length {
            self.max_line_length = max;
        }
        if let Some(threshold) = break_threshold {
            self.break_threshold = threshold;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_line_length == 0 || self.break_threshold == 0 {
            return Err(MarkflowError::config("line lengths must be greater than zero"));
        }
        if self.break_threshold > self.max_line_length {
            return Err(MarkflowError::config(format!(
                "break threshold {} exceeds max line length {}",
                self.break_threshold, self.max_line_length
            )));
        }
        if self.runs_on.trim().is_empty() {
            return Err(MarkflowError::config("runner label must not be empty"));
        }
        Ok(())
    }

    pub fn line_breaker(&self) -> LineBreaker {
        LineBreaker::new(self.max_line_length, self.break_threshold)
    }
}

fn parse_length(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| MarkflowError::config(format!("{} must be a positive integer, got '{}'", key, value)))
}
