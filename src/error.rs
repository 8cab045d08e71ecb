// SPDX-License-Identifier: MIT

//! Typed error handling for markflow
//!
//! Expression and synthesis errors are kept separate so the condition core can
//! be used without pulling in file or YAML concerns; everything converges on
//! [`MarkflowError`] at the workflow level.

use thiserror::Error;

/// Convenience alias used throughout the workflow layer
pub type Result<T> = std::result::Result<T, MarkflowError>;

/// Top-level error type for markflow
#[derive(Debug, Error)]
pub enum MarkflowError {
    /// Condition expression could not be tokenized or parsed
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Command trigger condition could not be synthesized
    #[error("Command trigger error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Workflow-specific errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Configuration errors (invalid env vars, inconsistent limits)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Errors raised by the expression tokenizer and parser.
///
/// Every positional variant carries the byte offset of the offending token in
/// the original input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// Input was blank
    #[error("empty expression")]
    Empty,

    /// A literal run trimmed down to nothing
    #[error("empty literal at position {position}")]
    EmptyLiteral { position: usize },

    /// A token appeared where it cannot be accepted
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    /// An opening parenthesis was never closed
    #[error("expected ')' at position {position}, found '{found}'")]
    ExpectedRightParen { found: String, position: usize },
}

/// Errors raised while synthesizing command trigger conditions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("no command names provided")]
    NoCommandNames,

    #[error("no valid comment events specified")]
    NoValidEvents,

    #[error("command name '{0}' contains a backslash")]
    InvalidCommandName(String),
}

/// Workflow-specific errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Markdown file does not start with a `---` block
    #[error("Missing frontmatter: workflow must start with a '---' line")]
    MissingFrontmatter,

    /// Opening `---` was never closed
    #[error("Unterminated frontmatter: no closing '---' line")]
    UnterminatedFrontmatter,

    /// No trigger events configured
    #[error("Missing 'on' section: at least one trigger is required")]
    MissingTriggers,

    /// `on:` has a shape we cannot interpret
    #[error("Invalid 'on' section: {0}")]
    InvalidTriggers(String),

    /// A command trigger with a blank name
    #[error("Command name must not be empty")]
    EmptyCommandName,

    /// Prompt body references expressions outside the allow-list
    #[error("Unauthorized expressions: {}", .0.join(", "))]
    UnauthorizedExpressions(Vec<String>),
}

impl MarkflowError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
