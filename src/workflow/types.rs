// SPDX-License-Identifier: MIT

//! Frontmatter schema types for markdown workflows
//!
//! This module contains the data structures deserialized from the YAML block
//! at the top of a workflow file, plus the loaded workflow itself.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Trigger keys that declare a slash-command trigger
pub const COMMAND_TRIGGER_KEYS: [&str; 2] = ["command", "slash_command"];

/// YAML frontmatter of a workflow file
#[derive(Debug, Deserialize, Serialize, Clone, Default, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct Frontmatter {
    /// Workflow name; defaults to the file stem
    pub name: Option<String>,
    pub description: Option<String>,
    /// Trigger events: a single event name, a list of names, or a map
    #[serde(default)]
    #[schemars(with = "serde_json::Value")]
    pub on: serde_yaml::Value,
    /// Extra activation condition, AND-ed with any command condition
    #[serde(rename = "if")]
    pub if_condition: Option<String>,
    pub runs_on: Option<String>,
    pub timeout_minutes: Option<u32>,
    /// Passed through to the generated workflow as-is
    #[schemars(with = "Option<serde_json::Value>")]
    pub permissions: Option<serde_yaml::Value>,
    /// Keys this compiler does not handle; reported and ignored
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Slash-command trigger configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum CommandConfig {
    /// `command: bot`
    Name(String),
    /// `command: { name: [bot, helper], events: [issues] }`
    Detailed {
        name: OneOrMany,
        #[serde(default)]
        events: Option<OneOrMany>,
    },
}

impl CommandConfig {
    pub fn names(&self) -> Vec<String> {
        match self {
            CommandConfig::Name(name) => vec![name.clone()],
            CommandConfig::Detailed { name, .. } => name.to_vec(),
        }
    }

    pub fn events(&self) -> Option<&OneOrMany> {
        match self {
            CommandConfig::Name(_) => None,
            CommandConfig::Detailed { events, .. } => events.as_ref(),
        }
    }
}

/// A single string or a list of strings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    Single(String),
    Multiple(Vec<String>),
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::Single(s) => vec![s.clone()],
            OneOrMany::Multiple(v) => v.clone(),
        }
    }
}

/// A workflow file split into its parts
#[derive(Debug, Clone)]
pub struct MarkdownWorkflow {
    pub frontmatter: Frontmatter,
    /// Agent instructions following the frontmatter
    pub body: String,
    /// File the workflow was loaded from, if any
    pub source: Option<PathBuf>,
}

impl MarkdownWorkflow {
    /// Name from the frontmatter, else the source file stem, else `workflow`
    pub fn name(&self) -> String {
        if let Some(name) = &self.frontmatter.name {
            return name.clone();
        }
        self.source
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("workflow")
            .to_string()
    }
}
