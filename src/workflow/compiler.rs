// SPDX-License-Identifier: MIT

//! Workflow compiler - turns a markdown workflow into a lock file
//!
//! Trigger configuration is resolved into the `on:` section and the
//! activation condition; the agent instructions are validated and carried
//! through as the prompt.

use super::command::{
    all_comment_events, build_event_aware_command_condition, filter_comment_events,
    merge_events_for_yaml, parse_command_events,
};
use super::condition::{builder::build_and, parse, strip_expression_wrapper, ConditionNode};
use super::emitter::emit_lock_file;
use super::loader::WorkflowLoader;
use super::safety::validate_expression_safety;
use super::types::{CommandConfig, MarkdownWorkflow, COMMAND_TRIGGER_KEYS};
use crate::config::CompilerConfig;
use crate::error::{Result, WorkflowError};

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Everything the emitter needs to write a lock file
#[derive(Debug, Clone)]
pub struct CompiledWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub source: Option<PathBuf>,
    /// Final `on:` section
    pub on: Mapping,
    /// Gate for the activation job, if any
    pub condition: Option<ConditionNode>,
    pub runs_on: String,
    pub timeout_minutes: Option<u32>,
    pub permissions: Option<Value>,
    pub prompt: String,
}

/// Slash-command trigger after defaults are applied
#[derive(Debug, Clone, PartialEq)]
struct CommandTrigger {
    names: Vec<String>,
    events: Vec<String>,
}

/// Triggers split into the command trigger and everything else
#[derive(Debug, Default)]
struct Triggers {
    command: Option<CommandTrigger>,
    others: Mapping,
}

/// Compiles markdown workflows with a fixed configuration
pub struct Compiler {
    config: CompilerConfig,
    loader: WorkflowLoader,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            loader: WorkflowLoader::new(),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Load, compile and emit a workflow file, returning the lock file text
    pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let workflow = self.loader.load_workflow(path)?;
        let compiled = self.compile(&workflow)?;
        emit_lock_file(&compiled, &self.config)
    }

    /// Resolve triggers, conditions and prompt for a loaded workflow
    pub fn compile(&self, workflow: &MarkdownWorkflow) -> Result<CompiledWorkflow> {
        let frontmatter = &workflow.frontmatter;
        let name = workflow.name();
        log::info!("Compiling workflow: {}", name);

        for key in frontmatter.extra.keys() {
            log::warn!("Ignoring unsupported frontmatter key: {}", key);
        }

        let triggers = split_triggers(&frontmatter.on, workflow)?;
        let mut on = Mapping::new();
        let mut condition = None;

        if let Some(command) = &triggers.command {
            let mappings = filter_comment_events(all_comment_events(), &command.events);
            for event in merge_events_for_yaml(&mappings) {
                let mut entry = Mapping::new();
                entry.insert(
                    Value::from("types"),
                    Value::Sequence(event.types.into_iter().map(Value::from).collect()),
                );
                on.insert(Value::from(event.name), Value::Mapping(entry));
            }

            condition = Some(build_event_aware_command_condition(
                &command.names,
                &command.events,
                !triggers.others.is_empty(),
            )?);
        }

        for (key, value) in triggers.others {
            if on.contains_key(&key) {
                let event = key.as_str().unwrap_or_default().to_string();
                return Err(WorkflowError::InvalidTriggers(format!(
                    "event '{}' is already used by the command trigger",
                    event
                ))
                .into());
            }
            on.insert(key, value);
        }

        if let Some(custom) = &frontmatter.if_condition {
            let custom = parse(strip_expression_wrapper(custom))?;
            condition = Some(match condition {
                Some(command) => build_and(command, custom),
                None => custom,
            });
        }

        validate_expression_safety(&workflow.body)?;

        Ok(CompiledWorkflow {
            name,
            description: frontmatter.description.clone(),
            source: workflow.source.clone(),
            on,
            condition,
            runs_on: frontmatter
                .runs_on
                .clone()
                .unwrap_or_else(|| self.config.runs_on.clone()),
            timeout_minutes: frontmatter.timeout_minutes,
            permissions: frontmatter.permissions.clone(),
            prompt: workflow.body.clone(),
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

/// `workflow.md` -> `workflow.lock.yml`, next to the source
pub fn lock_file_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workflow");
    source.with_file_name(format!("{}.lock.yml", stem))
}

fn split_triggers(on: &Value, workflow: &MarkdownWorkflow) -> Result<Triggers> {
    let mut triggers = Triggers::default();

    match on {
        Value::Null => return Err(WorkflowError::MissingTriggers.into()),
        Value::String(event) => add_trigger(&mut triggers, event, &Value::Null, workflow)?,
        Value::Sequence(events) => {
            for event in events {
                let Some(event) = event.as_str() else {
                    return Err(invalid_triggers("event names must be strings"));
                };
                add_trigger(&mut triggers, event, &Value::Null, workflow)?;
            }
        }
        Value::Mapping(entries) => {
            for (key, value) in entries {
                let Some(event) = key.as_str() else {
                    return Err(invalid_triggers("event names must be strings"));
                };
                add_trigger(&mut triggers, event, value, workflow)?;
            }
        }
        _ => return Err(invalid_triggers("expected an event name, a list, or a map")),
    }

    if triggers.command.is_none() && triggers.others.is_empty() {
        return Err(WorkflowError::MissingTriggers.into());
    }
    Ok(triggers)
}

fn add_trigger(
    triggers: &mut Triggers,
    event: &str,
    value: &Value,
    workflow: &MarkdownWorkflow,
) -> Result<()> {
    if !COMMAND_TRIGGER_KEYS.contains(&event) {
        triggers.others.insert(Value::from(event), value.clone());
        return Ok(());
    }
    if triggers.command.is_some() {
        return Err(invalid_triggers("only one command trigger is allowed"));
    }

    let (names, events) = if value.is_null() {
        (vec![default_command_name(workflow)?], Vec::new())
    } else {
        let config: CommandConfig = serde_yaml::from_value(value.clone())?;
        (config.names(), parse_command_events(config.events()))
    };

    let names = names
        .iter()
        .map(|name| normalize_command_name(name))
        .collect::<Result<Vec<_>>>()?;

    log::debug!("Command trigger {:?} on events {:?}", names, events);
    triggers.command = Some(CommandTrigger { names, events });
    Ok(())
}

/// Strip a leading `/` and reject blank or multi-word names
fn normalize_command_name(name: &str) -> Result<String> {
    let name = name.trim();
    let name = name.strip_prefix('/').unwrap_or(name);
    if name.is_empty() {
        return Err(WorkflowError::EmptyCommandName.into());
    }
    if name.contains(char::is_whitespace) {
        return Err(invalid_triggers(&format!(
            "command name '{}' must not contain whitespace",
            name
        )));
    }
    if name.contains(['\\', '\'', '"', '`']) {
        return Err(invalid_triggers(&format!(
            "command name '{}' must not contain quotes or backslashes",
            name
        )));
    }
    Ok(name.to_string())
}

/// A bare `command:` is named after the workflow file
fn default_command_name(workflow: &MarkdownWorkflow) -> Result<String> {
    workflow
        .source
        .as_deref()
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| WorkflowError::EmptyCommandName.into())
}

fn invalid_triggers(message: &str) -> crate::error::MarkflowError {
    WorkflowError::InvalidTriggers(message.to_string()).into()
}
