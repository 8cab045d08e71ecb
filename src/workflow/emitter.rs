// SPDX-License-Identifier: MIT

//! Lock file emitter
//!
//! Writes a compiled workflow as GitHub Actions YAML. The activation job
//! carries the trigger condition as a folded `if: >` scalar, broken into
//! lines by the configured [`LineBreaker`](super::condition::LineBreaker).

use super::compiler::CompiledWorkflow;
use super::condition::builder::EVENT_NAME_PATH;
use super::condition::wrap_expression;
use crate::config::CompilerConfig;
use crate::error::{MarkflowError, Result};

use serde_yaml::Value;
use std::fmt::Write;

/// Directory the prompt is written to on the runner
pub const PROMPT_DIR: &str = "/tmp/markflow";
/// Heredoc delimiter for the prompt step
pub const PROMPT_DELIMITER: &str = "MARKFLOW_PROMPT_EOF";

const CHECKOUT_ACTION: &str = "actions/checkout@v4";
const UPLOAD_ACTION: &str = "actions/upload-artifact@v4";

/// Render the full lock file for `workflow`
pub fn emit_lock_file(workflow: &CompiledWorkflow, config: &CompilerConfig) -> Result<String> {
    if workflow.prompt.lines().any(|l| l.trim() == PROMPT_DELIMITER) {
        return Err(MarkflowError::other(format!(
            "prompt must not contain a line equal to {}",
            PROMPT_DELIMITER
        )));
    }

    let mut out = String::new();
    write_header(&mut out, workflow).map_err(fmt_error)?;

    writeln!(out, "name: {}", yaml_scalar(&workflow.name)?).map_err(fmt_error)?;
    writeln!(out, "on:").map_err(fmt_error)?;
    write_block(&mut out, &Value::Mapping(workflow.on.clone()), 2)?;

    if let Some(permissions) = &workflow.permissions {
        if permissions.is_mapping() {
            writeln!(out, "permissions:").map_err(fmt_error)?;
            write_block(&mut out, permissions, 2)?;
        } else {
            writeln!(out, "permissions: {}", yaml_scalar(permissions)?).map_err(fmt_error)?;
        }
    }

    writeln!(out).map_err(fmt_error)?;
    writeln!(out, "jobs:").map_err(fmt_error)?;
    write_activation_job(&mut out, workflow, config).map_err(fmt_error)?;
    writeln!(out).map_err(fmt_error)?;
    write_agent_job(&mut out, workflow).map_err(fmt_error)?;

    log::debug!("Emitted {} bytes for workflow {}", out.len(), workflow.name);
    Ok(out)
}

fn write_header(out: &mut String, workflow: &CompiledWorkflow) -> std::fmt::Result {
    writeln!(out, "# This file was generated by markflow. Do not edit it by hand.")?;
    if let Some(source) = &workflow.source {
        writeln!(out, "# Source: {}", source.display())?;
    }
    if let Some(description) = &workflow.description {
        for line in description.lines() {
            writeln!(out, "# {}", line.trim_end())?;
        }
    }
    writeln!(out)
}

fn write_activation_job(
    out: &mut String,
    workflow: &CompiledWorkflow,
    config: &CompilerConfig,
) -> std::fmt::Result {
    writeln!(out, "  activation:")?;
    if let Some(condition) = &workflow.condition {
        let breaker = config.line_breaker();
        writeln!(out, "    if: >")?;
        for rendered in condition.render().lines() {
            for line in breaker.break_expression(rendered) {
                writeln!(out, "      {}", line)?;
            }
        }
    }
    writeln!(out, "    runs-on: {}", workflow.runs_on)?;
    writeln!(out, "    steps:")?;
    writeln!(out, "      - name: Confirm activation")?;
    writeln!(
        out,
        "        run: echo \"Workflow activated by {}\"",
        wrap_expression(EVENT_NAME_PATH)
    )
}

fn write_agent_job(out: &mut String, workflow: &CompiledWorkflow) -> std::fmt::Result {
    writeln!(out, "  agent:")?;
    writeln!(out, "    needs: activation")?;
    writeln!(out, "    runs-on: {}", workflow.runs_on)?;
    if let Some(minutes) = workflow.timeout_minutes {
        writeln!(out, "    timeout-minutes: {}", minutes)?;
    }
    writeln!(out, "    steps:")?;
    writeln!(out, "      - name: Checkout repository")?;
    writeln!(out, "        uses: {}", CHECKOUT_ACTION)?;
    writeln!(out, "      - name: Create prompt")?;
    writeln!(out, "        run: |")?;
    writeln!(out, "          mkdir -p {}", PROMPT_DIR)?;
    writeln!(
        out,
        "          cat > {}/prompt.md << '{}'",
        PROMPT_DIR, PROMPT_DELIMITER
    )?;
    for line in workflow.prompt.lines() {
        if line.trim().is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "          {}", line)?;
        }
    }
    writeln!(out, "          {}", PROMPT_DELIMITER)?;
    writeln!(out, "      - name: Upload prompt")?;
    writeln!(out, "        uses: {}", UPLOAD_ACTION)?;
    writeln!(out, "        with:")?;
    writeln!(out, "          name: prompt")?;
    writeln!(out, "          path: {}/prompt.md", PROMPT_DIR)
}

/// Serialize a value as a single-line YAML scalar
fn yaml_scalar<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?.trim_end().to_string())
}

/// Serialize a mapping as an indented YAML block
fn write_block(out: &mut String, value: &Value, indent: usize) -> Result<()> {
    let pad = " ".repeat(indent);
    for line in serde_yaml::to_string(value)?.lines() {
        writeln!(out, "{}{}", pad, line).map_err(fmt_error)?;
    }
    Ok(())
}

fn fmt_error(err: std::fmt::Error) -> MarkflowError {
    MarkflowError::other(format!("failed to render lock file: {}", err))
}
