// SPDX-License-Identifier: MIT

//! Workflow loader - markdown file loading and frontmatter parsing
//!
//! A workflow file is a YAML block delimited by `---` lines followed by the
//! agent instructions in markdown.

use super::types::{Frontmatter, MarkdownWorkflow};
use crate::error::{Result, WorkflowError};
use std::fs;
use std::path::Path;

const DELIMITER: &str = "---";

/// Loads workflow definitions from markdown files
pub struct WorkflowLoader;

impl WorkflowLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a workflow from a markdown file
    pub fn load_workflow<P: AsRef<Path>>(&self, path: P) -> Result<MarkdownWorkflow> {
        let path = path.as_ref();
        log::debug!("Loading workflow from {}", path.display());
        let content = fs::read_to_string(path)?;
        let mut workflow = Self::parse_markdown(&content)?;
        workflow.source = Some(path.to_path_buf());
        Ok(workflow)
    }

    /// Split a markdown string into frontmatter and body
    pub fn parse_markdown(content: &str) -> Result<MarkdownWorkflow> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.split_inclusive('\n');

        match lines.next() {
            Some(first) if first.trim_end() == DELIMITER => {}
            _ => return Err(WorkflowError::MissingFrontmatter.into()),
        }

        let mut yaml = String::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.trim_end() == DELIMITER {
                closed = true;
                break;
            }
            yaml.push_str(line);
        }
        if !closed {
            return Err(WorkflowError::UnterminatedFrontmatter.into());
        }

        let body: String = lines.collect();
        let frontmatter = if yaml.trim().is_empty() {
            Frontmatter::default()
        } else {
            serde_yaml::from_str(&yaml)?
        };

        Ok(MarkdownWorkflow {
            frontmatter,
            body: body.trim().to_string(),
            source: None,
        })
    }
}

impl Default for WorkflowLoader {
    fn default() -> Self {
        Self::new()
    }
}
