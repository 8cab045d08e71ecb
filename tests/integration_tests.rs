//! Integration tests for workflow compilation
//!
//! These tests drive the public API end to end: markdown on disk in, lock
//! file YAML out.

use markflow::config::CompilerConfig;
use markflow::error::{ExpressionError, MarkflowError, SynthesisError, WorkflowError};
use markflow::workflow::command::build_event_aware_command_condition;
use markflow::workflow::compiler::{lock_file_path, Compiler};
use markflow::workflow::condition::{
    break_long_expression, builder, parse, strip_expression_wrapper, ConditionNode,
};
use markflow::workflow::loader::WorkflowLoader;
use serde_yaml::Value;
use std::fs;
use std::io::Write;
use std::path::Path;

// ============================================================================
// Helpers
// ============================================================================

fn write_workflow(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const HELPER_WORKFLOW: &str = r#"---
name: Issue Helper
description: Answers /helper requests
on:
  command:
    name: helper
    events: [issues, issue_comment, pull_request_comment]
  workflow_dispatch:
permissions:
  contents: read
  issues: write
timeout-minutes: 10
---

# Issue Helper

Read issue #${{ github.event.issue.number }} in ${{ github.repository }}
and answer the question.
"#;

// ============================================================================
// End-to-end compilation
// ============================================================================

#[test]
fn test_compile_file_produces_lock_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workflow(dir.path(), "helper.md", HELPER_WORKFLOW);

    let lock = Compiler::default().compile_file(&path).unwrap();
    let doc: Value = serde_yaml::from_str(&lock).unwrap();

    assert_eq!(doc["name"].as_str(), Some("Issue Helper"));
    assert_eq!(
        doc["on"]["issue_comment"]["types"],
        serde_yaml::from_str::<Value>("[created, edited]").unwrap()
    );
    assert_eq!(
        doc["on"]["issues"]["types"],
        serde_yaml::from_str::<Value>("[edited, opened, reopened]").unwrap()
    );
    assert!(doc["on"].get("pull_request_comment").is_none());
    assert_eq!(doc["permissions"]["issues"].as_str(), Some("write"));
    assert_eq!(doc["jobs"]["agent"]["timeout-minutes"].as_u64(), Some(10));
    assert!(lock.contains(&format!("# Source: {}", path.display())));
}

#[test]
fn test_activation_condition_reparses() {
    let workflow = WorkflowLoader::parse_markdown(HELPER_WORKFLOW).unwrap();
    let compiled = Compiler::default().compile(&workflow).unwrap();
    let lock = markflow::workflow::emitter::emit_lock_file(&compiled, &CompilerConfig::default())
        .unwrap();
    let doc: Value = serde_yaml::from_str(&lock).unwrap();

    let folded = doc["jobs"]["activation"]["if"].as_str().unwrap().trim_end();
    let rendered = compiled.condition.unwrap().render();
    assert_eq!(folded, rendered);

    let first = parse(folded).unwrap().render();
    assert_eq!(parse(&first).unwrap().render(), first);
    assert!(rendered.contains("github.event.issue.pull_request == null"));
    assert!(rendered.contains("github.event.issue.pull_request != null"));
}

#[test]
fn test_lock_file_written_next_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workflow(dir.path(), "triage.md", "---\non:\n  command:\n---\nTriage.\n");

    let lock = Compiler::default().compile_file(&path).unwrap();
    let output = lock_file_path(&path);
    fs::write(&output, &lock).unwrap();

    assert_eq!(output, dir.path().join("triage.lock.yml"));
    assert!(fs::read_to_string(&output).unwrap().contains("'/triage'"));
}

#[test]
fn test_compile_rejects_secret_in_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workflow(
        dir.path(),
        "leaky.md",
        "---\non: push\n---\nUse ${{ secrets.API_KEY }} and ${{ github.token }}.\n",
    );

    let err = Compiler::default().compile_file(&path).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Workflow error: Unauthorized expressions: secrets.API_KEY, github.token"
    );
}

#[test]
fn test_compile_missing_file() {
    let result = Compiler::default().compile_file("/nonexistent/workflow.md");
    assert!(matches!(result, Err(MarkflowError::Io(_))));
}

#[test]
fn test_compile_without_triggers() {
    let workflow = WorkflowLoader::parse_markdown("---\nname: idle\n---\nNothing.").unwrap();
    let err = Compiler::default().compile(&workflow).unwrap_err();
    assert!(matches!(
        err,
        MarkflowError::Workflow(WorkflowError::MissingTriggers)
    ));
}

#[test]
fn test_narrow_config_breaks_more() {
    let workflow = WorkflowLoader::parse_markdown(HELPER_WORKFLOW).unwrap();
    let wide = CompilerConfig::default();
    let narrow = CompilerConfig::default().with_overrides(Some(60), Some(40)).unwrap();

    let count = |config: &CompilerConfig| {
        let compiled = Compiler::new(config.clone()).compile(&workflow).unwrap();
        let lock = markflow::workflow::emitter::emit_lock_file(&compiled, config).unwrap();
        lock.lines().filter(|l| l.starts_with("      ") && !l.starts_with("       ")).count()
    };
    assert!(count(&narrow) > count(&wide));
}

// ============================================================================
// Expressions and command conditions
// ============================================================================

#[test]
fn test_parse_wrapped_expression() {
    let tree = parse(strip_expression_wrapper("${{ !cancelled() && (a || b) }}")).unwrap();
    assert_eq!(tree.render(), "(!(cancelled())) && ((a) || (b))");
}

#[test]
fn test_parse_errors_are_positional() {
    assert_eq!(parse("   "), Err(ExpressionError::Empty));
    assert_eq!(
        parse("a &&"),
        Err(ExpressionError::UnexpectedToken {
            token: String::new(),
            position: 4
        })
    );
    assert!(matches!(
        parse("(a || b"),
        Err(ExpressionError::ExpectedRightParen { .. })
    ));
}

#[test]
fn test_command_condition_scenarios() {
    let only_issues =
        build_event_aware_command_condition(&names(&["bot"]), &names(&["issues"]), false)
            .unwrap();
    assert_eq!(
        only_issues.render(),
        "(github.event_name == 'issues') && (contains(github.event.issue.body, '/bot'))"
    );

    let with_others =
        build_event_aware_command_condition(&names(&["bot"]), &names(&["issues"]), true)
            .unwrap();
    assert!(matches!(with_others, ConditionNode::Or { .. }));

    assert_eq!(
        build_event_aware_command_condition(&[], &[], false),
        Err(SynthesisError::NoCommandNames)
    );
}

#[test]
fn test_json_tree_is_tagged() {
    let tree = builder::build_and(
        builder::build_event_type_equals("issues"),
        builder::build_expression("github.actor"),
    );
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["type"], "and");
    assert_eq!(json["right"]["type"], "expression");
}

#[test]
fn test_break_long_expression_default_limits() {
    let node = build_event_aware_command_condition(&names(&["bot", "helper"]), &[], true).unwrap();
    let rendered = node.render();
    let lines = break_long_expression(&rendered);
    assert!(lines.len() > 1);
    assert_eq!(lines.join(" "), rendered);
}
