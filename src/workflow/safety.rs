// SPDX-License-Identifier: MIT

//! Allow-list check for expressions embedded in agent instructions
//!
//! The prompt body ends up in a workflow step, so any `${{ }}` it contains is
//! expanded by the platform before the agent runs. Only context values that
//! cannot leak secrets are accepted.

use super::condition::{find_expressions, parse, visit, ConditionNode, ExpressionNode};
use crate::error::{Result, WorkflowError};
use std::convert::Infallible;

/// Context values that may appear in the prompt body
pub const ALLOWED_EXPRESSIONS: &[&str] = &[
    "github.actor",
    "github.event.after",
    "github.event.before",
    "github.event.check_run.id",
    "github.event.check_suite.id",
    "github.event.comment.id",
    "github.event.deployment.id",
    "github.event.deployment_status.id",
    "github.event.discussion.number",
    "github.event.head_commit.id",
    "github.event.installation.id",
    "github.event.issue.number",
    "github.event.pull_request.number",
    "github.event.release.id",
    "github.event.release.tag_name",
    "github.event.repository.id",
    "github.event.review.id",
    "github.event.review_comment.id",
    "github.event.sender.id",
    "github.event.workflow_run.id",
    "github.job",
    "github.owner",
    "github.repository",
    "github.run_id",
    "github.run_number",
    "github.server_url",
    "github.workflow",
    "github.workspace",
];

/// Prefixes whose every property is allowed
pub const ALLOWED_PREFIXES: &[&str] = &[
    "needs.",
    "steps.",
    "github.event.inputs.",
    "inputs.",
    "env.",
];

pub fn is_allowed_expression(expression: &str) -> bool {
    let expression = expression.trim();
    ALLOWED_EXPRESSIONS.contains(&expression)
        || ALLOWED_PREFIXES.iter().any(|prefix| {
            expression
                .strip_prefix(prefix)
                .is_some_and(is_property_path)
        })
}

/// Dot-separated segments of `[A-Za-z0-9_-]`, none empty
fn is_property_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        })
}

/// Check every `${{ }}` in `markdown`, reporting all offenders at once
pub fn validate_expression_safety(markdown: &str) -> Result<()> {
    let mut unauthorized: Vec<String> = Vec::new();

    for inner in find_expressions(markdown) {
        // Unparseable text is checked as one opaque leaf
        let tree = parse(inner).unwrap_or_else(|err| {
            log::debug!("Checking unparseable expression '{}' as a whole: {}", inner, err);
            ConditionNode::Expression(ExpressionNode::new(inner))
        });

        let Ok(()) = visit::<Infallible, _>(&tree, &mut |leaf: &ExpressionNode| {
            if !is_allowed_expression(&leaf.expression)
                && !unauthorized.contains(&leaf.expression)
            {
                unauthorized.push(leaf.expression.clone());
            }
            Ok(())
        });
    }

    if unauthorized.is_empty() {
        Ok(())
    } else {
        log::warn!("Rejected expressions in prompt: {:?}", unauthorized);
        Err(WorkflowError::UnauthorizedExpressions(unauthorized).into())
    }
}
