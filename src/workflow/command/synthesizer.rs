// SPDX-License-Identifier: MIT

//! Event-aware command trigger conditions
//!
//! A command such as `/bot` can appear in different payload fields depending
//! on which event fired. The synthesized condition checks the right field per
//! event and, when the workflow also has unrelated triggers, lets those
//! through untouched.

use super::events::{actual_event_name, all_comment_events, filter_comment_events, CommentEventMapping};
use crate::error::SynthesisError;
use crate::workflow::condition::builder::{
    build_and, build_contains, build_disjunction, build_equals, build_event_type_equals,
    build_event_type_in, build_not, build_not_equals, build_null_literal, build_or,
    build_property_access, build_string_literal, is_round_trip_string,
};
use crate::workflow::condition::ConditionNode;

const ISSUE_BODY: &str = "github.event.issue.body";
const COMMENT_BODY: &str = "github.event.comment.body";
const PULL_REQUEST_BODY: &str = "github.event.pull_request.body";
const DISCUSSION_BODY: &str = "github.event.discussion.body";
const ISSUE_PULL_REQUEST: &str = "github.event.issue.pull_request";

/// Builds command conditions against an injected event table
#[derive(Debug, Clone, Copy)]
pub struct CommandConditionBuilder<'t> {
    events: &'t [CommentEventMapping],
}

impl Default for CommandConditionBuilder<'static> {
    fn default() -> Self {
        Self::new(all_comment_events())
    }
}

/// Build with the standard event table
pub fn build_event_aware_command_condition(
    command_names: &[String],
    enabled_events: &[String],
    has_other_events: bool,
) -> Result<ConditionNode, SynthesisError> {
    CommandConditionBuilder::default().build(command_names, enabled_events, has_other_events)
}

impl<'t> CommandConditionBuilder<'t> {
    pub fn new(events: &'t [CommentEventMapping]) -> Self {
        Self { events }
    }

    /// Build the activation condition for `command_names`.
    ///
    /// `enabled_events` selects comment events by identifier; an empty list
    /// enables all of them. When `has_other_events` is set the result is
    /// `(discriminator && guard) || !discriminator`, so events that cannot
    /// carry a command always pass.
    pub fn build(
        &self,
        command_names: &[String],
        enabled_events: &[String],
        has_other_events: bool,
    ) -> Result<ConditionNode, SynthesisError> {
        if command_names.is_empty() {
            return Err(SynthesisError::NoCommandNames);
        }
        if let Some(name) = command_names.iter().find(|n| !is_round_trip_string(n)) {
            return Err(SynthesisError::InvalidCommandName(name.clone()));
        }

        let (guarded, guards): (Vec<&CommentEventMapping>, Vec<ConditionNode>) =
            filter_comment_events(self.events, enabled_events)
                .into_iter()
                .filter_map(|mapping| {
                    self.event_guard(mapping, command_names)
                        .map(|guard| (mapping, guard))
                })
                .unzip();

        if guards.is_empty() {
            return Err(SynthesisError::NoValidEvents);
        }
        log::debug!(
            "command condition for {:?} covers {} event(s)",
            command_names,
            guards.len()
        );

        let command_condition = build_disjunction(false, guards);
        if !has_other_events {
            return Ok(command_condition);
        }

        // Deduplicate by platform event so PR and issue comments share one check
        let discriminator =
            build_event_type_in(guarded.iter().map(|m| actual_event_name(m.event_name)));

        Ok(build_or(
            build_and(discriminator.clone(), command_condition),
            build_not(discriminator),
        ))
    }

    /// `event == X && <command in body>`, plus the PR/issue split for comments
    fn event_guard(
        &self,
        mapping: &CommentEventMapping,
        command_names: &[String],
    ) -> Option<ConditionNode> {
        let Some(body) = body_path(mapping.event_name) else {
            log::debug!("No body field known for event: {}", mapping.event_name);
            return None;
        };

        let guard = build_and(
            build_event_type_equals(actual_event_name(mapping.event_name)),
            command_check(command_names, body),
        );

        let pull_request = || build_property_access(ISSUE_PULL_REQUEST);
        let guard = if mapping.is_issue_comment {
            build_and(guard, build_equals(pull_request(), build_null_literal()))
        } else if mapping.is_pr_comment {
            build_and(guard, build_not_equals(pull_request(), build_null_literal()))
        } else {
            guard
        };
        Some(guard)
    }
}

fn body_path(event_name: &str) -> Option<&'static str> {
    match event_name {
        "issues" => Some(ISSUE_BODY),
        "issue_comment"
        | "pull_request_comment"
        | "pull_request_review_comment"
        | "discussion_comment" => Some(COMMENT_BODY),
        "pull_request" => Some(PULL_REQUEST_BODY),
        "discussion" => Some(DISCUSSION_BODY),
        _ => None,
    }
}

/// `contains(body, '/name')` for each name, OR-ed
fn command_check(command_names: &[String], body: &str) -> ConditionNode {
    build_disjunction(
        false,
        command_names
            .iter()
            .map(|name| {
                build_contains(
                    build_property_access(body),
                    build_string_literal(format!("/{}", name)),
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::condition::parse;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_issues_only() {
        let node =
            build_event_aware_command_condition(&names(&["bot"]), &names(&["issues"]), false)
                .unwrap();
        assert_eq!(
            node.render(),
            "(github.event_name == 'issues') && (contains(github.event.issue.body, '/bot'))"
        );
    }

    #[test]
    fn test_multiple_command_names_are_or_ed() {
        let node = build_event_aware_command_condition(
            &names(&["bot", "helper"]),
            &names(&["discussion"]),
            false,
        )
        .unwrap();
        assert_eq!(
            node.render(),
            "(github.event_name == 'discussion') && (contains(github.event.discussion.body, '/bot') || contains(github.event.discussion.body, '/helper'))"
        );
    }

    #[test]
    fn test_issue_comment_excludes_pull_requests() {
        let node = build_event_aware_command_condition(
            &names(&["bot"]),
            &names(&["issue_comment"]),
            false,
        )
        .unwrap();
        assert_eq!(
            node.render(),
            "((github.event_name == 'issue_comment') && (contains(github.event.comment.body, '/bot'))) && (github.event.issue.pull_request == null)"
        );
    }

    #[test]
    fn test_pull_request_comment_requires_pull_request() {
        let node = build_event_aware_command_condition(
            &names(&["bot"]),
            &names(&["pull_request_comment"]),
            false,
        )
        .unwrap();
        assert_eq!(
            node.render(),
            "((github.event_name == 'issue_comment') && (contains(github.event.comment.body, '/bot'))) && (github.event.issue.pull_request != null)"
        );
    }

    #[test]
    fn test_other_events_fall_through() {
        let node =
            build_event_aware_command_condition(&names(&["bot"]), &names(&["issues"]), true)
                .unwrap();
        assert_eq!(
            node.render(),
            "((github.event_name == 'issues') && ((github.event_name == 'issues') && (contains(github.event.issue.body, '/bot')))) || (!(github.event_name == 'issues'))"
        );
        match node {
            ConditionNode::Or { left, right } => {
                assert!(matches!(*left, ConditionNode::And { .. }));
                assert!(matches!(*right, ConditionNode::Not { .. }));
            }
            _ => panic!("Expected Or expression"),
        }
    }

    #[test]
    fn test_discriminator_deduplicates_platform_events() {
        let node = build_event_aware_command_condition(
            &names(&["bot"]),
            &names(&["issue_comment", "pull_request_comment"]),
            true,
        )
        .unwrap();
        let ConditionNode::Or { right, .. } = node else {
            panic!("Expected Or expression");
        };
        let ConditionNode::Not { child } = *right else {
            panic!("Expected Not expression");
        };
        assert_eq!(*child, build_event_type_equals("issue_comment"));
    }

    #[test]
    fn test_all_events_when_none_requested() {
        let node = build_event_aware_command_condition(&names(&["bot"]), &[], false).unwrap();
        let ConditionNode::Disjunction(disjunction) = node else {
            panic!("Expected Disjunction");
        };
        assert_eq!(disjunction.terms.len(), 7);
    }

    #[test]
    fn test_all_events_discriminator_has_six_platform_events() {
        let node = build_event_aware_command_condition(&names(&["bot"]), &[], true).unwrap();
        let ConditionNode::Or { right, .. } = node else {
            panic!("Expected Or expression");
        };
        let ConditionNode::Not { child } = *right else {
            panic!("Expected Not expression");
        };
        let ConditionNode::Disjunction(discriminator) = *child else {
            panic!("Expected Disjunction");
        };
        assert_eq!(discriminator.terms.len(), 6);
    }

    #[test]
    fn test_no_command_names() {
        let err = build_event_aware_command_condition(&[], &names(&["issues"]), false).unwrap_err();
        assert_eq!(err, SynthesisError::NoCommandNames);
        assert_eq!(err.to_string(), "no command names provided");
    }

    #[test]
    fn test_only_unknown_events() {
        let err = build_event_aware_command_condition(&names(&["bot"]), &names(&["push"]), false)
            .unwrap_err();
        assert_eq!(err, SynthesisError::NoValidEvents);
    }

    #[test]
    fn test_unknown_events_are_dropped() {
        let node = build_event_aware_command_condition(
            &names(&["bot"]),
            &names(&["push", "issues"]),
            false,
        )
        .unwrap();
        assert!(node.render().starts_with("(github.event_name == 'issues')"));
    }

    #[test]
    fn test_injected_table() {
        let table = [CommentEventMapping {
            event_name: "discussion",
            types: &["created"],
            is_pr_comment: false,
            is_issue_comment: false,
        }];
        let builder = CommandConditionBuilder::new(&table);
        assert!(builder.build(&names(&["bot"]), &[], false).is_ok());
        assert_eq!(
            builder.build(&names(&["bot"]), &names(&["issues"]), false),
            Err(SynthesisError::NoValidEvents)
        );
    }

    #[test]
    fn test_table_row_without_body_field_is_skipped() {
        let table = [CommentEventMapping {
            event_name: "release",
            types: &["published"],
            is_pr_comment: false,
            is_issue_comment: false,
        }];
        let builder = CommandConditionBuilder::new(&table);
        assert_eq!(
            builder.build(&names(&["bot"]), &[], false),
            Err(SynthesisError::NoValidEvents)
        );
    }

    #[test]
    fn test_unguarded_rows_stay_out_of_discriminator() {
        let table = [
            CommentEventMapping {
                event_name: "discussion",
                types: &["created"],
                is_pr_comment: false,
                is_issue_comment: false,
            },
            CommentEventMapping {
                event_name: "release",
                types: &["published"],
                is_pr_comment: false,
                is_issue_comment: false,
            },
        ];
        let node = CommandConditionBuilder::new(&table)
            .build(&names(&["bot"]), &[], true)
            .unwrap();
        let ConditionNode::Or { right, .. } = node else {
            panic!("Expected Or expression");
        };
        let ConditionNode::Not { child } = *right else {
            panic!("Expected Not expression");
        };
        assert_eq!(*child, build_event_type_equals("discussion"));
    }

    #[test]
    fn test_backslash_in_command_name() {
        let err = build_event_aware_command_condition(
            &names(&["fix\\"]),
            &names(&["issues"]),
            false,
        )
        .unwrap_err();
        assert_eq!(err, SynthesisError::InvalidCommandName("fix\\".to_string()));
    }

    #[test]
    fn test_quote_in_command_name_reparses() {
        let node =
            build_event_aware_command_condition(&names(&["it's"]), &names(&["issues"]), true)
                .unwrap();
        let first = parse(&node.render()).unwrap().render();
        assert_eq!(parse(&first).unwrap().render(), first);
    }

    #[test]
    fn test_synthesized_condition_reparses() {
        let node = build_event_aware_command_condition(&names(&["bot", "fix"]), &[], true).unwrap();
        let first = parse(&node.render()).unwrap().render();
        let second = parse(&first).unwrap().render();
        assert_eq!(first, second);
    }
}
