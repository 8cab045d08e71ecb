// SPDX-License-Identifier: MIT

//! Comment-bearing trigger events for command workflows

use crate::workflow::types::OneOrMany;
use once_cell::sync::Lazy;

/// One comment-bearing trigger and the activity types it listens for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEventMapping {
    /// Trigger identifier, which is also the lookup key
    pub event_name: &'static str,
    pub types: &'static [&'static str],
    /// Comment on a pull request delivered as an `issue_comment`
    pub is_pr_comment: bool,
    /// Comment on a plain issue
    pub is_issue_comment: bool,
}

/// An `on:` entry after folding PR comments into `issue_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEvent {
    pub name: String,
    pub types: Vec<String>,
}

static COMMENT_EVENTS: Lazy<Vec<CommentEventMapping>> = Lazy::new(|| {
    vec![
        CommentEventMapping {
            event_name: "issues",
            types: &["opened", "edited", "reopened"],
            is_pr_comment: false,
            is_issue_comment: false,
        },
        CommentEventMapping {
            event_name: "issue_comment",
            types: &["created", "edited"],
            is_pr_comment: false,
            is_issue_comment: true,
        },
        CommentEventMapping {
            event_name: "pull_request_comment",
            types: &["created", "edited"],
            is_pr_comment: true,
            is_issue_comment: false,
        },
        CommentEventMapping {
            event_name: "pull_request",
            types: &["opened", "edited", "reopened"],
            is_pr_comment: false,
            is_issue_comment: false,
        },
        CommentEventMapping {
            event_name: "pull_request_review_comment",
            types: &["created", "edited"],
            is_pr_comment: false,
            is_issue_comment: false,
        },
        CommentEventMapping {
            event_name: "discussion",
            types: &["created", "edited"],
            is_pr_comment: false,
            is_issue_comment: false,
        },
        CommentEventMapping {
            event_name: "discussion_comment",
            types: &["created", "edited"],
            is_pr_comment: false,
            is_issue_comment: false,
        },
    ]
});

/// The full table, in canonical order
pub fn all_comment_events() -> &'static [CommentEventMapping] {
    &COMMENT_EVENTS
}

/// The platform event an identifier is delivered as.
///
/// PR comments arrive as `issue_comment`; every other identifier is already
/// a platform event name.
pub fn actual_event_name(identifier: &str) -> &str {
    match identifier {
        "pull_request_comment" => "issue_comment",
        other => other,
    }
}

/// Read the `events:` field of a command trigger.
///
/// Missing or `*` means every comment event and yields an empty list.
pub fn parse_command_events(events: Option<&OneOrMany>) -> Vec<String> {
    let Some(events) = events else {
        return Vec::new();
    };
    let events = events.to_vec();
    if events.iter().any(|e| e == "*") {
        return Vec::new();
    }
    events
}

/// Resolve identifiers against `table`, keeping table order.
///
/// An empty list selects the whole table. Unknown identifiers are dropped.
pub fn filter_comment_events<'t>(
    table: &'t [CommentEventMapping],
    identifiers: &[String],
) -> Vec<&'t CommentEventMapping> {
    if identifiers.is_empty() {
        return table.iter().collect();
    }

    for unknown in identifiers
        .iter()
        .filter(|id| !table.iter().any(|m| m.event_name == id.as_str()))
    {
        log::warn!("Ignoring unknown command event: {}", unknown);
    }

    table
        .iter()
        .filter(|m| identifiers.iter().any(|id| id == m.event_name))
        .collect()
}

/// Fold mappings into platform events for the `on:` section.
///
/// Identifiers sharing a platform event collapse into one entry whose types
/// are the sorted union of theirs.
pub fn merge_events_for_yaml(mappings: &[&CommentEventMapping]) -> Vec<MergedEvent> {
    let mut merged: Vec<MergedEvent> = Vec::new();
    for mapping in mappings {
        let name = actual_event_name(mapping.event_name);
        let types = mapping.types.iter().map(|t| t.to_string());
        match merged.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.types.extend(types),
            None => merged.push(MergedEvent {
                name: name.to_string(),
                types: types.collect(),
            }),
        }
    }
    for event in &mut merged {
        event.types.sort();
        event.types.dedup();
    }
    merged
}
