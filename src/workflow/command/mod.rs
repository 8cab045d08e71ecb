// SPDX-License-Identifier: MIT

//! Slash-command triggers
//!
//! Maps comment-bearing events to the payload fields a command can appear in
//! and synthesizes the activation condition for a set of command names.

mod events;
mod synthesizer;

pub use events::{
    actual_event_name, all_comment_events, filter_comment_events, merge_events_for_yaml,
    parse_command_events, CommentEventMapping, MergedEvent,
};
pub use synthesizer::{build_event_aware_command_condition, CommandConditionBuilder};
