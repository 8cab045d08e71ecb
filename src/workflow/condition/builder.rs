// SPDX-License-Identifier: MIT

//! Constructors for assembling condition trees in code
//!
//! These do no semantic checking. They only make sure every child slot is
//! filled, so any tree built here renders without gaps.

use super::ast::{CompareOp, ConditionNode, DisjunctionNode, ExpressionNode, FunctionCallNode};

/// Property path holding the name of the triggering event
pub const EVENT_NAME_PATH: &str = "github.event_name";

pub fn build_expression(text: impl Into<String>) -> ConditionNode {
    ConditionNode::Expression(ExpressionNode::new(text))
}

pub fn build_and(left: ConditionNode, right: ConditionNode) -> ConditionNode {
    ConditionNode::And {
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn build_or(left: ConditionNode, right: ConditionNode) -> ConditionNode {
    ConditionNode::Or {
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn build_not(child: ConditionNode) -> ConditionNode {
    ConditionNode::Not {
        child: Box::new(child),
    }
}

pub fn build_comparison(left: ConditionNode, op: CompareOp, right: ConditionNode) -> ConditionNode {
    ConditionNode::Comparison {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

pub fn build_equals(left: ConditionNode, right: ConditionNode) -> ConditionNode {
    build_comparison(left, CompareOp::Eq, right)
}

pub fn build_not_equals(left: ConditionNode, right: ConditionNode) -> ConditionNode {
    build_comparison(left, CompareOp::NotEq, right)
}

pub fn build_contains(array: ConditionNode, value: ConditionNode) -> ConditionNode {
    ConditionNode::Contains {
        array: Box::new(array),
        value: Box::new(value),
    }
}

pub fn build_property_access(path: impl Into<String>) -> ConditionNode {
    ConditionNode::PropertyAccess { path: path.into() }
}

pub fn build_string_literal(value: impl Into<String>) -> ConditionNode {
    ConditionNode::StringLiteral {
        value: value.into(),
    }
}

pub fn build_boolean_literal(value: bool) -> ConditionNode {
    ConditionNode::BoolLiteral { value }
}

pub fn build_number_literal(value: impl std::fmt::Display) -> ConditionNode {
    ConditionNode::NumberLiteral {
        value: value.to_string(),
    }
}

pub fn build_null_literal() -> ConditionNode {
    build_expression("null")
}

pub fn build_function_call(name: impl Into<String>, args: Vec<ConditionNode>) -> ConditionNode {
    ConditionNode::FunctionCall(FunctionCallNode {
        name: name.into(),
        args,
    })
}

pub fn build_ternary(
    condition: ConditionNode,
    if_true: ConditionNode,
    if_false: ConditionNode,
) -> ConditionNode {
    ConditionNode::Ternary {
        condition: Box::new(condition),
        if_true: Box::new(if_true),
        if_false: Box::new(if_false),
    }
}

/// `github.event_name == '<event_name>'`
pub fn build_event_type_equals(event_name: &str) -> ConditionNode {
    build_equals(
        build_property_access(EVENT_NAME_PATH),
        build_string_literal(event_name),
    )
}

/// Whether `value` survives a render and reparse as a string literal.
///
/// The tokenizer reads `\` inside quotes as an escape, so a backslash can
/// swallow the closing quote. Single quotes are fine, they are doubled.
pub fn is_round_trip_string(value: &str) -> bool {
    !value.contains('\\')
}

/// OR the terms together without nesting.
///
/// A single term is returned as-is rather than wrapped in a one-element
/// disjunction.
pub fn build_disjunction(multiline: bool, mut terms: Vec<ConditionNode>) -> ConditionNode {
    if terms.len() == 1 {
        return terms.remove(0);
    }
    ConditionNode::Disjunction(DisjunctionNode { terms, multiline })
}

/// Disjunction of event-name checks, one per distinct name, in input order
pub fn build_event_type_in<'a>(event_names: impl IntoIterator<Item = &'a str>) -> ConditionNode {
    let mut seen: Vec<&str> = Vec::new();
    for name in event_names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    build_disjunction(
        false,
        seen.into_iter().map(build_event_type_equals).collect(),
    )
}
