// SPDX-License-Identifier: MIT

//! Condition expressions for workflow `if:` gates
//!
//! This module provides:
//! - a lenient tokenizer and strict recursive-descent parser for
//!   `&&` / `||` / `!` expressions over opaque literals
//! - a typed AST that renders back into platform expression text
//! - builder helpers for composing trees in code
//! - a line breaker that keeps rendered conditions within a width limit
//!
//! Examples of accepted input:
//! - `github.event_name == 'issues'`
//! - `!cancelled() && (contains(github.event.comment.body, '/bot') || always())`

mod ast;
mod breaker;
pub mod builder;
mod parser;
mod tokenizer;
mod visitor;
mod wrapper;


pub use ast::{CompareOp, ConditionNode, DisjunctionNode, ExpressionNode, FunctionCallNode};
pub use breaker::{
    break_long_expression, LineBreaker, EXPRESSION_BREAK_THRESHOLD, MAX_EXPRESSION_LINE_LENGTH,
};
pub use parser::parse;
pub use visitor::visit;
pub use wrapper::{find_expressions, strip_expression_wrapper, wrap_expression};
