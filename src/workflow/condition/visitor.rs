// SPDX-License-Identifier: MIT

//! Read-only walk over the logical structure of a condition tree

use super::ast::{ConditionNode, ExpressionNode};

/// Call `visitor` on every [`ExpressionNode`] leaf, depth-first, left to right.
///
/// Only `And`, `Or`, `Not` and `Disjunction` are descended into; any other
/// node is an atomic expression from the walk's point of view and is skipped.
/// The first error returned by `visitor` stops the walk and is propagated.
pub fn visit<E, F>(node: &ConditionNode, visitor: &mut F) -> Result<(), E>
where
    F: FnMut(&ExpressionNode) -> Result<(), E>,
{
    match node {
        ConditionNode::Expression(expression) => visitor(expression),
        ConditionNode::And { left, right } | ConditionNode::Or { left, right } => {
            visit(left, visitor)?;
            visit(right, visitor)
        }
        ConditionNode::Not { child } => visit(child, visitor),
        ConditionNode::Disjunction(disjunction) => disjunction
            .terms
            .iter()
            .try_for_each(|term| visit(term, visitor)),
        ConditionNode::Comparison { .. }
        | ConditionNode::FunctionCall(_)
        | ConditionNode::PropertyAccess { .. }
        | ConditionNode::StringLiteral { .. }
        | ConditionNode::BoolLiteral { .. }
        | ConditionNode::NumberLiteral { .. }
        | ConditionNode::Ternary { .. }
        | ConditionNode::Contains { .. } => Ok(()),
    }
}
