// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for condition expressions
//!
//! Nodes carry no evaluation semantics. The only thing a tree can do is render
//! itself back into platform expression text.

use serde::Serialize;
use std::fmt;

/// A condition expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionNode {
    /// Opaque expression text, rendered verbatim
    Expression(ExpressionNode),
    /// Logical AND: `(left) && (right)`
    And {
        left: Box<ConditionNode>,
        right: Box<ConditionNode>,
    },
    /// Logical OR: `(left) || (right)`
    Or {
        left: Box<ConditionNode>,
        right: Box<ConditionNode>,
    },
    /// Logical NOT
    Not { child: Box<ConditionNode> },
    /// N-ary OR without nested parentheses
    Disjunction(DisjunctionNode),
    /// `left op right`
    Comparison {
        left: Box<ConditionNode>,
        op: CompareOp,
        right: Box<ConditionNode>,
    },
    /// `name(arg1, arg2)`
    FunctionCall(FunctionCallNode),
    /// Dotted property path such as `github.event.issue.body`
    PropertyAccess { path: String },
    /// Single-quoted string; `'` is doubled, `\` is written as-is
    StringLiteral { value: String },
    BoolLiteral { value: bool },
    /// Numeric text, rendered as given
    NumberLiteral { value: String },
    /// `condition ? if_true : if_false`
    Ternary {
        condition: Box<ConditionNode>,
        if_true: Box<ConditionNode>,
        if_false: Box<ConditionNode>,
    },
    /// `contains(array, value)`
    Contains {
        array: Box<ConditionNode>,
        value: Box<ConditionNode>,
    },
}

/// Leaf holding raw expression text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionNode {
    pub expression: String,
    /// Rendered as a `# comment` line by multiline disjunctions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisjunctionNode {
    pub terms: Vec<ConditionNode>,
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCallNode {
    pub name: String,
    pub args: Vec<ConditionNode>,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    /// ==
    Eq,
    /// !=
    NotEq,
    /// >
    Gt,
    /// >=
    Gte,
    /// <
    Lt,
    /// <=
    Lte,
}

impl ExpressionNode {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl ConditionNode {
    /// Render the tree into platform expression text.
    ///
    /// Rendering is pure: the same tree always yields the same text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Pretty-printed JSON of the tree, tagged by node `type`
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionNode::Expression(node) => write!(f, "{}", node.expression),
            ConditionNode::And { left, right } => write!(f, "({}) && ({})", left, right),
            ConditionNode::Or { left, right } => write!(f, "({}) || ({})", left, right),
            // `!(f())` is ambiguous to some platform parsers, keep calls bare
            ConditionNode::Not { child } => match child.as_ref() {
                ConditionNode::FunctionCall(_) => write!(f, "!{}", child),
                _ => write!(f, "!({})", child),
            },
            ConditionNode::Disjunction(node) => node.fmt(f),
            ConditionNode::Comparison { left, op, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            ConditionNode::FunctionCall(node) => node.fmt(f),
            ConditionNode::PropertyAccess { path } => write!(f, "{}", path),
            ConditionNode::StringLiteral { value } => {
                write!(f, "'{}'", value.replace('\'', "''"))
            }
            ConditionNode::BoolLiteral { value } => write!(f, "{}", value),
            ConditionNode::NumberLiteral { value } => write!(f, "{}", value),
            ConditionNode::Ternary {
                condition,
                if_true,
                if_false,
            } => write!(f, "{} ? {} : {}", condition, if_true, if_false),
            ConditionNode::Contains { array, value } => {
                write!(f, "contains({}, {})", array, value)
            }
        }
    }
}

impl fmt::Display for DisjunctionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.multiline {
            for (i, term) in self.terms.iter().enumerate() {
                if i > 0 {
                    f.write_str(" || ")?;
                }
                write!(f, "{}", term)?;
            }
            return Ok(());
        }

        let last = self.terms.len().saturating_sub(1);
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            if let ConditionNode::Expression(ExpressionNode {
                description: Some(description),
                ..
            }) = term
            {
                writeln!(f, "# {}", description)?;
            }
            write!(f, "{}", term)?;
            if i < last {
                f.write_str(" ||")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for FunctionCallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}
