// SPDX-License-Identifier: MIT

//! Recursive-descent parser for condition expressions
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or      := and ( '||' and )*
//! and     := unary ( '&&' unary )*
//! unary   := '!' unary | primary
//! primary := '(' or ')' | literal
//! ```
//!
//! Literals are never interpreted: property paths, function calls and
//! comparisons all come out as [`ConditionNode::Expression`] leaves.

use super::ast::{ConditionNode, ExpressionNode};
use super::tokenizer::{tokenize, Token, TokenKind};
use crate::error::ExpressionError;

/// Parse a condition expression string into an AST
pub fn parse(input: &str) -> Result<ConditionNode, ExpressionError> {
    if input.trim().is_empty() {
        return Err(ExpressionError::Empty);
    }

    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.parse_or()?;

    let trailing = parser.current();
    if trailing.kind != TokenKind::Eof {
        return Err(unexpected(trailing));
    }

    log::trace!("parsed condition: {}", node);
    Ok(node)
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token<'a> {
        // The token list always ends in Eof, which is never advanced past
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<ConditionNode, ExpressionError> {
        let mut left = self.parse_and()?;
        while self.current().kind == TokenKind::Or {
            self.advance();
            let right = self.parse_and()?;
            left = ConditionNode::Or {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ConditionNode, ExpressionError> {
        let mut left = self.parse_unary()?;
        while self.current().kind == TokenKind::And {
            self.advance();
            let right = self.parse_unary()?;
            left = ConditionNode::And {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ConditionNode, ExpressionError> {
        if self.current().kind == TokenKind::Not {
            self.advance();
            let child = self.parse_unary()?;
            return Ok(ConditionNode::Not {
                child: Box::new(child),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<ConditionNode, ExpressionError> {
        let token = self.advance();
        match token.kind {
            TokenKind::LeftParen => {
                let inner = self.parse_or()?;
                let close = self.current();
                if close.kind != TokenKind::RightParen {
                    return Err(ExpressionError::ExpectedRightParen {
                        found: close.value.to_string(),
                        position: close.position,
                    });
                }
                self.advance();
                Ok(inner)
            }
            TokenKind::Literal => Ok(ConditionNode::Expression(ExpressionNode::new(token.value))),
            _ => Err(unexpected(&token)),
        }
    }
}

fn unexpected(token: &Token<'_>) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        token: token.value.to_string(),
        position: token.position,
    }
}
