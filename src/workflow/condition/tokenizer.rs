// SPDX-License-Identifier: MIT

//! Lexer for condition expressions
//!
//! The lexer is deliberately lenient: anything that is not a logical operator
//! or a structural parenthesis becomes an opaque literal. Literals keep their
//! own balanced parentheses (function calls) and quoted substrings intact.

use crate::error::ExpressionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Literal,
    And,
    Or,
    Not,
    LeftParen,
    RightParen,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    /// Byte offset into the original input
    pub position: usize,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, value: &'a str, position: usize) -> Self {
        Self {
            kind,
            value,
            position,
        }
    }
}

pub(crate) fn is_quote(b: u8) -> bool {
    matches!(b, b'\'' | b'"' | b'`')
}

pub(crate) fn is_logical_operator(bytes: &[u8], i: usize) -> bool {
    i + 1 < bytes.len() && matches!(&bytes[i..i + 2], b"&&" | b"||")
}

/// `!` is NOT only when it does not start `!=`
fn is_not_operator(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'!' && bytes.get(i + 1) != Some(&b'=')
}

/// Skip a quoted run starting at the opening quote at `start`.
///
/// Returns the index just past the closing quote, or the input length when
/// the quote is never closed. A backslash skips the following byte.
pub(crate) fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Split an expression into tokens, always terminated by an `Eof` token
pub(crate) fn tokenize(expression: &str) -> Result<Vec<Token<'_>>, ExpressionError> {
    let bytes = expression.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if is_logical_operator(bytes, i) {
            let kind = if b == b'&' { TokenKind::And } else { TokenKind::Or };
            tokens.push(Token::new(kind, &expression[i..i + 2], i));
            i += 2;
        } else if is_not_operator(bytes, i) {
            tokens.push(Token::new(TokenKind::Not, &expression[i..i + 1], i));
            i += 1;
        } else if b == b'(' {
            tokens.push(Token::new(TokenKind::LeftParen, &expression[i..i + 1], i));
            i += 1;
        } else if b == b')' {
            tokens.push(Token::new(TokenKind::RightParen, &expression[i..i + 1], i));
            i += 1;
        } else {
            let start = i;
            i = scan_literal(bytes, i);
            let literal = expression[start..i].trim();
            if literal.is_empty() {
                return Err(ExpressionError::EmptyLiteral { position: start });
            }
            tokens.push(Token::new(TokenKind::Literal, literal, start));
        }
    }

    tokens.push(Token::new(TokenKind::Eof, "", expression.len()));
    Ok(tokens)
}

/// Advance over a literal run and return the index where it ends.
///
/// The run stops, at paren depth zero and outside quotes, on `&&`, `||`, a
/// NOT operator, or an unmatched `)`.
fn scan_literal(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if is_quote(b) {
            i = skip_quoted(bytes, i);
            continue;
        }
        match b {
            b'(' => depth += 1,
            b')' if depth == 0 => break,
            b')' => depth -= 1,
            _ if depth == 0 && (is_logical_operator(bytes, i) || is_not_operator(bytes, i)) => {
                break
            }
            _ => {}
        }
        i += 1;
    }

    i.min(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    fn literals(input: &str) -> Vec<String> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Literal)
            .map(|t| t.value.to_string())
            .collect()
    }

    #[test]
    fn test_simple_operators() {
        assert_eq!(
            kinds("a && !b || (c)"),
            vec![
                TokenKind::Literal,
                TokenKind::And,
                TokenKind::Not,
                TokenKind::Literal,
                TokenKind::Or,
                TokenKind::LeftParen,
                TokenKind::Literal,
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_not_equals_stays_in_literal() {
        assert_eq!(literals("a != 'b'"), vec!["a != 'b'"]);
        assert_eq!(kinds("a != 'b'"), vec![TokenKind::Literal, TokenKind::Eof]);
    }

    #[test]
    fn test_function_call_is_one_literal() {
        assert_eq!(
            literals("contains(github.event.issue.body, '/bot') && success()"),
            vec!["contains(github.event.issue.body, '/bot')", "success()"]
        );
    }

    #[test]
    fn test_quoted_operators_are_not_split() {
        assert_eq!(literals("contains(x, '&&')"), vec!["contains(x, '&&')"]);
        assert_eq!(literals(r#"a == "x || y""#), vec![r#"a == "x || y""#]);
        assert_eq!(literals("a == `(`"), vec!["a == `(`"]);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        assert_eq!(literals(r"a == 'it\'s && more'"), vec![r"a == 'it\'s && more'"]);
    }

    #[test]
    fn test_unmatched_close_paren_ends_literal() {
        let tokens = tokenize("(a == b)").unwrap();
        assert_eq!(tokens[1].value, "a == b");
        assert_eq!(tokens[2].kind, TokenKind::RightParen);
        assert_eq!(tokens[2].position, 7);
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = tokenize("  a  &&  b").unwrap();
        assert_eq!(tokens[0].position, 2);
        assert_eq!(tokens[1].position, 5);
        assert_eq!(tokens[2].position, 9);
        assert_eq!(tokens[3].kind, TokenKind::Eof);
        assert_eq!(tokens[3].position, 10);
    }

    #[test]
    fn test_unterminated_quote_consumes_rest() {
        assert_eq!(literals("a == 'open && b"), vec!["a == 'open && b"]);
    }

    #[test]
    fn test_blank_input_yields_only_eof() {
        assert_eq!(kinds("   "), vec![TokenKind::Eof]);
    }
}
