// SPDX-License-Identifier: MIT

//! Width-constrained line breaking for rendered conditions
//!
//! Output lines are meant to be joined back with spaces (for example by a
//! YAML folded scalar). A break is only ever placed where the input already
//! has whitespace, so joining the lines and collapsing whitespace gives back
//! the original text.

use super::tokenizer::{is_logical_operator, is_quote, skip_quoted};

/// Longest line the breaker tries to produce
pub const MAX_EXPRESSION_LINE_LENGTH: usize = 120;

/// Length after which a line is flushed at the next operator
pub const EXPRESSION_BREAK_THRESHOLD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreaker {
    pub max_line_length: usize,
    pub break_threshold: usize,
}

impl Default for LineBreaker {
    fn default() -> Self {
        Self {
            max_line_length: MAX_EXPRESSION_LINE_LENGTH,
            break_threshold: EXPRESSION_BREAK_THRESHOLD,
        }
    }
}

/// Break with the default limits
pub fn break_long_expression(expression: &str) -> Vec<String> {
    LineBreaker::default().break_expression(expression)
}

impl LineBreaker {
    pub fn new(max_line_length: usize, break_threshold: usize) -> Self {
        Self {
            max_line_length,
            break_threshold,
        }
    }

    /// Split `expression` into lines.
    ///
    /// Short input comes back unchanged as a single line. Longer input is
    /// broken after `&&`/`||` operators outside quotes; lines still over the
    /// limit are then broken after top-level parenthesised groups. A run with
    /// neither may stay over the limit.
    pub fn break_expression(&self, expression: &str) -> Vec<String> {
        if expression.len() <= self.max_line_length {
            return vec![expression.to_string()];
        }

        let lines: Vec<String> = self
            .break_at_operators(expression)
            .into_iter()
            .flat_map(|line| {
                if line.len() > self.max_line_length {
                    self.break_at_parentheses(&line)
                } else {
                    vec![line]
                }
            })
            .collect();

        log::debug!(
            "broke {}-byte expression into {} lines",
            expression.len(),
            lines.len()
        );
        lines
    }

    fn break_at_operators(&self, expression: &str) -> Vec<String> {
        let bytes = expression.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        // Last operator on the current line that a break could follow
        let mut candidate: Option<usize> = None;
        let mut i = 0;

        while i < bytes.len() {
            if is_quote(bytes[i]) {
                i = skip_quoted(bytes, i);
                continue;
            }
            if !is_logical_operator(bytes, i) {
                i += 1;
                continue;
            }

            i += 2;
            if expression[start..i].trim().len() > self.max_line_length {
                if let Some(end) = candidate.take() {
                    push_line(&mut lines, &expression[start..end]);
                    start = skip_whitespace(bytes, end);
                }
            }
            if !bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                continue;
            }
            if expression[start..i].trim().len() > self.break_threshold {
                push_line(&mut lines, &expression[start..i]);
                i = skip_whitespace(bytes, i);
                start = i;
                candidate = None;
            } else {
                candidate = Some(i);
            }
        }

        if expression[start..].trim().len() > self.max_line_length {
            if let Some(end) = candidate {
                push_line(&mut lines, &expression[start..end]);
                start = skip_whitespace(bytes, end);
            }
        }
        push_line(&mut lines, &expression[start..]);
        lines
    }

    fn break_at_parentheses(&self, line: &str) -> Vec<String> {
        let bytes = line.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut depth = 0i32;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b if is_quote(b) => {
                    i = skip_quoted(bytes, i);
                    continue;
                }
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 && i + 1 - start >= self.break_threshold {
                        if let Some(next) = self.group_break(bytes, i) {
                            let (end, resume) = next;
                            push_line(&mut lines, &line[start..end]);
                            start = resume;
                            i = resume;
                            continue;
                        }
                    }
                }
                _ => {}
            }
            i += 1;
        }

        push_line(&mut lines, &line[start..]);
        lines
    }

    /// Where to break after the balanced group closing at `close`.
    ///
    /// Prefers to keep a following operator on the current line. Returns the
    /// end of the current line and the start of the next one.
    fn group_break(&self, bytes: &[u8], close: usize) -> Option<(usize, usize)> {
        let after = close + 1;
        let j = skip_whitespace(bytes, after);
        if j >= bytes.len() {
            return None;
        }
        if is_logical_operator(bytes, j) {
            let end = j + 2;
            return match bytes.get(end) {
                Some(b) if b.is_ascii_whitespace() => Some((end, skip_whitespace(bytes, end))),
                _ => None,
            };
        }
        (j > after).then_some((after, j))
    }
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn push_line(lines: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
}
