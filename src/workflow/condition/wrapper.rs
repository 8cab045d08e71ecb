// SPDX-License-Identifier: MIT

//! `${{ ... }}` delimiter handling

const OPEN: &str = "${{";
const CLOSE: &str = "}}";

/// Remove a surrounding `${{ }}` pair, if present, and trim the result
pub fn strip_expression_wrapper(expression: &str) -> &str {
    let trimmed = expression.trim();
    match trimmed
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
    {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

pub fn wrap_expression(expression: &str) -> String {
    format!("{} {} {}", OPEN, expression.trim(), CLOSE)
}

/// Inner text of every `${{ ... }}` occurrence in `text`, in order.
///
/// An opening delimiter without a matching close is ignored.
pub fn find_expressions(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(OPEN) {
        let after = &rest[open + OPEN.len()..];
        let Some(close) = after.find(CLOSE) else {
            break;
        };
        found.push(after[..close].trim());
        rest = &after[close + CLOSE.len()..];
    }
    found
}
