//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - JSON syntax highlighting
//! - Small cell formatters for tables

use colored::Colorize;

/// Prints a JSON value, pretty-printed and syntax highlighted.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (bold)
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json));
}

/// Colors a JSON document. The text itself is left untouched.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut rest = json;

    while let Some(ch) = rest.chars().next() {
        let consumed = match ch {
            '"' => {
                let end = string_literal_len(rest);
                let (token, tail) = rest.split_at(end);
                let painted = if tail.trim_start().starts_with(':') {
                    token.cyan()
                } else {
                    token.green()
                };
                out.push_str(&painted.to_string());
                end
            }
            '{' | '}' | '[' | ']' => {
                out.push_str(&ch.to_string().white().bold().to_string());
                1
            }
            ':' | ',' => {
                out.push_str(&ch.to_string().white().to_string());
                1
            }
            c if c.is_whitespace() => {
                out.push(c);
                c.len_utf8()
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | ']' | '}'))
                    .unwrap_or(rest.len());
                let token = &rest[..end];
                let painted = match token {
                    "true" | "false" | "null" => token.magenta(),
                    _ if token.parse::<f64>().is_ok() => token.yellow(),
                    _ => token.normal(),
                };
                out.push_str(&painted.to_string());
                end
            }
        };
        rest = &rest[consumed..];
    }

    out
}

/// Byte length of the string literal opening `s`, quotes included.
fn string_literal_len(s: &str) -> usize {
    let mut escaped = false;
    for (index, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return index + 1;
        }
    }
    s.len()
}

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{kept}…")
}

/// Formats a boolean as a colored check or cross.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Formats a coordinate pair without trailing zeros.
#[must_use]
pub fn format_pair(a: f64, b: f64) -> String { format!("{a}, {b}") }
