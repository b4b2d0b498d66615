// Dweve EKG - Enterprise Knowledge Graph
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Escaping for Cypher string literals and identifiers.
//!
//! Table names, column names and relationship names come from model and
//! declaration names, and property values come from extracted documents.
//! Both are escaped before they are spliced into statement text.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::config::LoadConfig;
use crate::error::{GraphError, Result};

/// Check a string property against the configured length limit.
///
/// # Examples
///
/// ```
/// # use ekg_graph::cypher::validate_string_length;
/// # use ekg_graph::LoadConfig;
/// let config = LoadConfig::default().with_max_string_length(8);
/// assert!(validate_string_length("short", "name", &config).is_ok());
/// assert!(validate_string_length("far too long", "name", &config).is_err());
/// ```
pub fn validate_string_length(s: &str, property: &str, config: &LoadConfig) -> Result<()> {
    if let Some(max_length) = config.max_string_length {
        let length = s.len();
        if length > max_length {
            return Err(GraphError::StringLengthExceeded {
                length,
                max_length,
                property: property.to_string(),
            });
        }
    }
    Ok(())
}

#[inline]
fn needs_escaping(s: &str) -> bool {
    s.chars()
        .any(|ch| matches!(ch, '\\' | '\'' | '"' | '\n' | '\r' | '\t' | '\x00'))
}

/// Escape a string value for use inside a single-quoted Cypher literal.
///
/// Clean strings are returned borrowed.
///
/// ```
/// # use ekg_graph::cypher::escape_string;
/// assert!(matches!(escape_string("Acme"), std::borrow::Cow::Borrowed(_)));
/// assert_eq!(escape_string("O'Brien"), "O\\'Brien");
/// ```
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !needs_escaping(s) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\x00' => escaped.push_str("\\u0000"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Quote a string value with single quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// Check if a string is a plain identifier: a letter or underscore followed
/// by letters, digits and underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Normalize a string to NFC form.
///
/// ```
/// # use ekg_graph::cypher::normalize_unicode;
/// assert_eq!(normalize_unicode("cafe\u{0301}"), "caf\u{e9}");
/// ```
pub fn normalize_unicode(s: &str) -> String {
    s.nfc().collect()
}

/// Control, zero-width, bidirectional and other invisible format characters.
fn is_dangerous_unicode(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{200B}'
                | '\u{200C}'
                | '\u{200D}'
                | '\u{FEFF}'
                | '\u{202A}'
                | '\u{202B}'
                | '\u{202C}'
                | '\u{202D}'
                | '\u{202E}'
                | '\u{2066}'
                | '\u{2067}'
                | '\u{2068}'
                | '\u{2069}'
                | '\u{00AD}'
                | '\u{061C}'
                | '\u{180E}'
        )
}

fn sanitize(s: &str) -> String {
    normalize_unicode(s)
        .chars()
        .filter(|c| !is_dangerous_unicode(*c))
        .collect()
}

/// Escape a table, column or relationship name.
///
/// The name is NFC-normalized and stripped of invisible characters. Plain
/// identifiers that are not keywords are returned as-is; everything else is
/// back-tick quoted. A name with nothing left after sanitizing becomes a
/// placeholder spelled from its code points (`_unnamed` when it was empty).
///
/// ```
/// # use ekg_graph::cypher::escape_identifier;
/// assert_eq!(escape_identifier("Person"), "Person");
/// assert_eq!(escape_identifier("_name"), "_name");
/// assert_eq!(escape_identifier("2fa"), "`2fa`");
/// assert_eq!(escape_identifier("FROM"), "`FROM`");
/// assert_eq!(escape_identifier("\u{200B}"), "_u200b");
/// ```
pub fn escape_identifier(s: &str) -> String {
    let sanitized = sanitize(s);
    if sanitized.is_empty() {
        return placeholder(s);
    }
    if is_valid_identifier(&sanitized) && !is_keyword(&sanitized) {
        sanitized
    } else {
        format!("`{}`", sanitized.replace('`', "``"))
    }
}

fn placeholder(s: &str) -> String {
    if s.is_empty() {
        return "_unnamed".to_string();
    }
    s.chars().fold(String::new(), |mut out, c| {
        out.push_str(&format!("_u{:x}", c as u32));
        out
    })
}

/// Escape a node label, prefixed with `:`.
///
/// ```
/// # use ekg_graph::cypher::escape_label;
/// assert_eq!(escape_label("Person"), ":Person");
/// assert_eq!(escape_label("Risk Analysis"), ":`Risk Analysis`");
/// ```
pub fn escape_label(s: &str) -> String {
    format!(":{}", escape_identifier(s))
}

/// Escape a relationship type, prefixed with `:`.
///
/// ```
/// # use ekg_graph::cypher::escape_relationship_type;
/// assert_eq!(escape_relationship_type("HAS_RISK"), ":HAS_RISK");
/// ```
pub fn escape_relationship_type(s: &str) -> String {
    format!(":{}", escape_identifier(s))
}

/// Cypher keywords plus the Kuzu DDL words that cannot be bare names.
fn is_keyword(s: &str) -> bool {
    matches!(
        s.to_uppercase().as_str(),
        "ALL"
            | "AND"
            | "ANY"
            | "AS"
            | "ASC"
            | "ASCENDING"
            | "BY"
            | "CALL"
            | "CASE"
            | "CONTAINS"
            | "COPY"
            | "COUNT"
            | "CREATE"
            | "DELETE"
            | "DESC"
            | "DESCENDING"
            | "DETACH"
            | "DISTINCT"
            | "DO"
            | "DROP"
            | "ELSE"
            | "END"
            | "ENDS"
            | "EXISTS"
            | "FALSE"
            | "FILTER"
            | "FOREACH"
            | "FROM"
            | "GROUP"
            | "IN"
            | "IS"
            | "KEY"
            | "LIMIT"
            | "MANDATORY"
            | "MATCH"
            | "MERGE"
            | "NODE"
            | "NONE"
            | "NOT"
            | "NULL"
            | "OF"
            | "ON"
            | "OPTIONAL"
            | "OR"
            | "ORDER"
            | "PRIMARY"
            | "REDUCE"
            | "REL"
            | "RELATIONSHIP"
            | "REMOVE"
            | "RETURN"
            | "SET"
            | "SINGLE"
            | "SKIP"
            | "SOME"
            | "STARTS"
            | "TABLE"
            | "THEN"
            | "TO"
            | "TRUE"
            | "UNION"
            | "UNIQUE"
            | "UNWIND"
            | "USING"
            | "WHEN"
            | "WHERE"
            | "WITH"
            | "XOR"
            | "YIELD"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string_clean_is_borrowed() {
        assert_eq!(escape_string("Globex Data Platform").as_ref(), "Globex Data Platform");
        assert!(matches!(escape_string("Acme"), Cow::Borrowed(_)));
        assert!(matches!(escape_string(""), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_string_quotes() {
        assert_eq!(escape_string("it's").as_ref(), "it\\'s");
        assert_eq!(escape_string(r#"say "hi""#).as_ref(), r#"say \"hi\""#);
    }

    #[test]
    fn test_escape_string_control_characters() {
        assert_eq!(escape_string(r"a\b").as_ref(), r"a\\b");
        assert_eq!(escape_string("l1\nl2").as_ref(), r"l1\nl2");
        assert_eq!(escape_string("c1\tc2\r").as_ref(), r"c1\tc2\r");
        assert_eq!(escape_string("x\x00y").as_ref(), r"x\u0000y");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("Acme"), "'Acme'");
        assert_eq!(quote_string("O'Brien"), "'O\\'Brien'");
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("Person"));
        assert!(is_valid_identifier("_created_at"));
        assert!(is_valid_identifier("financial_metrics_tcv"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("9lives"));
        assert!(!is_valid_identifier("risk-level"));
        assert!(!is_valid_identifier("naïve"));
    }

    #[test]
    fn test_escape_identifier_keywords() {
        assert_eq!(escape_identifier("match"), "`match`");
        assert_eq!(escape_identifier("to"), "`to`");
        assert_eq!(escape_identifier("Table"), "`Table`");
        assert_eq!(escape_identifier("REVIEWS"), "REVIEWS");
    }

    #[test]
    fn test_escape_identifier_backticks_doubled() {
        assert_eq!(escape_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_escape_identifier_strips_invisible_characters() {
        assert_eq!(escape_identifier("Per\u{200B}son"), "Person");
        assert_eq!(escape_identifier("na\u{202E}me"), "name");
        assert_eq!(escape_identifier("id\u{0000}"), "id");
    }

    #[test]
    fn test_escape_identifier_never_empty() {
        assert_eq!(escape_identifier(""), "_unnamed");
        assert_eq!(escape_identifier("\u{200B}"), "_u200b");
        assert_eq!(escape_identifier("\u{200B}\u{202E}"), "_u200b_u202e");
        assert_eq!(escape_label("\u{FEFF}"), ":_ufeff");
        assert!(is_valid_identifier(&escape_identifier("\u{0000}")));
    }

    #[test]
    fn test_escape_identifier_normalizes() {
        let composed = escape_identifier("caf\u{e9}");
        let decomposed = escape_identifier("cafe\u{0301}");
        assert_eq!(composed, decomposed);
    }

    #[test]
    fn test_validate_string_length_unlimited() {
        let config = LoadConfig::default();
        assert!(validate_string_length(&"x".repeat(100_000), "notes", &config).is_ok());
    }

    #[test]
    fn test_validate_string_length_exceeded() {
        let config = LoadConfig::default().with_max_string_length(3);
        match validate_string_length("abcd", "notes", &config) {
            Err(GraphError::StringLengthExceeded {
                length,
                max_length,
                property,
            }) => {
                assert_eq!(length, 4);
                assert_eq!(max_length, 3);
                assert_eq!(property, "notes");
            }
            other => panic!("expected StringLengthExceeded, got {:?}", other),
        }
    }
}
