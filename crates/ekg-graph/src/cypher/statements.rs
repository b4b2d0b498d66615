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

//! Kuzu-dialect statements.
//!
//! Statements are rendered with values inlined as literals, the form the
//! embedded engine accepts for DDL and for single-row inserts.

use std::fmt;

use ekg_core::PropertyMap;
use serde::{Deserialize, Serialize};

use super::escape::{escape_identifier, escape_label, escape_relationship_type, quote_string};
use super::literal::to_literal;
use crate::plan::ColumnDef;

/// The kind of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    /// `DROP TABLE`.
    DropTable,
    /// `CREATE NODE TABLE`.
    CreateNodeTable,
    /// `CREATE REL TABLE`.
    CreateRelTable,
    /// Single node insert.
    CreateNode,
    /// Match-both-endpoints relationship insert.
    CreateRelationship,
    /// Any other query.
    Query,
}

/// A single statement with optional `$name` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherStatement {
    /// The statement text.
    pub query: String,
    /// Parameters substituted by [`CypherStatement::render_inline`].
    pub parameters: PropertyMap,
    /// Kind of statement.
    pub statement_type: StatementType,
}

impl CypherStatement {
    /// Create a new statement.
    pub fn new(query: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            query: query.into(),
            parameters: PropertyMap::new(),
            statement_type,
        }
    }

    /// Create a general query statement.
    pub fn query(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::Query)
    }

    /// `DROP TABLE name`.
    pub fn drop_table(name: &str) -> Self {
        Self::new(
            format!("DROP TABLE {}", escape_identifier(name)),
            StatementType::DropTable,
        )
    }

    /// `CREATE NODE TABLE name(col TYPE, .., PRIMARY KEY(pk))`.
    ///
    /// ```
    /// # use ekg_graph::cypher::CypherStatement;
    /// # use ekg_graph::{ColumnDef, ColumnType};
    /// let stmt = CypherStatement::create_node_table(
    ///     "Person",
    ///     &[ColumnDef::new("id", ColumnType::String), ColumnDef::new("age", ColumnType::Int64)],
    ///     "id",
    /// );
    /// assert_eq!(stmt.render_inline(), "CREATE NODE TABLE Person(id STRING, age INT64, PRIMARY KEY(id))");
    /// ```
    pub fn create_node_table(name: &str, columns: &[ColumnDef], primary_key: &str) -> Self {
        let mut parts: Vec<String> = columns.iter().map(column_ddl).collect();
        parts.push(format!("PRIMARY KEY({})", escape_identifier(primary_key)));
        Self::new(
            format!(
                "CREATE NODE TABLE {}({})",
                escape_identifier(name),
                parts.join(", ")
            ),
            StatementType::CreateNodeTable,
        )
    }

    /// `CREATE REL TABLE name(FROM a TO b, col TYPE, ..)`.
    pub fn create_rel_table(name: &str, from: &str, to: &str, properties: &[ColumnDef]) -> Self {
        let mut body = format!("FROM {} TO {}", escape_identifier(from), escape_identifier(to));
        for column in properties {
            body.push_str(", ");
            body.push_str(&column_ddl(column));
        }
        Self::new(
            format!("CREATE REL TABLE {}({})", escape_identifier(name), body),
            StatementType::CreateRelTable,
        )
    }

    /// `CREATE (:table {k: v, ..})`.
    pub fn create_node(table: &str, data: &PropertyMap) -> Self {
        let fields: Vec<String> = data
            .iter()
            .map(|(k, v)| format!("{}: {}", escape_identifier(k), to_literal(v)))
            .collect();
        Self::new(
            format!("CREATE ({} {{{}}})", escape_label(table), fields.join(", ")),
            StatementType::CreateNode,
        )
    }

    /// Match both endpoints by key, then connect them.
    ///
    /// ```
    /// # use ekg_graph::cypher::{CypherStatement, EdgeEndpoint};
    /// let stmt = CypherStatement::create_relationship(
    ///     "HAS_RISK",
    ///     &EdgeEndpoint::new("Deal", "id", "d1"),
    ///     &EdgeEndpoint::new("Risk", "id", "r1"),
    ///     &Default::default(),
    /// );
    /// assert_eq!(
    ///     stmt.render_inline(),
    ///     "MATCH (a:Deal), (b:Risk) WHERE a.id = 'd1' AND b.id = 'r1' CREATE (a)-[:HAS_RISK]->(b)"
    /// );
    /// ```
    pub fn create_relationship(
        relation: &str,
        from: &EdgeEndpoint<'_>,
        to: &EdgeEndpoint<'_>,
        properties: &PropertyMap,
    ) -> Self {
        let props = if properties.is_empty() {
            String::new()
        } else {
            let fields: Vec<String> = properties
                .iter()
                .map(|(k, v)| format!("{}: {}", escape_identifier(k), to_literal(v)))
                .collect();
            format!(" {{{}}}", fields.join(", "))
        };
        Self::new(
            format!(
                "MATCH (a{}), (b{}) WHERE a.{} = {} AND b.{} = {} CREATE (a)-[{}{}]->(b)",
                escape_label(from.table),
                escape_label(to.table),
                escape_identifier(from.key_column),
                quote_string(from.key),
                escape_identifier(to.key_column),
                quote_string(to.key),
                escape_relationship_type(relation),
                props
            ),
            StatementType::CreateRelationship,
        )
    }

    /// Add parameters to this statement.
    pub fn with_params(mut self, params: &PropertyMap) -> Self {
        self.parameters
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Render the statement with parameters inlined as literals.
    ///
    /// The query is scanned once. A `$` followed by the longest run of
    /// identifier characters names a parameter; text inside quotes or
    /// backticks is copied unchanged, as are unknown parameters. Inlined
    /// values are never scanned again.
    ///
    /// ```
    /// # use ekg_graph::cypher::CypherStatement;
    /// # use ekg_core::{PropertyMap, Value};
    /// let mut params = PropertyMap::new();
    /// params.insert("id".to_string(), Value::from("x"));
    /// let stmt = CypherStatement::query("RETURN $id, $identity, '$id'").with_params(&params);
    /// assert_eq!(stmt.render_inline(), "RETURN 'x', $identity, '$id'");
    /// ```
    pub fn render_inline(&self) -> String {
        let query = self.query.as_str();
        let mut out = String::with_capacity(query.len());
        let mut chars = query.char_indices().peekable();
        let mut quote: Option<char> = None;

        while let Some((_, c)) = chars.next() {
            if let Some(open) = quote {
                out.push(c);
                if c == '\\' && open != '`' {
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == open {
                    quote = None;
                }
                continue;
            }

            match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                '$' => {
                    let start = chars.peek().map(|&(i, _)| i).unwrap_or(query.len());
                    let mut end = start;
                    while let Some(&(i, next)) = chars.peek() {
                        if next != '_' && !next.is_alphanumeric() {
                            break;
                        }
                        end = i + next.len_utf8();
                        chars.next();
                    }
                    let name = &query[start..end];
                    match self.parameters.get(name) {
                        Some(value) if !name.is_empty() => out.push_str(&to_literal(value)),
                        _ => {
                            out.push('$');
                            out.push_str(name);
                        }
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }
}

impl fmt::Display for CypherStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.render_inline())
    }
}

/// One end of a relationship insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEndpoint<'a> {
    /// Node table.
    pub table: &'a str,
    /// Primary key column of the table.
    pub key_column: &'a str,
    /// Primary key value.
    pub key: &'a str,
}

impl<'a> EdgeEndpoint<'a> {
    /// Create an endpoint.
    pub fn new(table: &'a str, key_column: &'a str, key: &'a str) -> Self {
        Self {
            table,
            key_column,
            key,
        }
    }
}

fn column_ddl(column: &ColumnDef) -> String {
    format!("{} {}", escape_identifier(&column.name), column.ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ColumnType;
    use ekg_core::{EnumValue, Value};

    fn props(pairs: &[(&str, Value)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(CypherStatement::drop_table("Person").render_inline(), "DROP TABLE Person");
        assert_eq!(
            CypherStatement::drop_table("Person").statement_type,
            StatementType::DropTable
        );
    }

    #[test]
    fn test_create_node_table_escapes_names() {
        let stmt = CypherStatement::create_node_table(
            "Risk Analysis",
            &[
                ColumnDef::new("id", ColumnType::String),
                ColumnDef::new("from", ColumnType::String),
                ColumnDef::new("tags", ColumnType::StringList),
            ],
            "id",
        );
        assert_eq!(
            stmt.render_inline(),
            "CREATE NODE TABLE `Risk Analysis`(id STRING, `from` STRING, tags STRING[], PRIMARY KEY(id))"
        );
    }

    #[test]
    fn test_create_rel_table() {
        let stmt = CypherStatement::create_rel_table("HAS_CONTACT", "Customer", "Person", &[]);
        assert_eq!(
            stmt.render_inline(),
            "CREATE REL TABLE HAS_CONTACT(FROM Customer TO Person)"
        );

        let with_props = CypherStatement::create_rel_table(
            "HAS_CONTACT",
            "Customer",
            "Person",
            &[ColumnDef::new("since", ColumnType::Int64)],
        );
        assert_eq!(
            with_props.render_inline(),
            "CREATE REL TABLE HAS_CONTACT(FROM Customer TO Person, since INT64)"
        );
    }

    #[test]
    fn test_create_node_literals() {
        let data = props(&[
            ("id", Value::from("p1")),
            ("name", Value::from("O'Brien")),
            ("email", Value::Null),
            ("level", Value::from(EnumValue::new("Level", "Senior", "senior"))),
            ("tools", Value::from(vec!["dbt", "Airflow"])),
        ]);
        let stmt = CypherStatement::create_node("Person", &data);
        assert_eq!(
            stmt.render_inline(),
            "CREATE (:Person {email: NULL, id: 'p1', level: 'senior', name: 'O\\'Brien', tools: ['dbt','Airflow']})"
        );
    }

    #[test]
    fn test_create_relationship_escapes_keys() {
        let stmt = CypherStatement::create_relationship(
            "REVIEWS",
            &EdgeEndpoint::new("Review", "id", "it's"),
            &EdgeEndpoint::new("Opportunity", "id", "o1"),
            &PropertyMap::new(),
        );
        assert!(stmt.render_inline().contains("a.id = 'it\\'s'"));
    }

    #[test]
    fn test_create_relationship_with_properties() {
        let stmt = CypherStatement::create_relationship(
            "HAS_RISK",
            &EdgeEndpoint::new("Deal", "id", "d1"),
            &EdgeEndpoint::new("Risk", "id", "r1"),
            &props(&[("weight", Value::Int(3))]),
        );
        assert!(stmt.render_inline().ends_with("CREATE (a)-[:HAS_RISK {weight: 3}]->(b)"));
    }

    #[test]
    fn test_render_inline_parameters() {
        let stmt = CypherStatement::query("MATCH (p:Person) WHERE p.id = $id OR p.id = $id2 RETURN p")
            .with_params(&props(&[("id", Value::from("a")), ("id2", Value::from("b"))]));
        assert_eq!(
            stmt.render_inline(),
            "MATCH (p:Person) WHERE p.id = 'a' OR p.id = 'b' RETURN p"
        );
        assert_eq!(
            stmt.to_string(),
            "MATCH (p:Person) WHERE p.id = 'a' OR p.id = 'b' RETURN p;"
        );
    }

    #[test]
    fn test_render_inline_does_not_rescan_values() {
        let stmt = CypherStatement::query("MATCH (p) WHERE p.note = $note AND p.id = $id")
            .with_params(&props(&[
                ("note", Value::from("costs $id")),
                ("id", Value::from("p1")),
            ]));
        assert_eq!(
            stmt.render_inline(),
            "MATCH (p) WHERE p.note = 'costs $id' AND p.id = 'p1'"
        );
    }

    #[test]
    fn test_render_inline_matches_whole_names() {
        let stmt = CypherStatement::query("RETURN $id, $identity")
            .with_params(&props(&[("id", Value::from("x"))]));
        assert_eq!(stmt.render_inline(), "RETURN 'x', $identity");

        let both = CypherStatement::query("RETURN $identity, $id").with_params(&props(&[
            ("id", Value::from("x")),
            ("identity", Value::Int(7)),
        ]));
        assert_eq!(both.render_inline(), "RETURN 7, 'x'");
    }

    #[test]
    fn test_render_inline_skips_quoted_text() {
        let stmt = CypherStatement::query(
            "MATCH (p:`$id`) WHERE p.a = 'it\\'s $id' AND p.b = \"$id\" RETURN $id, $",
        )
        .with_params(&props(&[("id", Value::from("x"))]));
        assert_eq!(
            stmt.render_inline(),
            "MATCH (p:`$id`) WHERE p.a = 'it\\'s $id' AND p.b = \"$id\" RETURN 'x', $"
        );
    }
}
