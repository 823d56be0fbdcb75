//! Update command templates with `@name` placeholders bound to batch columns.

use crate::Serializer;

use bulkload_core::{batch::Column, stmt::Value, Error, Result};
use regex::Regex;
use std::{ops::Range, sync::LazyLock};

/// Matches quoted literals and quoted identifiers so they can be skipped,
/// `@@system` variables so they can be skipped, and `@name` parameters.
static TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"'(?:[^']|'')*'|"(?:[^"]|"")*"|`[^`]*`|\[[^\]]*\]|@@[A-Za-z_][A-Za-z0-9_]*|@([A-Za-z_][A-Za-z0-9_]*)"#,
    )
    .expect("invalid template token regex")
});

/// A parsed update command.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    text: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone)]
struct Token {
    /// Placeholder name without the sigil
    name: String,

    /// Byte range of the placeholder, sigil included
    span: Range<usize>,
}

/// A distinct placeholder and the batch column supplying its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub source_column: usize,
}

/// A template rewritten for one dialect.
#[derive(Debug, Clone)]
pub struct BoundCommand {
    /// Statement text with dialect placeholders
    pub sql: String,

    /// Distinct parameters in order of first appearance
    pub parameters: Vec<Parameter>,

    /// Source column of each positional bind parameter
    pub order: Vec<usize>,
}

impl CommandTemplate {
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();

        if text.trim().is_empty() {
            return Err(Error::validation_blank_command());
        }

        let tokens = TOKENS
            .captures_iter(&text)
            .filter_map(|captures| {
                let name = captures.get(1)?;
                Some(Token {
                    name: name.as_str().to_string(),
                    span: name.start() - 1..name.end(),
                })
            })
            .collect();

        Ok(Self { text, tokens })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Distinct placeholder names in order of first appearance. Names are
    /// compared ignoring ASCII case, as column names are.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        for token in &self.tokens {
            let seen = names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&token.name));
            if !seen {
                names.push(&token.name);
            }
        }
        names
    }

    /// Binds every distinct placeholder to the column of the same name.
    ///
    /// Fails on the first placeholder that has no column.
    pub fn bind(&self, columns: &[Column]) -> Result<Vec<Parameter>> {
        self.parameter_names()
            .into_iter()
            .map(|name| {
                let source_column = columns
                    .iter()
                    .position(|column| column.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| Error::validation_unbound_parameter(name))?;

                Ok(Parameter {
                    name: name.to_string(),
                    source_column,
                })
            })
            .collect()
    }

    /// Binds the template and rewrites it in the serializer's placeholder
    /// syntax.
    ///
    /// Numbered dialects reuse one parameter for repeated placeholders. MySQL
    /// placeholders are purely positional, so each occurrence is bound
    /// separately.
    pub fn render(&self, serializer: &Serializer, columns: &[Column]) -> Result<BoundCommand> {
        let parameters = self.bind(columns)?;

        let mut sql = String::with_capacity(self.text.len());
        let mut order = vec![];
        let mut pos = 0;

        for token in &self.tokens {
            sql.push_str(&self.text[pos..token.span.start]);
            pos = token.span.end;

            let index = parameters
                .iter()
                .position(|param| param.name.eq_ignore_ascii_case(&token.name))
                .ok_or_else(|| Error::validation_unbound_parameter(&token.name))?;

            if serializer.positional_only() {
                order.push(parameters[index].source_column);
                sql.push_str(&serializer.placeholder(order.len()));
            } else {
                sql.push_str(&serializer.placeholder(index + 1));
            }
        }
        sql.push_str(&self.text[pos..]);

        if !serializer.positional_only() {
            order = parameters.iter().map(|param| param.source_column).collect();
        }

        Ok(BoundCommand {
            sql,
            parameters,
            order,
        })
    }
}

impl BoundCommand {
    /// Picks the bind values for one row out of its rendered values.
    pub fn bind_row(&self, row: &[Value]) -> Vec<Value> {
        self.order
            .iter()
            .map(|&column| row[column].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkload_core::stmt::Type;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Id", Type::I32),
            Column::new("Name", Type::String),
            Column::new("Email", Type::String),
        ]
    }

    #[test]
    fn blank_template_rejected() {
        let err = CommandTemplate::parse("  \n").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn extracts_distinct_names() {
        let template =
            CommandTemplate::parse("UPDATE t SET Name = @Name, Alias = @name WHERE Id = @Id")
                .unwrap();
        assert_eq!(template.parameter_names(), ["Name", "Id"]);
    }

    #[test]
    fn skips_literals_and_system_variables() {
        let template = CommandTemplate::parse(
            "UPDATE t SET Email = 'x@y.z', Note = \"@Quoted\", Seen = @@ROWCOUNT WHERE Id = @Id",
        )
        .unwrap();
        assert_eq!(template.parameter_names(), ["Id"]);
    }

    #[test]
    fn unknown_placeholder_fails_binding() {
        let template = CommandTemplate::parse("UPDATE t SET Age = @Age WHERE Id = @Id").unwrap();
        let err = template.bind(&columns()).unwrap_err();
        assert!(err.is_unbound_parameter());
        assert!(err.to_string().contains("@Age"));
    }

    #[test]
    fn bind_ignores_case() {
        let template = CommandTemplate::parse("UPDATE t SET Name = @NAME WHERE Id = @id").unwrap();
        let params = template.bind(&columns()).unwrap();
        assert_eq!(params[0].source_column, 1);
        assert_eq!(params[1].source_column, 0);
    }
}
