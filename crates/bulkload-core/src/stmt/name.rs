use std::fmt;

/// A possibly schema-qualified table identifier, e.g. `dbo.users`.
///
/// Parts are stored unquoted; quoting is applied by the serializer for the
/// active SQL dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name(pub Vec<String>);

impl Name {
    /// Parses a dotted identifier, stripping any `[..]`, `".."` or `` `..` ``
    /// quoting around each part.
    pub fn parse(src: &str) -> Self {
        Self(
            src.split('.')
                .map(|part| unquote(part.trim()).to_string())
                .filter(|part| !part.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|part| part.trim().is_empty())
    }

    /// The unqualified table name.
    pub fn table(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// The schema qualifier, if any.
    pub fn schema(&self) -> Option<&str> {
        match &self.0[..] {
            [.., schema, _] => Some(schema.as_str()),
            _ => None,
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

fn unquote(part: &str) -> &str {
    for (open, close) in [('[', ']'), ('"', '"'), ('`', '`')] {
        if let Some(inner) = part
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner;
        }
    }
    part
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<&String> for Name {
    fn from(value: &String) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = "";
        for ident in &self.0 {
            write!(f, "{s}{ident}")?;
            s = ".";
        }

        Ok(())
    }
}
