use super::Capability;
use crate::Error;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The closed set of supported database families.
///
/// The provider is always chosen explicitly, by the driver or by
/// configuration, and never guessed from a connection at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Sqlite,
    Mysql,
    #[serde(alias = "postgres")]
    Postgresql,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Sqlite => "sqlite",
            Provider::Mysql => "mysql",
            Provider::Postgresql => "postgresql",
        }
    }

    pub fn capability(&self) -> &'static Capability {
        match self {
            Provider::Sqlite => &Capability::SQLITE,
            Provider::Mysql => &Capability::MYSQL,
            Provider::Postgresql => &Capability::POSTGRESQL,
        }
    }

    /// Returns `true` if a connection URL with `scheme` targets this provider.
    pub fn accepts_scheme(&self, scheme: &str) -> bool {
        match self {
            Provider::Sqlite => scheme == "sqlite",
            Provider::Mysql => scheme == "mysql",
            Provider::Postgresql => matches!(scheme, "postgresql" | "postgres"),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Provider::Sqlite),
            "mysql" => Ok(Provider::Mysql),
            "postgresql" | "postgres" => Ok(Provider::Postgresql),
            other => Err(Error::configuration(format!(
                "unknown provider `{other}`"
            ))),
        }
    }
}
