use super::Serializer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Flavor {
    pub(super) fn is_sqlite(self) -> bool {
        matches!(self, Flavor::Sqlite)
    }

    pub(super) fn is_mysql(self) -> bool {
        matches!(self, Flavor::Mysql)
    }

    pub(super) fn is_postgresql(self) -> bool {
        matches!(self, Flavor::Postgresql)
    }

    /// Identifier quote character.
    pub(super) fn quote(self) -> char {
        match self {
            Flavor::Mysql => '`',
            Flavor::Postgresql | Flavor::Sqlite => '"',
        }
    }
}

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }
}
