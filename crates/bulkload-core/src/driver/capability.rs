/// What a provider's bulk channel can honor.
///
/// The engine reports options a provider cannot honor instead of failing.
#[derive(Debug)]
pub struct Capability {
    /// The bulk channel can take a table-level lock for the transfer.
    pub table_lock: bool,

    /// Constraint checking can be switched off for the transfer.
    pub toggle_check_constraints: bool,

    /// Triggers can be switched off for the transfer.
    pub toggle_triggers: bool,

    /// Schema changes take part in the surrounding transaction. When false,
    /// DDL implicitly commits any open transaction.
    pub transactional_ddl: bool,

    /// Maximum number of bind parameters a single statement may carry.
    pub max_params: usize,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        table_lock: true,
        toggle_check_constraints: true,
        toggle_triggers: false,
        transactional_ddl: true,
        // SQLITE_MAX_VARIABLE_NUMBER since 3.32
        max_params: 32_766,
    };

    /// MySQL capabilities.
    pub const MYSQL: Self = Self {
        table_lock: false,
        toggle_check_constraints: true,
        transactional_ddl: false,
        max_params: 65_535,
        ..Self::SQLITE
    };

    /// PostgreSQL capabilities. The COPY channel does not bind parameters.
    pub const POSTGRESQL: Self = Self {
        table_lock: true,
        toggle_check_constraints: false,
        transactional_ddl: true,
        max_params: 65_535,
        ..Self::SQLITE
    };
}
