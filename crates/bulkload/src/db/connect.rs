use bulkload_core::{
    driver::{Driver, Provider},
    Result,
};

/// Opens the built-in driver for `provider`.
pub(super) fn driver(provider: Provider, url: &str) -> Result<Box<dyn Driver>> {
    match provider {
        Provider::Mysql => mysql(url),
        Provider::Postgresql => postgresql(url),
        Provider::Sqlite => sqlite(url),
    }
}

#[cfg(feature = "mysql")]
fn mysql(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(bulkload_driver_mysql::MySQL::new(url)?))
}

#[cfg(not(feature = "mysql"))]
fn mysql(_url: &str) -> Result<Box<dyn Driver>> {
    Err(bulkload_core::Error::configuration("`mysql` feature not enabled"))
}

#[cfg(feature = "postgresql")]
fn postgresql(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(bulkload_driver_postgresql::PostgreSQL::new(url)?))
}

#[cfg(not(feature = "postgresql"))]
fn postgresql(_url: &str) -> Result<Box<dyn Driver>> {
    Err(bulkload_core::Error::configuration("`postgresql` feature not enabled"))
}

#[cfg(feature = "sqlite")]
fn sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(bulkload_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(bulkload_core::Error::configuration("`sqlite` feature not enabled"))
}
