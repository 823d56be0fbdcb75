use super::{connect, Config, Db};

use bulkload_core::{
    driver::{BulkCopyOptions, Driver, Provider},
    Error, Result,
};
use url::Url;

/// Rows per round trip when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

#[derive(Debug, Default)]
pub struct Builder {
    provider: Option<Provider>,
    url: Option<String>,
    driver: Option<Box<dyn Driver>>,
    batch_size: Option<usize>,
    bulk_options: Option<BulkCopyOptions>,
}

impl Builder {
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: Some(config.provider),
            url: Some(config.url.clone()),
            driver: None,
            batch_size: Some(config.batch_size),
            bulk_options: Some(config.bulk_options),
        }
    }

    /// Selects the provider the connection URL is opened with.
    pub fn provider(&mut self, provider: Provider) -> &mut Self {
        self.provider = Some(provider);
        self
    }

    pub fn connection_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    /// Uses an already constructed driver instead of a connection URL.
    pub fn driver(&mut self, driver: impl Driver) -> &mut Self {
        self.driver = Some(Box::new(driver));
        self
    }

    pub fn batch_size(&mut self, batch_size: usize) -> &mut Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn bulk_options(&mut self, options: BulkCopyOptions) -> &mut Self {
        self.bulk_options = Some(options);
        self
    }

    pub async fn build(&mut self) -> Result<Db> {
        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);

        if batch_size == 0 {
            return Err(Error::configuration("batch size must be greater than zero"));
        }

        let driver = match (self.driver.take(), &self.url) {
            (Some(driver), _) => {
                if let Some(provider) = self.provider {
                    if provider != driver.provider() {
                        return Err(Error::configuration(format!(
                            "driver is for `{}` but the provider is set to `{provider}`",
                            driver.provider()
                        )));
                    }
                }
                driver
            }
            (None, Some(url)) => {
                let Some(provider) = self.provider else {
                    return Err(Error::configuration(
                        "a provider must be selected to open a connection URL",
                    ));
                };

                let parsed = Url::parse(url)?;
                if !provider.accepts_scheme(parsed.scheme()) {
                    return Err(Error::configuration(format!(
                        "connection URL scheme `{}` does not match provider `{provider}`",
                        parsed.scheme()
                    )));
                }

                connect::driver(provider, url)?
            }
            (None, None) => {
                return Err(Error::configuration(
                    "neither a driver nor a connection URL is configured",
                ))
            }
        };

        tracing::debug!(
            provider = %driver.provider(),
            url = %driver.url(),
            batch_size,
            "database configured"
        );

        Ok(Db::new(
            driver,
            batch_size,
            self.bulk_options.unwrap_or_default(),
        ))
    }
}
