mod capability;
pub use capability::Capability;

mod options;
pub use options::BulkCopyOptions;

pub mod operation;
pub use operation::Operation;

mod provider;
pub use provider::Provider;

mod response;
pub use response::{Response, Rows};

use crate::{async_trait, Result};

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The database family this driver talks to. Statement text is rendered
    /// for this provider's dialect.
    fn provider(&self) -> Provider;

    /// Returns the URL this driver is connecting to.
    fn url(&self) -> Cow<'_, str>;

    /// Describes what the driver's bulk channel supports.
    fn capability(&self) -> &'static Capability {
        self.provider().capability()
    }

    /// Creates a new connection to the database.
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
