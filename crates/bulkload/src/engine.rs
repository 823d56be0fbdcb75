mod batch_update;
pub use batch_update::BatchUpdate;

mod bulk_load;
pub use bulk_load::{BulkLoad, TRACKER_COLUMN};

mod cleanup;

mod correlate;

mod populate;
pub use populate::{populate, populate_tuples, project};

mod session;
pub(crate) use session::{Session, Target};
