use crate::Setup;

/// Runs one test on its own runtime and drops the test's tables afterwards,
/// including when the test panics.
pub struct BulkloadTest<S: Setup> {
    runtime: tokio::runtime::Runtime,
    setup: Option<S>,
}

impl<S: Setup> BulkloadTest<S> {
    /// Create a new test with a current-thread runtime.
    pub fn new(setup: S) -> Self {
        crate::init_tracing();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        Self {
            runtime,
            setup: Some(setup),
        }
    }

    pub fn run_test<'a, F, Fut>(&'a mut self, test_fn: F)
    where
        F: FnOnce(&'a S) -> Fut,
        Fut: std::future::Future<Output = ()> + 'a,
    {
        let setup = self.setup.as_ref().expect("Setup already consumed");
        self.runtime.block_on(test_fn(setup));
    }
}

impl<S: Setup> Drop for BulkloadTest<S> {
    fn drop(&mut self) {
        if let Some(setup) = self.setup.take() {
            self.runtime.block_on(async {
                let _ = setup.cleanup_my_tables().await;
            });
        }
    }
}
