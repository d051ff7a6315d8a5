use std::sync::Arc;

use futures::stream::BoxStream;

use crate::repository::{RepoStream, Repository, RepositoryError};
use crate::streams::{materialize, StreamEvent};

/// Startup work: make the datasets resident before the first screen.
#[derive(Clone)]
pub struct LaunchUseCase {
    repository: Arc<dyn Repository>,
}

impl LaunchUseCase {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Load both datasets.
    pub fn warm_up(&self) -> RepoStream<()> {
        self.repository.load_all()
    }

    /// [`warm_up`](Self::warm_up) as events, ending in `Completed` or `Error`.
    pub fn warm_up_events(&self) -> BoxStream<'static, StreamEvent<(), RepositoryError>> {
        materialize(self.warm_up())
    }
}
