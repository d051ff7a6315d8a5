use std::sync::Arc;

use futures::stream::{StreamExt, TryStreamExt};

use crate::assets::{AnimatedImage, Sprite};
use crate::repository::{RepoStream, Repository};
use crate::streams::zip2;

/// Queries behind the entry detail screen.
#[derive(Clone)]
pub struct DetailUseCase {
    repository: Arc<dyn Repository>,
}

impl DetailUseCase {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Primary animation followed by the secondary ones.
    ///
    /// Both lookups run concurrently. When the primary animation is missing
    /// the result is empty even if secondaries were found. Completes without
    /// emitting when the entry has no alias.
    pub fn find_all_images(&self, number: u32) -> RepoStream<Vec<AnimatedImage>> {
        zip2(
            self.repository.find_primary_animation(number),
            self.repository.find_other_animations(number),
        )
        .map_ok(|(primary, others)| match primary {
            Some(primary) => std::iter::once(primary).chain(others).collect(),
            None => Vec::new(),
        })
        .boxed()
    }

    pub fn find_sprite(&self, number: u32) -> RepoStream<Option<Sprite>> {
        self.repository.find_sprite(number)
    }
}
