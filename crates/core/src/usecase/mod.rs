//! Presentation-facing queries composed from the repository.
//!
//! Each use case holds a shared [`Repository`](crate::repository::Repository)
//! and returns cold streams, so a screen can subscribe, cancel and
//! resubscribe freely.

mod detail;
mod launch;
mod table;

pub use detail::DetailUseCase;
pub use launch::LaunchUseCase;
pub use table::{TableDataSourceUseCase, TableUseCase};
