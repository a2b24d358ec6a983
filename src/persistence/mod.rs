//! The storage seam the commit path writes through.
//!
//! The import pipeline only needs two operations: create a development and create a unit under
//! an existing development. Anything backed by a real database implements
//! [`DevelopmentRepository`]; [`InMemoryRepository`] is provided for previews of a commit, tests
//! and benchmarks.

pub mod memory;

pub use memory::InMemoryRepository;

use crate::error::RepositoryError;
use crate::types::{Development, NewDevelopment, NewUnit, Unit};

/// Persistence collaborator for committed imports.
///
/// Calls are synchronous and made in encounter order: a development, then each of its units.
/// A returned error is recorded against that entity and the import carries on.
pub trait DevelopmentRepository {
    /// Store a development and return it with its generated identifier.
    fn create_development(&mut self, new: &NewDevelopment) -> Result<Development, RepositoryError>;

    /// Store a unit under `new.development_id` and return it with its generated identifier.
    fn create_unit(&mut self, new: &NewUnit) -> Result<Unit, RepositoryError>;
}

impl<R: DevelopmentRepository + ?Sized> DevelopmentRepository for &mut R {
    fn create_development(&mut self, new: &NewDevelopment) -> Result<Development, RepositoryError> {
        (**self).create_development(new)
    }

    fn create_unit(&mut self, new: &NewUnit) -> Result<Unit, RepositoryError> {
        (**self).create_unit(new)
    }
}

impl<R: DevelopmentRepository + ?Sized> DevelopmentRepository for Box<R> {
    fn create_development(&mut self, new: &NewDevelopment) -> Result<Development, RepositoryError> {
        (**self).create_development(new)
    }

    fn create_unit(&mut self, new: &NewUnit) -> Result<Unit, RepositoryError> {
        (**self).create_unit(new)
    }
}
