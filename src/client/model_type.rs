//! Fetch-once model type cache shared by both execution modes.

use crate::types::ModelType;
use crate::{Error, Result};
use once_cell::sync::OnceCell;

/// Lazily resolved model type for one client instance.
///
/// The cell is filled at most once. Concurrent first calls may both fetch
/// `info`; the fetch is idempotent and `record` keeps whichever value landed
/// first, so no lock is held across I/O.
#[derive(Debug, Default)]
pub(crate) struct ModelTypeCache {
    cell: OnceCell<ModelType>,
}

impl ModelTypeCache {
    pub(crate) fn cached(&self) -> Option<ModelType> {
        self.cell.get().copied()
    }

    /// Record a freshly fetched type and return the cached value.
    pub(crate) fn record(&self, model_type: ModelType) -> ModelType {
        *self.cell.get_or_init(|| model_type)
    }

    /// Fail fast when the resolved type is not what the verb needs.
    pub(crate) fn require(&self, expected: ModelType, actual: ModelType) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Error::TypeMismatch { expected, actual })
        }
    }
}
